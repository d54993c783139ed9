mod help;
mod state;

use crate::orchestrator::{self, UiCommand};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use food_dashboard::api::FoodsApi;
use food_dashboard::form::{Field, FoodForm};
use food_dashboard::menu::MenuController;
use food_dashboard::model::MenuEvent;
use help::draw_help;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs},
    Terminal,
};
use state::{UiState, TAB_HELP, TAB_MENU};
use std::sync::Arc;
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::info;

pub async fn run(api: Arc<dyn FoodsApi>) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel::<MenuEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_handle = std::thread::spawn(move || run_threaded(event_rx, cmd_tx));

    let res = orchestrator::run_controller(MenuController::new(api), event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// What the event loop should do after a key press.
#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Send(UiCommand),
    Quit,
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    mut event_rx: UnboundedReceiver<MenuEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // The controller issues the initial load on its own.
    let mut state = UiState {
        in_flight: 1,
        ..Default::default()
    };
    state.menu.info = "Loading menu…".into();

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        while let Ok(ev) = event_rx.try_recv() {
            state.apply(ev);
        }

        if last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(&mut state, k) {
                    KeyOutcome::Continue => {}
                    KeyOutcome::Send(cmd) => {
                        state.in_flight += 1;
                        let _ = cmd_tx.send(cmd);
                    }
                    KeyOutcome::Quit => {
                        let _ = cmd_tx.send(UiCommand::Quit);
                        break Ok(());
                    }
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    info!("dashboard closed");
    res
}

fn handle_key(state: &mut UiState, k: KeyEvent) -> KeyOutcome {
    if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
        return KeyOutcome::Quit;
    }
    if state.menu.create_modal.is_open() {
        return handle_create_form_key(state, k);
    }
    if state.menu.edit_modal.is_open() {
        return handle_edit_form_key(state, k);
    }

    match k.code {
        KeyCode::Char('q') => return KeyOutcome::Quit,
        KeyCode::Tab => {
            state.tab = if state.tab == TAB_MENU { TAB_HELP } else { TAB_MENU };
            return KeyOutcome::Continue;
        }
        KeyCode::Char('?') => {
            state.tab = TAB_HELP;
            return KeyOutcome::Continue;
        }
        _ => {}
    }
    if state.tab != TAB_MENU {
        return KeyOutcome::Continue;
    }

    match k.code {
        KeyCode::Char('r') => {
            state.menu.info = "Reloading…".into();
            KeyOutcome::Send(UiCommand::Reload)
        }
        KeyCode::Char('n') => {
            state.create_form = FoodForm::for_create();
            state.form_error = None;
            state.menu.begin_create();
            KeyOutcome::Continue
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(item) = state.selected_food().cloned() {
                state.edit_form = FoodForm::for_edit(&item);
                state.form_error = None;
                state.menu.begin_edit(item);
            }
            KeyOutcome::Continue
        }
        KeyCode::Char('d') => match state.selected_food().map(|f| (f.id, f.name.clone())) {
            Some((id, name)) => {
                state.menu.info = format!("Deleting {name}…");
                KeyOutcome::Send(UiCommand::Delete(id))
            }
            None => KeyOutcome::Continue,
        },
        KeyCode::Char(' ') => match state.selected_food().cloned() {
            Some(item) => KeyOutcome::Send(UiCommand::ToggleAvailability(item)),
            None => KeyOutcome::Continue,
        },
        KeyCode::Up | KeyCode::Char('k') => {
            state.select_prev();
            KeyOutcome::Continue
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.select_next();
            KeyOutcome::Continue
        }
        _ => KeyOutcome::Continue,
    }
}

/// Keys shared by both forms. Returns true when the key was consumed.
fn edit_form_field(form: &mut FoodForm, k: KeyEvent) -> bool {
    match k.code {
        KeyCode::Tab => form.focus_next(),
        KeyCode::BackTab => form.focus_prev(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) if !k.modifiers.contains(KeyModifiers::CONTROL) => form.input(c),
        _ => return false,
    }
    true
}

fn handle_create_form_key(state: &mut UiState, k: KeyEvent) -> KeyOutcome {
    match k.code {
        KeyCode::Esc => {
            state.menu.close_create();
            KeyOutcome::Continue
        }
        KeyCode::Enter => match state.create_form.to_new_item() {
            Ok(item) => {
                state.menu.close_create();
                state.menu.info = format!("Adding {}…", item.name);
                KeyOutcome::Send(UiCommand::Add(item))
            }
            Err(e) => {
                state.form_error = Some(e.to_string());
                KeyOutcome::Continue
            }
        },
        _ => {
            if edit_form_field(&mut state.create_form, k) {
                state.form_error = None;
            }
            KeyOutcome::Continue
        }
    }
}

fn handle_edit_form_key(state: &mut UiState, k: KeyEvent) -> KeyOutcome {
    match k.code {
        KeyCode::Esc => {
            state.menu.close_edit();
            KeyOutcome::Continue
        }
        KeyCode::Enter => {
            let patch = match state.edit_form.to_patch() {
                Ok(patch) => patch,
                Err(e) => {
                    state.form_error = Some(e.to_string());
                    return KeyOutcome::Continue;
                }
            };
            state.menu.close_edit();
            match state.menu.editing.clone() {
                Some(target) if !patch.is_empty() => {
                    state.menu.info = format!("Saving {}…", target.name);
                    KeyOutcome::Send(UiCommand::Update { target, patch })
                }
                _ => {
                    state.menu.info = "No changes".into();
                    KeyOutcome::Continue
                }
            }
        }
        _ => {
            if edit_form_field(&mut state.edit_form, k) {
                state.form_error = None;
            }
            KeyOutcome::Continue
        }
    }
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(4),
            ]
            .as_ref(),
        )
        .split(area);

    let tabs = Tabs::new(vec![Line::from("Menu"), Line::from("Help")])
        .select(state.tab)
        .block(Block::default().borders(Borders::ALL).title("food-dashboard"))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        TAB_MENU => draw_menu(chunks[1], f, state),
        _ => draw_help(chunks[1], f),
    }
    draw_status(chunks[2], f, state);

    if state.menu.create_modal.is_open() {
        draw_form(area, f, "New food", &state.create_form, state.form_error.as_deref());
    } else if state.menu.edit_modal.is_open() {
        let title = match state.menu.editing.as_ref() {
            Some(item) => format!("Edit #{} {}", item.id, item.name),
            None => "Edit food".to_string(),
        };
        draw_form(area, f, &title, &state.edit_form, state.form_error.as_deref());
    }
}

fn draw_menu(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Foods ({})", state.menu.foods.len()));

    if state.menu.foods.is_empty() {
        let empty = Paragraph::new("No foods yet. Press n to add one, r to reload.").block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["#", "Name", "Price", "Available", "Description"])
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));
    let rows = state.menu.foods.iter().map(|food| {
        let available = if food.available {
            Cell::from(Span::styled("yes", Style::default().fg(Color::Green)))
        } else {
            Cell::from(Span::styled("no", Style::default().fg(Color::Red)))
        };
        Row::new(vec![
            Cell::from(food.id.to_string()),
            Cell::from(food.name.clone()),
            Cell::from(food.price.clone()),
            available,
            Cell::from(food.description.clone()),
        ])
    });
    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(25),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Min(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut table_state = TableState::default().with_selected(Some(state.selected));
    f.render_stateful_widget(table, area, &mut table_state);
}

fn draw_status(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let info_style = if state.menu.last_error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let lines = vec![
        Line::from(vec![
            Span::styled("Items: ", Style::default().fg(Color::Gray)),
            Span::raw(state.menu.foods.len().to_string()),
            Span::raw("   "),
            Span::styled("Pending: ", Style::default().fg(Color::Gray)),
            Span::raw(state.in_flight.to_string()),
            Span::raw("   "),
            Span::styled("Keys: ", Style::default().fg(Color::Gray)),
            Span::raw("n new  e edit  d delete  space toggle  r reload  ? help  q quit"),
        ]),
        Line::from(vec![
            Span::styled("Info: ", Style::default().fg(Color::Gray)),
            Span::styled(state.menu.info.clone(), info_style),
        ]),
    ];
    let status =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

fn draw_form(
    area: Rect,
    f: &mut ratatui::Frame,
    title: &str,
    form: &FoodForm,
    error: Option<&str>,
) {
    let fields = form.fields();
    let height = fields.len() as u16 + 6;
    let popup = centered_rect(60, height, area);

    let mut lines = Vec::with_capacity(fields.len() + 3);
    for &field in fields {
        let focused = form.focused() == field;
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let mut value = form.value(field);
        if focused && field != Field::Available {
            value.push('_');
        }
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12}", field.label()), label_style),
            Span::raw(value),
        ]));
    }
    lines.push(Line::from(""));
    if let Some(err) = error {
        lines.push(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(Span::styled(
        "tab next field  enter submit  esc cancel",
        Style::default().fg(Color::DarkGray),
    )));

    f.render_widget(Clear, popup);
    let p = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string()),
    );
    f.render_widget(p, popup);
}

fn centered_rect(width_pct: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    let side = (100 - width_pct) / 2;
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(side),
            Constraint::Percentage(width_pct),
            Constraint::Percentage(side),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use food_dashboard::model::FoodItem;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(state: &mut UiState, s: &str) {
        for c in s.chars() {
            assert_eq!(handle_key(state, key(KeyCode::Char(c))), KeyOutcome::Continue);
        }
    }

    fn with_foods() -> UiState {
        let mut state = UiState::default();
        state.apply(MenuEvent::Loaded(vec![
            FoodItem {
                id: 1,
                name: "Pizza".into(),
                description: String::new(),
                price: "19.90".into(),
                available: true,
                image: String::new(),
            },
            FoodItem {
                id: 2,
                name: "Soup".into(),
                description: String::new(),
                price: "6.00".into(),
                available: false,
                image: String::new(),
            },
        ]));
        state
    }

    #[test]
    fn create_form_submits_add_and_closes() {
        let mut state = UiState::default();
        handle_key(&mut state, key(KeyCode::Char('n')));
        assert!(state.menu.create_modal.is_open());

        type_str(&mut state, "Soup");
        handle_key(&mut state, key(KeyCode::Tab));
        handle_key(&mut state, key(KeyCode::Tab));
        type_str(&mut state, "6.00");

        match handle_key(&mut state, key(KeyCode::Enter)) {
            KeyOutcome::Send(UiCommand::Add(item)) => {
                assert_eq!(item.name, "Soup");
                assert_eq!(item.price, "6.00");
            }
            other => panic!("expected add, got {other:?}"),
        }
        assert!(!state.menu.create_modal.is_open());
    }

    #[test]
    fn invalid_create_form_stays_open() {
        let mut state = UiState::default();
        handle_key(&mut state, key(KeyCode::Char('n')));
        assert_eq!(handle_key(&mut state, key(KeyCode::Enter)), KeyOutcome::Continue);
        assert!(state.menu.create_modal.is_open());
        assert!(state.form_error.is_some());

        assert_eq!(handle_key(&mut state, key(KeyCode::Esc)), KeyOutcome::Continue);
        assert!(!state.menu.create_modal.is_open());
    }

    #[test]
    fn q_inside_form_is_text_not_quit() {
        let mut state = UiState::default();
        handle_key(&mut state, key(KeyCode::Char('n')));
        assert_eq!(handle_key(&mut state, key(KeyCode::Char('q'))), KeyOutcome::Continue);
        assert_eq!(state.create_form.name, "q");
        assert_eq!(
            handle_key(&mut state, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyOutcome::Quit
        );
    }

    #[test]
    fn edit_selected_sends_patch_for_selection() {
        let mut state = with_foods();
        handle_key(&mut state, key(KeyCode::Down));
        handle_key(&mut state, key(KeyCode::Char('e')));
        assert!(state.menu.edit_modal.is_open());
        assert_eq!(state.menu.editing.as_ref().map(|f| f.id), Some(2));

        type_str(&mut state, " du jour");
        match handle_key(&mut state, key(KeyCode::Enter)) {
            KeyOutcome::Send(UiCommand::Update { target, patch }) => {
                assert_eq!(target.id, 2);
                assert_eq!(patch.name.as_deref(), Some("Soup du jour"));
                assert!(patch.price.is_none());
            }
            other => panic!("expected update, got {other:?}"),
        }
        assert!(!state.menu.edit_modal.is_open());
    }

    #[test]
    fn unchanged_edit_sends_nothing() {
        let mut state = with_foods();
        handle_key(&mut state, key(KeyCode::Enter));
        assert!(state.menu.edit_modal.is_open());
        assert_eq!(handle_key(&mut state, key(KeyCode::Enter)), KeyOutcome::Continue);
        assert!(!state.menu.edit_modal.is_open());
    }

    #[test]
    fn delete_and_toggle_target_selected_item() {
        let mut state = with_foods();
        assert_eq!(
            handle_key(&mut state, key(KeyCode::Char('d'))),
            KeyOutcome::Send(UiCommand::Delete(1))
        );

        handle_key(&mut state, key(KeyCode::Char('j')));
        match handle_key(&mut state, key(KeyCode::Char(' '))) {
            KeyOutcome::Send(UiCommand::ToggleAvailability(target)) => {
                assert_eq!(target.id, 2);
                assert!(!target.available);
            }
            other => panic!("expected toggle, got {other:?}"),
        }
    }

    #[test]
    fn selection_is_clamped_after_delete() {
        let mut state = with_foods();
        handle_key(&mut state, key(KeyCode::Down));
        assert_eq!(state.selected, 1);
        state.apply(MenuEvent::Deleted(2));
        assert_eq!(state.selected, 0);
        assert_eq!(state.selected_food().map(|f| f.id), Some(1));
    }

    #[test]
    fn menu_keys_ignored_on_help_tab() {
        let mut state = with_foods();
        handle_key(&mut state, key(KeyCode::Char('?')));
        assert_eq!(handle_key(&mut state, key(KeyCode::Char('d'))), KeyOutcome::Continue);
        assert_eq!(handle_key(&mut state, key(KeyCode::Char('q'))), KeyOutcome::Quit);
    }
}
