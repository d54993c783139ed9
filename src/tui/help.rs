use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn key_line(key: &'static str, pad: usize, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(key, Style::default().fg(Color::Magenta)),
        Span::raw(" ".repeat(pad)),
        Span::raw(what),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("q", Style::default().fg(Color::Magenta)),
            Span::raw(" / "),
            Span::styled("Ctrl-C", Style::default().fg(Color::Magenta)),
            Span::raw("  Quit"),
        ]),
        key_line("n", 11, "New food"),
        key_line("e", 11, "Edit selected (also Enter)"),
        key_line("d", 11, "Delete selected"),
        key_line("space", 7, "Toggle availability of selected"),
        key_line("r", 11, "Reload menu"),
        key_line("↑/↓", 9, "Navigate (also j/k)"),
        key_line("tab", 9, "Switch tabs"),
        key_line("?", 11, "Show this help"),
        Line::from(""),
        Line::from("Forms:"),
        key_line("tab", 9, "Next field (Shift-Tab: previous)"),
        key_line("enter", 7, "Submit"),
        key_line("esc", 9, "Cancel"),
        key_line("space", 7, "Toggle on the Available field"),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
