//! Remote-call orchestration for the interactive dashboard.
//!
//! Receives commands from the UI thread, runs them one at a time against the
//! remote store, and emits completion events back in submission order.

use anyhow::Result;
use food_dashboard::menu::MenuController;
use food_dashboard::model::{FoodId, FoodItem, FoodPatch, MenuEvent, NewFoodItem};
use std::collections::{HashMap, VecDeque};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

/// Commands emitted by UI layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UiCommand {
    Reload,
    Add(NewFoodItem),
    Update { target: FoodItem, patch: FoodPatch },
    /// Flip `available` on whatever the item holds when the command runs.
    ToggleAvailability(FoodItem),
    Delete(FoodId),
    Quit,
}

/// Latest server-confirmed record per id, fed from completed events.
///
/// Update commands are built from the UI's collection at key-press time; when
/// they run after earlier queued commands, their target is swapped for the
/// record those commands produced.
#[derive(Debug, Default)]
struct KnownFoods(HashMap<FoodId, FoodItem>);

impl KnownFoods {
    fn observe(&mut self, ev: &MenuEvent) {
        match ev {
            MenuEvent::Loaded(foods) => {
                self.0 = foods.iter().map(|f| (f.id, f.clone())).collect();
            }
            MenuEvent::Created(item) | MenuEvent::Updated(item) => {
                self.0.insert(item.id, item.clone());
            }
            MenuEvent::Deleted(id) => {
                self.0.remove(id);
            }
            MenuEvent::Failed { .. } | MenuEvent::Info(_) => {}
        }
    }

    fn current(&self, snapshot: FoodItem) -> FoodItem {
        match self.0.get(&snapshot.id) {
            Some(latest) => latest.clone(),
            None => snapshot,
        }
    }
}

/// Spawn the remote call for `cmd`. `Quit` has no remote call.
fn start_command(
    controller: &MenuController,
    known: &KnownFoods,
    cmd: UiCommand,
) -> Option<JoinHandle<MenuEvent>> {
    let controller = controller.clone();
    let handle = match cmd {
        UiCommand::Reload => tokio::spawn(async move { controller.load().await }),
        UiCommand::Add(candidate) => tokio::spawn(async move { controller.add(candidate).await }),
        UiCommand::Update { target, patch } => {
            let target = known.current(target);
            tokio::spawn(async move { controller.update(&target, &patch).await })
        }
        UiCommand::ToggleAvailability(snapshot) => {
            let target = known.current(snapshot);
            let patch = FoodPatch {
                available: Some(!target.available),
                ..Default::default()
            };
            tokio::spawn(async move { controller.update(&target, &patch).await })
        }
        UiCommand::Delete(id) => tokio::spawn(async move { controller.delete(id).await }),
        UiCommand::Quit => return None,
    };
    Some(handle)
}

/// Drive remote calls for UI commands and send their completions to `event_tx`.
///
/// The initial load is issued before any command is read.
pub(crate) async fn run_controller(
    controller: MenuController,
    event_tx: UnboundedSender<MenuEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let mut pending: VecDeque<UiCommand> = VecDeque::new();
    let mut known = KnownFoods::default();
    let mut in_flight = start_command(&controller, &known, UiCommand::Reload);

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UiCommand::Quit) | None => {
                        if let Some(h) = in_flight.take() {
                            h.abort();
                        }
                        if !pending.is_empty() {
                            debug!(dropped = pending.len(), "quitting with queued commands");
                        }
                        break;
                    }
                    Some(cmd) => {
                        if in_flight.is_none() {
                            in_flight = start_command(&controller, &known, cmd);
                        } else {
                            pending.push_back(cmd);
                        }
                    }
                }
            }
            // Only take the handle once this branch has won; a dropped handle would
            // lose the completion.
            join_res = async {
                match in_flight.as_mut() {
                    Some(h) => h.await,
                    None => futures::future::pending().await,
                }
            } => {
                in_flight = None;
                let ev = match join_res {
                    Ok(ev) => ev,
                    Err(e) => MenuEvent::Info(format!("Request task failed: {e}")),
                };
                known.observe(&ev);
                if event_tx.send(ev).is_err() {
                    break;
                }
                if let Some(next) = pending.pop_front() {
                    in_flight = start_command(&controller, &known, next);
                }
            }
        }
    }

    Ok(())
}
