//! Client-side copy of the menu collection and the UI state around it.
//!
//! All mutation goes through the transition functions here; the collection is
//! only changed by applying a completed remote operation.

use crate::model::{FoodItem, MenuEvent};
use std::collections::HashSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open,
}

impl ModalState {
    pub fn is_open(self) -> bool {
        self == ModalState::Open
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuState {
    pub foods: Vec<FoodItem>,
    /// Item targeted by the edit form.
    pub editing: Option<FoodItem>,
    pub create_modal: ModalState,
    pub edit_modal: ModalState,
    /// Last status or failure message.
    pub info: String,
    /// Message of the most recent failed remote call, cleared by the next success.
    pub last_error: Option<String>,
}

impl MenuState {
    pub fn begin_create(&mut self) {
        self.create_modal = ModalState::Open;
    }

    pub fn begin_edit(&mut self, item: FoodItem) {
        self.editing = Some(item);
        self.edit_modal = ModalState::Open;
    }

    pub fn close_create(&mut self) {
        self.create_modal = ModalState::Closed;
    }

    pub fn close_edit(&mut self) {
        self.edit_modal = ModalState::Closed;
    }
}

/// Reconcile the local collection with a completed remote operation.
pub fn apply_event(state: &mut MenuState, ev: MenuEvent) {
    match ev {
        MenuEvent::Loaded(mut foods) => {
            let mut seen = HashSet::new();
            foods.retain(|f| {
                let first = seen.insert(f.id);
                if !first {
                    warn!(id = f.id, name = %f.name, "dropping duplicate id from loaded menu");
                }
                first
            });
            state.last_error = None;
            state.info = format!("Loaded {} item(s)", foods.len());
            state.foods = foods;
        }
        MenuEvent::Created(item) => {
            state.last_error = None;
            state.info = format!("Added {}", item.name);
            // Ids stay unique: a reused id replaces the stale record.
            match state.foods.iter_mut().find(|f| f.id == item.id) {
                Some(slot) => {
                    warn!(id = item.id, "created item reuses an id already in the collection");
                    *slot = item;
                }
                None => state.foods.push(item),
            }
        }
        MenuEvent::Updated(item) => {
            state.last_error = None;
            state.info = format!("Updated {}", item.name);
            if state.editing.as_ref().is_some_and(|e| e.id == item.id) {
                state.editing = Some(item.clone());
            }
            match state.foods.iter_mut().find(|f| f.id == item.id) {
                Some(slot) => *slot = item,
                None => debug!(id = item.id, "updated item is not in the local collection"),
            }
        }
        MenuEvent::Deleted(id) => {
            state.foods.retain(|f| f.id != id);
            state.last_error = None;
            state.info = format!("Deleted #{id}");
        }
        MenuEvent::Failed { op, message } => {
            state.info = format!("{} failed: {message}", op.label());
            state.last_error = Some(message);
        }
        MenuEvent::Info(msg) => state.info = msg,
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
