//! Menu list controller.
//!
//! `MenuController` turns each operation into one remote call and a completion
//! event; it never fails, every remote error becomes `MenuEvent::Failed`.
//! `MenuSession` pairs a controller with the state it reconciles.

use crate::api::FoodsApi;
use crate::menu::state::{apply_event, MenuState};
use crate::model::{FoodId, FoodItem, FoodPatch, MenuEvent, MenuOp, NewFoodItem};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct MenuController {
    api: Arc<dyn FoodsApi>,
}

impl MenuController {
    pub fn new(api: Arc<dyn FoodsApi>) -> Self {
        Self { api }
    }

    pub async fn load(&self) -> MenuEvent {
        match self.api.list().await {
            Ok(foods) => {
                info!(count = foods.len(), "menu loaded");
                MenuEvent::Loaded(foods)
            }
            Err(e) => failed(MenuOp::Load, e),
        }
    }

    /// Create `candidate` remotely. New items always start out available.
    pub async fn add(&self, candidate: NewFoodItem) -> MenuEvent {
        let candidate = NewFoodItem {
            available: true,
            ..candidate
        };
        match self.api.create(&candidate).await {
            Ok(created) => {
                info!(id = created.id, name = %created.name, "food added");
                MenuEvent::Created(created)
            }
            Err(e) => failed(MenuOp::Add, e),
        }
    }

    /// Send `selection` with `patch` applied, addressed by the selection's id.
    pub async fn update(&self, selection: &FoodItem, patch: &FoodPatch) -> MenuEvent {
        let merged = selection.merged(patch);
        match self.api.update(&merged).await {
            Ok(updated) => {
                info!(id = updated.id, "food updated");
                MenuEvent::Updated(updated)
            }
            Err(e) => failed(MenuOp::Update, e),
        }
    }

    pub async fn delete(&self, id: FoodId) -> MenuEvent {
        match self.api.delete(id).await {
            Ok(()) => {
                info!(id, "food deleted");
                MenuEvent::Deleted(id)
            }
            Err(e) => failed(MenuOp::Delete, e),
        }
    }
}

fn failed(op: MenuOp, err: impl std::fmt::Display) -> MenuEvent {
    warn!(op = op.label(), error = %err, "remote call failed");
    MenuEvent::Failed {
        op,
        message: err.to_string(),
    }
}

/// A controller together with the state it owns.
pub struct MenuSession {
    controller: MenuController,
    state: MenuState,
}

impl MenuSession {
    pub fn new(api: Arc<dyn FoodsApi>) -> Self {
        Self {
            controller: MenuController::new(api),
            state: MenuState::default(),
        }
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn foods(&self) -> &[FoodItem] {
        &self.state.foods
    }

    pub async fn load(&mut self) {
        let ev = self.controller.load().await;
        apply_event(&mut self.state, ev);
    }

    pub async fn add(&mut self, candidate: NewFoodItem) {
        let ev = self.controller.add(candidate).await;
        apply_event(&mut self.state, ev);
    }

    /// Update the current edit selection. Without a selection nothing is sent.
    pub async fn update(&mut self, patch: FoodPatch) {
        let Some(selection) = self.state.editing.clone() else {
            warn!("update requested without an edit selection");
            return;
        };
        let ev = self.controller.update(&selection, &patch).await;
        apply_event(&mut self.state, ev);
    }

    pub async fn delete(&mut self, id: FoodId) {
        let ev = self.controller.delete(id).await;
        apply_event(&mut self.state, ev);
    }

    pub fn begin_create(&mut self) {
        self.state.begin_create();
    }

    pub fn begin_edit(&mut self, item: FoodItem) {
        self.state.begin_edit(item);
    }

    pub fn close_create(&mut self) {
        self.state.close_create();
    }

    pub fn close_edit(&mut self) {
        self.state.close_edit();
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
