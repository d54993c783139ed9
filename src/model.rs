use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Identifier assigned by the remote store.
pub type FoodId = u64;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

/// A menu entry as stored by the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: FoodId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Decimal amount kept as text, e.g. `"19.90"`.
    pub price: String,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub image: String,
}

/// A food item that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFoodItem {
    pub name: String,
    pub description: String,
    pub price: String,
    pub available: bool,
    pub image: String,
}

/// Partial update of a food item. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub available: Option<bool>,
    pub image: Option<String>,
}

impl FoodPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.available.is_none()
            && self.image.is_none()
    }
}

impl FoodItem {
    /// Apply `patch` on top of this item. The id is never changed.
    pub fn merged(&self, patch: &FoodPatch) -> FoodItem {
        FoodItem {
            id: self.id,
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            description: patch
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
            price: patch.price.clone().unwrap_or_else(|| self.price.clone()),
            available: patch.available.unwrap_or(self.available),
            image: patch.image.clone().unwrap_or_else(|| self.image.clone()),
        }
    }
}

/// Remote operation kinds, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOp {
    Load,
    Add,
    Update,
    Delete,
}

impl MenuOp {
    pub fn label(self) -> &'static str {
        match self {
            MenuOp::Load => "Load",
            MenuOp::Add => "Add",
            MenuOp::Update => "Update",
            MenuOp::Delete => "Delete",
        }
    }
}

/// Completion of a remote operation, applied to the local collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    Loaded(Vec<FoodItem>),
    Created(FoodItem),
    Updated(FoodItem),
    Deleted(FoodId),
    Failed { op: MenuOp, message: String },
    Info(String),
}
