//! Input collectors behind the create and edit modals.
//!
//! A form only holds the text being typed; on submit it validates and hands a
//! `NewFoodItem` or `FoodPatch` to the caller.

use crate::model::{FoodItem, FoodPatch, NewFoodItem};
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("name is required")]
    MissingName,
    #[error("price must be a non-negative decimal, got {0:?}")]
    InvalidPrice(String),
    #[error("image must be an absolute URL, got {0:?}")]
    InvalidImage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Description,
    Price,
    Image,
    Available,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Description => "Description",
            Field::Price => "Price",
            Field::Image => "Image URL",
            Field::Available => "Available",
        }
    }
}

const CREATE_FIELDS: &[Field] = &[Field::Name, Field::Description, Field::Price, Field::Image];
const EDIT_FIELDS: &[Field] = &[
    Field::Name,
    Field::Description,
    Field::Price,
    Field::Image,
    Field::Available,
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoodForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub available: bool,
    focus: usize,
    /// Set when editing: values the form was opened with.
    seed: Option<FoodItem>,
}

impl FoodForm {
    pub fn for_create() -> Self {
        Self {
            available: true,
            ..Default::default()
        }
    }

    pub fn for_edit(item: &FoodItem) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            price: item.price.clone(),
            image: item.image.clone(),
            available: item.available,
            focus: 0,
            seed: Some(item.clone()),
        }
    }

    pub fn fields(&self) -> &'static [Field] {
        if self.seed.is_some() {
            EDIT_FIELDS
        } else {
            CREATE_FIELDS
        }
    }

    pub fn focused(&self) -> Field {
        self.fields()[self.focus]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields().len();
    }

    pub fn focus_prev(&mut self) {
        let n = self.fields().len();
        self.focus = (self.focus + n - 1) % n;
    }

    pub fn value(&self, field: Field) -> String {
        match field {
            Field::Name => self.name.clone(),
            Field::Description => self.description.clone(),
            Field::Price => self.price.clone(),
            Field::Image => self.image.clone(),
            Field::Available => {
                let shown = if self.available { "yes" } else { "no" };
                shown.to_string()
            }
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focused() {
            Field::Name => Some(&mut self.name),
            Field::Description => Some(&mut self.description),
            Field::Price => Some(&mut self.price),
            Field::Image => Some(&mut self.image),
            Field::Available => None,
        }
    }

    /// Type into the focused field. On the availability field a space toggles it.
    pub fn input(&mut self, c: char) {
        if self.focused() == Field::Available {
            if c == ' ' {
                self.available = !self.available;
            }
            return;
        }
        if let Some(text) = self.text_mut() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
    }

    fn validate(&self) -> Result<(), FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::MissingName);
        }
        if !is_valid_price(&self.price) {
            return Err(FormError::InvalidPrice(self.price.clone()));
        }
        let image = self.image.trim();
        if !image.is_empty() && Url::parse(image).is_err() {
            return Err(FormError::InvalidImage(self.image.clone()));
        }
        Ok(())
    }

    pub fn to_new_item(&self) -> Result<NewFoodItem, FormError> {
        self.validate()?;
        Ok(NewFoodItem {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price: self.price.trim().to_string(),
            available: self.available,
            image: self.image.trim().to_string(),
        })
    }

    /// Fields that differ from the item the form was opened with.
    pub fn to_patch(&self) -> Result<FoodPatch, FormError> {
        self.validate()?;
        let changed = |current: &str, original: Option<&str>| {
            let current = current.trim();
            (original != Some(current)).then(|| current.to_string())
        };
        let seed = self.seed.as_ref();
        Ok(FoodPatch {
            name: changed(&self.name, seed.map(|s| s.name.as_str())),
            description: changed(&self.description, seed.map(|s| s.description.as_str())),
            price: changed(&self.price, seed.map(|s| s.price.as_str())),
            available: (seed.map(|s| s.available) != Some(self.available))
                .then_some(self.available),
            image: changed(&self.image, seed.map(|s| s.image.as_str())),
        })
    }
}

fn is_valid_price(raw: &str) -> bool {
    let raw = raw.trim();
    let mut parts = raw.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let frac = parts.next();
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    !whole.is_empty() && digits(whole) && frac.map_or(true, |f| !f.is_empty() && digits(f))
}
