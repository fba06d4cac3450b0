//! Reusable dish templates.
//!
//! Recurring dishes are saved once and applied to a slot in later weeks.  A
//! template carries the dish's content (name, description, price, course,
//! allergens, tags, background) but never its image, id or placement: those
//! belong to the slot it is applied to.
//!
//! The library serialises as a plain JSON array, so exports can be shared
//! between kiosks and imported by appending.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use menu_core::domain::menu::DEFAULT_BACKGROUND;
use menu_core::{Category, Dish};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq)]
pub enum LibraryError {
    #[error("a template needs a dish name")]
    MissingName,

    #[error("a template needs a price above zero (got {0})")]
    NonPositivePrice(f64),

    #[error("no library entry at position {index} (the library has {count})")]
    NoSuchEntry { index: usize, count: usize },

    #[error("the library is empty")]
    Empty,

    /// Import payloads must be a JSON array of templates.
    #[error("library import is not a JSON array")]
    NotAnArray,

    #[error("invalid library JSON: {0}")]
    Json(String),
}

/// One saved template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryEntry {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "prix")]
    pub price: f64,
    #[serde(rename = "categorie", default)]
    pub category: Category,
    #[serde(rename = "allergenes", default)]
    pub allergens: Vec<String>,
    #[serde(rename = "bgColor", default = "default_background")]
    pub background_color: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(rename = "savedAt", default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DishLibrary(Vec<LibraryEntry>);

impl DishLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LibraryEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Saves `dish` as a template, stamped with `now`.
    ///
    /// # Errors
    ///
    /// [`LibraryError::MissingName`] or [`LibraryError::NonPositivePrice`].
    pub fn save(&mut self, dish: &Dish, now: DateTime<Utc>) -> Result<&LibraryEntry, LibraryError> {
        if dish.name.trim().is_empty() {
            return Err(LibraryError::MissingName);
        }
        if dish.price.is_nan() || dish.price <= 0.0 {
            return Err(LibraryError::NonPositivePrice(dish.price));
        }

        self.0.push(LibraryEntry {
            id: Uuid::new_v4(),
            name: dish.name.clone(),
            description: dish.description.clone(),
            price: dish.price,
            category: dish.category,
            allergens: dish.allergens.clone(),
            background_color: dish.background_color.clone(),
            tags: dish.tags.clone(),
            saved_at: now,
        });
        info!(name = %dish.name, "dish saved to library");
        Ok(&self.0[self.0.len() - 1])
    }

    /// Copies template `index` onto `slot`, keeping the slot's id, column,
    /// image and flags.
    ///
    /// # Errors
    ///
    /// [`LibraryError::NoSuchEntry`] for an out-of-range index.
    pub fn apply(&self, index: usize, slot: &mut Dish) -> Result<(), LibraryError> {
        let entry = self.get(index)?;
        slot.name = entry.name.clone();
        slot.description = entry.description.clone();
        slot.price = entry.price;
        slot.category = entry.category;
        slot.allergens = entry.allergens.clone();
        slot.background_color = entry.background_color.clone();
        slot.tags = entry.tags.clone();
        Ok(())
    }

    /// Removes and returns template `index`.
    ///
    /// # Errors
    ///
    /// [`LibraryError::NoSuchEntry`] for an out-of-range index.
    pub fn delete(&mut self, index: usize) -> Result<LibraryEntry, LibraryError> {
        self.get(index)?;
        Ok(self.0.remove(index))
    }

    /// Pretty-printed JSON array of every template.
    ///
    /// # Errors
    ///
    /// [`LibraryError::Empty`] when there is nothing to export.
    pub fn export(&self) -> Result<String, LibraryError> {
        if self.is_empty() {
            return Err(LibraryError::Empty);
        }
        serde_json::to_string_pretty(&self.0).map_err(|e| LibraryError::Json(e.to_string()))
    }

    /// Appends every template in `input` and returns how many were added.
    ///
    /// # Errors
    ///
    /// [`LibraryError::NotAnArray`] when the payload is valid JSON but not an
    /// array, [`LibraryError::Json`] otherwise.
    pub fn import(&mut self, input: &[u8]) -> Result<usize, LibraryError> {
        let value: Value =
            serde_json::from_slice(input).map_err(|e| LibraryError::Json(e.to_string()))?;
        if !value.is_array() {
            return Err(LibraryError::NotAnArray);
        }
        let entries: Vec<LibraryEntry> =
            serde_json::from_value(value).map_err(|e| LibraryError::Json(e.to_string()))?;

        let added = entries.len();
        self.0.extend(entries);
        info!(added, total = self.0.len(), "library imported");
        Ok(added)
    }

    fn get(&self, index: usize) -> Result<&LibraryEntry, LibraryError> {
        self.0.get(index).ok_or(LibraryError::NoSuchEntry {
            index,
            count: self.0.len(),
        })
    }
}
