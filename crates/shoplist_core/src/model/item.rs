//! Shopping item domain model.
//!
//! # Responsibility
//! - Define the canonical record persisted under `SHOPPING_LIST`.
//! - Provide input validation shared by add/edit paths.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - `name` and `quantity` are non-blank after trimming.
//! - `quantity` is kept as text exactly as entered; it is never parsed.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one shopping-list entry.
pub type ItemId = Uuid;

/// Validation errors for item input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemValidationError {
    BlankName,
    BlankQuantity,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "item name cannot be blank"),
            Self::BlankQuantity => write!(f, "item quantity cannot be blank"),
        }
    }
}

impl Error for ItemValidationError {}

/// One shopping-list record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Generated when missing so legacy `{name, quantity, favorite}`
    /// records still load.
    #[serde(default = "Uuid::new_v4")]
    pub id: ItemId,
    pub name: String,
    /// Numeric-looking text, compared as a string.
    pub quantity: String,
    #[serde(default)]
    pub favorite: bool,
}

impl Item {
    /// Creates a non-favorite item with a generated stable ID.
    ///
    /// Input is stored as entered; call [`validate_input`] first when the
    /// values come from a user.
    pub fn new(name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, quantity)
    }

    /// Creates a non-favorite item with a caller-provided stable ID.
    pub fn with_id(id: ItemId, name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            quantity: quantity.into(),
            favorite: false,
        }
    }

    /// Flips the favorite flag and returns the new value.
    pub fn toggle_favorite(&mut self) -> bool {
        self.favorite = !self.favorite;
        self.favorite
    }
}

/// Checks that both user inputs carry non-whitespace content.
pub fn validate_input(name: &str, quantity: &str) -> Result<(), ItemValidationError> {
    if name.trim().is_empty() {
        return Err(ItemValidationError::BlankName);
    }
    if quantity.trim().is_empty() {
        return Err(ItemValidationError::BlankQuantity);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_input, Item, ItemValidationError};

    #[test]
    fn validate_input_rejects_whitespace_only_fields() {
        assert_eq!(
            validate_input("  ", "2"),
            Err(ItemValidationError::BlankName)
        );
        assert_eq!(
            validate_input("Milk", "\t"),
            Err(ItemValidationError::BlankQuantity)
        );
        assert!(validate_input(" Milk ", " 2 ").is_ok());
    }

    #[test]
    fn legacy_record_without_id_gets_generated_id() {
        let item: Item =
            serde_json::from_str(r#"{"name":"Bread","quantity":"2","favorite":true}"#).unwrap();
        assert!(!item.id.is_nil());
        assert_eq!(item.name, "Bread");
        assert!(item.favorite);
    }

    #[test]
    fn missing_favorite_defaults_to_false() {
        let item: Item = serde_json::from_str(r#"{"name":"Eggs","quantity":"12"}"#).unwrap();
        assert!(!item.favorite);
    }
}
