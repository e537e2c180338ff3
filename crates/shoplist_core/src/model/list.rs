//! Ordered shopping list and its read-only projections.
//!
//! # Invariants
//! - Insertion order is display order.
//! - Filtering never reorders or mutates the backing list.

use crate::model::item::{Item, ItemId};

/// Ordered sequence of items; new entries append to the end.
pub type ShoppingList = Vec<Item>;

/// View options applied when rendering the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub favorites_only: bool,
}

impl ListFilter {
    pub fn favorites() -> Self {
        Self {
            favorites_only: true,
        }
    }

    fn accepts(&self, item: &Item) -> bool {
        !self.favorites_only || item.favorite
    }
}

/// Returns the filtered projection of `items`, preserving relative order.
pub fn project(items: &[Item], filter: ListFilter) -> Vec<Item> {
    items
        .iter()
        .filter(|item| filter.accepts(item))
        .cloned()
        .collect()
}

/// Returns the position of `id` in `items`.
pub fn position_of(items: &[Item], id: ItemId) -> Option<usize> {
    items.iter().position(|item| item.id == id)
}
