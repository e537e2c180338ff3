//! Domain model for the shopping list.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep view projections (favorites filter) free of side effects.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemId`.
//! - Deletion is a hard delete; there is no tombstone or undo history.

pub mod item;
pub mod list;
pub mod theme;
