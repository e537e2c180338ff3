//! Repository layer over the key-value store.
//!
//! # Responsibility
//! - Own read-modify-write mutation of the persisted shopping list.
//! - Read and write the persisted theme preference.
//!
//! # Invariants
//! - Every list mutation ends with a full-collection write-through.
//! - Repository APIs return semantic errors (`NotFound`, `Validation`) in
//!   addition to storage errors.

pub mod list_repo;
pub mod theme_repo;

use crate::model::item::{ItemId, ItemValidationError};
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for list and theme operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ItemValidationError),
    Store(StoreError),
    NotFound(ItemId),
    IndexOutOfRange { index: usize, len: usize },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "item index {index} out of range for list of {len}")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted list data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::NotFound(_) | Self::IndexOutOfRange { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl RepoError {
    /// Whether the caller may retry the same intent unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}
