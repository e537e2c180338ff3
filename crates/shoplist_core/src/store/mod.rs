//! Persistent key-value store adapter.
//!
//! # Responsibility
//! - Define the async get/set contract over opaque string values.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - `set` replaces the whole value for a key; there are no partial writes.
//! - Failures are returned as `StoreError`, never panics.

use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory_store;
pub mod schema;
pub mod sqlite_store;

/// Storage key holding the JSON-serialized shopping list.
pub const SHOPPING_LIST_KEY: &str = "SHOPPING_LIST";
/// Storage key holding the `"dark"`/`"light"` theme literal.
pub const THEME_KEY: &str = "APP_THEME";

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage adapter failure surfaced to repository callers.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    /// Database was written by a newer build with a schema this one lacks.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Schema bootstrap finished but the named table is absent.
    MissingTable(&'static str),
    /// Blocking worker task panicked or was cancelled.
    Worker(String),
    /// Backend refused the operation (used by failure injection).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::MissingTable(table) => write!(f, "store table `{table}` is missing"),
            Self::Worker(message) => write!(f, "storage worker failed: {message}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. }
            | Self::MissingTable(_)
            | Self::Worker(_)
            | Self::Unavailable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Async key-value store holding one opaque string per key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value).await
    }
}
