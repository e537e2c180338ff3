//! SQLite-backed key-value store.
//!
//! # Responsibility
//! - Persist store entries in the `kv_entries` table.
//! - Keep blocking SQLite calls off the async executor.
//!
//! # Invariants
//! - The connection is only touched from `spawn_blocking` workers.
//! - `set` is an upsert; the previous value is fully replaced.

use crate::store::schema::{open_store_file, open_store_in_memory};
use crate::store::{KeyValueStore, StoreError, StoreResult};
use async_trait::async_trait;
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Key-value store over a migrated SQLite connection.
#[derive(Clone)]
pub struct SqliteKeyValueStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteKeyValueStore {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_store_file(path)?))
    }

    /// Opens an ephemeral in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_store_in_memory()?))
    }

    async fn with_conn<T, F>(&self, op: &'static str, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let joined = tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Worker("sqlite connection mutex poisoned".to_string()))?;
            f(&guard).map_err(StoreError::from)
        })
        .await;

        let result = match joined {
            Ok(result) => result,
            Err(err) => Err(StoreError::Worker(err.to_string())),
        };
        if let Err(err) = &result {
            error!("event=kv_{op} module=store status=error backend=sqlite error={err}");
        }
        result
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let key_owned = key.to_string();
        let value = self
            .with_conn("get", move |conn| {
                conn.query_row(
                    "SELECT value FROM kv_entries WHERE key = ?1;",
                    [key_owned.as_str()],
                    |row| row.get::<_, String>(0),
                )
                .optional()
            })
            .await?;
        debug!(
            "event=kv_get module=store status=ok backend=sqlite key={} hit={}",
            key,
            value.is_some()
        );
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let key_owned = key.to_string();
        let value_owned = value.to_string();
        let bytes = value_owned.len();
        self.with_conn("set", move |conn| {
            conn.execute(
                "INSERT INTO kv_entries (key, value, updated_at)
                 VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key_owned, value_owned],
            )
            .map(|_| ())
        })
        .await?;
        debug!("event=kv_set module=store status=ok backend=sqlite key={key} bytes={bytes}");
        Ok(())
    }
}
