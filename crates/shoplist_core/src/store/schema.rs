//! SQLite bootstrap for the key-value store.
//!
//! # Responsibility
//! - Open file or in-memory connections and set store pragmas.
//! - Bring the `kv_entries` schema up to date before first use.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A database written by a newer build is rejected, never downgraded.
//! - Steps only shape `kv_entries`; stored values are never rewritten here.
//! - A returned connection always has a `kv_entries` table.

use crate::store::{StoreError, StoreResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const KV_TABLE: &str = "kv_entries";

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "kv_entries",
    sql: include_str!("sql/0001_kv_entries.sql"),
}];

/// Highest schema version this build can open.
pub fn latest_schema_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Opens the store file at `path`, creating and migrating it as needed.
///
/// Missing parent directories are not created; callers resolve the data
/// directory first (see `AppConfig::ensure_dirs`).
pub fn open_store_file(path: impl AsRef<Path>) -> StoreResult<Connection> {
    open_with("file", || Connection::open(path.as_ref()))
}

/// Opens an ephemeral in-memory store database.
pub fn open_store_in_memory() -> StoreResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> StoreResult<Connection> {
    let started_at = Instant::now();
    let opened = connect()
        .map_err(StoreError::from)
        .and_then(|mut conn| prepare(&mut conn, mode).map(|()| conn));

    match &opened {
        Ok(_) => info!(
            "event=kv_open module=store status=ok mode={} schema_version={} duration_ms={}",
            mode,
            latest_schema_version(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=kv_open module=store status=error mode={} duration_ms={} error={}",
            mode,
            started_at.elapsed().as_millis(),
            err
        ),
    }
    opened
}

fn prepare(conn: &mut Connection, mode: &str) -> StoreResult<()> {
    if mode == "file" {
        let _journal: String =
            conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
    }
    conn.busy_timeout(Duration::from_secs(5))?;
    upgrade_schema(conn)?;
    ensure_kv_table(conn)
}

/// Applies pending schema steps in one transaction.
pub fn upgrade_schema(conn: &mut Connection) -> StoreResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_schema_version();
    if found > latest {
        return Err(StoreError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest,
        });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > found)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=kv_schema module=store status=ok step={} version={}",
            step.name, step.version
        );
    }
    tx.commit()?;
    Ok(())
}

fn ensure_kv_table(conn: &Connection) -> StoreResult<()> {
    let present: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [KV_TABLE],
        |row| row.get(0),
    )?;
    if present {
        Ok(())
    } else {
        Err(StoreError::MissingTable(KV_TABLE))
    }
}
