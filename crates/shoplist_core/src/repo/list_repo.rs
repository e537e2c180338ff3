//! Shopping list repository over the key-value store.
//!
//! # Responsibility
//! - Hold the authoritative in-memory copy of the shopping list.
//! - Run every mutation as read-modify-write with full-collection
//!   write-through under `SHOPPING_LIST`.
//! - Trigger the reminder scheduler after a successful add.
//!
//! # Invariants
//! - One async mutex guards the cache for the whole cycle, including the
//!   store write, so overlapping intents are applied one after another.
//! - The cache is replaced only after the store write succeeds; a failed
//!   write leaves cache and storage on the previous list.
//! - `add` trusts the cache and does not re-read storage: this repository is
//!   the only writer of `SHOPPING_LIST`.
//! - Items are addressed by stable id. The `*_at` variants resolve a
//!   position against the unfiltered list while holding the same lock.

use crate::model::item::{validate_input, Item, ItemId};
use crate::model::list::{position_of, project, ListFilter, ShoppingList};
use crate::notify::ReminderScheduler;
use crate::repo::{RepoError, RepoResult};
use crate::store::{KeyValueStore, SHOPPING_LIST_KEY};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::time::Instant;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Repository owning the shopping list and its persistence.
pub struct ShoppingListRepository<S, N> {
    store: S,
    scheduler: N,
    items: Mutex<ShoppingList>,
}

impl<S: KeyValueStore, N: ReminderScheduler> ShoppingListRepository<S, N> {
    /// Creates a repository with an empty cache. Call [`Self::load`] before
    /// serving reads.
    pub fn new(store: S, scheduler: N) -> Self {
        Self {
            store,
            scheduler,
            items: Mutex::new(Vec::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scheduler(&self) -> &N {
        &self.scheduler
    }

    /// Reads the persisted list into the cache.
    ///
    /// A missing entry yields an empty list; nothing is written back.
    pub async fn load(&self) -> RepoResult<ShoppingList> {
        let mut guard = self.items.lock().await;
        let loaded = match self.store.get(SHOPPING_LIST_KEY).await? {
            Some(raw) => decode_list(&raw)?,
            None => Vec::new(),
        };
        info!(
            "event=list_load module=repo status=ok items={}",
            loaded.len()
        );
        *guard = loaded.clone();
        Ok(loaded)
    }

    /// Returns a snapshot of the full list in display order.
    pub async fn items(&self) -> ShoppingList {
        self.items.lock().await.clone()
    }

    /// Returns the filtered projection. Never touches storage.
    pub async fn view(&self, filter: ListFilter) -> Vec<Item> {
        project(&self.items.lock().await, filter)
    }

    /// Appends a new non-favorite item and schedules its reminder.
    ///
    /// Returns `Ok(None)` without writing or scheduling when either input is
    /// blank after trimming. Values are stored as entered.
    pub async fn add(&self, name: &str, quantity: &str) -> RepoResult<Option<Item>> {
        if let Err(err) = validate_input(name, quantity) {
            debug!("event=list_add module=repo status=skipped reason={err}");
            return Ok(None);
        }

        let item = Item::new(name, quantity);
        let created = item.clone();
        self.mutate("list_add", move |items| {
            items.push(item);
            Ok(())
        })
        .await?;

        self.scheduler.schedule(&created.name);
        Ok(Some(created))
    }

    /// Removes the item with `id` and returns it.
    pub async fn delete(&self, id: ItemId) -> RepoResult<Item> {
        self.mutate("list_delete", move |items| {
            let index = position_of(items, id).ok_or(RepoError::NotFound(id))?;
            Ok(items.remove(index))
        })
        .await
    }

    /// Flips the favorite flag of the item with `id`.
    pub async fn toggle_favorite(&self, id: ItemId) -> RepoResult<Item> {
        self.mutate("list_toggle_favorite", move |items| {
            let index = position_of(items, id).ok_or(RepoError::NotFound(id))?;
            items[index].toggle_favorite();
            Ok(items[index].clone())
        })
        .await
    }

    /// Replaces name and quantity of the item with `id`.
    ///
    /// Position and favorite flag are kept. Blank input is rejected.
    pub async fn edit(&self, id: ItemId, name: &str, quantity: &str) -> RepoResult<Item> {
        validate_input(name, quantity)?;
        let (name, quantity) = (name.to_string(), quantity.to_string());
        self.mutate("list_edit", move |items| {
            let index = position_of(items, id).ok_or(RepoError::NotFound(id))?;
            replace_fields(&mut items[index], name, quantity);
            Ok(items[index].clone())
        })
        .await
    }

    /// Removes the item at `index` of the unfiltered list.
    pub async fn delete_at(&self, index: usize) -> RepoResult<Item> {
        self.mutate("list_delete", move |items| {
            check_index(items, index)?;
            Ok(items.remove(index))
        })
        .await
    }

    /// Flips the favorite flag at `index` of the unfiltered list.
    pub async fn toggle_favorite_at(&self, index: usize) -> RepoResult<Item> {
        self.mutate("list_toggle_favorite", move |items| {
            check_index(items, index)?;
            items[index].toggle_favorite();
            Ok(items[index].clone())
        })
        .await
    }

    /// Replaces name and quantity at `index` of the unfiltered list.
    pub async fn edit_at(&self, index: usize, name: &str, quantity: &str) -> RepoResult<Item> {
        validate_input(name, quantity)?;
        let (name, quantity) = (name.to_string(), quantity.to_string());
        self.mutate("list_edit", move |items| {
            check_index(items, index)?;
            replace_fields(&mut items[index], name, quantity);
            Ok(items[index].clone())
        })
        .await
    }

    async fn mutate<T, F>(&self, event: &'static str, apply: F) -> RepoResult<T>
    where
        T: Send,
        F: FnOnce(&mut ShoppingList) -> RepoResult<T> + Send,
    {
        let started_at = Instant::now();
        let mut guard = self.items.lock().await;
        let mut draft = guard.clone();
        let output = apply(&mut draft)?;

        let encoded = encode_list(&draft)?;
        if let Err(err) = self.store.set(SHOPPING_LIST_KEY, &encoded).await {
            warn!(
                "event={} module=repo status=error duration_ms={} error_code=store_write_failed error={}",
                event,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }

        *guard = draft;
        info!(
            "event={} module=repo status=ok items={} duration_ms={}",
            event,
            guard.len(),
            started_at.elapsed().as_millis()
        );
        Ok(output)
    }
}

fn replace_fields(item: &mut Item, name: String, quantity: String) {
    item.name = name;
    item.quantity = quantity;
}

fn check_index(items: &[Item], index: usize) -> RepoResult<()> {
    if index >= items.len() {
        return Err(RepoError::IndexOutOfRange {
            index,
            len: items.len(),
        });
    }
    Ok(())
}

fn encode_list(items: &[Item]) -> RepoResult<String> {
    serde_json::to_string(items)
        .map_err(|err| RepoError::InvalidData(format!("failed to encode list: {err}")))
}

/// Parses the stored JSON array.
///
/// Duplicate ids (hand-edited or legacy data) are replaced with fresh ones so
/// id addressing stays unambiguous.
fn decode_list(raw: &str) -> RepoResult<ShoppingList> {
    let mut items: ShoppingList = serde_json::from_str(raw)
        .map_err(|err| RepoError::InvalidData(format!("`{SHOPPING_LIST_KEY}` is not a list: {err}")))?;

    let mut seen = HashSet::with_capacity(items.len());
    for item in &mut items {
        if !seen.insert(item.id) {
            item.id = Uuid::new_v4();
            seen.insert(item.id);
            warn!("event=list_load module=repo status=repaired reason=duplicate_id");
        }
    }
    Ok(items)
}
