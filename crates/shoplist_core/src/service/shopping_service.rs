//! Shopping list use-case service.
//!
//! # Responsibility
//! - Provide the entry points consumed by presentation layers.
//! - Run process startup: load theme and list, request notification
//!   permission.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Theme state is cached here and changes only after a successful write.
//! - An undecodable stored list does not block startup; it is reported in
//!   `StartupState::list_error` and the list starts empty.

use crate::config::AppConfig;
use crate::model::item::{Item, ItemId};
use crate::model::list::{ListFilter, ShoppingList};
use crate::model::theme::ThemeMode;
use crate::notify::{DelayedReminderScheduler, PermissionPrompt, ReminderScheduler, ReminderSink};
use crate::repo::list_repo::ShoppingListRepository;
use crate::repo::theme_repo::ThemeRepository;
use crate::repo::{RepoError, RepoResult};
use crate::store::sqlite_store::SqliteKeyValueStore;
use crate::store::{KeyValueStore, StoreResult};
use log::{error, info};
use std::sync::Arc;
use tokio::sync::Mutex;

/// State handed to the UI once startup completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupState {
    pub items: ShoppingList,
    pub theme: ThemeMode,
    pub notifications_enabled: bool,
    /// Set when the stored list could not be decoded. The next successful
    /// list write replaces the unreadable value.
    pub list_error: Option<String>,
}

/// Service facade over the list repository, theme store and scheduler.
pub struct ShoppingService<S, N> {
    list: ShoppingListRepository<Arc<S>, N>,
    themes: ThemeRepository<Arc<S>>,
    theme: Mutex<ThemeMode>,
}

/// Service wired to on-device SQLite storage and timer-based reminders.
pub type DeviceShoppingService = ShoppingService<SqliteKeyValueStore, DelayedReminderScheduler>;

impl<S: KeyValueStore, N: ReminderScheduler> ShoppingService<S, N> {
    /// Creates a service sharing one store between list and theme.
    pub fn new(store: S, scheduler: N) -> Self {
        let store = Arc::new(store);
        Self {
            list: ShoppingListRepository::new(Arc::clone(&store), scheduler),
            themes: ThemeRepository::new(store),
            theme: Mutex::new(ThemeMode::Light),
        }
    }

    /// Loads persisted state and requests notification permission.
    ///
    /// `system_theme` is used when no theme has been stored yet. Storage
    /// failures are returned as errors; a corrupt list is not.
    pub async fn start(&self, system_theme: ThemeMode) -> RepoResult<StartupState> {
        let theme = self.themes.load(system_theme).await?;
        *self.theme.lock().await = theme;
        let notifications_enabled = self.list.scheduler().request_permission().await;

        let (items, list_error) = match self.list.load().await {
            Ok(items) => (items, None),
            Err(RepoError::InvalidData(message)) => {
                error!(
                    "event=service_start module=service status=degraded reason=invalid_list error={message}"
                );
                (ShoppingList::new(), Some(message))
            }
            Err(err) => return Err(err),
        };

        info!(
            "event=service_start module=service status=ok items={} theme={} notifications={}",
            items.len(),
            theme.as_str(),
            notifications_enabled
        );
        Ok(StartupState {
            items,
            theme,
            notifications_enabled,
            list_error,
        })
    }

    /// Permission recorded by the last startup prompt.
    pub fn notifications_enabled(&self) -> bool {
        self.list.scheduler().is_permitted()
    }

    /// Re-reads the list from storage.
    pub async fn load(&self) -> RepoResult<ShoppingList> {
        self.list.load().await
    }

    pub async fn items(&self) -> ShoppingList {
        self.list.items().await
    }

    /// Returns the list as rendered under `filter`.
    pub async fn view(&self, filter: ListFilter) -> Vec<Item> {
        self.list.view(filter).await
    }

    /// Adds an item; `Ok(None)` means blank input was declined.
    pub async fn add(&self, name: &str, quantity: &str) -> RepoResult<Option<Item>> {
        self.list.add(name, quantity).await
    }

    pub async fn edit(&self, id: ItemId, name: &str, quantity: &str) -> RepoResult<Item> {
        self.list.edit(id, name, quantity).await
    }

    pub async fn delete(&self, id: ItemId) -> RepoResult<Item> {
        self.list.delete(id).await
    }

    pub async fn toggle_favorite(&self, id: ItemId) -> RepoResult<Item> {
        self.list.toggle_favorite(id).await
    }

    pub async fn edit_at(&self, index: usize, name: &str, quantity: &str) -> RepoResult<Item> {
        self.list.edit_at(index, name, quantity).await
    }

    pub async fn delete_at(&self, index: usize) -> RepoResult<Item> {
        self.list.delete_at(index).await
    }

    pub async fn toggle_favorite_at(&self, index: usize) -> RepoResult<Item> {
        self.list.toggle_favorite_at(index).await
    }

    pub async fn theme(&self) -> ThemeMode {
        *self.theme.lock().await
    }

    /// Switches light/dark and persists the new value.
    pub async fn toggle_theme(&self) -> RepoResult<ThemeMode> {
        let mut current = self.theme.lock().await;
        let next = self.themes.toggle(*current).await?;
        *current = next;
        Ok(next)
    }

    pub fn store(&self) -> &S {
        self.list.store()
    }
}

impl DeviceShoppingService {
    /// Opens the on-device database from `config` and wires a timer scheduler.
    pub fn open(
        config: &AppConfig,
        prompt: impl PermissionPrompt + 'static,
        sink: impl ReminderSink + 'static,
    ) -> StoreResult<Self> {
        let store = SqliteKeyValueStore::open(config.db_path())?;
        let scheduler = DelayedReminderScheduler::new(config.reminder_delay, prompt, sink);
        Ok(Self::new(store, scheduler))
    }
}
