//! Core domain logic for the shopping list app.
//! This crate is the single source of truth for list and theme invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;
pub mod store;

pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, init_logging_for, logging_status};
pub use model::item::{validate_input, Item, ItemId, ItemValidationError};
pub use model::list::{project, ListFilter, ShoppingList};
pub use model::theme::ThemeMode;
pub use notify::{
    ChannelReminderSink, DelayedReminderScheduler, LogReminderSink, NoopReminderScheduler,
    PermissionPrompt, Reminder, ReminderScheduler, ReminderSink, StaticPermission,
};
pub use repo::list_repo::ShoppingListRepository;
pub use repo::theme_repo::ThemeRepository;
pub use repo::{RepoError, RepoResult};
pub use service::shopping_service::{DeviceShoppingService, ShoppingService, StartupState};
pub use store::memory_store::MemoryKeyValueStore;
pub use store::sqlite_store::SqliteKeyValueStore;
pub use store::{KeyValueStore, StoreError, StoreResult, SHOPPING_LIST_KEY, THEME_KEY};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
