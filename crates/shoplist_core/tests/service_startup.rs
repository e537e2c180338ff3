use shoplist_core::{
    AppConfig, ChannelReminderSink, DelayedReminderScheduler, DeviceShoppingService,
    Item, KeyValueStore, ListFilter, MemoryKeyValueStore, NoopReminderScheduler, RepoError,
    ShoppingService, StaticPermission, ThemeMode, ThemeRepository, SHOPPING_LIST_KEY, THEME_KEY,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn start_on_empty_storage_uses_system_theme_and_empty_list() {
    let service = ShoppingService::new(MemoryKeyValueStore::new(), NoopReminderScheduler);

    let state = service.start(ThemeMode::Dark).await.unwrap();
    assert!(state.items.is_empty());
    assert_eq!(state.theme, ThemeMode::Dark);
    assert!(!state.notifications_enabled);
    assert_eq!(service.store().write_count(), 0);
}

#[tokio::test]
async fn start_restores_persisted_list_and_theme() {
    let store = MemoryKeyValueStore::with_entries([
        (
            SHOPPING_LIST_KEY,
            r#"[{"name":"A","quantity":"1","favorite":false},{"name":"B","quantity":"2","favorite":true}]"#,
        ),
        (THEME_KEY, "light"),
    ]);
    let service = ShoppingService::new(store, NoopReminderScheduler);

    let state = service.start(ThemeMode::Dark).await.unwrap();
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.theme, ThemeMode::Light);

    let favorites = service.view(ListFilter::favorites()).await;
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].name, "B");
    assert_eq!(service.items().await.len(), 2);
}

#[tokio::test]
async fn corrupt_list_reports_error_and_still_loads_theme() {
    let store = MemoryKeyValueStore::with_entries([
        (SHOPPING_LIST_KEY, "{not json"),
        (THEME_KEY, "dark"),
    ]);
    let service = ShoppingService::new(store, NoopReminderScheduler);

    let state = service.start(ThemeMode::Light).await.unwrap();
    assert!(state.items.is_empty());
    assert_eq!(state.theme, ThemeMode::Dark);
    assert!(state.list_error.is_some());
    assert_eq!(service.store().write_count(), 0);

    service.add("Milk", "1").await.unwrap().unwrap();
    let raw = service.store().get(SHOPPING_LIST_KEY).await.unwrap().unwrap();
    let stored: Vec<Item> = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Milk");

    let restarted = ShoppingService::new(
        MemoryKeyValueStore::with_entries([(SHOPPING_LIST_KEY, raw.as_str())]),
        NoopReminderScheduler,
    );
    let state = restarted.start(ThemeMode::Light).await.unwrap();
    assert_eq!(state.list_error, None);
    assert_eq!(state.items, stored);
}

#[tokio::test]
async fn positional_entry_points_address_the_unfiltered_list() {
    let service = ShoppingService::new(MemoryKeyValueStore::new(), NoopReminderScheduler);
    service.start(ThemeMode::Light).await.unwrap();
    let first = service.add("Apples", "3").await.unwrap().unwrap();
    let second = service.add("Bread", "1").await.unwrap().unwrap();

    let favored = service.toggle_favorite_at(1).await.unwrap();
    assert_eq!(favored.id, second.id);
    assert!(favored.favorite);

    let edited = service.edit_at(0, "Green apples", "4").await.unwrap();
    assert_eq!(edited.id, first.id);
    assert_eq!(edited.name, "Green apples");

    let removed = service.delete_at(0).await.unwrap();
    assert_eq!(removed.id, first.id);
    assert!(matches!(
        service.delete_at(1).await.unwrap_err(),
        RepoError::IndexOutOfRange { index: 1, len: 1 }
    ));

    let remaining = service.items().await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second.id);
    assert!(remaining[0].favorite);
}

#[tokio::test]
async fn toggle_theme_persists_literal() {
    let service = ShoppingService::new(MemoryKeyValueStore::new(), NoopReminderScheduler);
    service.start(ThemeMode::Light).await.unwrap();

    assert_eq!(service.toggle_theme().await.unwrap(), ThemeMode::Dark);
    assert_eq!(
        service.store().get(THEME_KEY).await.unwrap().as_deref(),
        Some("dark")
    );
    assert_eq!(service.toggle_theme().await.unwrap(), ThemeMode::Light);
    assert_eq!(
        service.store().get(THEME_KEY).await.unwrap().as_deref(),
        Some("light")
    );
    assert_eq!(service.theme().await, ThemeMode::Light);
}

#[tokio::test]
async fn failed_theme_write_keeps_current_theme() {
    let service = ShoppingService::new(MemoryKeyValueStore::new(), NoopReminderScheduler);
    service.start(ThemeMode::Light).await.unwrap();

    service.store().set_fail_writes(true);
    assert!(service.toggle_theme().await.is_err());
    assert_eq!(service.theme().await, ThemeMode::Light);
}

#[tokio::test]
async fn unknown_stored_theme_falls_back_to_system_default() {
    let store = Arc::new(MemoryKeyValueStore::with_entries([(THEME_KEY, "sepia")]));
    let themes = ThemeRepository::new(store);

    assert_eq!(themes.load(ThemeMode::Dark).await.unwrap(), ThemeMode::Dark);
}

#[tokio::test(start_paused = true)]
async fn granted_permission_delivers_reminder_after_add() {
    let (sink, mut rx) = ChannelReminderSink::new();
    let scheduler =
        DelayedReminderScheduler::new(Duration::from_secs(10), StaticPermission(true), sink);
    let service = ShoppingService::new(MemoryKeyValueStore::new(), scheduler);

    assert!(!service.notifications_enabled());
    let state = service.start(ThemeMode::Light).await.unwrap();
    assert!(state.notifications_enabled);
    assert!(service.notifications_enabled());

    service.add("Bread", "2").await.unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(rx.recv().await.unwrap().body, "Item: Bread");
}

#[tokio::test]
async fn device_service_persists_to_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::new(dir.path());
    config.ensure_dirs().unwrap();

    let id = {
        let service = DeviceShoppingService::open(
            &config,
            StaticPermission(false),
            shoplist_core::LogReminderSink,
        )
        .unwrap();
        service.start(ThemeMode::Light).await.unwrap();
        let item = service.add("Coffee", "1").await.unwrap().unwrap();
        service.toggle_favorite(item.id).await.unwrap();
        service.toggle_theme().await.unwrap();
        item.id
    };

    let reopened =
        DeviceShoppingService::open(&config, StaticPermission(false), shoplist_core::LogReminderSink)
            .unwrap();
    let state = reopened.start(ThemeMode::Light).await.unwrap();
    assert_eq!(state.theme, ThemeMode::Dark);
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].id, id);
    assert!(state.items[0].favorite);
}
