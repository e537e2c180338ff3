//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the shopping list entry points to Dart via FRB.
//! - Own the single per-process service instance.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - List operations before `shop_init` return a failure envelope.
//! - Item ids cross the boundary as UUID strings.

use log::warn;
use shoplist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AppConfig, ChannelReminderSink, DeviceShoppingService, Item, ItemId, ListFilter, Reminder,
    RepoError, StaticPermission, ThemeMode,
};
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::{Mutex, OnceCell};

static APP: OnceCell<AppHandle> = OnceCell::const_new();

struct AppHandle {
    data_dir: PathBuf,
    service: DeviceShoppingService,
    reminders: Mutex<UnboundedReceiver<Reminder>>,
    /// Decode failure of the stored list at startup; cleared by the first add.
    list_error: Mutex<Option<String>>,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns empty string on success and error message on failure. Safe to call
/// repeatedly with the same `level + log_dir`.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Shopping item as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopItem {
    /// Stable item ID in string form.
    pub id: String,
    pub name: String,
    pub quantity: String,
    pub favorite: bool,
}

/// Startup envelope returned by `shop_init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopInitResponse {
    pub ok: bool,
    pub items: Vec<ShopItem>,
    pub dark_theme: bool,
    /// Permission actually held by the reminder scheduler.
    pub notifications_enabled: bool,
    /// Set when the stored list was unreadable and the app started empty.
    pub list_error: Option<String>,
    pub message: String,
}

/// List envelope for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopListResponse {
    pub ok: bool,
    pub items: Vec<ShopItem>,
    pub message: String,
}

/// Generic action envelope for list mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Affected item after the operation (removed item for delete).
    pub item: Option<ShopItem>,
    /// Set when the UI may offer the same action again (storage failures).
    pub retryable: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ShopActionResponse {
    fn success(message: impl Into<String>, item: Item) -> Self {
        Self {
            ok: true,
            item: Some(to_shop_item(item)),
            retryable: false,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item: None,
            retryable: false,
            message: message.into(),
        }
    }

    fn from_repo_error(op: &str, err: RepoError) -> Self {
        Self {
            retryable: err.is_retryable(),
            ..Self::failure(format!("{op} failed: {err}"))
        }
    }
}

/// Theme envelope returned by `shop_toggle_theme`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopThemeResponse {
    pub ok: bool,
    pub dark_theme: bool,
    pub message: String,
}

/// Reminder handed to the platform notification layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopReminder {
    pub title: String,
    pub body: String,
}

/// Opens on-device storage under `data_dir` and loads persisted state.
///
/// `system_dark` seeds the theme when none is stored.
/// `notifications_granted` is the answer of the platform permission prompt;
/// only the first successful call records it.
///
/// # FFI contract
/// - Async call; first call opens the database and loads state.
/// - Repeated calls with the same `data_dir` return the current state.
/// - A different `data_dir` after init is rejected.
/// - An unreadable stored list still yields `ok=true` with `list_error` set.
pub async fn shop_init(
    data_dir: String,
    system_dark: bool,
    notifications_granted: bool,
) -> ShopInitResponse {
    let config = AppConfig::new(data_dir.trim());
    let system_theme = ThemeMode::from_dark_flag(system_dark);

    let init = APP
        .get_or_try_init(|| async {
            config.ensure_dirs()?;
            let (sink, reminders) = ChannelReminderSink::new();
            let service = DeviceShoppingService::open(
                &config,
                StaticPermission(notifications_granted),
                sink,
            )
            .map_err(|err| format!("storage open failed: {err}"))?;
            let state = service
                .start(system_theme)
                .await
                .map_err(|err| format!("startup load failed: {err}"))?;
            Ok::<_, String>(AppHandle {
                data_dir: config.data_dir.clone(),
                service,
                reminders: Mutex::new(reminders),
                list_error: Mutex::new(state.list_error),
            })
        })
        .await;

    let app = match init {
        Ok(app) => app,
        Err(message) => return init_failure(format!("shop_init failed: {message}")),
    };
    if app.data_dir != config.data_dir {
        return init_failure(format!(
            "shop_init failed: already initialized at `{}`",
            app.data_dir.display()
        ));
    }

    let list_error = app.list_error.lock().await.clone();
    let message = if list_error.is_some() {
        "Saved list could not be read; starting with an empty list.".to_string()
    } else {
        String::new()
    };
    ShopInitResponse {
        ok: true,
        items: to_shop_items(app.service.items().await),
        dark_theme: app.service.theme().await.is_dark(),
        notifications_enabled: app.service.notifications_enabled(),
        list_error,
        message,
    }
}

/// Returns the list, optionally restricted to favorites.
pub async fn shop_list(favorites_only: bool) -> ShopListResponse {
    let Some(app) = APP.get() else {
        return ShopListResponse {
            ok: false,
            items: Vec::new(),
            message: not_initialized("shop_list"),
        };
    };
    let items = app.service.view(ListFilter { favorites_only }).await;
    let message = if items.is_empty() {
        "List is empty.".to_string()
    } else {
        format!("{} item(s).", items.len())
    };
    ShopListResponse {
        ok: true,
        items: to_shop_items(items),
        message,
    }
}

/// Adds an item. Blank name or quantity is declined with `ok=false`.
pub async fn shop_add(name: String, quantity: String) -> ShopActionResponse {
    let Some(app) = APP.get() else {
        return ShopActionResponse::failure(not_initialized("shop_add"));
    };
    match app.service.add(&name, &quantity).await {
        Ok(Some(item)) => {
            app.list_error.lock().await.take();
            ShopActionResponse::success("Item added.", item)
        }
        Ok(None) => ShopActionResponse::failure("Name and quantity are required."),
        Err(err) => ShopActionResponse::from_repo_error("shop_add", err),
    }
}

/// Replaces name and quantity of one item.
pub async fn shop_edit(item_id: String, name: String, quantity: String) -> ShopActionResponse {
    with_item("shop_edit", &item_id, |app, id| async move {
        app.service
            .edit(id, &name, &quantity)
            .await
            .map(|item| ShopActionResponse::success("Item updated.", item))
    })
    .await
}

/// Deletes one item.
pub async fn shop_delete(item_id: String) -> ShopActionResponse {
    with_item("shop_delete", &item_id, |app, id| async move {
        app.service
            .delete(id)
            .await
            .map(|item| ShopActionResponse::success("Item deleted.", item))
    })
    .await
}

/// Flips the favorite flag of one item.
pub async fn shop_toggle_favorite(item_id: String) -> ShopActionResponse {
    with_item("shop_toggle_favorite", &item_id, |app, id| async move {
        app.service
            .toggle_favorite(id)
            .await
            .map(|item| ShopActionResponse::success("Favorite updated.", item))
    })
    .await
}

/// Switches light/dark theme and persists it.
pub async fn shop_toggle_theme() -> ShopThemeResponse {
    let Some(app) = APP.get() else {
        return ShopThemeResponse {
            ok: false,
            dark_theme: false,
            message: not_initialized("shop_toggle_theme"),
        };
    };
    match app.service.toggle_theme().await {
        Ok(mode) => ShopThemeResponse {
            ok: true,
            dark_theme: mode.is_dark(),
            message: String::new(),
        },
        Err(err) => ShopThemeResponse {
            ok: false,
            dark_theme: app.service.theme().await.is_dark(),
            message: format!("shop_toggle_theme failed: {err}"),
        },
    }
}

/// Waits for the next due reminder.
///
/// Returns `None` before `shop_init` or when reminders can no longer arrive.
pub async fn shop_next_reminder() -> Option<ShopReminder> {
    let app = APP.get()?;
    let reminder = app.reminders.lock().await.recv().await?;
    Some(ShopReminder {
        title: reminder.title,
        body: reminder.body,
    })
}

async fn with_item<F, Fut>(op: &str, item_id: &str, f: F) -> ShopActionResponse
where
    F: FnOnce(&'static AppHandle, ItemId) -> Fut,
    Fut: std::future::Future<Output = Result<ShopActionResponse, RepoError>>,
{
    let Some(app) = APP.get() else {
        return ShopActionResponse::failure(not_initialized(op));
    };
    let id = match parse_item_id(item_id) {
        Ok(id) => id,
        Err(message) => return ShopActionResponse::failure(format!("{op} failed: {message}")),
    };
    match f(app, id).await {
        Ok(response) => response,
        Err(err) => ShopActionResponse::from_repo_error(op, err),
    }
}

fn parse_item_id(raw: &str) -> Result<ItemId, String> {
    ItemId::parse_str(raw.trim()).map_err(|_| format!("invalid item id `{}`", raw.trim()))
}

fn not_initialized(op: &str) -> String {
    warn!("event={op} module=ffi status=error error_code=not_initialized");
    format!("{op} failed: shop_init has not completed")
}

fn init_failure(message: String) -> ShopInitResponse {
    ShopInitResponse {
        ok: false,
        items: Vec::new(),
        dark_theme: false,
        notifications_enabled: false,
        list_error: None,
        message,
    }
}

fn to_shop_items(items: Vec<Item>) -> Vec<ShopItem> {
    items.into_iter().map(to_shop_item).collect()
}

fn to_shop_item(item: Item) -> ShopItem {
    ShopItem {
        id: item.id.to_string(),
        name: item.name,
        quantity: item.quantity,
        favorite: item.favorite,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, parse_item_id, ping, shop_add, shop_delete, shop_edit,
        shop_init, shop_list, shop_toggle_favorite, shop_toggle_theme,
    };

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn parse_item_id_rejects_garbage() {
        assert!(parse_item_id("not-a-uuid").is_err());
        assert!(parse_item_id(" 00000000-0000-4000-8000-000000000001 ").is_ok());
    }

    // One test drives the whole flow: the service is a per-process singleton.
    #[tokio::test]
    async fn shop_flow_add_favorite_edit_delete() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap().to_string();

        let before = shop_add("Bread".to_string(), "2".to_string()).await;
        assert!(!before.ok);

        let init = shop_init(data_dir.clone(), false, false).await;
        assert!(init.ok, "{}", init.message);
        assert!(init.items.is_empty());
        assert!(!init.dark_theme);
        assert!(!init.notifications_enabled);
        assert_eq!(init.list_error, None);

        let again = shop_init(data_dir, true, false).await;
        assert!(again.ok, "{}", again.message);

        let other = tempfile::tempdir().unwrap();
        let conflict = shop_init(other.path().to_str().unwrap().to_string(), false, false).await;
        assert!(!conflict.ok);

        let declined = shop_add("  ".to_string(), "2".to_string()).await;
        assert!(!declined.ok);
        assert!(!declined.retryable);

        let added = shop_add("Bread".to_string(), "2".to_string()).await;
        assert!(added.ok, "{}", added.message);
        let id = added.item.unwrap().id;

        let favorite = shop_toggle_favorite(id.clone()).await;
        assert!(favorite.item.unwrap().favorite);
        assert_eq!(shop_list(true).await.items.len(), 1);

        let edited = shop_edit(id.clone(), "Bread".to_string(), "3".to_string()).await;
        let edited = edited.item.unwrap();
        assert_eq!(edited.quantity, "3");
        assert!(edited.favorite);

        let theme = shop_toggle_theme().await;
        assert!(theme.ok);
        assert!(theme.dark_theme);

        assert!(shop_delete(id.clone()).await.ok);
        assert!(shop_list(false).await.items.is_empty());
        assert!(!shop_delete(id).await.ok);
        assert!(!shop_delete("bad-id".to_string()).await.ok);
    }
}
