//! Theme preference persistence under `APP_THEME`.

use crate::model::theme::ThemeMode;
use crate::repo::RepoResult;
use crate::store::{KeyValueStore, THEME_KEY};
use log::{info, warn};

/// Reads and writes the theme literal. Independent of the list.
pub struct ThemeRepository<S> {
    store: S,
}

impl<S: KeyValueStore> ThemeRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the stored theme, or `system_default` when absent.
    ///
    /// Unknown stored text also falls back to `system_default`. Earlier app
    /// builds read anything other than `"dark"` as light; here only the two
    /// known literals are honored and a damaged value follows the system.
    pub async fn load(&self, system_default: ThemeMode) -> RepoResult<ThemeMode> {
        let mode = match self.store.get(THEME_KEY).await? {
            Some(raw) => ThemeMode::parse(&raw).unwrap_or_else(|| {
                warn!("event=theme_load module=repo status=fallback reason=unknown_value");
                system_default
            }),
            None => system_default,
        };
        info!(
            "event=theme_load module=repo status=ok theme={}",
            mode.as_str()
        );
        Ok(mode)
    }

    pub async fn set(&self, mode: ThemeMode) -> RepoResult<()> {
        self.store.set(THEME_KEY, mode.as_str()).await?;
        info!(
            "event=theme_set module=repo status=ok theme={}",
            mode.as_str()
        );
        Ok(())
    }

    /// Persists and returns the opposite of `current`.
    pub async fn toggle(&self, current: ThemeMode) -> RepoResult<ThemeMode> {
        let next = current.toggled();
        self.set(next).await?;
        Ok(next)
    }
}
