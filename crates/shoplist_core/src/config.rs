//! Application configuration shared by the FFI and CLI surfaces.
//!
//! # Invariants
//! - `data_dir` is absolute; logs and the database live beneath it.
//! - Defaults: build-mode log level, 10 second reminder delay.

use crate::logging::default_log_level;
use crate::notify::DEFAULT_REMINDER_DELAY;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DB_FILE_NAME: &str = "shoplist.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Runtime configuration for one application process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub reminder_delay: Duration,
}

impl AppConfig {
    /// Creates a config rooted at `data_dir` with default settings.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            log_level: default_log_level().to_string(),
            reminder_delay: DEFAULT_REMINDER_DELAY,
        }
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    pub fn with_reminder_delay(mut self, delay: Duration) -> Self {
        self.reminder_delay = delay;
        self
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }

    /// Validates `data_dir` and creates it when missing.
    ///
    /// # Errors
    /// - Returns an error when `data_dir` is relative or cannot be created.
    pub fn ensure_dirs(&self) -> Result<(), String> {
        if !Path::new(&self.data_dir).is_absolute() {
            return Err(format!(
                "data_dir must be an absolute path, got `{}`",
                self.data_dir.display()
            ));
        }
        std::fs::create_dir_all(&self.data_dir).map_err(|err| {
            format!(
                "failed to create data directory `{}`: {err}",
                self.data_dir.display()
            )
        })
    }
}
