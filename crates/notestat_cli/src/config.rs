//! Runtime settings for the CLI transport.
//!
//! # Responsibility
//! - Resolve database path and logging settings from flags/environment.
//!
//! # Invariants
//! - A blank database path falls back to the temp-dir default.
//! - File logging is enabled only when a log directory is given.

use notestat_core::default_log_level;
use std::path::PathBuf;

const DEFAULT_DB_FILE_NAME: &str = "notestat.sqlite3";

/// Resolved process settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Builds settings from raw flag values, applying defaults.
    pub fn resolve(
        db_path: Option<PathBuf>,
        log_level: Option<String>,
        log_dir: Option<PathBuf>,
    ) -> Self {
        let db_path = db_path
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let log_level = log_level
            .map(|level| level.trim().to_string())
            .filter(|level| !level.is_empty())
            .unwrap_or_else(|| default_log_level().to_string());
        let log_dir = log_dir.filter(|dir| !dir.as_os_str().is_empty());

        Self {
            db_path,
            log_level,
            log_dir,
        }
    }
}
