//! Data directory resolution.
//!
//! Personalization and log files live in one per-user data directory:
//!
//! 1. `$ICV_DATA_DIR` when set and non-empty
//! 2. `<platform data dir>/collection-viewer` (e.g. `~/.local/share/collection-viewer`)
//! 3. `<temp dir>/collection-viewer` when the platform has no data directory

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "ICV_DATA_DIR";

const APP_DIR: &str = "collection-viewer";

/// File name of the default personalization store.
pub const STORE_FILE: &str = "personalization.json";

/// File name of the default log file.
pub const LOG_FILE: &str = "viewer.log";

/// Returns the data directory for personalization and logs.
#[must_use]
pub fn data_dir() -> PathBuf {
    resolve_data_dir(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
}

fn resolve_data_dir(overridden: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = overridden.filter(|p| !p.as_os_str().is_empty()) {
        return dir;
    }
    dirs::data_dir().map_or_else(|| std::env::temp_dir().join(APP_DIR), |dir| dir.join(APP_DIR))
}

/// Default location of the JSON personalization store.
#[must_use]
pub fn default_store_path() -> PathBuf {
    data_dir().join(STORE_FILE)
}

/// Default location of the log file.
#[must_use]
pub fn default_log_path() -> PathBuf {
    data_dir().join(LOG_FILE)
}
