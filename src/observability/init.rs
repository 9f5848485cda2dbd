//! Tracing initialization and subscriber setup.

use super::file_writer::RotatingFileWriter;
use crate::Config;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber with a JSON log file.
///
/// Sets up a subscriber pipeline that:
/// 1. Filters events based on the configured trace level
/// 2. Formats events and span context as JSON lines
/// 3. Writes to a size-rotated file with backups
///
/// # Parameters
///
/// * `config` - Crate configuration containing `trace_level` and `log_file`
///
/// # Trace Level Resolution
///
/// 1. `config.trace_level` if set
/// 2. Default: `"info"`
///
/// # Initialization Behavior
///
/// - Creates the log directory if it doesn't exist
/// - Silently does nothing if the directory cannot be created (logging is optional)
/// - Idempotent: only the first successful call installs a subscriber
///
/// # Example
///
/// ```rust
/// use collection_viewer::observability::init_tracing;
/// use collection_viewer::Config;
///
/// let dir = std::env::temp_dir().join("collection-viewer-doc");
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     log_file: Some(dir.join("viewer.log")),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());

    let log_file = config.log_file_path();
    if let Some(parent) = log_file.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_ansi(false)
        .with_writer(Mutex::new(RotatingFileWriter::new(log_file)));

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(json_layer)
        .try_init();
}
