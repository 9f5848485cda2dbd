//! Error types for the collection viewer.
//!
//! This module defines the centralized error type [`ViewerError`] and a type alias
//! [`Result`] used throughout the crate. All errors are implemented using the
//! `thiserror` crate for automatic `Error` trait implementation.
//!
//! Most failure modes of the coordinator are recovered locally (degraded labels,
//! dropped stale personalization, hidden affordances) and never reach the host as
//! an `Err`. The variants here cover the genuinely fallible edges: persistence,
//! configuration parsing, worker messaging and export.

use thiserror::Error;

/// The main error type for collection viewer operations.
///
/// # Examples
///
/// ```
/// use collection_viewer::ViewerError;
///
/// fn load_options() -> Result<(), ViewerError> {
///     Err(ViewerError::Config("unknown view option 'x'".to_string()))
/// }
///
/// assert!(load_options().is_err());
/// ```
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Personalization store operation failed.
    ///
    /// The string contains a description of what went wrong.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Communication with the personalization worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Export of the current data failed.
    #[error("Export error: {0}")]
    Export(String),
}

/// A specialized `Result` type for collection viewer operations.
pub type Result<T> = std::result::Result<T, ViewerError>;
