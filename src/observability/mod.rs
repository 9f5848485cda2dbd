//! Structured logging to a rotating JSON file.
//!
//! # Architecture
//!
//! ```text
//! tracing macros → EnvFilter → fmt::layer().json() → RotatingFileWriter → viewer.log
//! ```
//!
//! # Features
//!
//! - **JSON lines**: one object per event, with the current span's fields
//! - **Automatic rotation**: files rotate at 10 MiB with 3-backup retention
//!
//! # Configuration
//!
//! The level filter comes from `Config::trace_level` (default `"info"`) and
//! accepts `EnvFilter` directives such as `collection_viewer=debug`.
//!
//! # Modules
//!
//! - [`init`]: subscriber setup
//! - [`file_writer`]: rotating file writer

pub mod file_writer;
pub mod init;

pub use file_writer::RotatingFileWriter;
pub use init::init_tracing;
