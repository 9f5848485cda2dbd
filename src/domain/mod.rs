//! Domain layer for the collection viewer.
//!
//! This module contains the core domain types independent of any host shell or
//! rendering toolkit.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`record`]: Collection records and identity matching

pub mod error;
pub mod record;

pub use error::{Result, ViewerError};
pub use record::{IdentityComparator, IdentityKey, Record, SelectionKey};
