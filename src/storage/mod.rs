//! Personalization persistence.
//!
//! # Modules
//!
//! - `backend`: the [`PersonalizationStore`] trait
//! - `json`: JSON file store with atomic writes
//! - `memory`: in-process store
//! - `models`: the versioned [`PersonalizationRecord`]
//! - `merge`: the pure [`merge_view_config`] overlay protocol

pub mod backend;
pub mod json;
pub mod memory;
pub mod merge;
pub mod models;

pub use backend::PersonalizationStore;
pub use json::JsonPersonalizationStore;
pub use memory::MemoryPersonalizationStore;
pub use merge::{merge_view_config, ColumnState, TileFields, ViewConfig};
pub use models::{ColumnPreference, PersonalizationRecord, RECORD_VERSION};
