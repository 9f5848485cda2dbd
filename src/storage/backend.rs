//! Personalization store abstraction.
//!
//! Records are addressed by `(widget_type, pref_id)`: the widget type separates
//! widget families sharing one store, the pref id names the per-user slot of a
//! widget instance.

use crate::domain::error::Result;
use crate::storage::models::PersonalizationRecord;

/// Key/value persistence of personalization records.
///
/// # Implementations
///
/// - [`JsonPersonalizationStore`](super::JsonPersonalizationStore): JSON file with atomic writes
/// - [`MemoryPersonalizationStore`](super::MemoryPersonalizationStore): in-process map
///
/// # Examples
///
/// ```
/// use collection_viewer::storage::{MemoryPersonalizationStore, PersonalizationRecord, PersonalizationStore};
///
/// let mut store = MemoryPersonalizationStore::default();
/// store.set("icv", "books", &PersonalizationRecord::default())?;
/// assert!(store.get("icv", "books")?.is_some());
/// # Ok::<(), collection_viewer::ViewerError>(())
/// ```
pub trait PersonalizationStore: Send {
    /// Loads a record. Returns `Ok(None)` when the slot is empty or holds a
    /// record that can no longer be read.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn get(&self, widget_type: &str, pref_id: &str) -> Result<Option<PersonalizationRecord>>;

    /// Stores a record, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set(&mut self, widget_type: &str, pref_id: &str, record: &PersonalizationRecord) -> Result<()>;

    /// Deletes a record. Removing an absent record is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn remove(&mut self, widget_type: &str, pref_id: &str) -> Result<()>;
}

/// Storage key of a slot.
#[must_use]
pub fn slot_key(widget_type: &str, pref_id: &str) -> String {
    format!("{widget_type}/{pref_id}")
}
