//! In-process personalization store.

use crate::domain::error::Result;
use crate::storage::backend::{slot_key, PersonalizationStore};
use crate::storage::models::PersonalizationRecord;
use std::collections::HashMap;

/// Map-backed store for hosts without persistence and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersonalizationStore {
    records: HashMap<String, PersonalizationRecord>,
}

impl MemoryPersonalizationStore {
    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PersonalizationStore for MemoryPersonalizationStore {
    fn get(&self, widget_type: &str, pref_id: &str) -> Result<Option<PersonalizationRecord>> {
        Ok(self.records.get(&slot_key(widget_type, pref_id)).cloned())
    }

    fn set(&mut self, widget_type: &str, pref_id: &str, record: &PersonalizationRecord) -> Result<()> {
        self.records.insert(slot_key(widget_type, pref_id), record.clone());
        Ok(())
    }

    fn remove(&mut self, widget_type: &str, pref_id: &str) -> Result<()> {
        self.records.remove(&slot_key(widget_type, pref_id));
        Ok(())
    }
}
