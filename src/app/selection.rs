//! Ordered set of selected identity keys.
//!
//! Keys are kept in selection order, most recent last, so that narrowing the
//! selection mode can keep exactly the most recently selected item.

use super::modes::SelectionMode;
use crate::domain::{IdentityKey, Record, SelectionKey};
use serde::{Deserialize, Serialize};

/// Selected keys in selection order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    keys: Vec<SelectionKey>,
}

impl SelectionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &SelectionKey) -> bool {
        self.keys.contains(key)
    }

    /// Keys, oldest first.
    #[must_use]
    pub fn keys(&self) -> &[SelectionKey] {
        &self.keys
    }

    #[must_use]
    pub fn most_recent(&self) -> Option<&SelectionKey> {
        self.keys.last()
    }

    /// Adds a key as the most recent; re-selecting moves it to the end.
    pub fn insert(&mut self, key: SelectionKey) {
        self.keys.retain(|k| *k != key);
        self.keys.push(key);
    }

    /// Returns true if the key was present.
    pub fn remove(&mut self, key: &SelectionKey) -> bool {
        let before = self.keys.len();
        self.keys.retain(|k| k != key);
        before != self.keys.len()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// Truncates to what `mode` allows, keeping the most recent keys.
    pub fn truncate_for(&mut self, mode: SelectionMode) {
        if let Some(capacity) = mode.capacity() {
            let excess = self.keys.len().saturating_sub(capacity);
            self.keys.drain(..excess);
        }
    }

    /// Keeps only keys that identify one of `records`.
    pub fn retain_existing(&mut self, identity: &IdentityKey, records: &[Record]) {
        self.keys
            .retain(|key| records.iter().any(|record| identity.matches(key, record)));
    }

    /// True when `record` is selected.
    #[must_use]
    pub fn is_selected(&self, identity: &IdentityKey, record: &Record) -> bool {
        self.keys.iter().any(|key| identity.matches(key, record))
    }
}
