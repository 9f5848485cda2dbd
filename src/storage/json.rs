//! JSON file-based personalization store.
//!
//! All records live in one human-readable JSON file, loaded once and rewritten
//! atomically (write-to-temp + rename) after every change. Entries are kept as
//! raw JSON so that a single unreadable record degrades to "no personalization"
//! instead of poisoning the whole file.

use crate::domain::error::{Result, ViewerError};
use crate::storage::backend::{slot_key, PersonalizationStore};
use crate::storage::models::{PersonalizationRecord, RECORD_VERSION};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// On-disk container format.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    /// Container format version.
    version: u32,

    /// Records keyed by `"{widget_type}/{pref_id}"`.
    #[serde(default)]
    records: BTreeMap<String, Value>,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            version: 1,
            records: BTreeMap::new(),
        }
    }
}

/// JSON file personalization store.
///
/// # Thread Safety
///
/// `Send` but not `Sync`; owned by a single [`PersonalizationWorker`](crate::worker::PersonalizationWorker).
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "records": {
///     "icv/books": { "version": 1, "viewMode": "g", "columns": { "title": { "visible": true, "index": 0 } } }
///   }
/// }
/// ```
pub struct JsonPersonalizationStore {
    file_path: PathBuf,
    data: StoreData,
    dirty: bool,
}

impl JsonPersonalizationStore {
    /// Opens the store at `file_path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - The file exists but is not valid JSON
    /// - The file cannot be read
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use collection_viewer::storage::JsonPersonalizationStore;
    /// use std::path::PathBuf;
    ///
    /// let store = JsonPersonalizationStore::new(PathBuf::from("/tmp/personalization.json"))?;
    /// # Ok::<(), collection_viewer::ViewerError>(())
    /// ```
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening personalization store");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty store");
            StoreData::default()
        };

        tracing::debug!(records = data.records.len(), "personalization store ready");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<StoreData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StoreData = serde_json::from_str(&contents)
            .map_err(|e| ViewerError::Storage(format!("failed to parse JSON: {e}")))?;

        tracing::debug!(version = data.version, records = data.records.len(), "loaded store data");
        Ok(data)
    }

    /// Writes the container atomically if anything changed.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| ViewerError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "personalization store saved");
        Ok(())
    }
}

impl PersonalizationStore for JsonPersonalizationStore {
    fn get(&self, widget_type: &str, pref_id: &str) -> Result<Option<PersonalizationRecord>> {
        let key = slot_key(widget_type, pref_id);
        let _span = tracing::debug_span!("json_get_personalization", key = %key).entered();

        let Some(raw) = self.data.records.get(&key) else {
            tracing::debug!("no record");
            return Ok(None);
        };

        match serde_json::from_value::<PersonalizationRecord>(raw.clone()) {
            Ok(record) if record.version == RECORD_VERSION => Ok(Some(record)),
            Ok(record) => {
                tracing::debug!(version = record.version, "ignoring record with unsupported version");
                Ok(None)
            }
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unreadable record");
                Ok(None)
            }
        }
    }

    fn set(&mut self, widget_type: &str, pref_id: &str, record: &PersonalizationRecord) -> Result<()> {
        let key = slot_key(widget_type, pref_id);
        let _span = tracing::debug_span!("json_set_personalization", key = %key).entered();

        self.data.records.insert(key, serde_json::to_value(record)?);
        self.dirty = true;
        self.save_to_file()
    }

    fn remove(&mut self, widget_type: &str, pref_id: &str) -> Result<()> {
        let key = slot_key(widget_type, pref_id);
        let _span = tracing::debug_span!("json_remove_personalization", key = %key).entered();

        if self.data.records.remove(&key).is_some() {
            self.dirty = true;
            self.save_to_file()?;
        }
        Ok(())
    }
}

impl Drop for JsonPersonalizationStore {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty store on drop");
            if let Err(e) = self.save_to_file() {
                tracing::warn!(error = %e, "failed to save personalization store on drop");
            }
        }
    }
}
