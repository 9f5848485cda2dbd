//! Persisted personalization record.
//!
//! The record is a narrow projection of the view configuration: the view code,
//! per-column visibility and order, and tile field overrides. It never contains
//! sort, filter, group or selection state.

use crate::app::modes::ViewCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current schema version of [`PersonalizationRecord`].
pub const RECORD_VERSION: u32 = 1;

const fn current_version() -> u32 {
    RECORD_VERSION
}

/// Saved visibility and position of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPreference {
    pub visible: bool,
    pub index: usize,
}

/// Per-user, per-widget display preferences.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "viewMode": "m",
///   "columns": { "title": { "visible": true, "index": 0 } },
///   "titleField": "title",
///   "propertyFields": ["author", "year"],
///   "savedAt": "2024-05-01T10:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizationRecord {
    #[serde(default = "current_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_mode: Option<ViewCode>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub columns: BTreeMap<String, ColumnPreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Default for PersonalizationRecord {
    fn default() -> Self {
        Self {
            version: RECORD_VERSION,
            view_mode: None,
            columns: BTreeMap::new(),
            title_field: None,
            description_field: None,
            property_fields: None,
            saved_at: None,
        }
    }
}

impl PersonalizationRecord {
    /// True when the record carries no preference at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.view_mode.is_none()
            && self.columns.is_empty()
            && self.title_field.is_none()
            && self.description_field.is_none()
            && self.property_fields.is_none()
    }

    /// Copy without grid column preferences.
    #[must_use]
    pub fn without_columns(&self) -> Self {
        Self {
            columns: BTreeMap::new(),
            ..self.clone()
        }
    }

    /// Copy without tile field overrides.
    #[must_use]
    pub fn without_tile_fields(&self) -> Self {
        Self {
            title_field: None,
            description_field: None,
            property_fields: None,
            ..self.clone()
        }
    }

    /// Stamps the record with the current time.
    #[must_use]
    pub fn stamped(mut self) -> Self {
        self.saved_at = Some(Utc::now());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_records_without_version_default_to_current() {
        let record: PersonalizationRecord =
            serde_json::from_str(r#"{"viewMode":"s","columns":{"title":{"visible":false,"index":2}}}"#).unwrap();
        assert_eq!(record.version, RECORD_VERSION);
        assert_eq!(record.view_mode, Some(ViewCode::MediumTile));
        assert!(!record.columns["title"].visible);
    }

    #[test]
    fn serialization_skips_absent_preferences() {
        let json = serde_json::to_string(&PersonalizationRecord::default()).unwrap();
        assert_eq!(json, r#"{"version":1}"#);
        assert!(PersonalizationRecord::default().is_empty());
    }

    #[test]
    fn surface_removal_keeps_the_other_surface() {
        let record = PersonalizationRecord {
            columns: BTreeMap::from([("title".to_string(), ColumnPreference { visible: true, index: 0 })]),
            title_field: Some("name".into()),
            ..Default::default()
        };
        assert!(record.without_columns().columns.is_empty());
        assert_eq!(record.without_columns().title_field.as_deref(), Some("name"));
        assert!(record.without_tile_fields().title_field.is_none());
        assert_eq!(record.without_tile_fields().columns.len(), 1);
    }
}
