//! Reconciliation of saved personalization with the current configuration.
//!
//! The configuration is authoritative: a personalization record is an overlay
//! that can reorder, hide or show configured columns and remap tile fields, but
//! can never introduce a column or field the configuration does not know.
//!
//! # Precedence
//!
//! | item | rule |
//! |---|---|
//! | column in config and record | record `visible` / `index` |
//! | column only in config | config default, ordered after personalized columns |
//! | column only in record | dropped |
//! | tile field override | applied only if the field is allowed |
//! | view code | applied only if permitted by the view options |

use crate::app::modes::ViewCode;
use crate::options::normalize::{NormalizedOptions, ViewOptions};
use crate::options::ColumnDef;
use crate::storage::models::{ColumnPreference, PersonalizationRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Effective state of one grid column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnState {
    pub field: String,
    pub label: Option<String>,
    pub visible: bool,
    pub index: usize,
    pub sortable: bool,
    pub width: Option<u32>,
    pub field_source: Option<String>,
}

impl From<(usize, &ColumnDef)> for ColumnState {
    fn from((index, def): (usize, &ColumnDef)) -> Self {
        Self {
            field: def.field.clone(),
            label: def.label.clone().filter(|l| !l.trim().is_empty()),
            visible: def.visible,
            index,
            sortable: def.sortable,
            width: def.width,
            field_source: def.field_source.clone(),
        }
    }
}

/// Tile field mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileFields {
    pub title_field: Option<String>,
    pub description_field: Option<String>,
    pub property_fields: Vec<String>,
}

/// Effective view configuration: configuration defaults with personalization applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewConfig {
    pub view_code: ViewCode,
    /// Columns in display order; `index` equals the position.
    pub columns: Vec<ColumnState>,
    pub tile: TileFields,
    /// Fields tiles may display.
    pub allowed_fields: BTreeSet<String>,
}

impl ViewConfig {
    /// Configuration defaults, before any personalization.
    #[must_use]
    pub fn base(options: &NormalizedOptions) -> Self {
        Self {
            view_code: options.initial_code,
            columns: options.columns.iter().enumerate().map(ColumnState::from).collect(),
            tile: TileFields {
                title_field: options.tile.title_field.clone(),
                description_field: options.tile.description_field.clone(),
                property_fields: options.tile.property_fields.clone(),
            },
            allowed_fields: options.known_fields(),
        }
    }

    /// Visible columns in display order.
    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnState> {
        self.columns.iter().filter(|c| c.visible)
    }

    /// Narrow projection persisted as personalization.
    #[must_use]
    pub fn capture(&self) -> PersonalizationRecord {
        PersonalizationRecord {
            view_mode: Some(self.view_code),
            columns: self
                .columns
                .iter()
                .map(|c| (c.field.clone(), ColumnPreference { visible: c.visible, index: c.index }))
                .collect(),
            title_field: self.tile.title_field.clone(),
            description_field: self.tile.description_field.clone(),
            property_fields: Some(self.tile.property_fields.clone()),
            ..PersonalizationRecord::default()
        }
        .stamped()
    }

    /// Renumbers `index` to match positions.
    pub fn renumber(&mut self) {
        for (index, column) in self.columns.iter_mut().enumerate() {
            column.index = index;
        }
    }
}

/// Applies a personalization overlay to a configuration.
///
/// Pure and idempotent: `merge(&merge(b, o, v), o, v) == merge(b, o, v)`.
#[must_use]
pub fn merge_view_config(base: &ViewConfig, overlay: &PersonalizationRecord, view_options: &ViewOptions) -> ViewConfig {
    let _span = tracing::debug_span!("merge_view_config",
        columns = base.columns.len(),
        saved_columns = overlay.columns.len()
    )
    .entered();

    let mut merged = base.clone();
    merged.columns = merge_columns(&base.columns, &overlay.columns);

    let allowed = |field: &String| base.allowed_fields.contains(field);
    if let Some(title) = overlay.title_field.as_ref() {
        if allowed(title) {
            merged.tile.title_field = Some(title.clone());
        } else {
            tracing::debug!(field = %title, "dropping stale title field");
        }
    }
    if let Some(description) = overlay.description_field.as_ref() {
        if allowed(description) {
            merged.tile.description_field = Some(description.clone());
        } else {
            tracing::debug!(field = %description, "dropping stale description field");
        }
    }
    if let Some(properties) = overlay.property_fields.as_ref() {
        let kept: Vec<String> = properties.iter().filter(|f| allowed(f)).cloned().collect();
        if kept.len() != properties.len() {
            tracing::debug!(dropped = properties.len() - kept.len(), "dropping stale property fields");
        }
        merged.tile.property_fields = kept;
    }

    if let Some(code) = overlay.view_mode {
        if view_options.contains(code) {
            merged.view_code = code;
        } else {
            tracing::debug!(code = %code, "saved view mode no longer permitted");
        }
    }

    merged
}

fn merge_columns(base: &[ColumnState], saved: &BTreeMap<String, ColumnPreference>) -> Vec<ColumnState> {
    let mut personalized: Vec<(usize, ColumnState)> = Vec::new();
    let mut fresh: Vec<ColumnState> = Vec::new();

    for column in base {
        match saved.get(&column.field) {
            Some(pref) => {
                let mut column = column.clone();
                column.visible = pref.visible;
                personalized.push((pref.index, column));
            }
            None => fresh.push(column.clone()),
        }
    }

    personalized.sort_by_key(|(index, _)| *index);
    personalized
        .into_iter()
        .map(|(_, column)| column)
        .chain(fresh)
        .enumerate()
        .map(|(index, mut column)| {
            column.index = index;
            column
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{normalize, CollectionOptions};

    fn base() -> (ViewConfig, ViewOptions) {
        let mut options = CollectionOptions {
            view_options: Some("gsm".into()),
            ..Default::default()
        };
        options.grid_config.column_defs = vec![
            ColumnDef::new("title", "Title"),
            ColumnDef::new("author", "Author"),
            ColumnDef::new("year", "Year"),
        ];
        options.tile_config.title_field = Some("title".into());
        options.tile_config.available_fields = vec!["isbn".into()];
        let normalized = normalize(&options);
        (ViewConfig::base(&normalized), normalized.view_options)
    }

    fn pref(visible: bool, index: usize) -> ColumnPreference {
        ColumnPreference { visible, index }
    }

    fn fields(config: &ViewConfig) -> Vec<&str> {
        config.columns.iter().map(|c| c.field.as_str()).collect()
    }

    #[test]
    fn saved_columns_reorder_and_stale_columns_drop() {
        let (base, views) = base();
        let overlay = PersonalizationRecord {
            columns: BTreeMap::from([
                ("year".to_string(), pref(true, 0)),
                ("title".to_string(), pref(false, 1)),
                ("removed".to_string(), pref(true, 2)),
            ]),
            ..Default::default()
        };

        let merged = merge_view_config(&base, &overlay, &views);
        assert_eq!(fields(&merged), vec!["year", "title", "author"]);
        assert!(!merged.columns[1].visible);
        assert!(merged.columns[2].visible);
        assert_eq!(merged.columns.iter().map(|c| c.index).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn merge_is_idempotent() {
        let (base, views) = base();
        let overlay = PersonalizationRecord {
            view_mode: Some(ViewCode::WideTile),
            columns: BTreeMap::from([("author".to_string(), pref(false, 5)), ("year".to_string(), pref(true, 1))]),
            title_field: Some("isbn".into()),
            property_fields: Some(vec!["author".into(), "gone".into()]),
            ..Default::default()
        };

        let once = merge_view_config(&base, &overlay, &views);
        let twice = merge_view_config(&once, &overlay, &views);
        assert_eq!(once, twice);
    }

    #[test]
    fn tile_overrides_and_view_code_are_validated() {
        let (base, views) = base();
        let overlay = PersonalizationRecord {
            view_mode: Some(ViewCode::LargeTile),
            title_field: Some("unknown".into()),
            description_field: Some("author".into()),
            property_fields: Some(vec!["year".into(), "unknown".into()]),
            ..Default::default()
        };

        let merged = merge_view_config(&base, &overlay, &views);
        assert_eq!(merged.view_code, ViewCode::Grid);
        assert_eq!(merged.tile.title_field.as_deref(), Some("title"));
        assert_eq!(merged.tile.description_field.as_deref(), Some("author"));
        assert_eq!(merged.tile.property_fields, vec!["year".to_string()]);
    }

    #[test]
    fn capture_round_trips_through_merge() {
        let (base, views) = base();
        let mut edited = base.clone();
        edited.columns.swap(0, 2);
        edited.columns[1].visible = false;
        edited.renumber();

        let record = edited.capture();
        assert!(record.saved_at.is_some());
        assert_eq!(merge_view_config(&base, &record, &views), edited);
    }
}
