//! Host-supplied collection configuration.
//!
//! [`CollectionOptions`] mirrors the configuration object a host hands to the
//! viewer. Every field is defaulted so partial documents deserialize; validation
//! and defaulting happen later in [`normalize`](super::normalize::normalize).
//!
//! # Example
//!
//! ```rust
//! use collection_viewer::options::CollectionOptions;
//!
//! let options = CollectionOptions::from_json_str(r#"{
//!     "viewMode": "g",
//!     "viewOptions": "gsml",
//!     "pagingOptions": { "pageSize": 10 },
//!     "gridConfig": { "columnDefs": [{ "field": "title", "label": "Title" }] }
//! }"#)?;
//! assert_eq!(options.view_options.as_deref(), Some("gsml"));
//! assert!(options.enable_responsive_behaviour);
//! # Ok::<(), collection_viewer::ViewerError>(())
//! ```

use crate::app::modes::{SelectionMode, TileSize};
use crate::data::group::GroupField;
use crate::data::search::QuickSearchMode;
use crate::data::sort::SortInfo;
use crate::data::source::ServerDataOptions;
use crate::domain::{Result, ViewerError};
use serde::{Deserialize, Serialize};

const fn default_true() -> bool {
    true
}

/// Raw collection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionOptions {
    /// Initial view as a letter code (`g`, `s`, `m`, `l`, `c`).
    pub view_mode: Option<String>,
    /// Permitted views as a string of letter codes, e.g. `"gsml"`.
    pub view_options: Option<String>,
    pub selection_mode: SelectionMode,
    pub grid_config: GridConfig,
    pub tile_config: TileConfig,
    pub paging_options: PagingOptions,
    pub sort_info: Option<SortInfo>,
    pub group_field: Option<GroupField>,
    /// Fields offered for grouping in the filter bar.
    pub group_fields: Vec<FieldDef>,
    pub quick_search_options: QuickSearchOptions,
    /// Fields offered in the structured filter builder.
    pub filter_fields: Vec<FieldDef>,
    pub filter_bar_options: FilterBarOptions,
    /// Personalization slot; personalization is disabled when absent.
    pub user_pref_id: Option<String>,
    pub server_data_options: Option<ServerDataOptions>,
    #[serde(alias = "enableResponsiveBehavior")]
    pub enable_responsive_behaviour: bool,
    #[serde(rename = "containerID", alias = "containerId")]
    pub container_id: Option<String>,
    pub height: Option<String>,
    pub commands: Vec<CommandDef>,
    /// Widget family; together with `userPrefId` it names the personalization slot.
    pub widget_type: Option<String>,
}

impl Default for CollectionOptions {
    fn default() -> Self {
        Self {
            view_mode: None,
            view_options: None,
            selection_mode: SelectionMode::default(),
            grid_config: GridConfig::default(),
            tile_config: TileConfig::default(),
            paging_options: PagingOptions::default(),
            sort_info: None,
            group_field: None,
            group_fields: Vec::new(),
            quick_search_options: QuickSearchOptions::default(),
            filter_fields: Vec::new(),
            filter_bar_options: FilterBarOptions::default(),
            user_pref_id: None,
            server_data_options: None,
            enable_responsive_behaviour: true,
            container_id: None,
            height: None,
            commands: Vec::new(),
            widget_type: None,
        }
    }
}

impl CollectionOptions {
    /// Parses options from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Serialization`] for malformed JSON or mistyped fields.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses options from a TOML document using the same camelCase keys.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Config`] for malformed TOML or mistyped fields.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        toml::from_str(toml).map_err(|e| ViewerError::Config(format!("invalid collection options: {e}")))
    }
}

/// Grid surface configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    pub column_defs: Vec<ColumnDef>,
    /// Field whose value identifies a record across data refreshes.
    pub identity_field: Option<String>,
}

/// One grid column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub field: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub sortable: bool,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub field_source: Option<String>,
}

impl ColumnDef {
    /// Visible, sortable column with a header label.
    #[must_use]
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: Some(label.into()),
            visible: true,
            sortable: true,
            width: None,
            field_source: None,
        }
    }
}

/// Tile surface configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TileConfig {
    pub title_field: Option<String>,
    pub description_field: Option<String>,
    pub property_fields: Vec<String>,
    /// Extra fields a user may map onto a tile through personalization.
    pub available_fields: Vec<String>,
    /// Compact property layout that fits four properties on a wide tile.
    pub is_cell: bool,
    pub tile_size: Option<TileSize>,
}

/// Paging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PagingOptions {
    /// Requested page size; values outside 10/25/50/100 fall back to 25.
    pub page_size: Option<u32>,
    pub enabled: bool,
}

impl Default for PagingOptions {
    fn default() -> Self {
        Self {
            page_size: None,
            enabled: true,
        }
    }
}

/// Quick-search configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuickSearchOptions {
    /// Field searched; all text fields when absent.
    pub field: Option<String>,
    pub mode: QuickSearchMode,
    pub placeholder: Option<String>,
}

/// A field offered by the filter bar for grouping or filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub field: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub field_source: Option<String>,
}

/// Visibility of the filter-bar affordances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterBarOptions {
    pub show_search: bool,
    pub show_sort: bool,
    pub show_group: bool,
    pub show_filter: bool,
}

impl Default for FilterBarOptions {
    fn default() -> Self {
        Self {
            show_search: true,
            show_sort: true,
            show_group: true,
            show_filter: true,
        }
    }
}

/// Command (toolbar button) as configured by the host.
///
/// Handlers are not part of the configuration; they are registered by id in a
/// [`CommandRegistry`](crate::app::commands::CommandRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDef {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub tooltip: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub requires_selection: bool,
}
