//! Option normalization: letter codes parsed once, defaults applied once.
//!
//! [`normalize`] turns raw [`CollectionOptions`] into [`NormalizedOptions`].
//! Nothing here fails: configuration mistakes are logged and replaced with
//! defaults, so a misconfigured widget still renders.

use super::collection::{ColumnDef, CollectionOptions, FieldDef, FilterBarOptions, QuickSearchOptions, TileConfig};
use crate::app::commands::Command;
use crate::app::modes::{infer_tile_size, SelectionMode, TileSize, ViewCode, ViewMode};
use crate::data::group::GroupField;
use crate::data::paging::PageSize;
use crate::data::sort::SortInfo;
use crate::data::source::ServerDataOptions;
use crate::domain::IdentityKey;
use std::collections::BTreeSet;

/// Widget family used for personalization slots when none is configured.
pub const DEFAULT_WIDGET_TYPE: &str = "icv";

/// Ordered set of permitted view codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions(Vec<ViewCode>);

impl Default for ViewOptions {
    fn default() -> Self {
        Self(vec![ViewCode::Grid])
    }
}

impl ViewOptions {
    /// Parses a letter string such as `"gsml"`.
    ///
    /// Unknown letters are logged and skipped, duplicates are dropped, and an
    /// empty result means grid only.
    ///
    /// ```
    /// use collection_viewer::app::modes::{TileSize, ViewCode};
    /// use collection_viewer::options::ViewOptions;
    ///
    /// let views = ViewOptions::parse("gxmm");
    /// assert_eq!(views.codes(), &[ViewCode::Grid, ViewCode::WideTile]);
    /// assert!(views.is_dual_surface());
    /// assert_eq!(views.tile_sizes(), vec![TileSize::Wide]);
    /// ```
    #[must_use]
    pub fn parse(letters: &str) -> Self {
        let mut codes = Vec::new();
        for letter in letters.chars().filter(|c| !c.is_whitespace() && *c != ',') {
            match ViewCode::from_letter(letter) {
                Some(code) if !codes.contains(&code) => codes.push(code),
                Some(_) => {}
                None => tracing::warn!(letter = %letter, "ignoring unknown view option"),
            }
        }

        if codes.is_empty() {
            Self::default()
        } else {
            Self(codes)
        }
    }

    #[must_use]
    pub fn codes(&self) -> &[ViewCode] {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, code: ViewCode) -> bool {
        self.0.contains(&code)
    }

    /// First permitted code; the fallback initial view.
    #[must_use]
    pub fn first(&self) -> ViewCode {
        self.0.first().copied().unwrap_or(ViewCode::Grid)
    }

    #[must_use]
    pub fn exposes_grid(&self) -> bool {
        self.contains(ViewCode::Grid)
    }

    #[must_use]
    pub fn exposes_tiles(&self) -> bool {
        self.0.iter().any(|code| code.view_mode() == ViewMode::Tile)
    }

    /// Permitted tile sizes, smallest first.
    #[must_use]
    pub fn tile_sizes(&self) -> Vec<TileSize> {
        [TileSize::Medium, TileSize::Wide, TileSize::Large]
            .into_iter()
            .filter(|size| self.contains(ViewCode::for_tile(*size)))
            .collect()
    }

    /// True when both the grid and at least one tile surface are exposed.
    ///
    /// Compact does not count as a surface: it is a narrow-container rendering
    /// of whichever surface is configured.
    #[must_use]
    pub fn is_dual_surface(&self) -> bool {
        self.exposes_grid() && self.exposes_tiles()
    }

    /// Letter string form, e.g. `"gsml"`.
    #[must_use]
    pub fn letters(&self) -> String {
        self.0.iter().map(|code| code.letter()).collect()
    }
}

/// Validated, defaulted configuration.
#[derive(Debug, Clone)]
pub struct NormalizedOptions {
    pub view_options: ViewOptions,
    pub initial_code: ViewCode,
    pub tile_size: TileSize,
    pub selection_mode: SelectionMode,
    pub columns: Vec<ColumnDef>,
    pub identity: IdentityKey,
    pub tile: TileConfig,
    pub page_size: PageSize,
    pub paging_enabled: bool,
    pub sort: Option<SortInfo>,
    pub group_field: Option<GroupField>,
    pub group_fields: Vec<FieldDef>,
    pub quick_search: QuickSearchOptions,
    pub filter_fields: Vec<FieldDef>,
    pub filter_bar: FilterBarOptions,
    pub user_pref_id: Option<String>,
    pub server: Option<ServerDataOptions>,
    pub responsive: bool,
    pub container_id: Option<String>,
    pub height: Option<String>,
    pub commands: Vec<Command>,
    pub widget_type: String,
}

impl NormalizedOptions {
    /// Every field a tile or column may display.
    #[must_use]
    pub fn known_fields(&self) -> BTreeSet<String> {
        self.columns
            .iter()
            .map(|c| c.field.clone())
            .chain(self.tile.title_field.iter().cloned())
            .chain(self.tile.description_field.iter().cloned())
            .chain(self.tile.property_fields.iter().cloned())
            .chain(self.tile.available_fields.iter().cloned())
            .collect()
    }
}

/// Applies defaults and validation to raw options.
#[must_use]
pub fn normalize(options: &CollectionOptions) -> NormalizedOptions {
    let _span = tracing::debug_span!("normalize_options",
        view_mode = ?options.view_mode,
        view_options = ?options.view_options
    )
    .entered();

    let view_options = ViewOptions::parse(options.view_options.as_deref().unwrap_or_default());
    let initial_code = initial_code(options.view_mode.as_deref(), &view_options);
    let tile_size = derive_tile_size(&view_options, initial_code, &options.tile_config);
    let columns = dedupe_columns(&options.grid_config.column_defs);

    let identity = options
        .grid_config
        .identity_field
        .clone()
        .map_or(IdentityKey::Structural, IdentityKey::Field);

    let page_size = PageSize::from_rows_or_default(options.paging_options.page_size);

    let normalized = NormalizedOptions {
        view_options,
        initial_code,
        tile_size,
        selection_mode: options.selection_mode,
        columns,
        identity,
        tile: options.tile_config.clone(),
        page_size,
        paging_enabled: options.paging_options.enabled,
        sort: options.sort_info.clone(),
        group_field: options.group_field.clone(),
        group_fields: options.group_fields.clone(),
        quick_search: options.quick_search_options.clone(),
        filter_fields: options.filter_fields.clone(),
        filter_bar: options.filter_bar_options.clone(),
        user_pref_id: options.user_pref_id.clone().filter(|id| !id.is_empty()),
        server: options.server_data_options.clone(),
        responsive: options.enable_responsive_behaviour,
        container_id: options.container_id.clone(),
        height: options.height.clone(),
        commands: options.commands.iter().map(Command::from_def).collect(),
        widget_type: options
            .widget_type
            .clone()
            .filter(|w| !w.is_empty())
            .unwrap_or_else(|| DEFAULT_WIDGET_TYPE.to_string()),
    };

    if let Some(sort) = &normalized.sort {
        let known = normalized.known_fields();
        if sort.field_source.is_none() && !known.contains(&sort.field) {
            tracing::warn!(field = %sort.field, "sort field is not a configured field");
        }
    }

    tracing::debug!(
        initial = %normalized.initial_code,
        tile_size = ?normalized.tile_size,
        columns = normalized.columns.len(),
        page_size = normalized.page_size.rows(),
        "options normalized"
    );
    normalized
}

/// Initial view code: the configured `viewMode` when permitted, else the first permitted code.
fn initial_code(view_mode: Option<&str>, view_options: &ViewOptions) -> ViewCode {
    let requested = view_mode.and_then(|s| {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => ViewCode::from_letter(letter),
            _ => None,
        }
    });

    match requested {
        Some(code) if view_options.contains(code) => code,
        Some(code) => {
            tracing::debug!(requested = %code, fallback = %view_options.first(), "view mode not permitted");
            view_options.first()
        }
        None => {
            if let Some(raw) = view_mode {
                tracing::warn!(view_mode = %raw, "unrecognized view mode");
            }
            view_options.first()
        }
    }
}

/// Default tile size for the configuration.
///
/// An initial tile code wins, then a permitted explicit `tileSize`, then the only
/// permitted size, then inference from the property field count snapped to a
/// permitted size.
#[must_use]
pub fn derive_tile_size(view_options: &ViewOptions, initial_code: ViewCode, tile: &TileConfig) -> TileSize {
    if let Some(size) = initial_code.tile_size() {
        return size;
    }

    let permitted = view_options.tile_sizes();
    if let Some(size) = tile.tile_size {
        if permitted.is_empty() || permitted.contains(&size) {
            return size;
        }
        tracing::debug!(size = ?size, "configured tile size not permitted");
    }

    let inferred = infer_tile_size(tile.property_fields.len(), tile.is_cell);
    match permitted.as_slice() {
        [] => inferred,
        [only] => *only,
        sizes => sizes
            .iter()
            .copied()
            .find(|size| *size >= inferred)
            .or_else(|| sizes.last().copied())
            .unwrap_or(inferred),
    }
}

fn dedupe_columns(defs: &[ColumnDef]) -> Vec<ColumnDef> {
    let mut seen = BTreeSet::new();
    let mut columns = Vec::with_capacity(defs.len());
    for def in defs {
        if !seen.insert(def.field.clone()) {
            tracing::warn!(field = %def.field, "duplicate column definition dropped");
            continue;
        }
        if def.label.as_deref().map_or(true, |l| l.trim().is_empty()) {
            tracing::warn!(field = %def.field, "column has no label, rendering without header text");
        }
        columns.push(def.clone());
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(view_mode: &str, view_options: &str) -> CollectionOptions {
        CollectionOptions {
            view_mode: Some(view_mode.to_string()),
            view_options: Some(view_options.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_view_options_mean_grid_only() {
        let normalized = normalize(&CollectionOptions::default());
        assert_eq!(normalized.view_options.codes(), &[ViewCode::Grid]);
        assert_eq!(normalized.initial_code, ViewCode::Grid);
        assert!(!normalized.view_options.is_dual_surface());
    }

    #[test]
    fn unpermitted_view_mode_falls_back_to_first_option() {
        assert_eq!(normalize(&options("l", "gs")).initial_code, ViewCode::Grid);
        assert_eq!(normalize(&options("grid", "sm")).initial_code, ViewCode::MediumTile);
        assert_eq!(normalize(&options("m", "gsml")).initial_code, ViewCode::WideTile);
    }

    #[test]
    fn dual_surface_is_explicit() {
        assert!(ViewOptions::parse("gs").is_dual_surface());
        assert!(!ViewOptions::parse("sml").is_dual_surface());
        assert!(!ViewOptions::parse("gc").is_dual_surface());
        assert!(!ViewOptions::parse("x").is_dual_surface());
    }

    #[test]
    fn tile_size_prefers_initial_code_then_explicit_size() {
        let mut raw = options("l", "gsml");
        raw.tile_config.tile_size = Some(TileSize::Medium);
        assert_eq!(normalize(&raw).tile_size, TileSize::Large);

        raw.view_mode = Some("g".into());
        assert_eq!(normalize(&raw).tile_size, TileSize::Medium);
    }

    #[test]
    fn inferred_tile_size_snaps_to_permitted_sizes() {
        let mut raw = options("g", "gsl");
        raw.tile_config.property_fields = vec!["a".into(), "b".into(), "c".into()];
        assert_eq!(normalize(&raw).tile_size, TileSize::Large);

        raw.view_options = Some("gsm".into());
        raw.tile_config.property_fields.push("d".into());
        assert_eq!(normalize(&raw).tile_size, TileSize::Wide);

        raw.view_options = Some("gm".into());
        raw.tile_config.property_fields.clear();
        assert_eq!(normalize(&raw).tile_size, TileSize::Wide);
    }

    #[test]
    fn invalid_page_size_and_duplicate_columns_are_corrected() {
        let mut raw = CollectionOptions::default();
        raw.paging_options.page_size = Some(7);
        raw.grid_config.column_defs = vec![
            ColumnDef::new("title", "Title"),
            ColumnDef::new("title", "Again"),
            ColumnDef::new("year", "Year"),
        ];
        let normalized = normalize(&raw);
        assert_eq!(normalized.page_size, PageSize::TwentyFive);
        assert_eq!(normalized.columns.len(), 2);
        assert_eq!(normalized.columns[0].label.as_deref(), Some("Title"));
    }
}
