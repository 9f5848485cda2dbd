//! Canonical view state.
//!
//! [`ViewState`] is the single source of truth for what is rendered and how the
//! collection is filtered, sorted, grouped and selected. Only the coordinator
//! mutates it; renderers and the filter bar read projections derived from it.
//!
//! # State Components
//!
//! - **Presentation**: `mode`, `tile_size`, `prev_view_code`
//! - **Query**: `sort`, `group_field`, `quick_search_text`, `filter_clauses`
//! - **Selection**: `selection_mode`, `selected_keys`
//! - **Async results**: `is_tags_authorized`, written only by completions and
//!   never merged into other fields
//!
//! Switching presentation never touches the query or selection components.

use super::modes::{SelectionMode, TileSize, ViewCode, ViewMode};
use super::selection::SelectionSet;
use crate::data::filter::FilterClause;
use crate::data::group::GroupField;
use crate::data::sort::SortInfo;
use serde::Serialize;
use std::collections::BTreeSet;

/// Canonical view state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Active presentation.
    pub mode: ViewMode,
    /// Tile size used whenever the mode is `Tile`.
    pub tile_size: TileSize,
    pub sort: Option<SortInfo>,
    pub group_field: Option<GroupField>,
    pub quick_search_text: String,
    pub filter_clauses: Vec<FilterClause>,
    pub selection_mode: SelectionMode,
    pub selected_keys: SelectionSet,
    /// Labels of expanded groups of the current group field.
    pub expanded_groups: BTreeSet<String>,
    /// View to restore when the container widens again.
    pub prev_view_code: Option<ViewCode>,
    pub is_tags_authorized: bool,
    pub tag_manager_open: bool,
    /// True when the current query matches no record.
    pub no_data: bool,
}

impl ViewState {
    /// State for an initial view code.
    #[must_use]
    pub fn new(code: ViewCode, tile_size: TileSize, selection_mode: SelectionMode) -> Self {
        Self {
            mode: code.view_mode(),
            tile_size: code.tile_size().unwrap_or(tile_size),
            sort: None,
            group_field: None,
            quick_search_text: String::new(),
            filter_clauses: Vec::new(),
            selection_mode,
            selected_keys: SelectionSet::new(),
            expanded_groups: BTreeSet::new(),
            prev_view_code: None,
            is_tags_authorized: false,
            tag_manager_open: false,
            no_data: true,
        }
    }

    /// Code of the active presentation.
    #[must_use]
    pub fn view_code(&self) -> ViewCode {
        ViewCode::from_mode(self.mode, Some(self.tile_size)).unwrap_or(ViewCode::Grid)
    }

    /// Switches presentation to `code`, leaving every other field untouched.
    pub fn apply_code(&mut self, code: ViewCode) {
        self.mode = code.view_mode();
        if let Some(size) = code.tile_size() {
            self.tile_size = size;
        }
    }

    #[must_use]
    pub fn is_filter_active(&self) -> bool {
        !self.filter_clauses.is_empty()
    }

    /// Selection mode as experienced by the user: compact is single-select.
    #[must_use]
    pub fn effective_selection_mode(&self) -> SelectionMode {
        match (self.mode, self.selection_mode) {
            (ViewMode::Compact, SelectionMode::Multi) => SelectionMode::Single,
            (_, mode) => mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_code_only_touches_presentation() {
        let mut state = ViewState::new(ViewCode::Grid, TileSize::Medium, SelectionMode::Multi);
        state.quick_search_text = "dune".into();
        let before = state.clone();

        state.apply_code(ViewCode::LargeTile);
        assert_eq!(state.view_code(), ViewCode::LargeTile);
        state.apply_code(ViewCode::Compact);
        assert_eq!(state.tile_size, TileSize::Large);
        assert_eq!(state.quick_search_text, before.quick_search_text);
        assert_eq!(state.effective_selection_mode(), SelectionMode::Single);
    }
}
