//! Filter-bar adapter.
//!
//! The adapter owns the filter-bar affordances (which fields can be searched,
//! sorted, grouped and filtered, which controls are shown) and a read-only mirror
//! of the search/sort/group state. It never mutates view state itself: user
//! intents are validated and turned into [`Event`]s for the coordinator, and the
//! coordinator writes the mirror back after applying them.

use super::handler::Event;
use super::modes::SortDirection;
use super::state::ViewState;
use crate::data::filter::FilterClause;
use crate::data::group::GroupField;
use crate::data::search::QuickSearchMode;
use crate::data::sort::SortInfo;
use crate::options::collection::FieldDef;
use crate::options::normalize::NormalizedOptions;
use crate::options::FilterBarOptions;

/// Filter-bar affordances and state mirror.
#[derive(Debug, Clone)]
pub struct FilterBarAdapter {
    visibility: FilterBarOptions,
    search_field: Option<String>,
    search_mode: QuickSearchMode,
    placeholder: Option<String>,
    sortable_fields: Vec<FieldDef>,
    group_fields: Vec<FieldDef>,
    filter_fields: Vec<FieldDef>,

    search_text: String,
    sort: Option<SortInfo>,
    group: Option<GroupField>,
    filter_count: usize,
}

impl FilterBarAdapter {
    /// Derives the affordances from the normalized options.
    #[must_use]
    pub fn new(options: &NormalizedOptions) -> Self {
        let sortable_fields = options
            .columns
            .iter()
            .filter(|c| c.sortable)
            .map(|c| FieldDef {
                field: c.field.clone(),
                label: c.label.clone(),
                field_source: c.field_source.clone(),
            })
            .collect();

        Self {
            visibility: options.filter_bar.clone(),
            search_field: options.quick_search.field.clone(),
            search_mode: options.quick_search.mode,
            placeholder: options.quick_search.placeholder.clone(),
            sortable_fields,
            group_fields: options.group_fields.clone(),
            filter_fields: options.filter_fields.clone(),
            search_text: String::new(),
            sort: options.sort.clone(),
            group: options.group_field.clone(),
            filter_count: 0,
        }
    }

    /// Refreshes the mirror from the canonical state.
    pub(crate) fn sync(&mut self, state: &ViewState) {
        self.search_text.clone_from(&state.quick_search_text);
        self.sort.clone_from(&state.sort);
        self.group.clone_from(&state.group_field);
        self.filter_count = state.filter_clauses.len();
    }

    // Intents

    /// The user typed in the search box.
    #[must_use]
    pub fn search_changed(&self, text: &str) -> Event {
        Event::QuickSearchChanged(text.to_string())
    }

    /// The user picked a sort field. Picking the current field toggles the direction.
    ///
    /// Returns `None` for fields that are not sortable.
    #[must_use]
    pub fn sort_requested(&self, field: &str) -> Option<Event> {
        let Some(def) = self.sortable_fields.iter().find(|f| f.field == field) else {
            tracing::debug!(field = %field, "sort requested on non-sortable field");
            return None;
        };

        let direction = match &self.sort {
            Some(current) if current.field == field => current.direction.toggled(),
            _ => SortDirection::Asc,
        };
        Some(Event::SortRequested(Some(SortInfo {
            field: def.field.clone(),
            direction,
            field_source: def.field_source.clone(),
        })))
    }

    /// The user picked a group field, or `None` to ungroup.
    #[must_use]
    pub fn group_requested(&self, field: Option<&str>) -> Option<Event> {
        let Some(field) = field else {
            return Some(Event::GroupFieldChanged(None));
        };
        let Some(def) = self.group_fields.iter().find(|f| f.field == field) else {
            tracing::debug!(field = %field, "group requested on unknown field");
            return None;
        };
        Some(Event::GroupFieldChanged(Some(GroupField {
            field: def.field.clone(),
            field_source: def.field_source.clone(),
        })))
    }

    /// The user applied filter clauses. Clauses on fields not offered for
    /// filtering are dropped; with no configured filter fields every field is allowed.
    #[must_use]
    pub fn filter_applied(&self, clauses: Vec<FilterClause>) -> Event {
        if self.filter_fields.is_empty() {
            return Event::ApplyFilter(clauses);
        }
        let accepted = clauses
            .into_iter()
            .filter_map(|mut clause| {
                let def = self.filter_fields.iter().find(|f| f.field == clause.field);
                match def {
                    Some(def) => {
                        if clause.field_source.is_none() {
                            clause.field_source.clone_from(&def.field_source);
                        }
                        Some(clause)
                    }
                    None => {
                        tracing::debug!(field = %clause.field, "dropping filter clause on unknown field");
                        None
                    }
                }
            })
            .collect();
        Event::ApplyFilter(accepted)
    }

    /// The user cleared the filter builder.
    #[must_use]
    pub const fn filter_cleared(&self) -> Event {
        Event::ResetFilter
    }

    // Read accessors

    #[must_use]
    pub fn get_search_text(&self) -> &str {
        &self.search_text
    }

    #[must_use]
    pub const fn get_group_field(&self) -> Option<&GroupField> {
        self.group.as_ref()
    }

    #[must_use]
    pub const fn get_sort_info(&self) -> Option<&SortInfo> {
        self.sort.as_ref()
    }

    #[must_use]
    pub const fn is_filter_active(&self) -> bool {
        self.filter_count > 0
    }

    /// Number shown on the filter badge.
    #[must_use]
    pub const fn badge_count(&self) -> usize {
        self.filter_count
    }

    #[must_use]
    pub fn search_field(&self) -> Option<&str> {
        self.search_field.as_deref()
    }

    #[must_use]
    pub const fn search_mode(&self) -> QuickSearchMode {
        self.search_mode
    }

    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    #[must_use]
    pub fn sortable_fields(&self) -> &[FieldDef] {
        &self.sortable_fields
    }

    #[must_use]
    pub fn group_fields(&self) -> &[FieldDef] {
        &self.group_fields
    }

    #[must_use]
    pub fn filter_fields(&self) -> &[FieldDef] {
        &self.filter_fields
    }

    #[must_use]
    pub const fn visibility(&self) -> &FilterBarOptions {
        &self.visibility
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::FilterOp;
    use crate::options::{normalize, CollectionOptions, ColumnDef};

    fn adapter() -> FilterBarAdapter {
        let mut options = CollectionOptions::default();
        let mut year = ColumnDef::new("year", "Year");
        year.sortable = false;
        options.grid_config.column_defs = vec![ColumnDef::new("title", "Title"), year];
        options.group_fields = vec![FieldDef { field: "author".into(), label: None, field_source: None }];
        options.filter_fields = vec![FieldDef {
            field: "name".into(),
            label: None,
            field_source: Some("publisher".into()),
        }];
        FilterBarAdapter::new(&normalize(&options))
    }

    #[test]
    fn sort_intents_toggle_and_validate() {
        let mut bar = adapter();
        assert!(bar.sort_requested("year").is_none());

        let Some(Event::SortRequested(Some(first))) = bar.sort_requested("title") else {
            panic!("expected sort event");
        };
        assert_eq!(first.direction, SortDirection::Asc);

        bar.sort = Some(first);
        let Some(Event::SortRequested(Some(second))) = bar.sort_requested("title") else {
            panic!("expected sort event");
        };
        assert_eq!(second.direction, SortDirection::Desc);
    }

    #[test]
    fn group_and_filter_intents_only_accept_offered_fields() {
        let bar = adapter();
        assert!(bar.group_requested(Some("title")).is_none());
        assert_eq!(bar.group_requested(None), Some(Event::GroupFieldChanged(None)));

        let Event::ApplyFilter(clauses) = bar.filter_applied(vec![
            FilterClause::new("name", FilterOp::Eq, "Putnam"),
            FilterClause::new("title", FilterOp::Eq, "Dune"),
        ]) else {
            panic!("expected filter event");
        };
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].field_source.as_deref(), Some("publisher"));
    }

    #[test]
    fn mirror_follows_synced_state() {
        let mut bar = adapter();
        let mut state = ViewState::new(
            crate::app::modes::ViewCode::Grid,
            crate::app::modes::TileSize::Medium,
            crate::app::modes::SelectionMode::None,
        );
        state.quick_search_text = "dune".into();
        state.filter_clauses = vec![FilterClause::new("name", FilterOp::Eq, "Putnam")];
        bar.sync(&state);
        assert_eq!(bar.get_search_text(), "dune");
        assert!(bar.is_filter_active());
        assert_eq!(bar.badge_count(), 1);
    }
}
