//! The view-mode coordinator.
//!
//! [`ViewModeCoordinator`] is the single authority for what is rendered and how
//! state survives presentation switches. It owns the canonical [`ViewState`],
//! the effective [`ViewConfig`] (configuration plus personalization overlay),
//! the data pipeline and the two render projections.
//!
//! # Architecture
//!
//! ```text
//!  operation ──▶ mutate ViewState ──▶ recompute rows ──▶ invalidate projections
//!                                                          └─▶ rebuild active one
//!      └──────────▶ Vec<Action> (worker requests, page fetches, notifications)
//! ```
//!
//! Every operation finishes rebuilding the active projection before returning,
//! so a renderer never observes a half-updated state. The inactive projection
//! is rebuilt lazily the next time it is read.
//!
//! # Personalization
//!
//! Layout edits persist as they happen: a view-mode change, column toggle,
//! column move or tile-field edit each emit a save for the widget's
//! personalization slot, and a reset writes back what remains. Nothing is lost
//! when the widget is torn down without an explicit save.
//! [`save_personalization`](ViewModeCoordinator::save_personalization) re-sends
//! the current layout, for hosts that expose a save button or retry after a
//! failed write. Any local edit supersedes a personalization load still in
//! flight.
//!
//! # Async completions
//!
//! Personalization loads and server page fetches carry a generation number.
//! Completions whose generation is not the latest issued are dropped, and after
//! [`teardown`](ViewModeCoordinator::teardown) every completion is ignored.
//!
//! # Example
//!
//! ```rust
//! use collection_viewer::app::ViewModeCoordinator;
//! use collection_viewer::app::modes::{TileSize, ViewMode};
//! use collection_viewer::data::DataSource;
//! use collection_viewer::infrastructure::{ContainerSize, FixedMeasure};
//! use collection_viewer::options::CollectionOptions;
//! use collection_viewer::Record;
//!
//! let options = CollectionOptions {
//!     view_mode: Some("g".into()),
//!     view_options: Some("gsml".into()),
//!     ..Default::default()
//! };
//! let data = vec![Record::new().with("title", "Dune")];
//! let measure = FixedMeasure::new(ContainerSize::new(1024.0, 768.0));
//!
//! let (mut coordinator, _actions) =
//!     ViewModeCoordinator::initialize(&options, DataSource::InMemory(data), Box::new(measure));
//! coordinator.change_view_mode(ViewMode::Tile, Some(TileSize::Wide));
//! assert_eq!(coordinator.state().mode, ViewMode::Tile);
//! ```

use super::actions::Action;
use super::commands::{Command, CommandContext, CommandGate, CommandRegistry};
use super::filter_bar::FilterBarAdapter;
use super::modes::{SelectionMode, TileSize, ViewCode, ViewMode};
use super::responsive::{Breakpoint, ResponsiveController, Transition};
use super::state::ViewState;
use crate::data::export::ExportColumn;
use crate::data::filter::matches_all;
use crate::data::group::{group_records, order_by_group};
use crate::data::sort::sort_records;
use crate::data::{
    DataSource, ExportOptions, ExportTable, FilterClause, FilterOp, GroupBucket, GroupField, PageInfo,
    PageManager, PageSize, PagingMode, QuickSearch, QuickSearchMode, ServerPage, ServerQuery, SortInfo,
};
use crate::domain::{IdentityKey, Record, Result, SelectionKey};
use crate::infrastructure::{ContainerMeasure, PageBus, PageEvent, Subscription};
use crate::options::{derive_tile_size, normalize, CollectionOptions, NormalizedOptions};
use crate::projection::{GridOptions, Projection, ProjectionContext, TileOptions};
use crate::storage::{merge_view_config, PersonalizationRecord, TileFields, ViewConfig};
use crate::worker::{WorkerMessage, WorkerResponse};
use std::cell::OnceCell;
use std::fmt;

/// Owner of the canonical view state.
pub struct ViewModeCoordinator {
    options: NormalizedOptions,
    state: ViewState,
    base_config: ViewConfig,
    view_config: ViewConfig,
    personalization: Option<PersonalizationRecord>,

    source: DataSource,
    /// All records for in-memory data; the loaded page for server data.
    records: Vec<Record>,
    /// Records after filter, quick search, sort and group ordering.
    view_rows: Vec<Record>,
    groups: Vec<GroupBucket>,
    pages: PageManager,

    filter_bar: FilterBarAdapter,
    commands: CommandRegistry,
    responsive: ResponsiveController,
    measure: Box<dyn ContainerMeasure>,
    subscription: Option<Subscription>,

    grid_cache: OnceCell<GridOptions>,
    tile_cache: OnceCell<TileOptions>,

    render_pending: bool,
    torn_down: bool,
    pending_reset: bool,
    last_generation: u64,
    page_generation: u64,
    personalization_generation: u64,
}

impl fmt::Debug for ViewModeCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModeCoordinator")
            .field("state", &self.state)
            .field("view_config", &self.view_config)
            .field("records", &self.records.len())
            .field("page_info", &self.pages.page_info())
            .field("commands", &self.commands)
            .field("torn_down", &self.torn_down)
            .finish_non_exhaustive()
    }
}

impl ViewModeCoordinator {
    /// Builds a coordinator from host configuration.
    ///
    /// The initial mode comes from `viewMode`; when responsive behaviour is on
    /// and the measured container is narrow, compact mode starts instead and the
    /// configured code is remembered for when the container widens. Returns the
    /// personalization load and, for server data, the first page fetch.
    pub fn initialize(
        options: &CollectionOptions,
        source: DataSource,
        measure: Box<dyn ContainerMeasure>,
    ) -> (Self, Vec<Action>) {
        let _span = tracing::debug_span!("initialize").entered();

        let options = normalize(options);
        let source = match (source, &options.server) {
            (DataSource::InMemory(records), Some(server)) if records.is_empty() => DataSource::Server(server.clone()),
            (source, _) => source,
        };
        let paging_mode = if source.is_server() { PagingMode::Server } else { PagingMode::Client };
        let records = match &source {
            DataSource::InMemory(records) => records.clone(),
            DataSource::Server(_) => Vec::new(),
        };

        let mut state = ViewState::new(options.initial_code, options.tile_size, options.selection_mode);
        state.sort.clone_from(&options.sort);
        state.group_field.clone_from(&options.group_field);

        let width = measure.measure().width;
        let breakpoint = if options.responsive { Breakpoint::of_width(width) } else { Breakpoint::Wide };
        if breakpoint == Breakpoint::Narrow {
            tracing::debug!(width = width, initial = %options.initial_code, "starting in compact mode");
            state.prev_view_code = Some(options.initial_code);
            state.apply_code(ViewCode::Compact);
        }

        let base_config = ViewConfig::base(&options);
        let mut coordinator = Self {
            pages: PageManager::new(paging_mode, options.page_size, options.paging_enabled),
            filter_bar: FilterBarAdapter::new(&options),
            view_config: base_config.clone(),
            base_config,
            personalization: None,
            source,
            records,
            view_rows: Vec::new(),
            groups: Vec::new(),
            commands: CommandRegistry::new(),
            responsive: ResponsiveController::new(breakpoint),
            measure,
            subscription: None,
            grid_cache: OnceCell::new(),
            tile_cache: OnceCell::new(),
            render_pending: true,
            torn_down: false,
            pending_reset: false,
            last_generation: 0,
            page_generation: 0,
            personalization_generation: 0,
            state,
            options,
        };
        coordinator.recompute();

        let mut actions = Vec::new();
        actions.extend(coordinator.load_personalization());
        actions.extend(coordinator.fetch_page());

        tracing::debug!(
            mode = ?coordinator.state.mode,
            tile_size = ?coordinator.state.tile_size,
            records = coordinator.records.len(),
            server = coordinator.source.is_server(),
            "coordinator initialized"
        );
        (coordinator, actions)
    }

    /// Injects the command handler registry.
    #[must_use]
    pub fn with_commands(mut self, registry: CommandRegistry) -> Self {
        self.commands = registry;
        self
    }

    /// Replaces the identity used to match records across refreshes.
    pub fn set_identity(&mut self, identity: IdentityKey) {
        self.options.identity = identity;
        self.invalidate_projections();
    }

    /// Subscribes to page-scoped notifications.
    pub fn attach_bus(&mut self, bus: &PageBus) {
        self.subscription = Some(bus.subscribe());
    }

    /// Processes notifications waiting in the bus mailbox.
    pub fn drain_bus(&mut self) -> Vec<Action> {
        let events = self.subscription.as_ref().map(Subscription::drain).unwrap_or_default();
        events.iter().flat_map(|event| self.handle_page_event(event)).collect()
    }

    /// Returns and clears the "needs render" flag.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.render_pending)
    }

    // Presentation

    /// Switches presentation.
    ///
    /// No-op unless the target code is permitted. While the container is narrow
    /// the request is only remembered and compact mode stays active. Sort,
    /// group, quick search, filters and selection are never touched.
    pub fn change_view_mode(&mut self, mode: ViewMode, tile_size: Option<TileSize>) -> Vec<Action> {
        let _span = tracing::debug_span!("change_view_mode", mode = ?mode, tile_size = ?tile_size).entered();

        let size = tile_size.or_else(|| (mode == ViewMode::Tile).then_some(self.state.tile_size));
        let Some(code) = ViewCode::from_mode(mode, size) else {
            tracing::debug!("no view code for request");
            return vec![];
        };
        if !self.options.view_options.contains(code) {
            tracing::debug!(code = %code, permitted = %self.options.view_options.letters(), "view mode not permitted");
            return vec![];
        }

        if self.responsive.is_narrow() {
            tracing::debug!(code = %code, "container narrow, remembering requested view");
            self.state.prev_view_code = Some(code);
            self.view_config.view_code = code;
            return self.persist();
        }
        if code == self.state.view_code() {
            return vec![];
        }

        self.state.apply_code(code);
        self.view_config.view_code = code;
        self.invalidate_projections();

        let mut actions = vec![Action::ViewModeChanged { code }];
        actions.extend(self.persist());
        actions
    }

    /// Samples the container width and applies breakpoint transitions.
    pub fn handle_resize(&mut self) -> Vec<Action> {
        if !self.options.responsive {
            return vec![];
        }
        let _span = tracing::debug_span!("handle_resize").entered();

        let mut width = self.measure.measure().width;
        let mut actions = Vec::new();
        while let Some(transition) = self.responsive.begin(width) {
            actions.extend(self.apply_transition(transition));
            match self.responsive.finish() {
                Some(deferred) => width = deferred,
                None => break,
            }
        }
        actions
    }

    fn apply_transition(&mut self, transition: Transition) -> Vec<Action> {
        let code = match transition {
            Transition::EnterNarrow => {
                self.state.prev_view_code = Some(self.state.view_code());
                ViewCode::Compact
            }
            Transition::LeaveNarrow => self.state.prev_view_code.take().unwrap_or(self.view_config.view_code),
        };
        tracing::debug!(transition = ?transition, code = %code, "responsive transition");

        self.state.apply_code(code);
        self.invalidate_projections();
        vec![Action::ViewModeChanged { code }]
    }

    // Query

    /// Replaces the structured filter clauses and returns to page 1.
    pub fn apply_filter(&mut self, clauses: Vec<FilterClause>) -> Vec<Action> {
        let _span = tracing::debug_span!("apply_filter", clauses = clauses.len()).entered();
        self.state.filter_clauses = clauses;
        self.pages.reset();
        self.requery()
    }

    /// Clears the structured filter clauses and returns to page 1.
    pub fn reset_filter(&mut self) -> Vec<Action> {
        let _span = tracing::debug_span!("reset_filter").entered();
        self.state.filter_clauses.clear();
        self.pages.reset();
        self.requery()
    }

    pub fn set_quick_search(&mut self, text: &str) -> Vec<Action> {
        if self.state.quick_search_text == text {
            return vec![];
        }
        let _span = tracing::debug_span!("set_quick_search", text = %text).entered();
        self.state.quick_search_text = text.to_string();
        self.pages.reset();
        self.requery()
    }

    /// Groups by `field`, or ungroups. Expanded groups are forgotten.
    pub fn set_group_field(&mut self, field: Option<GroupField>) -> Vec<Action> {
        if self.state.group_field == field {
            return vec![];
        }
        let _span = tracing::debug_span!("set_group_field", field = ?field).entered();
        self.state.group_field = field;
        self.state.expanded_groups.clear();
        self.pages.reset();
        self.requery()
    }

    /// Expands the group labelled `value` of the current group field.
    pub fn expand_group(&mut self, field: &str, value: &str) -> Vec<Action> {
        self.toggle_group(field, value, true)
    }

    pub fn collapse_group(&mut self, field: &str, value: &str) -> Vec<Action> {
        self.toggle_group(field, value, false)
    }

    fn toggle_group(&mut self, field: &str, value: &str, expanded: bool) -> Vec<Action> {
        let Some(group) = self.state.group_field.as_ref() else {
            tracing::debug!(field = %field, "not grouped, ignoring group toggle");
            return vec![];
        };
        if group.field != field && group.path() != field {
            tracing::debug!(field = %field, current = %group.field, "group toggle for another field ignored");
            return vec![];
        }

        let changed = if expanded {
            self.state.expanded_groups.insert(value.to_string())
        } else {
            self.state.expanded_groups.remove(value)
        };
        if changed {
            self.regroup();
            self.invalidate_projections();
        }
        vec![]
    }

    /// Sort changed from the filter bar or a renderer header.
    pub fn sorting_changed(&mut self, sort: Option<SortInfo>) -> Vec<Action> {
        if self.state.sort == sort {
            return vec![];
        }
        let _span = tracing::debug_span!("sorting_changed", sort = ?sort).entered();
        self.state.sort.clone_from(&sort);

        let mut actions = vec![Action::SortingChanged(sort)];
        actions.extend(self.requery());
        actions
    }

    // Data

    /// Re-pulls data and personalization.
    ///
    /// With `reset_personalization` the in-memory overlay is discarded first and
    /// paging returns to page 1.
    pub fn refresh(&mut self, reset_personalization: bool) -> Vec<Action> {
        let _span = tracing::debug_span!("refresh", reset_personalization = reset_personalization).entered();

        if reset_personalization {
            self.personalization = None;
            self.restore_base();
            self.pages.reset();
        }
        let mut actions = self.requery();
        actions.extend(self.load_personalization());
        actions
    }

    /// Re-synchronizes rows, paging and projections with the data source.
    ///
    /// `data` replaces in-memory records. Selection is kept for records that
    /// still exist by identity. Calling it repeatedly with the same data leaves
    /// the state unchanged.
    pub fn reset_data(&mut self, data: Option<Vec<Record>>) -> Vec<Action> {
        let _span = tracing::debug_span!("reset_data", replaced = data.is_some()).entered();

        if let Some(data) = data {
            if self.source.is_server() {
                tracing::debug!(records = data.len(), "ignoring in-memory data for server source");
            } else {
                self.source = DataSource::InMemory(data.clone());
                self.records = data;
            }
        }

        let mut actions = Vec::new();
        if !self.source.is_server() {
            let before = self.state.selected_keys.len();
            self.state
                .selected_keys
                .retain_existing(&self.options.identity, &self.records);
            if self.state.selected_keys.len() != before {
                tracing::debug!(dropped = before - self.state.selected_keys.len(), "selection pruned");
                actions.push(self.selection_changed());
            }
        }
        actions.extend(self.requery());
        actions
    }

    /// Moves to page `page` (1-based, clamped).
    pub fn change_page(&mut self, page: usize) -> Vec<Action> {
        if !self.pages.set_page(page) {
            return vec![];
        }
        tracing::debug!(page = self.pages.current_page(), "page changed");
        if self.source.is_server() {
            return self.fetch_page().into_iter().collect();
        }
        self.invalidate_projections();
        vec![]
    }

    /// Changes the page size; values outside {10, 25, 50, 100} are ignored.
    pub fn set_page_size(&mut self, rows: u32) -> Vec<Action> {
        let Some(size) = PageSize::from_rows(rows) else {
            tracing::debug!(rows = rows, "unsupported page size ignored");
            return vec![];
        };
        if size == self.pages.page_size() {
            return vec![];
        }
        self.pages.set_page_size(size);
        self.requery()
    }

    // Selection

    /// Selects or deselects `items`, matched by identity against the rows of
    /// the active projection. `clear` drops the previous selection first.
    pub fn select_items(&mut self, items: &[Record], selected: bool, clear: bool) -> Vec<Action> {
        let _span = tracing::debug_span!("select_items", items = items.len(), selected = selected, clear = clear).entered();

        let mode = self.state.effective_selection_mode();
        if mode == SelectionMode::None {
            tracing::debug!("selection disabled");
            return vec![];
        }

        let identity = &self.options.identity;
        let keys: Vec<SelectionKey> = items
            .iter()
            .filter_map(|item| {
                let wanted = identity.key_of(item);
                let found = self.page_rows().iter().find(|row| identity.matches(&wanted, row));
                if found.is_none() {
                    tracing::debug!("selected item is not in the current view");
                }
                found.map(|row| identity.key_of(row))
            })
            .collect();

        let before = self.state.selected_keys.clone();
        if clear {
            self.state.selected_keys.clear();
        }
        for key in keys {
            if selected {
                self.state.selected_keys.insert(key);
            } else {
                self.state.selected_keys.remove(&key);
            }
        }
        self.state.selected_keys.truncate_for(mode);

        if self.state.selected_keys == before {
            return vec![];
        }
        self.invalidate_projections();
        vec![self.selection_changed()]
    }

    /// Selects every row of the current page, or clears the selection.
    pub fn select_all(&mut self, selected: bool) -> Vec<Action> {
        let before = self.state.selected_keys.clone();
        if selected {
            if self.state.effective_selection_mode() != SelectionMode::Multi {
                tracing::debug!("select all requires multi selection");
                return vec![];
            }
            let identity = &self.options.identity;
            let keys: Vec<SelectionKey> = self.page_rows().iter().map(|row| identity.key_of(row)).collect();
            for key in keys {
                self.state.selected_keys.insert(key);
            }
        } else {
            self.state.selected_keys.clear();
        }

        if self.state.selected_keys == before {
            return vec![];
        }
        self.invalidate_projections();
        vec![self.selection_changed()]
    }

    /// Changes the selection mode, truncating to what the new mode allows.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) -> Vec<Action> {
        let _span = tracing::debug_span!("set_selection_mode", mode = ?mode).entered();
        let before = self.state.selected_keys.len();
        self.state.selection_mode = mode;
        self.state.selected_keys.truncate_for(mode);
        self.invalidate_projections();

        if self.state.selected_keys.len() == before {
            return vec![];
        }
        vec![self.selection_changed()]
    }

    fn selection_changed(&self) -> Action {
        Action::SelectionChanged {
            keys: self.state.selected_keys.keys().to_vec(),
        }
    }

    // Personalization

    pub fn set_column_visibility(&mut self, field: &str, visible: bool) -> Vec<Action> {
        let Some(column) = self.view_config.columns.iter_mut().find(|c| c.field == field) else {
            tracing::debug!(field = %field, "unknown column");
            return vec![];
        };
        if column.visible == visible {
            return vec![];
        }
        column.visible = visible;
        self.invalidate_projections();
        self.persist()
    }

    /// Moves a column to `to_index` (clamped) in display order.
    pub fn move_column(&mut self, field: &str, to_index: usize) -> Vec<Action> {
        let Some(from) = self.view_config.columns.iter().position(|c| c.field == field) else {
            tracing::debug!(field = %field, "unknown column");
            return vec![];
        };
        let to = to_index.min(self.view_config.columns.len() - 1);
        if from == to {
            return vec![];
        }
        let column = self.view_config.columns.remove(from);
        self.view_config.columns.insert(to, column);
        self.view_config.renumber();
        self.invalidate_projections();
        self.persist()
    }

    /// Replaces the tile field mapping. Fields tiles may not show are dropped.
    pub fn set_tile_fields(&mut self, fields: TileFields) -> Vec<Action> {
        let allowed = &self.view_config.allowed_fields;
        let keep = |field: Option<String>| {
            field.filter(|f| {
                let ok = allowed.contains(f);
                if !ok {
                    tracing::debug!(field = %f, "tile field not allowed");
                }
                ok
            })
        };
        let tile = TileFields {
            title_field: keep(fields.title_field),
            description_field: keep(fields.description_field),
            property_fields: fields
                .property_fields
                .into_iter()
                .filter_map(|f| keep(Some(f)))
                .collect(),
        };
        if tile == self.view_config.tile {
            return vec![];
        }
        self.view_config.tile = tile;
        self.invalidate_projections();
        self.persist()
    }

    /// Re-sends the current layout to the store.
    ///
    /// Edits already persist themselves; this is the explicit save affordance.
    pub fn save_personalization(&mut self) -> Vec<Action> {
        if self.options.user_pref_id.is_none() {
            tracing::debug!("personalization disabled, nothing to save");
        }
        self.persist()
    }

    /// Resets personalization.
    ///
    /// Widgets exposing one surface reset that surface and persist the rest.
    /// Widgets exposing both grid and tiles ask for confirmation first.
    pub fn reset_personalization(&mut self) -> Vec<Action> {
        let _span = tracing::debug_span!("reset_personalization").entered();

        if self.options.view_options.is_dual_surface() {
            tracing::debug!("dual surface, awaiting confirmation");
            self.pending_reset = true;
            return vec![Action::ConfirmReset];
        }

        let current = self.view_config.capture();
        let remainder = if self.options.view_options.exposes_tiles() {
            self.view_config.tile = self.base_config.tile.clone();
            self.rederive_tile_size();
            current.without_tile_fields()
        } else {
            self.view_config.columns = self.base_config.columns.clone();
            current.without_columns()
        };
        self.invalidate_projections();
        self.persist_record(remainder)
    }

    /// The user confirmed a full reset: clear the record and restore configuration.
    pub fn confirm_reset(&mut self) -> Vec<Action> {
        if !std::mem::take(&mut self.pending_reset) {
            tracing::debug!("no reset awaiting confirmation");
            return vec![];
        }
        let _span = tracing::debug_span!("confirm_reset").entered();

        self.personalization = None;
        self.restore_base();

        let mut actions = Vec::new();
        if let Some(pref_id) = self.options.user_pref_id.clone() {
            let generation = self.next_generation();
            actions.push(Action::PostToWorker(WorkerMessage::clear(
                generation,
                self.options.widget_type.as_str(),
                pref_id,
            )));
        }
        self.pages.reset();
        actions.extend(self.requery());
        actions
    }

    pub fn cancel_reset(&mut self) {
        if std::mem::take(&mut self.pending_reset) {
            tracing::debug!("reset cancelled");
        }
    }

    fn persist(&mut self) -> Vec<Action> {
        let record = self.view_config.capture();
        self.persist_record(record)
    }

    fn persist_record(&mut self, record: PersonalizationRecord) -> Vec<Action> {
        let Some(pref_id) = self.options.user_pref_id.clone() else {
            return vec![];
        };
        self.supersede_pending_load();
        self.personalization = Some(record.clone());
        let generation = self.next_generation();
        if record.is_empty() {
            return vec![Action::PostToWorker(WorkerMessage::clear(
                generation,
                self.options.widget_type.as_str(),
                pref_id,
            ))];
        }
        vec![Action::PostToWorker(WorkerMessage::save(
            generation,
            self.options.widget_type.as_str(),
            pref_id,
            record,
        ))]
    }

    fn load_personalization(&mut self) -> Option<Action> {
        let pref_id = self.options.user_pref_id.clone()?;
        let generation = self.next_generation();
        self.personalization_generation = generation;
        Some(Action::PostToWorker(WorkerMessage::load(
            generation,
            self.options.widget_type.as_str(),
            pref_id,
        )))
    }

    /// Local layout edits win over a load still in flight.
    fn supersede_pending_load(&mut self) {
        if self.personalization_generation != 0 {
            tracing::debug!(generation = self.personalization_generation, "pending personalization load superseded");
            self.personalization_generation = 0;
        }
    }

    fn apply_personalization(&mut self, record: PersonalizationRecord) {
        let _span = tracing::debug_span!("apply_personalization", columns = record.columns.len()).entered();
        self.view_config = merge_view_config(&self.base_config, &record, &self.options.view_options);
        self.personalization = Some(record);
        self.rederive_tile_size();
        self.apply_view_code(self.view_config.view_code);
        self.invalidate_projections();
    }

    /// Configuration defaults for layout and presentation.
    fn restore_base(&mut self) {
        self.supersede_pending_load();
        self.view_config = self.base_config.clone();
        self.rederive_tile_size();
        self.apply_view_code(self.view_config.view_code);
        self.invalidate_projections();
    }

    fn rederive_tile_size(&mut self) {
        let mut tile = self.options.tile.clone();
        tile.property_fields.clone_from(&self.view_config.tile.property_fields);
        self.state.tile_size = derive_tile_size(&self.options.view_options, self.view_config.view_code, &tile);
    }

    fn apply_view_code(&mut self, code: ViewCode) {
        if self.responsive.is_narrow() {
            self.state.prev_view_code = Some(code);
        } else {
            self.state.apply_code(code);
        }
    }

    // Async completions

    /// Applies a worker response, ignoring superseded loads.
    pub fn handle_worker_response(&mut self, response: &WorkerResponse) -> Vec<Action> {
        match response {
            WorkerResponse::PersonalizationLoaded { generation, record } => {
                if *generation != self.personalization_generation {
                    tracing::debug!(
                        generation = generation,
                        latest = self.personalization_generation,
                        "stale personalization load ignored"
                    );
                    return vec![];
                }
                match record {
                    Some(record) => self.apply_personalization(record.clone()),
                    None => tracing::debug!("no saved personalization, using configuration"),
                }
            }
            WorkerResponse::PersonalizationSaved { generation } => {
                tracing::debug!(generation = generation, "personalization saved");
            }
            WorkerResponse::PersonalizationCleared { generation } => {
                tracing::debug!(generation = generation, "personalization cleared");
            }
            WorkerResponse::Error { generation, message } => {
                tracing::warn!(generation = generation, error = %message, "personalization store failed");
            }
        }
        vec![]
    }

    /// Applies a server page, ignoring superseded fetches.
    pub fn page_loaded(&mut self, generation: u64, page: ServerPage) -> Vec<Action> {
        if generation != self.page_generation {
            tracing::debug!(generation = generation, latest = self.page_generation, "stale page ignored");
            return vec![];
        }
        tracing::debug!(records = page.records.len(), total = page.total_count, "page loaded");

        let requested = self.pages.current_page();
        self.records = page.records;
        self.pages.set_total_count(page.total_count);
        if self.pages.current_page() != requested {
            return self.fetch_page().into_iter().collect();
        }
        self.recompute();
        vec![]
    }

    pub fn page_load_failed(&mut self, generation: u64, message: &str) -> Vec<Action> {
        if generation == self.page_generation {
            tracing::warn!(error = %message, "page fetch failed, keeping current rows");
        }
        vec![]
    }

    /// Records the tag-management authorization result. Failures hide the feature.
    pub fn tags_authorization_resolved(&mut self, result: &std::result::Result<bool, String>) -> Vec<Action> {
        let authorized = match result {
            Ok(authorized) => *authorized,
            Err(error) => {
                tracing::debug!(error = %error, "tag authorization failed");
                false
            }
        };
        if self.state.is_tags_authorized != authorized {
            self.state.is_tags_authorized = authorized;
            self.invalidate_projections();
        }
        vec![]
    }

    /// Reacts to a page-bus notification.
    pub fn handle_page_event(&mut self, event: &PageEvent) -> Vec<Action> {
        match event {
            PageEvent::TagManagerStateChanged { open } => {
                if self.state.tag_manager_open != *open {
                    self.state.tag_manager_open = *open;
                    self.invalidate_projections();
                }
                vec![]
            }
            PageEvent::TagsChanged { keys } => {
                tracing::debug!(keys = keys.len(), "tags changed, refreshing");
                self.refresh(false)
            }
            PageEvent::RefreshRequested { widget_id } => {
                let targeted = match (widget_id, &self.options.container_id) {
                    (None, _) => true,
                    (Some(id), Some(own)) => id == own,
                    (Some(_), None) => false,
                };
                if targeted {
                    self.refresh(false)
                } else {
                    vec![]
                }
            }
        }
    }

    // Commands

    /// Invokes a command through the registry, or forwards it to the host.
    pub fn invoke_command(&mut self, id: &str) -> Vec<Action> {
        let _span = tracing::debug_span!("invoke_command", id = %id).entered();

        let Some(command) = self.resolved_commands().into_iter().find(|c| c.id == id) else {
            tracing::debug!("unknown command");
            return vec![];
        };
        if !command.is_invocable() {
            tracing::debug!(enabled = command.enabled, visible = command.visible, "command not invocable");
            return vec![];
        }

        let selected = self.selected_records();
        let context = CommandContext { id, selected: &selected };
        if self.commands.invoke(&context) {
            return vec![];
        }
        vec![Action::RunCommand {
            id: id.to_string(),
            selected,
        }]
    }

    /// Commands with selection and authorization gating applied.
    #[must_use]
    pub fn resolved_commands(&self) -> Vec<Command> {
        let gate = CommandGate {
            selection_count: self.state.selected_keys.len(),
            tags_authorized: self.state.is_tags_authorized,
            tag_manager_open: self.state.tag_manager_open,
        };
        self.options.commands.iter().map(|c| c.resolve(&gate)).collect()
    }

    fn selected_records(&self) -> Vec<Record> {
        self.records
            .iter()
            .filter(|r| self.state.selected_keys.is_selected(&self.options.identity, r))
            .cloned()
            .collect()
    }

    /// Detaches from the page bus. Every later event is ignored.
    pub fn teardown(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
        self.torn_down = true;
        self.pending_reset = false;
        tracing::debug!("coordinator torn down");
    }

    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // Host read API

    #[must_use]
    pub fn get_search_text(&self) -> &str {
        &self.state.quick_search_text
    }

    #[must_use]
    pub const fn get_group_field(&self) -> Option<&GroupField> {
        self.state.group_field.as_ref()
    }

    #[must_use]
    pub const fn get_sort_info(&self) -> Option<&SortInfo> {
        self.state.sort.as_ref()
    }

    #[must_use]
    pub fn get_filter_clauses(&self) -> &[FilterClause] {
        &self.state.filter_clauses
    }

    /// Filtered and sorted records across all pages (the loaded page for server data).
    #[must_use]
    pub fn get_current_data(&self) -> &[Record] {
        &self.view_rows
    }

    #[must_use]
    pub fn get_page_info(&self) -> PageInfo {
        self.pages.page_info()
    }

    /// Exports the current data as CSV.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Export`](crate::ViewerError::Export) if serialization fails.
    pub fn print_to_excel(&self, options: &ExportOptions) -> Result<Vec<Action>> {
        let _span = tracing::debug_span!("print_to_excel", all_pages = options.all_pages).entered();

        let columns = self
            .view_config
            .columns
            .iter()
            .filter(|c| c.visible || options.include_hidden)
            .map(|c| ExportColumn {
                field: c.field_source.as_ref().map_or_else(|| c.field.clone(), |alias| format!("{alias}.{}", c.field)),
                header: c.label.clone().unwrap_or_else(|| c.field.clone()),
            })
            .collect();
        let rows = if options.all_pages { &self.view_rows[..] } else { self.page_rows() };
        let content = ExportTable { columns, rows }.to_csv()?;

        let stem = options
            .file_name
            .clone()
            .or_else(|| match &self.source {
                DataSource::Server(server) if !server.data_entity.is_empty() => Some(server.data_entity.clone()),
                _ => None,
            })
            .unwrap_or_else(|| "export".to_string());
        tracing::debug!(rows = rows.len(), file = %stem, "export prepared");

        Ok(vec![Action::ExportWorkbook {
            file_name: format!("{stem}.csv"),
            content,
        }])
    }

    #[must_use]
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    #[must_use]
    pub const fn view_config(&self) -> &ViewConfig {
        &self.view_config
    }

    #[must_use]
    pub const fn options(&self) -> &NormalizedOptions {
        &self.options
    }

    #[must_use]
    pub const fn filter_bar(&self) -> &FilterBarAdapter {
        &self.filter_bar
    }

    #[must_use]
    pub const fn personalization(&self) -> Option<&PersonalizationRecord> {
        self.personalization.as_ref()
    }

    #[must_use]
    pub fn groups(&self) -> &[GroupBucket] {
        &self.groups
    }

    /// Rows of the current page.
    #[must_use]
    pub fn page_rows(&self) -> &[Record] {
        self.pages.slice(&self.view_rows)
    }

    // Projections

    #[must_use]
    pub fn grid_options(&self) -> &GridOptions {
        self.grid_cache.get_or_init(|| self.with_context(GridOptions::project))
    }

    #[must_use]
    pub fn tile_options(&self) -> &TileOptions {
        self.tile_cache.get_or_init(|| self.with_context(TileOptions::project))
    }

    /// Projection of the active presentation.
    #[must_use]
    pub fn projection(&self) -> Projection {
        match self.state.mode {
            ViewMode::Grid => Projection::Grid(self.grid_options().clone()),
            ViewMode::Tile => Projection::Tile(self.tile_options().clone()),
            ViewMode::Compact => Projection::Compact(self.tile_options().clone()),
        }
    }

    fn with_context<T>(&self, project: impl FnOnce(&ProjectionContext<'_>) -> T) -> T {
        let search = self.quick_search();
        let commands = self.resolved_commands();
        let context = ProjectionContext {
            config: &self.view_config,
            state: &self.state,
            rows: self.page_rows(),
            groups: &self.groups,
            page_info: self.pages.page_info(),
            identity: &self.options.identity,
            search: &search,
            commands: &commands,
            is_cell: self.options.tile.is_cell,
            height: self.options.height.as_deref(),
            container_id: self.options.container_id.as_deref(),
        };
        project(&context)
    }

    /// Drops both projections and rebuilds the active one.
    fn invalidate_projections(&mut self) {
        self.grid_cache.take();
        self.tile_cache.take();
        self.render_pending = true;
        match self.state.mode {
            ViewMode::Grid => {
                let _ = self.grid_options();
            }
            ViewMode::Tile | ViewMode::Compact => {
                let _ = self.tile_options();
            }
        }
    }

    // Pipeline

    fn quick_search(&self) -> QuickSearch {
        QuickSearch::new(
            &self.state.quick_search_text,
            self.options.quick_search.field.as_deref(),
            self.options.quick_search.mode,
        )
    }

    /// Recomputes rows locally and fetches a page for server data.
    fn requery(&mut self) -> Vec<Action> {
        self.recompute();
        self.fetch_page().into_iter().collect()
    }

    fn recompute(&mut self) {
        if self.source.is_server() {
            self.view_rows = self.records.clone();
            if let Some(group) = &self.state.group_field {
                order_by_group(&mut self.view_rows, group);
            }
        } else {
            let search = self.quick_search();
            let mut rows: Vec<Record> = self
                .records
                .iter()
                .filter(|r| matches_all(&self.state.filter_clauses, r) && search.matches(r))
                .cloned()
                .collect();
            if let Some(sort) = &self.state.sort {
                sort_records(&mut rows, &sort.path(), sort.direction);
            }
            if let Some(group) = &self.state.group_field {
                order_by_group(&mut rows, group);
            }
            self.pages.set_total_count(rows.len());
            self.view_rows = rows;
        }

        self.regroup();
        self.state.no_data = self.view_rows.is_empty();
        self.filter_bar.sync(&self.state);
        self.invalidate_projections();
    }

    fn regroup(&mut self) {
        self.groups = match &self.state.group_field {
            Some(group) => group_records(&self.view_rows, group, &self.state.expanded_groups),
            None => Vec::new(),
        };
    }

    fn fetch_page(&mut self) -> Option<Action> {
        if !self.source.is_server() {
            return None;
        }
        let generation = self.next_generation();
        self.page_generation = generation;

        let search = self.server_search_clause();
        let DataSource::Server(server) = &self.source else {
            return None;
        };
        let query = ServerQuery::new(
            generation,
            server,
            &self.state.filter_clauses,
            search.as_ref(),
            self.state.sort.as_ref(),
            self.pages.skip(),
            self.pages.page_size().rows(),
        );
        tracing::debug!(generation = generation, skip = query.skip, top = query.top, "fetching page");
        Some(Action::FetchPage(query))
    }

    /// Quick search as a server clause. Needs a configured search field.
    fn server_search_clause(&self) -> Option<FilterClause> {
        let text = self.state.quick_search_text.trim();
        if text.is_empty() {
            return None;
        }
        let Some(field) = self.options.quick_search.field.as_deref() else {
            tracing::debug!("server quick search needs a search field");
            return None;
        };
        let op = match self.options.quick_search.mode {
            QuickSearchMode::StartsWith => FilterOp::StartsWith,
            QuickSearchMode::Contains | QuickSearchMode::Fuzzy => FilterOp::Contains,
        };
        Some(FilterClause::new(field, op, text))
    }

    fn next_generation(&mut self) -> u64 {
        self.last_generation += 1;
        self.last_generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ServerDataOptions;
    use crate::infrastructure::{ContainerSize, FixedMeasure};
    use crate::options::ColumnDef;
    use crate::storage::ColumnPreference;
    use serde_json::json;

    fn books() -> Vec<Record> {
        [
            (1, "Dune", "Frank Herbert", 1965),
            (2, "Foundation", "Isaac Asimov", 1951),
            (3, "Children of Dune", "Frank Herbert", 1976),
            (4, "Hyperion", "Dan Simmons", 1989),
        ]
        .into_iter()
        .map(|(id, title, author, year)| {
            Record::new()
                .with("id", id)
                .with("title", title)
                .with("author", author)
                .with("year", year)
        })
        .collect()
    }

    fn options(view_options: &str) -> CollectionOptions {
        let mut options = CollectionOptions {
            view_mode: Some("g".into()),
            view_options: Some(view_options.into()),
            selection_mode: SelectionMode::Multi,
            user_pref_id: Some("books".into()),
            ..Default::default()
        };
        options.grid_config.identity_field = Some("id".into());
        options.grid_config.column_defs = vec![
            ColumnDef::new("title", "Title"),
            ColumnDef::new("author", "Author"),
            ColumnDef::new("year", "Year"),
        ];
        options.tile_config.title_field = Some("title".into());
        options.tile_config.property_fields = vec!["author".into(), "year".into()];
        options
    }

    fn coordinator(view_options: &str, width: f64) -> (ViewModeCoordinator, FixedMeasure, Vec<Action>) {
        let measure = FixedMeasure::new(ContainerSize::new(width, 600.0));
        let (coordinator, actions) = ViewModeCoordinator::initialize(
            &options(view_options),
            DataSource::InMemory(books()),
            Box::new(measure.clone()),
        );
        (coordinator, measure, actions)
    }

    #[test]
    fn initialize_requests_personalization() {
        let (coordinator, _, actions) = coordinator("gsml", 1024.0);
        assert_eq!(coordinator.state().mode, ViewMode::Grid);
        assert_eq!(
            actions,
            vec![Action::PostToWorker(WorkerMessage::load(1, "icv", "books"))]
        );
        assert_eq!(coordinator.grid_options().rows.len(), 4);
    }

    #[test]
    fn narrow_container_starts_compact_and_restores_configured_view() {
        let (mut coordinator, measure, _) = coordinator("gsml", 320.0);
        assert_eq!(coordinator.state().mode, ViewMode::Compact);
        assert_eq!(coordinator.state().prev_view_code, Some(ViewCode::Grid));

        coordinator.change_view_mode(ViewMode::Tile, Some(TileSize::Large));
        assert_eq!(coordinator.state().mode, ViewMode::Compact);

        measure.set_width(900.0);
        let actions = coordinator.handle_resize();
        assert_eq!(actions[0], Action::ViewModeChanged { code: ViewCode::LargeTile });
        assert_eq!(coordinator.state().view_code(), ViewCode::LargeTile);
    }

    #[test]
    fn quick_search_filter_sort_and_group_compose() {
        let (mut coordinator, _, _) = coordinator("g", 1024.0);
        coordinator.set_quick_search("dune");
        assert_eq!(coordinator.get_current_data().len(), 2);

        coordinator.sorting_changed(Some(SortInfo::new("year", crate::app::modes::SortDirection::Desc)));
        assert_eq!(coordinator.get_current_data()[0].text("title").as_deref(), Some("Children of Dune"));

        coordinator.set_quick_search("");
        coordinator.set_group_field(Some(GroupField::new("author")));
        let labels: Vec<&str> = coordinator.groups().iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Dan Simmons", "Frank Herbert", "Isaac Asimov"]);

        coordinator.expand_group("author", "Frank Herbert");
        assert!(coordinator.groups()[1].expanded);
        coordinator.expand_group("title", "Dune");
        assert_eq!(coordinator.state().expanded_groups.len(), 1);
    }

    #[test]
    fn selection_follows_identity_and_mode() {
        let (mut coordinator, _, _) = coordinator("g", 1024.0);
        let rows = books();
        let actions = coordinator.select_items(&rows[..3], true, false);
        assert_eq!(actions.len(), 1);
        assert_eq!(coordinator.state().selected_keys.len(), 3);

        coordinator.set_selection_mode(SelectionMode::Single);
        assert_eq!(coordinator.state().selected_keys.keys(), &[SelectionKey(json!(3))]);

        let refreshed: Vec<Record> = books().into_iter().skip(3).collect();
        coordinator.reset_data(Some(refreshed));
        assert!(coordinator.state().selected_keys.is_empty());
    }

    #[test]
    fn stale_personalization_load_is_ignored() {
        let (mut coordinator, _, _) = coordinator("gsml", 1024.0);
        coordinator.refresh(false);

        let mut record = PersonalizationRecord::default();
        record.columns.insert("title".into(), ColumnPreference { visible: false, index: 0 });
        let stale = WorkerResponse::PersonalizationLoaded { generation: 1, record: Some(record.clone()) };
        coordinator.handle_worker_response(&stale);
        assert!(coordinator.view_config().columns[0].visible);

        let fresh = WorkerResponse::PersonalizationLoaded { generation: 2, record: Some(record) };
        coordinator.handle_worker_response(&fresh);
        assert!(!coordinator.view_config().columns[0].visible);
        assert_eq!(coordinator.grid_options().columns.len(), 2);
    }

    #[test]
    fn late_load_does_not_override_local_edits() {
        let mut saved = PersonalizationRecord {
            view_mode: Some(ViewCode::LargeTile),
            ..Default::default()
        };
        saved.columns.insert("year".into(), ColumnPreference { visible: true, index: 2 });
        let late = WorkerResponse::PersonalizationLoaded { generation: 1, record: Some(saved) };

        let (mut switched, _, actions) = coordinator("gsml", 1024.0);
        assert_eq!(actions, vec![Action::PostToWorker(WorkerMessage::load(1, "icv", "books"))]);
        switched.change_view_mode(ViewMode::Tile, Some(TileSize::Wide));
        switched.handle_worker_response(&late);
        assert_eq!(switched.state().view_code(), ViewCode::WideTile);
        assert_eq!(switched.view_config().view_code, ViewCode::WideTile);

        let (mut edited, _, _) = coordinator("gsml", 1024.0);
        edited.set_column_visibility("year", false);
        edited.handle_worker_response(&late);
        assert!(!edited.view_config().columns[2].visible);
        assert_eq!(edited.state().view_code(), ViewCode::Grid);
    }

    #[test]
    fn layout_edits_persist_without_explicit_save() {
        let (mut coordinator, _, _) = coordinator("gsml", 1024.0);
        let actions = coordinator.set_column_visibility("author", false);
        let [Action::PostToWorker(WorkerMessage::SavePersonalization { record, .. })] = actions.as_slice() else {
            panic!("expected save, got {actions:?}");
        };
        assert!(!record.columns["author"].visible);

        let resent = coordinator.save_personalization();
        assert!(matches!(
            resent.as_slice(),
            [Action::PostToWorker(WorkerMessage::SavePersonalization { .. })]
        ));
    }

    #[test]
    fn reset_data_is_idempotent() {
        let mut options = options("g");
        options.paging_options.page_size = Some(10);
        let data: Vec<Record> = (1..=25)
            .map(|id| Record::new().with("id", id).with("title", format!("Book {id}")))
            .collect();
        let measure = FixedMeasure::new(ContainerSize::new(1024.0, 600.0));
        let (mut coordinator, _) =
            ViewModeCoordinator::initialize(&options, DataSource::InMemory(data.clone()), Box::new(measure));

        coordinator.change_page(2);
        let rows = coordinator.page_rows()[..2].to_vec();
        coordinator.select_items(&rows, true, false);
        assert_eq!(coordinator.state().selected_keys.len(), 2);

        assert!(coordinator.reset_data(Some(data.clone())).is_empty());
        let state = coordinator.state().clone();
        let page_info = coordinator.get_page_info();
        let current = coordinator.get_current_data().to_vec();
        assert_eq!(page_info.current_page, 2);

        for repeat in [Some(data.clone()), Some(data), None] {
            assert!(coordinator.reset_data(repeat).is_empty());
            assert_eq!(coordinator.state(), &state);
            assert_eq!(coordinator.get_page_info(), page_info);
            assert_eq!(coordinator.get_current_data(), current.as_slice());
        }
        assert_eq!(coordinator.page_rows()[0].text("title").as_deref(), Some("Book 11"));
    }

    #[test]
    fn store_failure_leaves_state_untouched() {
        let (mut coordinator, _, _) = coordinator("g", 1024.0);
        coordinator.set_column_visibility("year", false);
        let before = coordinator.view_config().clone();
        coordinator.handle_worker_response(&WorkerResponse::Error { generation: 2, message: "disk full".into() });
        assert_eq!(coordinator.view_config(), &before);
    }

    #[test]
    fn single_surface_reset_restores_columns_and_persists_rest() {
        let (mut coordinator, _, _) = coordinator("g", 1024.0);
        coordinator.move_column("year", 0);
        assert_eq!(coordinator.view_config().columns[0].field, "year");

        let actions = coordinator.reset_personalization();
        assert_eq!(coordinator.view_config().columns[0].field, "title");
        let [Action::PostToWorker(WorkerMessage::SavePersonalization { record, .. })] = actions.as_slice() else {
            panic!("expected save of remainder, got {actions:?}");
        };
        assert!(record.columns.is_empty());
    }

    #[test]
    fn dual_surface_reset_needs_confirmation() {
        let (mut coordinator, _, _) = coordinator("gsml", 1024.0);
        coordinator.set_column_visibility("author", false);

        assert_eq!(coordinator.reset_personalization(), vec![Action::ConfirmReset]);
        assert!(!coordinator.view_config().columns[1].visible);

        let actions = coordinator.confirm_reset();
        assert!(matches!(
            actions.first(),
            Some(Action::PostToWorker(WorkerMessage::ClearPersonalization { .. }))
        ));
        assert!(coordinator.view_config().columns[1].visible);
        assert!(coordinator.confirm_reset().is_empty());
    }

    #[test]
    fn manage_tags_gated_by_authorization() {
        let mut options = options("g");
        options.commands = vec![crate::options::CommandDef {
            id: crate::app::commands::MANAGE_TAGS.into(),
            label: Some("Tags".into()),
            tooltip: Some("Manage tags".into()),
            enabled: true,
            visible: true,
            requires_selection: false,
        }];
        let measure = FixedMeasure::new(ContainerSize::new(1024.0, 600.0));
        let (mut coordinator, _) =
            ViewModeCoordinator::initialize(&options, DataSource::InMemory(books()), Box::new(measure));

        assert!(coordinator.grid_options().commands.is_empty());
        assert!(coordinator.invoke_command("manageTags").is_empty());

        coordinator.tags_authorization_resolved(&Ok(true));
        assert_eq!(coordinator.grid_options().commands.len(), 1);
        assert!(matches!(
            coordinator.invoke_command("manageTags").as_slice(),
            [Action::RunCommand { .. }]
        ));

        coordinator.tags_authorization_resolved(&Err("denied".into()));
        assert!(!coordinator.state().is_tags_authorized);
    }

    #[test]
    fn server_source_fetches_pages_and_drops_stale_results() {
        let mut options = options("g");
        options.paging_options.page_size = Some(10);
        options.quick_search_options.field = Some("title".into());
        options.server_data_options = Some(ServerDataOptions {
            data_service: "library".into(),
            data_entity: "Book".into(),
            ..Default::default()
        });
        let measure = FixedMeasure::new(ContainerSize::new(1024.0, 600.0));
        let (mut coordinator, actions) =
            ViewModeCoordinator::initialize(&options, DataSource::default(), Box::new(measure));

        let Some(Action::FetchPage(first)) = actions.last() else {
            panic!("expected page fetch");
        };
        assert_eq!(first.top, 10);

        let actions = coordinator.set_quick_search("dune");
        let [Action::FetchPage(second)] = actions.as_slice() else {
            panic!("expected page fetch");
        };
        assert!(second.options_string().contains("contains(title,'dune')"));

        let page = ServerPage { records: books(), total_count: 42 };
        assert!(coordinator.page_loaded(first.generation, page.clone()).is_empty());
        assert!(coordinator.get_current_data().is_empty());

        coordinator.page_loaded(second.generation, page);
        assert_eq!(coordinator.get_page_info().page_count, 5);
        assert_eq!(coordinator.get_current_data().len(), 4);

        let actions = coordinator.change_page(3);
        let [Action::FetchPage(third)] = actions.as_slice() else {
            panic!("expected page fetch");
        };
        assert_eq!(third.skip, 20);
    }

    #[test]
    fn export_writes_visible_columns() {
        let (mut coordinator, _, _) = coordinator("g", 1024.0);
        coordinator.set_column_visibility("year", false);
        let actions = coordinator
            .print_to_excel(&ExportOptions { file_name: Some("books".into()), ..Default::default() })
            .unwrap();
        let [Action::ExportWorkbook { file_name, content }] = actions.as_slice() else {
            panic!("expected export");
        };
        assert_eq!(file_name, "books.csv");
        assert!(content.starts_with("Title,Author\n"));
        assert_eq!(content.lines().count(), 5);
    }
}
