//! Event handling and dispatch to the coordinator.
//!
//! This module implements the event handler that processes host input,
//! renderer intents, async completions and page-bus notifications, translating
//! them into coordinator operations and action sequences.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the host, a renderer, the worker or the data service
//! 2. [`handle_event`] drains the page-bus mailbox, then pattern-matches the event
//! 3. State mutations occur via `ViewModeCoordinator` operations
//! 4. Actions are collected and returned with the "needs render" flag
//!
//! # Event Types
//!
//! - **Host**: `Resized`, `DataChanged`, `ResetData`, `Refresh`, `Teardown`
//! - **Presentation**: `ChangeViewMode`
//! - **Query**: `ApplyFilter`, `ResetFilter`, `QuickSearchChanged`,
//!   `GroupFieldChanged`, `ExpandGroup`, `CollapseGroup`, `SortRequested`
//! - **Paging and selection**: `PageChanged`, `PageSizeChanged`, `SelectItems`,
//!   `SelectAll`, `SetSelectionMode`
//! - **Personalization**: column, tile field, save and reset events
//! - **Completions**: `WorkerResponse`, `PageLoaded`, `PageLoadFailed`,
//!   `TagsAuthorizationResolved`
//!
//! After `Teardown` every event is ignored.
//!
//! # Example
//!
//! ```rust
//! use collection_viewer::app::{handle_event, Event, ViewModeCoordinator};
//! use collection_viewer::data::DataSource;
//! use collection_viewer::infrastructure::FixedMeasure;
//! use collection_viewer::options::CollectionOptions;
//!
//! let (mut coordinator, _) = ViewModeCoordinator::initialize(
//!     &CollectionOptions::default(),
//!     DataSource::default(),
//!     Box::new(FixedMeasure::default()),
//! );
//! let (needs_render, actions) = handle_event(&mut coordinator, &Event::QuickSearchChanged("dune".into()))?;
//! assert!(needs_render);
//! assert!(actions.is_empty());
//! # Ok::<(), collection_viewer::ViewerError>(())
//! ```

use super::actions::Action;
use super::coordinator::ViewModeCoordinator;
use super::modes::{SelectionMode, TileSize, ViewMode};
use crate::data::{ExportOptions, FilterClause, GroupField, ServerPage, SortInfo};
use crate::domain::error::Result;
use crate::domain::Record;
use crate::infrastructure::PageEvent;
use crate::storage::TileFields;
use crate::worker::WorkerResponse;

/// Events triggered by the host, renderers, completions or the page bus.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The container may have been resized; the coordinator re-measures it.
    Resized,
    /// The host replaced the in-memory records.
    DataChanged(Vec<Record>),
    /// Re-synchronize with the current data source.
    ResetData,
    /// Re-pull data and personalization.
    Refresh {
        /// Discard the personalization overlay and return to page 1 first.
        reset_personalization: bool,
    },

    /// Switch presentation.
    ChangeViewMode {
        mode: ViewMode,
        /// Tile size for `ViewMode::Tile`; the current size when absent.
        tile_size: Option<TileSize>,
    },

    ApplyFilter(Vec<FilterClause>),
    ResetFilter,
    QuickSearchChanged(String),
    GroupFieldChanged(Option<GroupField>),
    ExpandGroup {
        field: String,
        value: String,
    },
    CollapseGroup {
        field: String,
        value: String,
    },
    SortRequested(Option<SortInfo>),

    /// Move to a 1-based page.
    PageChanged(usize),
    PageSizeChanged(u32),
    SelectItems {
        items: Vec<Record>,
        selected: bool,
        /// Drop the previous selection first.
        clear: bool,
    },
    SelectAll(bool),
    SetSelectionMode(SelectionMode),

    ColumnVisibilityChanged {
        field: String,
        visible: bool,
    },
    ColumnMoved {
        field: String,
        to_index: usize,
    },
    TileFieldsChanged(TileFields),
    SavePersonalization,
    ResetPersonalization,
    /// The user accepted the reset confirmation prompt.
    ResetConfirmed,
    ResetCancelled,

    /// Wraps a response from the personalization worker.
    WorkerResponse(WorkerResponse),
    /// A server page arrived for the fetch with `generation`.
    PageLoaded {
        generation: u64,
        page: ServerPage,
    },
    PageLoadFailed {
        generation: u64,
        message: String,
    },
    /// Outcome of the tag-management authorization check.
    TagsAuthorizationResolved(std::result::Result<bool, String>),

    /// A command button was pressed.
    CommandInvoked {
        id: String,
    },
    /// A page-bus notification delivered directly by the host.
    Page(PageEvent),
    /// Export the current data.
    Export(ExportOptions),
    /// The widget is being destroyed.
    Teardown,
}

/// Processes an event, mutates coordinator state, and returns actions to execute.
///
/// # Returns
///
/// `(needs_render, actions)`: whether any projection changed, and the side
/// effects to execute in order.
///
/// # Errors
///
/// Returns an error only when an export cannot be serialized. Every other
/// failure is recovered inside the coordinator.
///
/// # Tracing
///
/// Each call creates a debug-level span with the event.
#[allow(clippy::too_many_lines)]
pub fn handle_event(coordinator: &mut ViewModeCoordinator, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    if coordinator.is_torn_down() {
        tracing::debug!("coordinator torn down, ignoring event");
        return Ok((false, vec![]));
    }

    let mut actions = coordinator.drain_bus();

    let produced = match event {
        Event::Resized => coordinator.handle_resize(),
        Event::DataChanged(records) => coordinator.reset_data(Some(records.clone())),
        Event::ResetData => coordinator.reset_data(None),
        Event::Refresh { reset_personalization } => coordinator.refresh(*reset_personalization),
        Event::ChangeViewMode { mode, tile_size } => coordinator.change_view_mode(*mode, *tile_size),
        Event::ApplyFilter(clauses) => coordinator.apply_filter(clauses.clone()),
        Event::ResetFilter => coordinator.reset_filter(),
        Event::QuickSearchChanged(text) => coordinator.set_quick_search(text),
        Event::GroupFieldChanged(field) => coordinator.set_group_field(field.clone()),
        Event::ExpandGroup { field, value } => coordinator.expand_group(field, value),
        Event::CollapseGroup { field, value } => coordinator.collapse_group(field, value),
        Event::SortRequested(sort) => coordinator.sorting_changed(sort.clone()),
        Event::PageChanged(page) => coordinator.change_page(*page),
        Event::PageSizeChanged(rows) => coordinator.set_page_size(*rows),
        Event::SelectItems { items, selected, clear } => coordinator.select_items(items, *selected, *clear),
        Event::SelectAll(selected) => coordinator.select_all(*selected),
        Event::SetSelectionMode(mode) => coordinator.set_selection_mode(*mode),
        Event::ColumnVisibilityChanged { field, visible } => coordinator.set_column_visibility(field, *visible),
        Event::ColumnMoved { field, to_index } => coordinator.move_column(field, *to_index),
        Event::TileFieldsChanged(fields) => coordinator.set_tile_fields(fields.clone()),
        Event::SavePersonalization => coordinator.save_personalization(),
        Event::ResetPersonalization => coordinator.reset_personalization(),
        Event::ResetConfirmed => coordinator.confirm_reset(),
        Event::ResetCancelled => {
            coordinator.cancel_reset();
            vec![]
        }
        Event::WorkerResponse(response) => coordinator.handle_worker_response(response),
        Event::PageLoaded { generation, page } => coordinator.page_loaded(*generation, page.clone()),
        Event::PageLoadFailed { generation, message } => coordinator.page_load_failed(*generation, message),
        Event::TagsAuthorizationResolved(result) => coordinator.tags_authorization_resolved(result),
        Event::CommandInvoked { id } => coordinator.invoke_command(id),
        Event::Page(page_event) => coordinator.handle_page_event(page_event),
        Event::Export(options) => coordinator.print_to_excel(options)?,
        Event::Teardown => {
            coordinator.teardown();
            vec![]
        }
    };
    actions.extend(produced);

    let needs_render = coordinator.take_render_request();
    tracing::debug!(needs_render = needs_render, actions = actions.len(), "event handled");
    Ok((needs_render, actions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataSource;
    use crate::infrastructure::{ContainerSize, FixedMeasure, PageBus};
    use crate::options::CollectionOptions;

    fn coordinator() -> ViewModeCoordinator {
        let options = CollectionOptions {
            view_options: Some("gs".into()),
            container_id: Some("books".into()),
            ..Default::default()
        };
        let data = vec![Record::new().with("title", "Dune"), Record::new().with("title", "Emma")];
        let (coordinator, _) = ViewModeCoordinator::initialize(
            &options,
            DataSource::InMemory(data),
            Box::new(FixedMeasure::new(ContainerSize::new(800.0, 600.0))),
        );
        coordinator
    }

    #[test]
    fn unchanged_state_does_not_request_render() {
        let mut coordinator = coordinator();
        let _ = coordinator.take_render_request();

        let (needs_render, _) = handle_event(&mut coordinator, &Event::QuickSearchChanged(String::new())).unwrap();
        assert!(!needs_render);

        let (needs_render, _) = handle_event(&mut coordinator, &Event::QuickSearchChanged("em".into())).unwrap();
        assert!(needs_render);
        assert_eq!(coordinator.get_current_data().len(), 1);
    }

    #[test]
    fn bus_events_are_drained_before_dispatch() {
        let mut coordinator = coordinator();
        let bus = PageBus::new();
        coordinator.attach_bus(&bus);

        bus.publish(PageEvent::TagManagerStateChanged { open: true });
        handle_event(&mut coordinator, &Event::ResetData).unwrap();
        assert!(coordinator.state().tag_manager_open);
    }

    #[test]
    fn events_after_teardown_are_ignored() {
        let mut coordinator = coordinator();
        let bus = PageBus::new();
        coordinator.attach_bus(&bus);

        handle_event(&mut coordinator, &Event::Teardown).unwrap();
        assert_eq!(bus.subscriber_count(), 0);

        let before = coordinator.state().clone();
        let (needs_render, actions) = handle_event(
            &mut coordinator,
            &Event::ChangeViewMode { mode: ViewMode::Tile, tile_size: Some(TileSize::Medium) },
        )
        .unwrap();
        assert!(!needs_render);
        assert!(actions.is_empty());
        assert_eq!(coordinator.state(), &before);
    }
}
