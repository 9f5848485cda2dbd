use collection_viewer::app::modes::{SelectionMode, SortDirection, TileSize, ViewCode, ViewMode};
use collection_viewer::data::{DataSource, FilterClause, FilterOp, GroupField, SortInfo};
use collection_viewer::domain::SelectionKey;
use collection_viewer::infrastructure::{ContainerSize, FixedMeasure};
use collection_viewer::options::CollectionOptions;
use collection_viewer::projection::{render, GridOptions, GridRenderer, TileOptions, TileRenderer};
use collection_viewer::storage::MemoryPersonalizationStore;
use collection_viewer::worker::{PersonalizationWorker, WorkerResponse};
use collection_viewer::{handle_event, Action, Event, Record, ViewModeCoordinator};

const AUTHORS: [&str; 3] = ["Frank Herbert", "Isaac Asimov", "Ursula K. Le Guin"];

const OPTIONS: &str = r#"{
    "viewMode": "g",
    "viewOptions": "gsml",
    "selectionMode": "multi",
    "userPrefId": "library",
    "pagingOptions": { "pageSize": 10 },
    "gridConfig": {
        "identityField": "id",
        "columnDefs": [
            { "field": "title", "label": "Title" },
            { "field": "author", "label": "Author" },
            { "field": "year", "label": "Year" }
        ]
    },
    "tileConfig": {
        "titleField": "title",
        "propertyFields": ["author", "year"]
    }
}"#;

fn library() -> Vec<Record> {
    (1..=12)
        .map(|i: u32| {
            Record::new()
                .with("id", i)
                .with("title", format!("Book {i}"))
                .with("author", AUTHORS[(i % 3) as usize])
                .with("year", 1950 + i)
        })
        .collect()
}

fn setup(width: f64) -> (ViewModeCoordinator, FixedMeasure, PersonalizationWorker) {
    let options = CollectionOptions::from_json_str(OPTIONS).unwrap();
    let measure = FixedMeasure::new(ContainerSize::new(width, 600.0));
    let mut worker = PersonalizationWorker::new(Box::new(MemoryPersonalizationStore::default()));

    let (mut coordinator, actions) =
        ViewModeCoordinator::initialize(&options, DataSource::InMemory(library()), Box::new(measure.clone()));
    run(&mut coordinator, &mut worker, actions);
    (coordinator, measure, worker)
}

/// Executes worker requests the way a host would and feeds responses back.
fn run(coordinator: &mut ViewModeCoordinator, worker: &mut PersonalizationWorker, actions: Vec<Action>) {
    for action in actions {
        if let Action::PostToWorker(message) = action {
            let response = worker.handle_message(message);
            let (_, more) = handle_event(coordinator, &Event::WorkerResponse(response)).unwrap();
            run(coordinator, worker, more);
        }
    }
}

#[test]
fn state_survives_mode_switches() {
    let (mut coordinator, _, mut worker) = setup(1024.0);
    assert_eq!(coordinator.state().mode, ViewMode::Grid);
    assert_eq!(coordinator.get_page_info().page_count, 2);
    assert_eq!(coordinator.grid_options().rows.len(), 10);

    let sort = SortInfo::new("year", SortDirection::Desc);
    let group = GroupField::new("author");
    handle_event(&mut coordinator, &Event::SortRequested(Some(sort.clone()))).unwrap();
    handle_event(&mut coordinator, &Event::GroupFieldChanged(Some(group.clone()))).unwrap();

    let (needs_render, actions) = handle_event(
        &mut coordinator,
        &Event::ChangeViewMode { mode: ViewMode::Tile, tile_size: Some(TileSize::Wide) },
    )
    .unwrap();
    assert!(needs_render);
    assert_eq!(actions[0], Action::ViewModeChanged { code: ViewCode::WideTile });
    run(&mut coordinator, &mut worker, actions);

    let filter = FilterClause::new("author", FilterOp::Eq, "Frank Herbert");
    handle_event(&mut coordinator, &Event::ApplyFilter(vec![filter])).unwrap();

    assert_eq!(coordinator.get_sort_info(), Some(&sort));
    assert_eq!(coordinator.get_group_field(), Some(&group));
    assert_eq!(coordinator.get_current_data().len(), 4);
    assert_eq!(coordinator.get_page_info().current_page, 1);

    let tiles = coordinator.tile_options();
    assert_eq!(tiles.size, TileSize::Wide);
    assert_eq!(tiles.items.len(), 4);
    assert_eq!(tiles.items[0].title.as_deref(), Some("Book 12"));

    let before = coordinator.state().clone();
    handle_event(&mut coordinator, &Event::ChangeViewMode { mode: ViewMode::Grid, tile_size: None }).unwrap();
    handle_event(
        &mut coordinator,
        &Event::ChangeViewMode { mode: ViewMode::Tile, tile_size: Some(TileSize::Wide) },
    )
    .unwrap();
    assert_eq!(coordinator.state(), &before);
}

#[test]
fn disallowed_mode_is_a_no_op() {
    let (mut coordinator, _, _) = setup(1024.0);
    let _ = coordinator.take_render_request();
    let before = coordinator.state().clone();

    let (needs_render, actions) =
        handle_event(&mut coordinator, &Event::ChangeViewMode { mode: ViewMode::Compact, tile_size: None }).unwrap();
    assert!(!needs_render);
    assert!(actions.is_empty());
    assert_eq!(coordinator.state(), &before);
}

#[test]
fn resize_sequence_flips_twice() {
    let (mut coordinator, measure, _) = setup(600.0);
    handle_event(
        &mut coordinator,
        &Event::ChangeViewMode { mode: ViewMode::Tile, tile_size: Some(TileSize::Large) },
    )
    .unwrap();

    let mut flips = Vec::new();
    for width in [600.0, 600.0, 450.0, 450.0, 600.0] {
        measure.set_width(width);
        let (_, actions) = handle_event(&mut coordinator, &Event::Resized).unwrap();
        flips.extend(actions.into_iter().filter_map(|a| match a {
            Action::ViewModeChanged { code } => Some(code),
            _ => None,
        }));
        if width < 500.0 {
            assert_eq!(coordinator.state().mode, ViewMode::Compact);
        }
    }

    assert_eq!(flips, vec![ViewCode::Compact, ViewCode::LargeTile]);
    assert_eq!(coordinator.state().view_code(), ViewCode::LargeTile);
}

#[test]
fn single_selection_keeps_most_recent_item() {
    let (mut coordinator, _, _) = setup(1024.0);
    handle_event(&mut coordinator, &Event::SetSelectionMode(SelectionMode::Single)).unwrap();

    let rows = coordinator.page_rows()[..3].to_vec();
    let (_, actions) = handle_event(
        &mut coordinator,
        &Event::SelectItems { items: rows.clone(), selected: true, clear: false },
    )
    .unwrap();

    let expected = SelectionKey(rows[2].get("id").cloned().unwrap());
    assert_eq!(actions, vec![Action::SelectionChanged { keys: vec![expected.clone()] }]);
    assert_eq!(coordinator.state().selected_keys.keys(), &[expected]);
    assert_eq!(coordinator.grid_options().selected_rows, vec![2]);
}

#[test]
fn saved_layout_applies_and_stale_loads_are_dropped() {
    let (mut coordinator, _, mut worker) = setup(1024.0);
    let (_, actions) =
        handle_event(&mut coordinator, &Event::ColumnVisibilityChanged { field: "year".into(), visible: false })
            .unwrap();
    run(&mut coordinator, &mut worker, actions);

    let (_, first) = handle_event(&mut coordinator, &Event::Refresh { reset_personalization: true }).unwrap();
    let (_, second) = handle_event(&mut coordinator, &Event::Refresh { reset_personalization: true }).unwrap();
    assert!(coordinator.view_config().columns.iter().all(|c| c.visible));

    let Some(Action::PostToWorker(stale)) = first.into_iter().last() else {
        panic!("expected personalization load");
    };
    let stale = worker.handle_message(stale);
    handle_event(&mut coordinator, &Event::WorkerResponse(stale)).unwrap();
    assert!(coordinator.view_config().columns.iter().all(|c| c.visible));

    run(&mut coordinator, &mut worker, second);
    assert_eq!(coordinator.grid_options().columns.len(), 2);
}

#[test]
fn events_after_teardown_do_nothing() {
    let (mut coordinator, _, _) = setup(1024.0);
    handle_event(&mut coordinator, &Event::Teardown).unwrap();
    let before = coordinator.state().clone();

    let response = WorkerResponse::PersonalizationLoaded { generation: 99, record: None };
    for event in [
        Event::WorkerResponse(response),
        Event::QuickSearchChanged("book".into()),
        Event::SelectAll(true),
        Event::Resized,
    ] {
        let (needs_render, actions) = handle_event(&mut coordinator, &event).unwrap();
        assert!(!needs_render);
        assert!(actions.is_empty());
    }
    assert_eq!(coordinator.state(), &before);
}

#[derive(Default)]
struct Recorder {
    grids: Vec<GridOptions>,
    tiles: Vec<TileOptions>,
}

impl GridRenderer for Recorder {
    fn render_grid(&mut self, options: &GridOptions) {
        self.grids.push(options.clone());
    }
}

impl TileRenderer for Recorder {
    fn render_tiles(&mut self, options: &TileOptions) {
        self.tiles.push(options.clone());
    }
}

#[test]
fn render_dispatches_to_active_surface() {
    let (mut coordinator, measure, _) = setup(1024.0);
    let mut grid = Recorder::default();
    let mut tiles = Recorder::default();

    render(&coordinator, &mut grid, &mut tiles);
    assert_eq!(grid.grids.len(), 1);
    assert!(tiles.tiles.is_empty());

    measure.set_width(320.0);
    handle_event(&mut coordinator, &Event::Resized).unwrap();
    render(&coordinator, &mut grid, &mut tiles);
    assert_eq!(tiles.tiles.len(), 1);
    assert!(tiles.tiles[0].compact);
    assert_eq!(tiles.tiles[0].items.len(), 10);
}
