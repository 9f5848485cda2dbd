use collection_viewer::app::modes::{TileSize, ViewCode, ViewMode};
use collection_viewer::data::DataSource;
use collection_viewer::infrastructure::{ContainerSize, FixedMeasure};
use collection_viewer::options::{CollectionOptions, ColumnDef};
use collection_viewer::storage::{JsonPersonalizationStore, PersonalizationStore};
use collection_viewer::worker::PersonalizationWorker;
use collection_viewer::{handle_event, Action, Event, Record, ViewModeCoordinator};
use std::path::Path;

fn options() -> CollectionOptions {
    let mut options = CollectionOptions {
        view_mode: Some("g".into()),
        view_options: Some("gsl".into()),
        user_pref_id: Some("reading-list".into()),
        ..Default::default()
    };
    options.grid_config.column_defs = vec![
        ColumnDef::new("title", "Title"),
        ColumnDef::new("author", "Author"),
        ColumnDef::new("year", "Year"),
    ];
    options.tile_config.title_field = Some("title".into());
    options.tile_config.property_fields = vec!["author".into()];
    options
}

fn open(worker: &mut PersonalizationWorker) -> ViewModeCoordinator {
    let data = vec![Record::new().with("title", "Dune").with("author", "Frank Herbert").with("year", 1965)];
    let measure = FixedMeasure::new(ContainerSize::new(1280.0, 720.0));
    let (mut coordinator, actions) =
        ViewModeCoordinator::initialize(&options(), DataSource::InMemory(data), Box::new(measure));
    execute(&mut coordinator, worker, actions);
    coordinator
}

fn execute(coordinator: &mut ViewModeCoordinator, worker: &mut PersonalizationWorker, actions: Vec<Action>) {
    for action in actions {
        if let Action::PostToWorker(message) = action {
            let response = worker.handle_message(message);
            handle_event(coordinator, &Event::WorkerResponse(response)).unwrap();
        }
    }
}

fn send(coordinator: &mut ViewModeCoordinator, worker: &mut PersonalizationWorker, event: &Event) {
    let (_, actions) = handle_event(coordinator, event).unwrap();
    execute(coordinator, worker, actions);
}

fn stored_slot(path: &Path) -> Option<collection_viewer::storage::PersonalizationRecord> {
    JsonPersonalizationStore::new(path.to_path_buf())
        .unwrap()
        .get("icv", "reading-list")
        .unwrap()
}

#[test]
fn layout_survives_a_new_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("personalization.json");

    {
        let mut worker = PersonalizationWorker::lazy(path.clone());
        let mut coordinator = open(&mut worker);
        send(
            &mut coordinator,
            &mut worker,
            &Event::ChangeViewMode { mode: ViewMode::Tile, tile_size: Some(TileSize::Large) },
        );
        send(
            &mut coordinator,
            &mut worker,
            &Event::ColumnVisibilityChanged { field: "year".into(), visible: false },
        );
        send(&mut coordinator, &mut worker, &Event::ColumnMoved { field: "author".into(), to_index: 0 });
    }

    let saved = stored_slot(&path).unwrap();
    assert_eq!(saved.view_mode, Some(ViewCode::LargeTile));
    assert!(saved.saved_at.is_some());

    let mut worker = PersonalizationWorker::lazy(path);
    let coordinator = open(&mut worker);
    assert_eq!(coordinator.state().view_code(), ViewCode::LargeTile);
    assert_eq!(coordinator.tile_options().size, TileSize::Large);

    let fields: Vec<&str> = coordinator.view_config().columns.iter().map(|c| c.field.as_str()).collect();
    assert_eq!(fields, vec!["author", "title", "year"]);
    assert!(!coordinator.view_config().columns[2].visible);
}

#[test]
fn confirmed_reset_clears_the_slot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("personalization.json");
    let mut worker = PersonalizationWorker::lazy(path.clone());
    let mut coordinator = open(&mut worker);

    send(
        &mut coordinator,
        &mut worker,
        &Event::ColumnVisibilityChanged { field: "author".into(), visible: false },
    );
    assert!(stored_slot(&path).is_some());

    let (_, actions) = handle_event(&mut coordinator, &Event::ResetPersonalization).unwrap();
    assert_eq!(actions, vec![Action::ConfirmReset]);
    send(&mut coordinator, &mut worker, &Event::ResetConfirmed);

    assert!(stored_slot(&path).is_none());
    assert!(coordinator.view_config().columns.iter().all(|c| c.visible));
    assert_eq!(coordinator.state().view_code(), ViewCode::Grid);
}
