//! Collection viewer: a headless view-mode and personalization coordinator for
//! item collection viewers.
//!
//! The crate owns everything about *what* an item collection viewer shows and
//! how that survives user interaction, and nothing about *drawing* it:
//! - Grid and tile presentations sharing one canonical view state
//! - A responsive compact mode forced below a 500px container width
//! - Filter, quick search, sort, group, paging and selection state
//! - Per-user layout personalization persisted through a JSON store
//! - Render projections handed to host-supplied grid and tile renderers

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host shell                                         │  ← Events in, actions out
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - ViewModeCoordinator, ViewState                   │
//! │  - Responsive machine, filter bar, commands         │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Projection    │   │ Storage Layer │   │ Worker Layer  │
//! │ (projection/) │   │ (storage/)    │   │ (worker/)     │
//! │ - Grid        │   │ - JSON store  │   │ - Store ops   │
//! │ - Tiles       │   │ - Merge       │   │ - Generations │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Options, Data, Infrastructure & Domain Layers      │
//! │  - Option normalization (options/)                  │
//! │  - Filter, search, sort, group, paging (data/)      │
//! │  - Paths, measurement, page bus (infrastructure/)   │
//! │  - Error and record types (domain/)                 │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - JSON log lines to a rotating file                │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: coordinator, view state and the event/action model
//! - [`data`]: the record pipeline and server query descriptor
//! - [`domain`]: error and record types
//! - [`infrastructure`]: data paths, container measurement and the page bus
//! - [`options`]: host configuration and its normalization
//! - [`projection`]: grid and tile render projections
//! - [`storage`]: personalization records, stores and the merge protocol
//! - [`worker`]: personalization worker and its message protocol
//! - [`observability`]: tracing subscriber setup
//!
//! # Initialization Flow
//!
//! 1. The host calls [`initialize`] once per page to install logging and get a
//!    personalization worker.
//! 2. Each widget builds a [`ViewModeCoordinator`] from its
//!    [`CollectionOptions`](options::CollectionOptions). The returned actions
//!    request the saved personalization and, for server data, the first page.
//! 3. The host feeds every user intent, resize and completion through
//!    [`handle_event`], executes the returned actions and re-renders with
//!    [`projection::render`] when asked to.
//!
//! # Example
//!
//! ```rust
//! use collection_viewer::{handle_event, Action, Event, ViewModeCoordinator};
//! use collection_viewer::data::DataSource;
//! use collection_viewer::infrastructure::{ContainerSize, FixedMeasure};
//! use collection_viewer::options::CollectionOptions;
//! use collection_viewer::worker::PersonalizationWorker;
//! use collection_viewer::storage::MemoryPersonalizationStore;
//!
//! let options = CollectionOptions::from_json_str(r#"{
//!     "viewMode": "g",
//!     "viewOptions": "gs",
//!     "userPrefId": "library"
//! }"#)?;
//! let mut worker = PersonalizationWorker::new(Box::new(MemoryPersonalizationStore::default()));
//! let (mut coordinator, actions) = ViewModeCoordinator::initialize(
//!     &options,
//!     DataSource::default(),
//!     Box::new(FixedMeasure::new(ContainerSize::new(1024.0, 768.0))),
//! );
//!
//! for action in actions {
//!     if let Action::PostToWorker(message) = action {
//!         let response = worker.handle_message(message);
//!         handle_event(&mut coordinator, &Event::WorkerResponse(response))?;
//!     }
//! }
//! # Ok::<(), collection_viewer::ViewerError>(())
//! ```

pub mod app;
pub mod data;
pub mod domain;
pub mod infrastructure;
pub mod options;
pub mod projection;
pub mod storage;
pub mod worker;

pub mod observability;

pub use app::{handle_event, Action, Event, ViewModeCoordinator, ViewState};
pub use domain::{Record, Result, ViewerError};

use options::CollectionOptions;
use std::collections::BTreeMap;
use std::path::PathBuf;
use worker::PersonalizationWorker;

/// Crate-level configuration shared by every widget on a page.
///
/// Values come from the host as a string map, the same way a plugin receives
/// its configuration.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use collection_viewer::Config;
///
/// let mut map = BTreeMap::new();
/// map.insert("trace_level".to_string(), "debug".to_string());
/// map.insert("widget_type".to_string(), "catalog".to_string());
///
/// let config = Config::from_map(&map);
/// assert_eq!(config.trace_level.as_deref(), Some("debug"));
/// assert_eq!(config.widget_type.as_deref(), Some("catalog"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Level filter for logging, accepting `EnvFilter` directives. Default: `"info"`
    pub trace_level: Option<String>,

    /// Log file location. Default: `viewer.log` in the data directory.
    pub log_file: Option<PathBuf>,

    /// Personalization store location. Default: `personalization.json` in the data directory.
    pub store_path: Option<PathBuf>,

    /// Widget family for options that do not name one.
    pub widget_type: Option<String>,
}

impl Config {
    /// Parses configuration from a host string map.
    ///
    /// Empty values are treated as absent.
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let value = |key: &str| {
            config
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        Self {
            trace_level: value("trace_level"),
            log_file: value("log_file").map(PathBuf::from),
            store_path: value("store_path").map(PathBuf::from),
            widget_type: value("widget_type"),
        }
    }

    /// Log file path with the default applied.
    #[must_use]
    pub fn log_file_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(infrastructure::default_log_path)
    }

    /// Store path with the default applied.
    #[must_use]
    pub fn store_file_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(infrastructure::default_store_path)
    }

    /// Fills page-wide defaults into widget options that leave them unset.
    pub fn apply_defaults(&self, options: &mut CollectionOptions) {
        if options.widget_type.is_none() {
            options.widget_type.clone_from(&self.widget_type);
        }
    }
}

/// Installs logging and creates the page's personalization worker.
///
/// The worker opens its JSON store lazily on the first message, so calling
/// this never touches the filesystem beyond creating the log directory.
///
/// # Example
///
/// ```rust
/// use collection_viewer::{initialize, Config};
///
/// let dir = std::env::temp_dir().join("collection-viewer-init-doc");
/// let config = Config {
///     log_file: Some(dir.join("viewer.log")),
///     store_path: Some(dir.join("personalization.json")),
///     ..Default::default()
/// };
/// let _worker = initialize(&config);
/// ```
#[must_use]
pub fn initialize(config: &Config) -> PersonalizationWorker {
    observability::init_tracing(config);
    tracing::debug!(store = %config.store_file_path().display(), "initializing collection viewer");
    PersonalizationWorker::lazy(config.store_file_path())
}
