//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the host shell and the data/storage/worker layers.
//! It implements the event-driven architecture that keeps one canonical view
//! state consistent across grid, tile and compact presentations.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Host / renderer intent → Event → handle_event → ViewModeCoordinator → Actions → Host
//!                                      ↑                                    ↓
//!                                      └──── worker / page completions ─────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: side effects emitted for the host
//! - [`commands`]: typed command descriptors and the handler registry
//! - [`coordinator`]: the owner of view state and projections
//! - [`filter_bar`]: filter-bar affordances translating intents into events
//! - [`handler`]: event dispatch
//! - [`modes`]: view, tile, selection and sort mode enumerations
//! - [`responsive`]: breakpoint state machine
//! - [`selection`]: ordered selection set
//! - [`state`]: the canonical [`ViewState`]

pub mod actions;
pub mod commands;
pub mod coordinator;
pub mod filter_bar;
pub mod handler;
pub mod modes;
pub mod responsive;
pub mod selection;
pub mod state;

pub use actions::Action;
pub use commands::{Command, CommandContext, CommandRegistry};
pub use coordinator::ViewModeCoordinator;
pub use filter_bar::FilterBarAdapter;
pub use handler::{handle_event, Event};
pub use modes::{SelectionMode, SortDirection, TileSize, ViewCode, ViewMode};
pub use state::ViewState;
