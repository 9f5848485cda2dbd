//! Actions representing side effects to be executed by the host.
//!
//! This module defines the [`Action`] type, the imperative commands produced by
//! the coordinator after processing an event. Actions are the boundary between
//! pure state transitions and effectful operations such as talking to the
//! personalization worker, fetching a server page, showing a confirmation
//! prompt or delivering an export.
//!
//! # Architecture
//!
//! Every operation returns a `Vec<Action>` so several side effects can be queued
//! atomically. The host executes them in order and feeds completions back as
//! [`Event`](super::Event)s.
//!
//! # Example
//!
//! ```rust
//! use collection_viewer::app::Action;
//! use collection_viewer::worker::WorkerMessage;
//!
//! let actions = vec![Action::PostToWorker(WorkerMessage::load(1, "icv", "books"))];
//! assert_eq!(actions.len(), 1);
//! ```

use super::modes::ViewCode;
use crate::data::{ServerQuery, SortInfo};
use crate::domain::{Record, SelectionKey};
use crate::worker::WorkerMessage;

/// Commands representing side effects to be executed by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Posts a message to the personalization worker.
    ///
    /// The worker answers with a [`WorkerResponse`](crate::worker::WorkerResponse)
    /// echoing the request generation.
    PostToWorker(WorkerMessage),

    /// Requests one page from the data service.
    ///
    /// The host answers with `Event::PageLoaded` carrying the same generation,
    /// or `Event::PageLoadFailed`.
    FetchPage(ServerQuery),

    /// The sort changed; hosts persisting sort state listen for this.
    SortingChanged(Option<SortInfo>),

    /// The selection changed.
    SelectionChanged {
        /// Selected keys, oldest first.
        keys: Vec<SelectionKey>,
    },

    /// The active view changed.
    ViewModeChanged {
        /// Code of the new view.
        code: ViewCode,
    },

    /// Asks the user to confirm resetting personalization of both surfaces.
    ///
    /// The host answers with `Event::ResetConfirmed` or `Event::ResetCancelled`.
    ConfirmReset,

    /// Delivers an exported workbook.
    ExportWorkbook {
        /// File name including extension.
        file_name: String,
        /// CSV content.
        content: String,
    },

    /// Runs a command that has no handler registered in the coordinator.
    RunCommand {
        /// Command id.
        id: String,
        /// Selected records at the time of invocation.
        selected: Vec<Record>,
    },
}
