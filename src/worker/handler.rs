//! Personalization worker.
//!
//! The worker owns the personalization store and turns [`WorkerMessage`]s into
//! [`WorkerResponse`]s. Hosts either call [`PersonalizationWorker::handle_message`]
//! directly or run the worker elsewhere and exchange JSON payloads through
//! [`PersonalizationWorker::on_message`].

use crate::domain::error::{Result, ViewerError};
use crate::infrastructure::paths;
use crate::storage::{JsonPersonalizationStore, PersonalizationStore};
use crate::worker::{WorkerMessage, WorkerResponse};
use std::path::PathBuf;

/// Worker state. The store is opened lazily on the first message when the
/// worker was created without one.
#[derive(Default)]
pub struct PersonalizationWorker {
    store: Option<Box<dyn PersonalizationStore>>,
    store_path: Option<PathBuf>,
}

impl PersonalizationWorker {
    /// Creates a worker over an existing store.
    #[must_use]
    pub fn new(store: Box<dyn PersonalizationStore>) -> Self {
        Self {
            store: Some(store),
            store_path: None,
        }
    }

    /// Creates a worker that opens a JSON store at `path` on first use.
    #[must_use]
    pub fn lazy(path: PathBuf) -> Self {
        Self {
            store: None,
            store_path: Some(path),
        }
    }

    fn get_store(&mut self) -> Result<&mut Box<dyn PersonalizationStore>> {
        if self.store.is_none() {
            let path = self
                .store_path
                .clone()
                .unwrap_or_else(paths::default_store_path);
            tracing::debug!(path = ?path, "opening personalization store on first use");
            self.store = Some(Box::new(JsonPersonalizationStore::new(path)?));
        }
        self.store
            .as_mut()
            .ok_or_else(|| ViewerError::Worker("store not initialized".to_string()))
    }

    /// Logs the outcome of a store operation and maps it to a response.
    fn handle_store_result<T, F>(operation: &str, generation: u64, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, generation = generation, "store operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation = operation, generation = generation, error = %e, "store operation failed");
                WorkerResponse::Error {
                    generation,
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    /// Processes one request.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let span = tracing::debug_span!("worker_handle_message", generation = message.generation());
        let _guard = span.entered();

        match message {
            WorkerMessage::LoadPersonalization { generation, widget_type, pref_id } => Self::handle_store_result(
                "load personalization",
                generation,
                self.get_store().and_then(|store| store.get(&widget_type, &pref_id)),
                |record| {
                    tracing::debug!(found = record.is_some(), "personalization loaded");
                    WorkerResponse::PersonalizationLoaded { generation, record }
                },
            ),

            WorkerMessage::SavePersonalization { generation, widget_type, pref_id, record } => {
                Self::handle_store_result(
                    "save personalization",
                    generation,
                    self.get_store().and_then(|store| store.set(&widget_type, &pref_id, &record)),
                    |()| WorkerResponse::PersonalizationSaved { generation },
                )
            }

            WorkerMessage::ClearPersonalization { generation, widget_type, pref_id } => Self::handle_store_result(
                "clear personalization",
                generation,
                self.get_store().and_then(|store| store.remove(&widget_type, &pref_id)),
                |()| WorkerResponse::PersonalizationCleared { generation },
            ),
        }
    }

    /// JSON entry point: deserializes a request, handles it and serializes the response.
    ///
    /// Returns `None` when the payload is not a valid request or the response
    /// cannot be serialized; both are logged.
    pub fn on_message(&mut self, payload: &str) -> Option<String> {
        let message: WorkerMessage = match serde_json::from_str(payload) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker message");
                return None;
            }
        };

        let response = self.handle_message(message);

        match serde_json::to_string(&response) {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize worker response");
                None
            }
        }
    }
}
