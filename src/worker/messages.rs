//! Worker message protocol.
//!
//! Requests and responses are serde-serializable so a host can run the worker on
//! another thread or process and exchange them as JSON. Every message carries the
//! generation of the coordinator request that produced it; responses echo it back
//! so the coordinator can discard completions of superseded requests.

use crate::storage::models::PersonalizationRecord;
use serde::{Deserialize, Serialize};

/// Generates builder methods for `WorkerMessage` variants addressed to a slot.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message for a personalization slot")]
                #[must_use]
                pub fn $builder_name(
                    generation: u64,
                    widget_type: impl Into<String>,
                    pref_id: impl Into<String>,
                    $($field: $ty),*
                ) -> Self {
                    Self::$variant {
                        generation,
                        widget_type: widget_type.into(),
                        pref_id: pref_id.into(),
                        $($field,)*
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load(LoadPersonalization {}),
    save(SavePersonalization { record: PersonalizationRecord }),
    clear(ClearPersonalization {}),
}

/// Requests sent to the personalization worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkerMessage {
    /// Read the record of a slot.
    #[serde(rename_all = "camelCase")]
    LoadPersonalization {
        generation: u64,
        widget_type: String,
        pref_id: String,
    },

    /// Replace the record of a slot.
    #[serde(rename_all = "camelCase")]
    SavePersonalization {
        generation: u64,
        widget_type: String,
        pref_id: String,
        record: PersonalizationRecord,
    },

    /// Delete the record of a slot.
    #[serde(rename_all = "camelCase")]
    ClearPersonalization {
        generation: u64,
        widget_type: String,
        pref_id: String,
    },
}

impl WorkerMessage {
    /// Generation of the request.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        match self {
            Self::LoadPersonalization { generation, .. }
            | Self::SavePersonalization { generation, .. }
            | Self::ClearPersonalization { generation, .. } => *generation,
        }
    }
}

/// Responses returned by the personalization worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkerResponse {
    /// Load finished; `record` is `None` when the slot is empty or unreadable.
    PersonalizationLoaded {
        generation: u64,
        record: Option<PersonalizationRecord>,
    },

    /// Save finished.
    PersonalizationSaved { generation: u64 },

    /// Clear finished.
    PersonalizationCleared { generation: u64 },

    /// The store operation failed.
    Error { generation: u64, message: String },
}

impl WorkerResponse {
    /// Generation of the request this response answers.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        match self {
            Self::PersonalizationLoaded { generation, .. }
            | Self::PersonalizationSaved { generation }
            | Self::PersonalizationCleared { generation }
            | Self::Error { generation, .. } => *generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_fill_slot_fields() {
        let message = WorkerMessage::save(4, "icv", "books", PersonalizationRecord::default());
        assert_eq!(message.generation(), 4);
        let WorkerMessage::SavePersonalization { widget_type, pref_id, .. } = message else {
            panic!("expected save message");
        };
        assert_eq!((widget_type.as_str(), pref_id.as_str()), ("icv", "books"));
    }

    #[test]
    fn messages_are_tagged_json() {
        let json = serde_json::to_string(&WorkerMessage::load(1, "icv", "books")).unwrap();
        assert_eq!(
            json,
            r#"{"type":"loadPersonalization","generation":1,"widgetType":"icv","prefId":"books"}"#
        );
        let response: WorkerResponse =
            serde_json::from_str(r#"{"type":"personalizationLoaded","generation":2,"record":null}"#).unwrap();
        assert_eq!(response, WorkerResponse::PersonalizationLoaded { generation: 2, record: None });
    }
}
