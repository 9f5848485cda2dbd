//! Record and identity model.
//!
//! A [`Record`] is one item of the collection as delivered by the host: a JSON
//! object. Records are replaced wholesale when the host refreshes its data, so
//! selection survives refreshes through an [`IdentityKey`] rather than through
//! object identity.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// One item of the collection.
///
/// Field lookup accepts dotted paths (`"author.name"`) so fields resolved through a
/// field source alias can be read from nested objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builds a record from a JSON value, returning `None` for non-objects.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Builder-style field insertion.
    ///
    /// ```
    /// use collection_viewer::Record;
    ///
    /// let book = Record::new().with("title", "Dune").with("year", 1965);
    /// assert_eq!(book.text("title").as_deref(), Some("Dune"));
    /// ```
    #[must_use]
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    /// Looks up a field, following dotted paths into nested objects.
    ///
    /// A literal key containing dots takes precedence over path traversal.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        if let Some(value) = self.0.get(field) {
            return Some(value);
        }

        let mut parts = field.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Returns a field rendered as display text. `null` and missing fields yield `None`.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<String> {
        match self.get(field)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Iterates the top-level fields.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns the record as a JSON object value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Comparator deciding whether two records denote the same entity.
pub type IdentityComparator = Arc<dyn Fn(&Record, &Record) -> bool + Send + Sync>;

/// How records are matched across data refreshes.
#[derive(Clone)]
pub enum IdentityKey {
    /// Records are the same entity when this field holds equal values.
    Field(String),
    /// Records are the same entity when the comparator says so.
    Comparator(IdentityComparator),
    /// No identity configured; whole-record equality is used.
    Structural,
}

impl fmt::Debug for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => f.debug_tuple("Field").field(field).finish(),
            Self::Comparator(_) => f.write_str("Comparator(..)"),
            Self::Structural => f.write_str("Structural"),
        }
    }
}

impl Default for IdentityKey {
    fn default() -> Self {
        Self::Structural
    }
}

/// Stored identity of a selected item.
///
/// For [`IdentityKey::Field`] this is the field value; otherwise it is the whole
/// record snapshot, matched later through the comparator or structural equality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionKey(pub Value);

impl IdentityKey {
    /// Derives the selection key of a record. Records lacking the identity field
    /// fall back to their whole-object snapshot.
    #[must_use]
    pub fn key_of(&self, record: &Record) -> SelectionKey {
        match self {
            Self::Field(field) => record
                .get(field)
                .filter(|v| !v.is_null())
                .map_or_else(|| SelectionKey(record.to_value()), |v| SelectionKey(v.clone())),
            Self::Comparator(_) | Self::Structural => SelectionKey(record.to_value()),
        }
    }

    /// Returns true when `record` is the entity identified by `key`.
    #[must_use]
    pub fn matches(&self, key: &SelectionKey, record: &Record) -> bool {
        match self {
            Self::Field(_) => self.key_of(record) == *key,
            Self::Comparator(cmp) => Record::from_value(key.0.clone())
                .is_some_and(|snapshot| cmp(&snapshot, record)),
            Self::Structural => record.to_value() == key.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dotted_lookup_reads_nested_objects() {
        let record = Record::from_value(json!({"author": {"name": "Frank Herbert"}, "a.b": 1}))
            .unwrap();
        assert_eq!(record.text("author.name").as_deref(), Some("Frank Herbert"));
        assert_eq!(record.get("a.b"), Some(&json!(1)));
        assert!(record.get("author.missing").is_none());
    }

    #[test]
    fn field_identity_survives_object_replacement() {
        let key = IdentityKey::Field("id".into());
        let before = Record::new().with("id", 7).with("title", "old");
        let after = Record::new().with("id", 7).with("title", "new");
        assert!(key.matches(&key.key_of(&before), &after));
    }

    #[test]
    fn comparator_identity_uses_snapshot() {
        let key = IdentityKey::Comparator(Arc::new(|a: &Record, b: &Record| {
            a.text("isbn") == b.text("isbn")
        }));
        let stored = key.key_of(&Record::new().with("isbn", "x-1").with("rev", 1));
        assert!(key.matches(&stored, &Record::new().with("isbn", "x-1").with("rev", 2)));
        assert!(!key.matches(&stored, &Record::new().with("isbn", "x-2")));
    }
}
