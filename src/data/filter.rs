//! Structured filter clauses.
//!
//! A filter is a conjunction of [`FilterClause`]s, each comparing one record field
//! against a value. The same clauses are evaluated locally for in-memory data and
//! rendered into the options string of a server query for remote data.

use crate::domain::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// Comparison operator of a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOp {
    #[serde(rename = "=", alias = "eq")]
    Eq,
    #[serde(rename = "!=", alias = "ne")]
    Ne,
    #[serde(rename = "<", alias = "lt")]
    Lt,
    #[serde(rename = "<=", alias = "le")]
    Le,
    #[serde(rename = ">", alias = "gt")]
    Gt,
    #[serde(rename = ">=", alias = "ge")]
    Ge,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "startswith")]
    StartsWith,
    #[serde(rename = "endswith")]
    EndsWith,
}

impl FilterOp {
    /// Operator keyword used in server option strings.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Lt => "lt",
            Self::Le => "le",
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Contains => "contains",
            Self::StartsWith => "startswith",
            Self::EndsWith => "endswith",
        }
    }
}

/// One `field op value` condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterClause {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
    /// Field source alias when the field lives outside the primary entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_source: Option<String>,
}

impl FilterClause {
    /// Creates a clause on a primary-entity field.
    ///
    /// ```
    /// use collection_viewer::data::filter::{FilterClause, FilterOp};
    /// use collection_viewer::Record;
    ///
    /// let clause = FilterClause::new("author", FilterOp::Eq, "Frank Herbert");
    /// assert!(clause.matches(&Record::new().with("author", "Frank Herbert")));
    /// ```
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
            field_source: None,
        }
    }

    /// Qualified field path (`alias.field` for field-source fields).
    #[must_use]
    pub fn path(&self) -> String {
        self.field_source
            .as_ref()
            .map_or_else(|| self.field.clone(), |alias| format!("{alias}.{}", self.field))
    }

    /// Evaluates the clause against a record. Missing fields only satisfy `!=`.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        let path = self.path();
        let Some(actual) = record.get(&path).filter(|v| !v.is_null()) else {
            return self.op == FilterOp::Ne && !self.value.is_null();
        };

        match self.op {
            FilterOp::Eq => values_equal(actual, &self.value),
            FilterOp::Ne => !values_equal(actual, &self.value),
            FilterOp::Lt => compare_values(actual, &self.value) == Some(Ordering::Less),
            FilterOp::Le => matches!(compare_values(actual, &self.value), Some(Ordering::Less | Ordering::Equal)),
            FilterOp::Gt => compare_values(actual, &self.value) == Some(Ordering::Greater),
            FilterOp::Ge => matches!(compare_values(actual, &self.value), Some(Ordering::Greater | Ordering::Equal)),
            FilterOp::Contains => text_of(actual).contains(&text_of(&self.value)),
            FilterOp::StartsWith => text_of(actual).starts_with(&text_of(&self.value)),
            FilterOp::EndsWith => text_of(actual).ends_with(&text_of(&self.value)),
        }
    }

    /// Renders the clause as a server filter expression.
    #[must_use]
    pub fn to_expression(&self) -> String {
        let literal = match &self.value {
            Value::String(s) => format!("'{}'", s.replace('\'', "''")),
            other => other.to_string(),
        };
        match self.op {
            FilterOp::Contains | FilterOp::StartsWith | FilterOp::EndsWith => {
                format!("{}({},{literal})", self.op.keyword(), self.path())
            }
            _ => format!("{} {} {literal}", self.path(), self.op.keyword()),
        }
    }
}

/// True when every clause matches.
#[must_use]
pub fn matches_all(clauses: &[FilterClause], record: &Record) -> bool {
    clauses.iter().all(|clause| clause.matches(record))
}

/// Lowercased display text of a value.
fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_lowercase(),
        other => other.to_string().to_lowercase(),
    }
}

/// Equality that treats numerically equal numbers (`1` and `1.0`) as equal.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => (x - y).abs() < f64::EPSILON,
        _ => a == b,
    }
}

/// Orders two values of the same kind; mixed kinds are incomparable.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.to_lowercase().cmp(&y.to_lowercase())),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
