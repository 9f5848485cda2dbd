//! Grouping of records into labelled buckets.

use super::sort::sort_records;
use crate::app::modes::SortDirection;
use crate::domain::Record;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Label used for records without a value in the group field.
pub const EMPTY_GROUP_LABEL: &str = "";

/// Field the collection is grouped by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupField {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_source: Option<String>,
}

impl GroupField {
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            field_source: None,
        }
    }

    /// Qualified field path.
    #[must_use]
    pub fn path(&self) -> String {
        self.field_source
            .as_ref()
            .map_or_else(|| self.field.clone(), |alias| format!("{alias}.{}", self.field))
    }
}

/// One group header with the number of records it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBucket {
    pub label: String,
    pub count: usize,
    pub expanded: bool,
}

/// Orders `records` so that members of a group are contiguous, keeping the
/// existing (already sorted) order inside each group.
pub fn order_by_group(records: &mut [Record], group: &GroupField) {
    sort_records(records, &group.path(), SortDirection::Asc);
}

/// Buckets records by their group field value, in first-seen order.
///
/// Callers pass records already ordered with [`order_by_group`].
#[must_use]
pub fn group_records(records: &[Record], group: &GroupField, expanded: &BTreeSet<String>) -> Vec<GroupBucket> {
    let path = group.path();
    let mut buckets: Vec<GroupBucket> = Vec::new();

    for record in records {
        let label = record.text(&path).unwrap_or_else(|| EMPTY_GROUP_LABEL.to_string());
        match buckets.iter_mut().find(|b| b.label == label) {
            Some(bucket) => bucket.count += 1,
            None => buckets.push(GroupBucket {
                expanded: expanded.contains(&label),
                label,
                count: 1,
            }),
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_follow_group_order_and_flag_expanded() {
        let mut records = vec![
            Record::new().with("author", "Herbert").with("title", "Dune"),
            Record::new().with("author", "Asimov").with("title", "Foundation"),
            Record::new().with("author", "Herbert").with("title", "Dune Messiah"),
            Record::new().with("title", "Anonymous"),
        ];
        let group = GroupField::new("author");
        order_by_group(&mut records, &group);

        let expanded = BTreeSet::from(["Herbert".to_string()]);
        let buckets = group_records(&records, &group, &expanded);
        let summary: Vec<_> = buckets.iter().map(|b| (b.label.as_str(), b.count, b.expanded)).collect();
        assert_eq!(
            summary,
            vec![("Asimov", 1, false), ("Herbert", 2, true), (EMPTY_GROUP_LABEL, 1, false)]
        );
        assert_eq!(records[1].text("title").as_deref(), Some("Dune"));
    }
}
