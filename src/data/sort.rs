//! Sort descriptor and stable record ordering.

use super::filter::compare_values;
use crate::app::modes::SortDirection;
use crate::domain::Record;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort field, direction and optional field source alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortInfo {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_source: Option<String>,
}

impl SortInfo {
    #[must_use]
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
            field_source: None,
        }
    }

    /// Qualified field path used for lookup and server ordering.
    #[must_use]
    pub fn path(&self) -> String {
        self.field_source
            .as_ref()
            .map_or_else(|| self.field.clone(), |alias| format!("{alias}.{}", self.field))
    }

    /// Server `$orderby` clause.
    #[must_use]
    pub fn to_order_by(&self) -> String {
        match self.direction {
            SortDirection::Asc => format!("{} asc", self.path()),
            SortDirection::Desc => format!("{} desc", self.path()),
        }
    }
}

/// Stable in-place sort by a field path. Missing and `null` values sort last in
/// both directions; incomparable values keep their relative order.
pub fn sort_records(records: &mut [Record], path: &str, direction: SortDirection) {
    records.sort_by(|a, b| {
        let left = a.get(path).filter(|v| !v.is_null());
        let right = b.get(path).filter(|v| !v.is_null());
        match (left, right) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => {
                let ord = compare_values(x, y).unwrap_or(Ordering::Equal);
                match direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn years(records: &[Record]) -> Vec<Option<String>> {
        records.iter().map(|r| r.text("year")).collect()
    }

    #[test]
    fn nulls_sort_last_in_both_directions() {
        let mut records = vec![
            Record::new().with("year", 1965),
            Record::new(),
            Record::new().with("year", 1951),
        ];
        sort_records(&mut records, "year", SortDirection::Asc);
        assert_eq!(years(&records), vec![Some("1951".into()), Some("1965".into()), None]);

        sort_records(&mut records, "year", SortDirection::Desc);
        assert_eq!(years(&records), vec![Some("1965".into()), Some("1951".into()), None]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let mut records = vec![
            Record::new().with("author", "b").with("n", 1),
            Record::new().with("author", "a").with("n", 2),
            Record::new().with("author", "B").with("n", 3),
        ];
        sort_records(&mut records, "author", SortDirection::Asc);
        let order: Vec<_> = records.iter().filter_map(|r| r.text("n")).collect();
        assert_eq!(order, vec!["2", "1", "3"]);
    }

    #[test]
    fn order_by_uses_field_source() {
        let mut sort = SortInfo::new("name", SortDirection::Desc);
        sort.field_source = Some("publisher".into());
        assert_eq!(sort.to_order_by(), "publisher.name desc");
    }
}
