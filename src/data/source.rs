//! Data sources: in-memory records or a remote paged query.
//!
//! For server data the coordinator never fetches anything itself. It builds a
//! [`ServerQuery`] descriptor and emits it as an action; the host runs the query
//! against its data service and feeds the page back as an event carrying the
//! query's generation, so superseded fetches are recognized and dropped.

use super::filter::FilterClause;
use super::sort::SortInfo;
use crate::domain::Record;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Remote query descriptor supplied in the collection options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerDataOptions {
    pub data_service: String,
    pub data_entity: String,
    /// Base query options appended before the generated clauses.
    pub options_string: String,
    pub app_name: Option<String>,
    /// Alias to extension-entity reference for fields outside the primary entity.
    pub field_sources: BTreeMap<String, String>,
}

/// Where records come from.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    InMemory(Vec<Record>),
    Server(ServerDataOptions),
}

impl Default for DataSource {
    fn default() -> Self {
        Self::InMemory(Vec::new())
    }
}

impl DataSource {
    #[must_use]
    pub const fn is_server(&self) -> bool {
        matches!(self, Self::Server(_))
    }
}

/// One page request against a data service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerQuery {
    /// Request generation; page results carrying an older generation are discarded.
    pub generation: u64,
    pub data_service: String,
    pub data_entity: String,
    pub app_name: Option<String>,
    pub base_options: String,
    pub filter: Vec<String>,
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub skip: usize,
    pub top: usize,
    pub expand: Vec<String>,
}

impl ServerQuery {
    /// Builds a query for one page.
    #[must_use]
    pub fn new(
        generation: u64,
        options: &ServerDataOptions,
        clauses: &[FilterClause],
        search: Option<&FilterClause>,
        sort: Option<&SortInfo>,
        skip: usize,
        top: usize,
    ) -> Self {
        Self {
            generation,
            data_service: options.data_service.clone(),
            data_entity: options.data_entity.clone(),
            app_name: options.app_name.clone(),
            base_options: options.options_string.trim_start_matches(['?', '&']).to_string(),
            filter: clauses.iter().map(FilterClause::to_expression).collect(),
            search: search.map(FilterClause::to_expression),
            order_by: sort.map(SortInfo::to_order_by),
            skip,
            top,
            expand: options.field_sources.keys().cloned().collect(),
        }
    }

    /// Composes the options string sent to the data service.
    ///
    /// ```
    /// use collection_viewer::data::source::{ServerDataOptions, ServerQuery};
    ///
    /// let options = ServerDataOptions {
    ///     data_service: "books".into(),
    ///     data_entity: "Book".into(),
    ///     options_string: "$select=title".into(),
    ///     ..Default::default()
    /// };
    /// let query = ServerQuery::new(1, &options, &[], None, None, 20, 10);
    /// assert_eq!(query.options_string(), "$select=title&$skip=20&$top=10");
    /// ```
    #[must_use]
    pub fn options_string(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if !self.base_options.is_empty() {
            parts.push(self.base_options.clone());
        }

        let conditions: Vec<String> = self
            .filter
            .iter()
            .chain(self.search.iter())
            .map(|expr| format!("({expr})"))
            .collect();
        if !conditions.is_empty() {
            parts.push(format!("$filter={}", conditions.join(" and ")));
        }
        if let Some(order_by) = &self.order_by {
            parts.push(format!("$orderby={order_by}"));
        }
        if !self.expand.is_empty() {
            parts.push(format!("$expand={}", self.expand.join(",")));
        }
        parts.push(format!("$skip={}", self.skip));
        parts.push(format!("$top={}", self.top));
        parts.join("&")
    }
}

/// One page of server results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerPage {
    pub records: Vec<Record>,
    pub total_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::modes::SortDirection;
    use crate::data::filter::FilterOp;

    #[test]
    fn options_string_combines_every_clause() {
        let options = ServerDataOptions {
            data_service: "library".into(),
            data_entity: "Book".into(),
            options_string: "?$select=title,author".into(),
            app_name: Some("catalog".into()),
            field_sources: BTreeMap::from([("publisher".to_string(), "PublisherExt".to_string())]),
        };
        let clauses = vec![FilterClause::new("author", FilterOp::Eq, "Frank Herbert")];
        let search = FilterClause::new("title", FilterOp::Contains, "dune");
        let sort = SortInfo::new("year", SortDirection::Desc);

        let query = ServerQuery::new(3, &options, &clauses, Some(&search), Some(&sort), 0, 25);
        assert_eq!(
            query.options_string(),
            "$select=title,author&$filter=(author eq 'Frank Herbert') and (contains(title,'dune'))\
             &$orderby=year desc&$expand=publisher&$skip=0&$top=25"
        );
        assert_eq!(query.generation, 3);
    }
}
