//! Quick search: the single-text filter of the filter bar.
//!
//! Quick search is distinct from structured [`FilterClause`](super::filter::FilterClause)s.
//! It matches one configured field (or every text field when none is configured)
//! by substring, prefix or fuzzy match. Fuzzy matching uses the Skim algorithm and
//! also yields highlight ranges that tile projections use to mark matched characters.

use crate::domain::Record;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Matching strategy for quick search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuickSearchMode {
    /// Case-insensitive substring match.
    #[default]
    Contains,
    /// Case-insensitive prefix match.
    #[serde(alias = "prefix")]
    StartsWith,
    /// Skim fuzzy match; every whitespace-separated token must match.
    Fuzzy,
}

/// A prepared quick-search query.
pub struct QuickSearch {
    tokens: Vec<String>,
    query: String,
    field: Option<String>,
    mode: QuickSearchMode,
    matcher: Option<SkimMatcherV2>,
}

impl QuickSearch {
    /// Prepares a query. Whitespace-only text yields an inactive search that matches everything.
    #[must_use]
    pub fn new(text: &str, field: Option<&str>, mode: QuickSearchMode) -> Self {
        let query = text.trim().to_lowercase();
        let tokens: Vec<String> = query.split_whitespace().map(str::to_string).collect();
        let matcher = (mode == QuickSearchMode::Fuzzy && !tokens.is_empty()).then(SkimMatcherV2::default);

        Self {
            tokens,
            query,
            field: field.map(str::to_string),
            mode,
            matcher,
        }
    }

    /// True when the query has any text.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// The searched field, if restricted to one.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// The normalized query text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Matching strategy.
    #[must_use]
    pub const fn mode(&self) -> QuickSearchMode {
        self.mode
    }

    /// Tests a record.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        if !self.is_active() {
            return true;
        }
        match &self.field {
            Some(field) => record.text(field).is_some_and(|text| self.matches_text(&text)),
            None => record.fields().any(|(_, value)| match value {
                Value::String(text) => self.matches_text(text),
                _ => false,
            }),
        }
    }

    /// Tests one piece of text.
    #[must_use]
    pub fn matches_text(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        match self.mode {
            QuickSearchMode::Contains => lowered.contains(&self.query),
            QuickSearchMode::StartsWith => lowered.starts_with(&self.query),
            QuickSearchMode::Fuzzy => self.matcher.as_ref().map_or(true, |m| {
                self.tokens.iter().all(|token| m.fuzzy_match(&lowered, token).is_some())
            }),
        }
    }

    /// Character ranges `(start, end)` (exclusive end) of `text` matched by the query.
    ///
    /// Ranges index characters of the original `text`, also when lowercasing
    /// changes the character count. Contiguous fuzzy match indices are
    /// coalesced into single ranges.
    #[must_use]
    pub fn highlight_ranges(&self, text: &str) -> Vec<(usize, usize)> {
        if !self.is_active() {
            return vec![];
        }
        let (lowered, origins) = lowercase_with_origins(text);
        let query_len = self.query.chars().count();

        let lowered_ranges = match self.mode {
            QuickSearchMode::Contains => lowered
                .find(&self.query)
                .map(|byte_start| {
                    let start = lowered[..byte_start].chars().count();
                    vec![(start, start + query_len)]
                })
                .unwrap_or_default(),
            QuickSearchMode::StartsWith => {
                if lowered.starts_with(&self.query) {
                    vec![(0, query_len)]
                } else {
                    vec![]
                }
            }
            QuickSearchMode::Fuzzy => {
                let Some(matcher) = &self.matcher else {
                    return vec![];
                };
                let Some((_score, indices)) = matcher.fuzzy_indices(&lowered, &self.query) else {
                    return vec![];
                };
                let mut original: Vec<usize> = indices.iter().filter_map(|&i| origins.get(i).copied()).collect();
                original.dedup();
                return coalesce(&original);
            }
        };

        lowered_ranges
            .into_iter()
            .filter_map(|(start, end)| {
                let first = *origins.get(start)?;
                let last = *origins.get(end.checked_sub(1)?)?;
                Some((first, last + 1))
            })
            .collect()
    }
}

/// Lowercases `text`, returning for each lowered character the index of the
/// original character it came from.
fn lowercase_with_origins(text: &str) -> (String, Vec<usize>) {
    let mut lowered = String::with_capacity(text.len());
    let mut origins = Vec::with_capacity(text.len());
    for (index, ch) in text.chars().enumerate() {
        for lower in ch.to_lowercase() {
            lowered.push(lower);
            origins.push(index);
        }
    }
    (lowered, origins)
}

/// Merges sorted indices into `(start, end)` runs.
fn coalesce(indices: &[usize]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut run: Option<(usize, usize)> = None;

    for &idx in indices {
        run = match run {
            Some((start, prev)) if idx == prev + 1 => Some((start, idx)),
            Some((start, prev)) => {
                ranges.push((start, prev + 1));
                Some((idx, idx))
            }
            None => Some((idx, idx)),
        };
    }
    if let Some((start, prev)) = run {
        ranges.push((start, prev + 1));
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_matches_everything() {
        let search = QuickSearch::new("   ", Some("title"), QuickSearchMode::Contains);
        assert!(!search.is_active());
        assert!(search.matches(&Record::new()));
    }

    #[test]
    fn field_scoped_substring_and_prefix() {
        let record = Record::new().with("title", "Children of Dune").with("author", "Herbert");
        assert!(QuickSearch::new("dune", Some("title"), QuickSearchMode::Contains).matches(&record));
        assert!(!QuickSearch::new("dune", Some("title"), QuickSearchMode::StartsWith).matches(&record));
        assert!(!QuickSearch::new("herbert", Some("title"), QuickSearchMode::Contains).matches(&record));
    }

    #[test]
    fn unscoped_search_checks_text_fields() {
        let record = Record::new().with("title", "Foundation").with("year", 1951);
        assert!(QuickSearch::new("found", None, QuickSearchMode::Contains).matches(&record));
        assert!(!QuickSearch::new("1951", None, QuickSearchMode::Contains).matches(&record));
    }

    #[test]
    fn fuzzy_requires_every_token() {
        let search = QuickSearch::new("chl dne", Some("title"), QuickSearchMode::Fuzzy);
        assert!(search.matches_text("Children of Dune"));
        assert!(!search.matches_text("Foundation"));
    }

    #[test]
    fn highlight_ranges_are_character_based() {
        let search = QuickSearch::new("dune", None, QuickSearchMode::Contains);
        assert_eq!(search.highlight_ranges("Ça Dune"), vec![(3, 7)]);
        assert_eq!(coalesce(&[0, 1, 2, 5, 7, 8]), vec![(0, 3), (5, 6), (7, 9)]);
    }

    #[test]
    fn highlight_ranges_index_the_original_text_when_lowercasing_expands() {
        // 'İ' lowercases to two characters.
        let contains = QuickSearch::new("stan", None, QuickSearchMode::Contains);
        assert_eq!(contains.highlight_ranges("İstanbul"), vec![(1, 5)]);

        let prefix = QuickSearch::new("İs", None, QuickSearchMode::StartsWith);
        assert_eq!(prefix.highlight_ranges("İstanbul"), vec![(0, 2)]);

        let fuzzy = QuickSearch::new("bul", None, QuickSearchMode::Fuzzy);
        assert_eq!(fuzzy.highlight_ranges("İİ bul"), vec![(3, 6)]);
    }
}
