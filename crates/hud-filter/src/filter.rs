//! Log filter state and its query-string encoding.
//!
//! The source of truth for log filters is the URL. For example
//! `/r/(all)/overview?level=error&source=build&term=docker` only shows
//! errors from builds (not from the pod) that contain `docker`.
//!
//! A [`FilterSet`] is never stored on its own: it is parsed from the current
//! query string on every navigation, and edits go back out through
//! [`create_log_search`].

use std::ops::Range;

use hud_core::{FilterLevel, FilterSource};
use regex::{Regex, RegexBuilder};
use tracing::debug;
use url::form_urlencoded;

/// Query parameter holding the severity level.
pub const LEVEL_PARAM: &str = "level";
/// Query parameter holding the log source.
pub const SOURCE_PARAM: &str = "source";
/// Query parameter holding the free-text term.
pub const TERM_PARAM: &str = "term";

/// The empty filter term.
pub const EMPTY_TERM: &str = "";

/// A free-text filter term and its compiled pattern.
#[derive(Debug, Clone, Default)]
pub struct FilterTerm {
    /// Unmodified user input
    pub source_text: String,
    /// Case-insensitive pattern compiled from the input; `None` matches everything
    pub compiled_pattern: Option<Regex>,
    /// Input did not compile as a pattern and is matched as literal text
    pub invalid: bool,
}

impl FilterTerm {
    /// The canonical empty term.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled_pattern.is_none()
    }

    /// Returns true if `text` matches (always true for the empty term).
    pub fn matches(&self, text: &str) -> bool {
        self.compiled_pattern
            .as_ref()
            .is_none_or(|re| re.is_match(text))
    }

    /// Byte ranges of every match in `text`, for highlighting.
    pub fn match_ranges(&self, text: &str) -> Vec<Range<usize>> {
        match &self.compiled_pattern {
            Some(re) => re
                .find_iter(text)
                .filter(|m| !m.is_empty())
                .map(|m| m.range())
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Compile a filter term.
///
/// The raw text is used as a case-insensitive pattern. Text that does not
/// compile falls back to a literal match and the term is marked invalid.
pub fn parse_filter_term(term: &str) -> FilterTerm {
    if term.is_empty() {
        return FilterTerm::empty();
    }

    match case_insensitive(term) {
        Ok(re) => FilterTerm {
            source_text: term.to_string(),
            compiled_pattern: Some(re),
            invalid: false,
        },
        Err(e) => {
            debug!(term, error = %e, "filter term is not a valid pattern, matching literally");
            FilterTerm {
                source_text: term.to_string(),
                compiled_pattern: case_insensitive(&regex::escape(term)).ok(),
                invalid: true,
            }
        }
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// The active combination of level, source, and term.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    pub level: FilterLevel,
    pub source: FilterSource,
    pub term: FilterTerm,
}

impl FilterSet {
    /// Parse a filter set from a query string (leading `?` allowed).
    pub fn from_query(query: &str) -> Self {
        let params = QueryParams::parse(query);
        let filters = Self {
            level: FilterLevel::from_param(params.get(LEVEL_PARAM)),
            source: FilterSource::from_param(params.get(SOURCE_PARAM)),
            term: parse_filter_term(params.get(TERM_PARAM).unwrap_or(EMPTY_TERM)),
        };
        debug!(
            level = %filters.level,
            source = %filters.source,
            term = %filters.term.source_text,
            "parsed filter set"
        );
        filters
    }

    /// Returns true if no dimension narrows the results.
    pub fn is_default(&self) -> bool {
        self.level == FilterLevel::All && self.source == FilterSource::All && self.term.is_empty()
    }

    /// These settings as a full set of edits.
    pub fn as_edits(&self) -> FilterEdits {
        FilterEdits {
            level: Some(self.level),
            source: Some(self.source),
            term: Some(self.term.source_text.clone()),
        }
    }
}

/// Filter sets are equal when level and source match and the terms match
/// ignoring case. Compiled patterns are not compared.
impl PartialEq for FilterSet {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.level == other.level
            && self.term.source_text.to_lowercase() == other.term.source_text.to_lowercase()
    }
}

impl Eq for FilterSet {}

/// Parse a filter set from a query string.
pub fn filter_set_from_query(query: &str) -> FilterSet {
    FilterSet::from_query(query)
}

/// Compare two filter sets (see the `PartialEq` impl).
pub fn filter_sets_equal(a: &FilterSet, b: &FilterSet) -> bool {
    a == b
}

/// A partial update to the filter parameters. `None` leaves a key untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterEdits {
    pub level: Option<FilterLevel>,
    pub source: Option<FilterSource>,
    pub term: Option<String>,
}

impl FilterEdits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: FilterLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_source(mut self, source: FilterSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }
}

/// Apply `edits` to the parameters of `current_search` and return the new
/// query string (without a leading `?`). Unedited parameters, including
/// unrelated ones, are kept in place.
pub fn create_log_search(current_search: &str, edits: &FilterEdits) -> String {
    let mut params = QueryParams::parse(current_search);
    if let Some(level) = edits.level {
        params.set(LEVEL_PARAM, level.as_param());
    }
    if let Some(source) = edits.source {
        params.set(SOURCE_PARAM, source.as_param());
    }
    if let Some(term) = &edits.term {
        params.set(TERM_PARAM, term);
    }
    params.finish()
}

/// Ordered, possibly repeated query parameters.
#[derive(Debug, Clone, Default)]
struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self {
            pairs: form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// First value for `key`.
    fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the first value for `key` and drop any others, or append.
    fn set(&mut self, key: &str, value: &str) {
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(first) => {
                self.pairs[first].1 = value.to_string();
                let mut index = 0;
                self.pairs.retain(|(k, _)| {
                    let keep = index <= first || k != key;
                    index += 1;
                    keep
                });
            }
            None => self.pairs.push((key.to_string(), value.to_string())),
        }
    }

    fn finish(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_query() {
        let f = FilterSet::from_query("?level=error&source=build&term=docker");
        assert_eq!(f.level, FilterLevel::Error);
        assert_eq!(f.source, FilterSource::Build);
        assert_eq!(f.term.source_text, "docker");
        assert!(!f.term.invalid);
        assert!(f.term.matches("Pulling DOCKER image"));
        assert!(!f.term.matches("pulling image"));
    }

    #[test]
    fn test_parse_unknown_values_fall_back() {
        let f = FilterSet::from_query("level=info&source=pod");
        assert_eq!(f.level, FilterLevel::All);
        assert_eq!(f.source, FilterSource::All);
        assert!(f.is_default());
    }

    #[test]
    fn test_parse_uses_first_value() {
        let f = FilterSet::from_query("level=warn&level=error");
        assert_eq!(f.level, FilterLevel::Warn);
    }

    #[test]
    fn test_parse_decodes_term() {
        let f = FilterSet::from_query("term=connection+refused%21");
        assert_eq!(f.term.source_text, "connection refused!");
    }

    #[test]
    fn test_empty_term_has_no_pattern() {
        let a = FilterSet::from_query("term=");
        let b = FilterSet::from_query("");
        assert!(a.term.compiled_pattern.is_none());
        assert!(!a.term.invalid);
        assert_eq!(a, b);
        assert!(a.term.matches("anything"));
    }

    #[test]
    fn test_term_is_a_pattern() {
        let term = parse_filter_term("err(or)?\\s+\\d+");
        assert!(term.matches("ERROR 42"));
        assert!(term.matches("err 7"));
        assert!(!term.matches("error x"));
    }

    #[test]
    fn test_invalid_term_matches_literally() {
        let term = parse_filter_term("foo(");
        assert!(term.invalid);
        assert_eq!(term.source_text, "foo(");
        assert!(term.matches("call FOO(bar)"));
        assert!(!term.matches("foo bar"));
    }

    #[test]
    fn test_match_ranges_finds_all() {
        let term = parse_filter_term("ab");
        assert_eq!(term.match_ranges("xAbyab"), vec![1..3, 4..6]);
        assert!(FilterTerm::empty().match_ranges("ab").is_empty());
    }

    #[test]
    fn test_equality_ignores_term_case() {
        let a = FilterSet::from_query("term=Docker");
        let b = FilterSet::from_query("term=docker");
        let c = FilterSet::from_query("term=dockerx");
        assert!(filter_sets_equal(&a, &b));
        assert!(!filter_sets_equal(&a, &c));
    }

    #[test]
    fn test_equality_checks_level_and_source() {
        let a = FilterSet::from_query("level=warn");
        let b = FilterSet::from_query("level=error");
        let c = FilterSet::from_query("level=warn&source=runtime");
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_create_log_search_partial_update() {
        let search = create_log_search(
            "level=error&source=build",
            &FilterEdits::new().with_term("docker"),
        );
        assert_eq!(search, "level=error&source=build&term=docker");
    }

    #[test]
    fn test_create_log_search_overwrites_in_place() {
        let search = create_log_search(
            "?term=old&level=warn&level=error&tab=logs",
            &FilterEdits::new().with_level(FilterLevel::Error),
        );
        assert_eq!(search, "term=old&level=error&tab=logs");
    }

    #[test]
    fn test_create_log_search_all_writes_empty_value() {
        let search = create_log_search(
            "level=warn&source=build",
            &FilterEdits::new()
                .with_level(FilterLevel::All)
                .with_source(FilterSource::All),
        );
        assert_eq!(search, "level=&source=");
        assert!(FilterSet::from_query(&search).is_default());
    }

    #[test]
    fn test_create_log_search_encodes_term() {
        let search = create_log_search("", &FilterEdits::new().with_term("a b&c"));
        assert_eq!(search, "term=a+b%26c");
        assert_eq!(FilterSet::from_query(&search).term.source_text, "a b&c");
    }

    #[test]
    fn test_as_edits_round_trip() {
        let f = FilterSet::from_query("level=warn&source=runtime&term=Timeout");
        let again = FilterSet::from_query(&create_log_search("", &f.as_edits()));
        assert_eq!(f, again);
    }
}
