//! Navigation targets and the filter state derived from them.

use crate::filter::{FilterEdits, FilterSet, create_log_search};

/// A navigation target: a path plus its query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub pathname: String,
    /// Query string without the leading `?`
    pub search: String,
}

impl Location {
    pub fn new(pathname: impl Into<String>, search: impl Into<String>) -> Self {
        let search = search.into();
        Self {
            pathname: pathname.into(),
            search: search.strip_prefix('?').map(str::to_string).unwrap_or(search),
        }
    }

    /// The filter set encoded in this location.
    pub fn filter_set(&self) -> FilterSet {
        filter_set_from_location(self)
    }

    /// The location reached by applying `edits` to this one.
    pub fn with_edits(&self, edits: &FilterEdits) -> Location {
        next_location(self, edits)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.search.is_empty() {
            write!(f, "{}", self.pathname)
        } else {
            write!(f, "{}?{}", self.pathname, self.search)
        }
    }
}

/// Derive the filter set from a navigation target.
pub fn filter_set_from_location(location: &Location) -> FilterSet {
    FilterSet::from_query(&location.search)
}

/// Build the next navigation target: same path, query string rebuilt with
/// `edits`.
pub fn next_location(current: &Location, edits: &FilterEdits) -> Location {
    Location {
        pathname: current.pathname.clone(),
        search: create_log_search(&current.search, edits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hud_core::{FilterLevel, FilterSource};

    #[test]
    fn test_new_strips_question_mark() {
        let l = Location::new("/r/(all)/overview", "?level=error");
        assert_eq!(l.search, "level=error");
        assert_eq!(l.to_string(), "/r/(all)/overview?level=error");
        assert_eq!(Location::new("/overview", "").to_string(), "/overview");
    }

    #[test]
    fn test_next_location_keeps_path() {
        let l = Location::new("/r/vigoda/overview", "term=docker");
        let next = next_location(
            &l,
            &FilterEdits::new()
                .with_level(FilterLevel::Warn)
                .with_source(FilterSource::All),
        );
        assert_eq!(next.pathname, "/r/vigoda/overview");
        assert_eq!(next.search, "term=docker&level=warn&source=");

        let filters = next.filter_set();
        assert_eq!(filters.level, FilterLevel::Warn);
        assert_eq!(filters.term.source_text, "docker");
    }

    #[test]
    fn test_with_edits_matches_next_location() {
        let l = Location::new("/overview", "");
        let edits = FilterEdits::new().with_term("x");
        assert_eq!(l.with_edits(&edits), next_location(&l, &edits));
    }
}
