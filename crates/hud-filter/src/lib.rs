//! # hud-filter
//!
//! Log filter state for the HUD: the query-string codec, evaluation against
//! alerts and log lines, and debounced commits of the search term.
//!
//! Filter state lives in the location's query string. It is parsed again on
//! every navigation and written back through [`next_location`].
//!
//! ```
//! use hud_core::{FilterLevel, FilterSource};
//! use hud_filter::{FilterEdits, Location, next_location};
//!
//! let here = Location::new("/r/(all)/overview", "?source=build");
//! let next = next_location(&here, &FilterEdits::new().with_level(FilterLevel::Error));
//! assert_eq!(next.search, "source=build&level=error");
//!
//! let filters = next.filter_set();
//! assert_eq!(filters.level, FilterLevel::Error);
//! assert_eq!(filters.source, FilterSource::Build);
//! ```

pub mod debounce;
pub mod evaluator;
pub mod filter;
pub mod location;
pub mod log_filter;

pub use debounce::{DebounceState, TermDebouncer};
pub use evaluator::{FilterEvaluator, LevelCounts, SourceMenuCounts, filter_alerts};
pub use filter::{
    FilterEdits, FilterSet, FilterTerm, create_log_search, filter_set_from_query,
    filter_sets_equal, parse_filter_term,
};
pub use location::{Location, filter_set_from_location, next_location};
pub use log_filter::{LineLevel, LogFilter, LogLine, is_build_span_id};
