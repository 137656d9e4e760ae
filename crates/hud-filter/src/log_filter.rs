//! Filtering of individual log lines.
//!
//! Uses the same level and source semantics as alerts, plus manifest scoping.
//! Build event lines always pass so the reader can tell which output belongs
//! to which build.

use hud_core::types::ALL_RESOURCES;
use hud_core::{FilterLevel, FilterSource};
use serde::{Deserialize, Serialize};

use crate::filter::{FilterSet, FilterTerm};

/// Severity of a single log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LineLevel {
    /// Returns true if this line would show up under `level`.
    fn matches(self, level: FilterLevel) -> bool {
        match level {
            FilterLevel::All => true,
            FilterLevel::Warn => self == LineLevel::Warn,
            FilterLevel::Error => self == LineLevel::Error,
        }
    }
}

/// One line of resource output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogLine {
    pub manifest_name: String,
    pub span_id: String,
    pub level: LineLevel,
    /// Non-empty for build start/finish markers
    pub build_event: String,
    pub text: String,
}

impl LogLine {
    pub fn is_build(&self) -> bool {
        is_build_span_id(&self.span_id)
    }
}

/// Returns true for spans produced by a build step.
pub fn is_build_span_id(span_id: &str) -> bool {
    span_id.starts_with("build:") || span_id.starts_with("cmdimage:")
}

/// A filter over log lines.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub source: FilterSource,
    /// Empty means every manifest
    pub manifest_name: String,
    pub level: FilterLevel,
    pub term: FilterTerm,
}

impl LogFilter {
    /// Scope `filters` to one manifest. `(all)` and the empty name select
    /// every manifest.
    pub fn from_filter_set(filters: &FilterSet, manifest_name: &str) -> Self {
        let manifest_name = if manifest_name == ALL_RESOURCES {
            String::new()
        } else {
            manifest_name.to_string()
        };
        Self {
            source: filters.source,
            manifest_name,
            level: filters.level,
            term: filters.term.clone(),
        }
    }

    pub fn matches(&self, line: &LogLine) -> bool {
        if !line.build_event.is_empty() {
            return true;
        }

        if !self.manifest_name.is_empty() && self.manifest_name != line.manifest_name {
            return false;
        }

        let is_build = line.is_build();
        match self.source {
            FilterSource::Runtime if is_build => return false,
            FilterSource::Build if !is_build => return false,
            _ => {}
        }

        line.level.matches(self.level) && self.term.matches(&line.text)
    }

    /// Matching lines, in input order.
    pub fn apply(&self, lines: &[LogLine]) -> Vec<LogLine> {
        lines.iter().filter(|l| self.matches(l)).cloned().collect()
    }
}
