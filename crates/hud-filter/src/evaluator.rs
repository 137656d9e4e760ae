//! Evaluating a filter set against alerts.
//!
//! Counts feed the level buttons and the source menu; [`filter_alerts`]
//! decides which alerts are shown.

use hud_alerts::Alert;
use hud_core::{FilterLevel, FilterSource};
use serde::Serialize;

use crate::filter::FilterSet;

impl FilterSet {
    /// Returns true if `alert` passes the level, source, and term filters.
    pub fn matches_alert(&self, alert: &Alert) -> bool {
        let level_ok = self.level == FilterLevel::All || alert.level() == self.level;
        let source_ok = self.source == FilterSource::All || alert.source() == self.source;
        level_ok
            && source_ok
            && (self.term.matches(&alert.message) || self.term.matches(&alert.title))
    }
}

/// Alerts that pass `filters`, in input order.
pub fn filter_alerts<'a>(filters: &FilterSet, alerts: &'a [Alert]) -> Vec<&'a Alert> {
    alerts.iter().filter(|a| filters.matches_alert(a)).collect()
}

/// Count reductions over a set of alerts.
#[derive(Debug, Clone, Copy)]
pub struct FilterEvaluator<'a> {
    alerts: &'a [Alert],
}

impl<'a> FilterEvaluator<'a> {
    pub fn new(alerts: &'a [Alert]) -> Self {
        Self { alerts }
    }

    /// Number of alerts at `level`.
    ///
    /// Callers only ask for `Warn` or `Error`; no alert has level `All`.
    pub fn count_matching_level(&self, level: FilterLevel) -> usize {
        self.alerts.iter().filter(|a| a.level() == level).count()
    }

    /// Number of alerts at `level` from `source`.
    pub fn count_matching_level_and_source(&self, level: FilterLevel, source: FilterSource) -> usize {
        self.alerts
            .iter()
            .filter(|a| a.level() == level && a.source() == source)
            .count()
    }

    /// Counts for the level buttons.
    pub fn level_counts(&self) -> LevelCounts {
        LevelCounts {
            warn: self.count_matching_level(FilterLevel::Warn),
            error: self.count_matching_level(FilterLevel::Error),
        }
    }

    /// Counts for the source menu attached to a level button.
    ///
    /// The `All` level shows no counts, so this returns `None` for it.
    pub fn source_menu_counts(&self, level: FilterLevel) -> Option<SourceMenuCounts> {
        if level == FilterLevel::All {
            return None;
        }
        Some(SourceMenuCounts {
            all: self.count_matching_level(level),
            build: self.count_matching_level_and_source(level, FilterSource::Build),
            runtime: self.count_matching_level_and_source(level, FilterSource::Runtime),
        })
    }
}

/// Alert counts per level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelCounts {
    pub warn: usize,
    pub error: usize,
}

impl LevelCounts {
    pub fn get(&self, level: FilterLevel) -> usize {
        match level {
            FilterLevel::All => 0,
            FilterLevel::Warn => self.warn,
            FilterLevel::Error => self.error,
        }
    }

    /// Button label for `level`, e.g. `Errors (3)`.
    pub fn label(&self, level: FilterLevel) -> String {
        level.label(self.get(level))
    }
}

/// Alert counts per source within one level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceMenuCounts {
    pub all: usize,
    pub build: usize,
    pub runtime: usize,
}

impl SourceMenuCounts {
    pub fn get(&self, source: FilterSource) -> usize {
        match source {
            FilterSource::All => self.all,
            FilterSource::Build => self.build,
            FilterSource::Runtime => self.runtime,
        }
    }

    /// Menu label for `source`, e.g. `Build Only (2)`.
    pub fn label(&self, source: FilterSource) -> String {
        format!("{} ({})", source.label(), self.get(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hud_alerts::AlertKind;

    fn alert(kind: AlertKind, message: &str) -> Alert {
        Alert {
            kind,
            resource_name: "web".to_string(),
            title: "web".to_string(),
            message: message.to_string(),
            timestamp: String::new(),
        }
    }

    fn sample() -> Vec<Alert> {
        vec![
            alert(AlertKind::PodRestart, "OOMKilled"),
            alert(AlertKind::BuildFailed, "docker build failed"),
            alert(AlertKind::Warning, "deprecated flag"),
            alert(AlertKind::Warning, "docker cache miss"),
            alert(AlertKind::PodStatusError, "ImagePullBackOff"),
        ]
    }

    #[test]
    fn test_count_matching_level() {
        let alerts = sample();
        let eval = FilterEvaluator::new(&alerts);
        assert_eq!(eval.count_matching_level(FilterLevel::Error), 3);
        assert_eq!(eval.count_matching_level(FilterLevel::Warn), 2);
        assert_eq!(eval.count_matching_level(FilterLevel::All), 0);
    }

    #[test]
    fn test_count_matching_level_and_source() {
        let alerts = sample();
        let eval = FilterEvaluator::new(&alerts);
        assert_eq!(
            eval.count_matching_level_and_source(FilterLevel::Error, FilterSource::Runtime),
            2
        );
        assert_eq!(
            eval.count_matching_level_and_source(FilterLevel::Error, FilterSource::Build),
            1
        );
        assert_eq!(
            eval.count_matching_level_and_source(FilterLevel::Warn, FilterSource::Runtime),
            0
        );
    }

    #[test]
    fn test_counts_ignore_order() {
        let mut alerts = sample();
        let before = FilterEvaluator::new(&alerts).level_counts();
        alerts.reverse();
        assert_eq!(FilterEvaluator::new(&alerts).level_counts(), before);
    }

    #[test]
    fn test_source_menu_counts() {
        let alerts = sample();
        let eval = FilterEvaluator::new(&alerts);
        assert_eq!(eval.source_menu_counts(FilterLevel::All), None);

        let counts = eval.source_menu_counts(FilterLevel::Error).unwrap();
        assert_eq!(counts, SourceMenuCounts { all: 3, build: 1, runtime: 2 });
        assert_eq!(counts.label(FilterSource::Runtime), "Runtime Only (2)");
    }

    #[test]
    fn test_level_labels() {
        let alerts = sample();
        let counts = FilterEvaluator::new(&alerts).level_counts();
        assert_eq!(counts.label(FilterLevel::All), "All Levels");
        assert_eq!(counts.label(FilterLevel::Error), "Errors (3)");
        assert_eq!(counts.label(FilterLevel::Warn), "Warnings (2)");
    }

    #[test]
    fn test_filter_alerts_by_level_and_term() {
        let alerts = sample();
        let filters = FilterSet::from_query("level=warn&term=DOCKER");
        let shown = filter_alerts(&filters, &alerts);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].message, "docker cache miss");
    }

    #[test]
    fn test_filter_alerts_by_source() {
        let alerts = sample();
        let filters = FilterSet::from_query("source=runtime");
        let kinds: Vec<_> = filter_alerts(&filters, &alerts).iter().map(|a| a.kind).collect();
        assert_eq!(kinds, vec![AlertKind::PodRestart, AlertKind::PodStatusError]);
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let alerts = sample();
        assert_eq!(filter_alerts(&FilterSet::default(), &alerts).len(), alerts.len());
    }

    #[test]
    fn test_term_matches_title() {
        let alerts = vec![alert(AlertKind::PodRestart, "")];
        let filters = FilterSet::from_query("term=^web$");
        assert_eq!(filter_alerts(&filters, &alerts).len(), 1);
    }
}
