//! Alert derivation from resource snapshots.
//!
//! Two result sets are derived from the same predicates and are kept as two
//! separate functions:
//!
//! - [`AlertClassifier::compute_alerts`] (the *existence* set) covers only
//!   pod/runtime problems. The pod-status and restart checks are independent,
//!   so a crashing pod that also restarted yields two alerts.
//! - [`AlertClassifier::compute_display_alerts`] (the *display* set) picks at
//!   most one of pod-status error, restart, or crash rebuild per resource, then
//!   appends the build failure and every build warning.
//!
//! The two sets disagree for some resources (a failed build with a healthy pod
//! has no existence alert but one display alert). Callers rely on that
//! difference: the existence set drives lightweight problem counts, the
//! display set drives the alert pane.

use hud_core::{FilterLevel, FilterSource, PodStatusRules, ResourceSnapshot};
use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

/// Title used for crash-rebuild alerts.
pub const CRASH_REBUILD_TITLE: &str = "Pod crashed";

/// Kind of a derived alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    /// Pod is in an error status or reports a status message
    #[serde(rename = "PodStatusError")]
    PodStatusError,
    /// Pod has restarted
    #[serde(rename = "PodRestartError")]
    PodRestart,
    /// Last build was triggered by a pod crash
    #[serde(rename = "ResourceCrashRebuild")]
    CrashRebuild,
    /// Last build failed
    #[serde(rename = "BuildError")]
    BuildFailed,
    /// Last build emitted a warning
    #[serde(rename = "Warning")]
    Warning,
}

impl AlertKind {
    /// The outbound type tag for this kind.
    pub fn type_tag(&self) -> &'static str {
        match self {
            AlertKind::PodStatusError => "PodStatusError",
            AlertKind::PodRestart => "PodRestartError",
            AlertKind::CrashRebuild => "ResourceCrashRebuild",
            AlertKind::BuildFailed => "BuildError",
            AlertKind::Warning => "Warning",
        }
    }

    /// Severity bucket used by the level filter.
    pub fn level(&self) -> FilterLevel {
        match self {
            AlertKind::Warning => FilterLevel::Warn,
            AlertKind::PodStatusError
            | AlertKind::PodRestart
            | AlertKind::CrashRebuild
            | AlertKind::BuildFailed => FilterLevel::Error,
        }
    }

    /// Log source bucket used by the source filter.
    pub fn source(&self) -> FilterSource {
        match self {
            AlertKind::BuildFailed | AlertKind::Warning => FilterSource::Build,
            AlertKind::PodStatusError | AlertKind::PodRestart | AlertKind::CrashRebuild => {
                FilterSource::Runtime
            }
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_tag())
    }
}

/// A derived, user-facing notice about a resource.
///
/// Timestamps are passed through as delivered; formatting them is left to
/// the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "alertType")]
    pub kind: AlertKind,
    #[serde(rename = "resourceName")]
    pub resource_name: String,
    #[serde(rename = "titleMsg")]
    pub title: String,
    #[serde(rename = "msg")]
    pub message: String,
    pub timestamp: String,
}

impl Alert {
    pub fn level(&self) -> FilterLevel {
        self.kind.level()
    }

    pub fn source(&self) -> FilterSource {
        self.kind.source()
    }

    /// Format for display in one line.
    pub fn format_compact(&self) -> String {
        let first_line = self.message.lines().next().unwrap_or("");
        format!(
            "[{}] {} {}: {}",
            self.kind, self.resource_name, self.title, first_line
        )
    }
}

/// Classifies resource snapshots into alerts using a set of pod status rules.
#[derive(Debug, Clone, Copy)]
pub struct AlertClassifier<'a> {
    rules: &'a PodStatusRules,
}

impl Default for AlertClassifier<'static> {
    fn default() -> Self {
        Self::new(PodStatusRules::builtin())
    }
}

impl<'a> AlertClassifier<'a> {
    pub fn new(rules: &'a PodStatusRules) -> Self {
        Self { rules }
    }

    /// The existence set for one resource: pod status error, restart, and
    /// crash rebuild, each checked independently. Build failures and
    /// warnings are never part of this set.
    pub fn compute_alerts(&self, resource: &ResourceSnapshot) -> Vec<Alert> {
        let mut alerts = Vec::new();
        if resource.is_pod_status_error_with(self.rules) {
            alerts.push(self.pod_status_alert(resource));
        }
        if resource.pod_restarted() {
            alerts.push(pod_restart_alert(resource));
        }
        if resource.is_crash_rebuild() {
            alerts.push(crash_rebuild_alert(resource));
        }
        trace!(resource = %resource.name, count = alerts.len(), "computed existence alerts");
        alerts
    }

    /// The display set across resources, in input order.
    #[instrument(name = "classify", skip_all, fields(resources = resources.len()))]
    pub fn compute_display_alerts(&self, resources: &[ResourceSnapshot]) -> Vec<Alert> {
        let mut alerts = Vec::new();
        for resource in resources {
            self.push_display_alerts(resource, &mut alerts);
        }
        trace!(
            resources = resources.len(),
            count = alerts.len(),
            "computed display alerts"
        );
        alerts
    }

    fn push_display_alerts(&self, resource: &ResourceSnapshot, alerts: &mut Vec<Alert>) {
        if resource.is_pod_status_error_with(self.rules) {
            alerts.push(self.pod_status_alert(resource));
        } else if resource.pod_restarted() {
            alerts.push(pod_restart_alert(resource));
        } else if resource.is_crash_rebuild() {
            alerts.push(crash_rebuild_alert(resource));
        }

        let Some(last_build) = resource.last_build() else {
            return;
        };

        if last_build.failed() {
            alerts.push(Alert {
                kind: AlertKind::BuildFailed,
                resource_name: resource.name.clone(),
                title: resource.name.clone(),
                message: last_build.log.clone(),
                timestamp: last_build.finish_time.clone(),
            });
        }

        for warning in &last_build.warnings {
            alerts.push(Alert {
                kind: AlertKind::Warning,
                resource_name: resource.name.clone(),
                title: resource.name.clone(),
                message: warning.clone(),
                timestamp: last_build.finish_time.clone(),
            });
        }
    }

    fn pod_status_alert(&self, resource: &ResourceSnapshot) -> Alert {
        let pod = &resource.pod_info;
        let crash_log = if resource.is_pod_status_crash_with(self.rules) {
            resource.crash_log.as_str()
        } else {
            ""
        };
        let message = [crash_log, pod.status_message()]
            .into_iter()
            .find(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Pod has status {}", pod.pod_status));

        Alert {
            kind: AlertKind::PodStatusError,
            resource_name: resource.name.clone(),
            title: resource.name.clone(),
            message,
            timestamp: pod.pod_creation_time.clone(),
        }
    }
}

fn pod_restart_alert(resource: &ResourceSnapshot) -> Alert {
    Alert {
        kind: AlertKind::PodRestart,
        resource_name: resource.name.clone(),
        title: format!("Restarts:{}", resource.pod_info.pod_restarts),
        message: resource.crash_log.clone(),
        timestamp: resource.pod_info.pod_creation_time.clone(),
    }
}

fn crash_rebuild_alert(resource: &ResourceSnapshot) -> Alert {
    Alert {
        kind: AlertKind::CrashRebuild,
        resource_name: resource.name.clone(),
        title: CRASH_REBUILD_TITLE.to_string(),
        message: resource.crash_log.clone(),
        timestamp: resource.pod_info.pod_creation_time.clone(),
    }
}

/// Existence set for one resource using the built-in pod status rules.
pub fn compute_alerts(resource: &ResourceSnapshot) -> Vec<Alert> {
    AlertClassifier::default().compute_alerts(resource)
}

/// Display set for a list of resources using the built-in pod status rules.
pub fn compute_display_alerts(resources: &[ResourceSnapshot]) -> Vec<Alert> {
    AlertClassifier::default().compute_display_alerts(resources)
}

/// A resource together with its precomputed existence alerts.
#[derive(Debug, Clone)]
pub struct AlertResource {
    resource: ResourceSnapshot,
    alerts: Vec<Alert>,
    display_count: usize,
}

impl AlertResource {
    pub fn new(resource: ResourceSnapshot) -> Self {
        Self::with_classifier(resource, AlertClassifier::default())
    }

    pub fn with_classifier(resource: ResourceSnapshot, classifier: AlertClassifier<'_>) -> Self {
        let alerts = classifier.compute_alerts(&resource);
        let display_count = classifier
            .compute_display_alerts(std::slice::from_ref(&resource))
            .len();
        Self {
            resource,
            alerts,
            display_count,
        }
    }

    pub fn resource(&self) -> &ResourceSnapshot {
        &self.resource
    }

    /// The existence set.
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Returns true if the resource shows anything in the alert pane.
    pub fn has_alert(&self) -> bool {
        self.display_count > 0
    }

    /// Number of items the resource contributes to the alert pane.
    pub fn number_of_alerts(&self) -> usize {
        self.display_count
    }
}
