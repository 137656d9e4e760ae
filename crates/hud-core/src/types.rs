//! Shared type definitions used across HUD crates.
//!
//! The resource structs keep the field names delivered by the monitored
//! system on the wire (`Name`, `BuildHistory`, `ResourceInfo`, ...) and map
//! them to Rust names. Missing or `null` fields decode to their zero value.

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::PodStatusRules;

/// Timestamp used when a resource has no live pod yet.
pub const ZERO_TIME: &str = "0001-01-01T00:00:00Z";

/// Resource name used by views that span every resource.
pub const ALL_RESOURCES: &str = "(all)";

/// Decode `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn zero_time() -> String {
    ZERO_TIME.to_string()
}

fn null_as_zero_time<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(zero_time))
}

/// Severity dimension of the log filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FilterLevel {
    /// No level filtering
    #[default]
    #[serde(rename = "")]
    All,
    /// Only warnings
    #[serde(rename = "warn")]
    Warn,
    /// Only errors
    #[serde(rename = "error")]
    Error,
}

impl FilterLevel {
    /// The literal used in the `level` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            FilterLevel::All => "",
            FilterLevel::Warn => "warn",
            FilterLevel::Error => "error",
        }
    }

    /// Decode a `level` parameter. Anything but the two literals is `All`.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("warn") => FilterLevel::Warn,
            Some("error") => FilterLevel::Error,
            _ => FilterLevel::All,
        }
    }

    /// Button label for this level given a matching alert count.
    pub fn label(&self, count: usize) -> String {
        match self {
            FilterLevel::All => "All Levels".to_string(),
            FilterLevel::Warn => format!("Warnings ({count})"),
            FilterLevel::Error => format!("Errors ({count})"),
        }
    }
}

impl std::fmt::Display for FilterLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterLevel::All => write!(f, "all"),
            FilterLevel::Warn => write!(f, "warn"),
            FilterLevel::Error => write!(f, "error"),
        }
    }
}

/// Source dimension of the log filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FilterSource {
    /// No source filtering
    #[default]
    #[serde(rename = "")]
    All,
    /// Only build logs
    #[serde(rename = "build")]
    Build,
    /// Only runtime logs
    #[serde(rename = "runtime")]
    Runtime,
}

impl FilterSource {
    /// The literal used in the `source` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            FilterSource::All => "",
            FilterSource::Build => "build",
            FilterSource::Runtime => "runtime",
        }
    }

    /// Decode a `source` parameter. Anything but the two literals is `All`.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("build") => FilterSource::Build,
            Some("runtime") => FilterSource::Runtime,
            _ => FilterSource::All,
        }
    }

    /// Menu label for this source.
    pub fn label(&self) -> &'static str {
        match self {
            FilterSource::All => "All Sources",
            FilterSource::Build => "Build Only",
            FilterSource::Runtime => "Runtime Only",
        }
    }
}

impl std::fmt::Display for FilterSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterSource::All => write!(f, "all"),
            FilterSource::Build => write!(f, "build"),
            FilterSource::Runtime => write!(f, "runtime"),
        }
    }
}

/// One build attempt of a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Build {
    /// Files whose edits triggered this build
    #[serde(default, deserialize_with = "null_as_default")]
    pub edits: Vec<String>,

    /// Build error, if the build failed
    #[serde(default)]
    pub error: Option<String>,

    /// Build log text
    #[serde(default, deserialize_with = "null_as_default")]
    pub log: String,

    /// Warnings emitted by the build
    #[serde(default, deserialize_with = "null_as_default")]
    pub warnings: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub start_time: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub finish_time: String,

    /// Build was triggered to recover from a pod crash
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_crash_rebuild: bool,
}

impl Build {
    /// Returns true if this build recorded an error, even an empty one.
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Live pod state for a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PodInfo {
    #[serde(default = "zero_time", deserialize_with = "null_as_zero_time")]
    pub pod_creation_time: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub pod_status: String,

    #[serde(default)]
    pub pod_status_message: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub pod_restarts: u32,
}

impl Default for PodInfo {
    fn default() -> Self {
        Self {
            pod_creation_time: zero_time(),
            pod_status: String::new(),
            pod_status_message: None,
            pod_restarts: 0,
        }
    }
}

impl PodInfo {
    /// Status message, or the empty string when absent.
    pub fn status_message(&self) -> &str {
        self.pod_status_message.as_deref().unwrap_or("")
    }
}

/// Normalized view of one monitored resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    /// Unique resource name
    #[serde(rename = "Name")]
    pub name: String,

    /// Builds, most recent first
    #[serde(rename = "BuildHistory", default, deserialize_with = "null_as_default")]
    pub build_history: Vec<Build>,

    #[serde(rename = "CrashLog", default, deserialize_with = "null_as_default")]
    pub crash_log: String,

    /// Pod state; zero-valued when no pod exists yet
    #[serde(rename = "ResourceInfo", default, deserialize_with = "null_as_default")]
    pub pod_info: PodInfo,
}

impl ResourceSnapshot {
    /// Create a snapshot with no builds and no pod.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the pod state.
    pub fn with_pod(mut self, pod_info: PodInfo) -> Self {
        self.pod_info = pod_info;
        self
    }

    /// Append a build (builds are ordered most recent first).
    pub fn with_build(mut self, build: Build) -> Self {
        self.build_history.push(build);
        self
    }

    /// Set the crash log.
    pub fn with_crash_log(mut self, crash_log: impl Into<String>) -> Self {
        self.crash_log = crash_log.into();
        self
    }

    /// The current (most recent) build, if any.
    pub fn last_build(&self) -> Option<&Build> {
        self.build_history.first()
    }

    /// Pod status is an error status, or the pod reports a status message.
    pub fn is_pod_status_error(&self) -> bool {
        self.is_pod_status_error_with(PodStatusRules::builtin())
    }

    pub fn is_pod_status_error_with(&self, rules: &PodStatusRules) -> bool {
        rules.is_error(&self.pod_info.pod_status) || !self.pod_info.status_message().is_empty()
    }

    /// Pod status is a crash status.
    pub fn is_pod_status_crash(&self) -> bool {
        self.is_pod_status_crash_with(PodStatusRules::builtin())
    }

    pub fn is_pod_status_crash_with(&self, rules: &PodStatusRules) -> bool {
        rules.is_crash(&self.pod_info.pod_status)
    }

    /// Pod has restarted at least once.
    pub fn pod_restarted(&self) -> bool {
        self.pod_info.pod_restarts > 0
    }

    /// The last build was a crash rebuild.
    pub fn is_crash_rebuild(&self) -> bool {
        self.last_build().is_some_and(|b| b.is_crash_rebuild)
    }

    /// The last build failed.
    pub fn build_failed(&self) -> bool {
        self.last_build().is_some_and(Build::failed)
    }

    /// Warnings of the last build.
    pub fn warnings(&self) -> &[String] {
        self.last_build().map(|b| b.warnings.as_slice()).unwrap_or(&[])
    }
}

/// A full dashboard update: every resource, in display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct View {
    #[serde(rename = "Resources", default, deserialize_with = "null_as_default")]
    pub resources: Vec<ResourceSnapshot>,
}
