//! HUD configuration loaded from `~/.hud/config.yaml`.
//!
//! Every field is optional; a missing file or a missing section falls back
//! to the defaults below.
//!
//! ```yaml
//! filter:
//!   debounce_ms: 500
//! pods:
//!   error_statuses: [Error, CrashLoopBackOff, ImagePullBackOff]
//!   crash_statuses: [Error, CrashLoopBackOff]
//! logging:
//!   verbose: false
//!   dir: /var/log/hud
//! ```

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use serde::Deserialize;
use tracing::debug;

use crate::error::{HudError, Result};

/// Default quiet period before a typed filter term is committed.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Upper bound accepted for `filter.debounce_ms`.
pub const MAX_DEBOUNCE_MS: u64 = 10_000;

/// Pod statuses that mark a pod as unhealthy.
pub const DEFAULT_ERROR_STATUSES: &[&str] = &[
    "Error",
    "CrashLoopBackOff",
    "ImagePullBackOff",
    "ErrImagePull",
    "RunContainerError",
    "StartError",
    "OOMKilled",
];

/// Pod statuses whose alert shows the crash log instead of the status message.
pub const DEFAULT_CRASH_STATUSES: &[&str] = &["Error", "CrashLoopBackOff"];

static BUILTIN_POD_RULES: LazyLock<PodStatusRules> = LazyLock::new(PodStatusRules::default);

/// Config file path (typically ~/.hud/config.yaml).
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".hud").join("config.yaml"))
}

/// Top-level HUD configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct HudConfig {
    /// Filter term behaviour
    #[serde(default)]
    pub filter: FilterConfig,

    /// Pod status classification
    #[serde(default)]
    pub pods: PodStatusRules,

    /// Logging preferences
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HudConfig {
    /// Load configuration from the default path, falling back to defaults
    /// when the file does not exist.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HudError::config_not_found(path));
        }
        let content = std::fs::read_to_string(path).map_err(|e| HudError::ConfigNotFound {
            path: path.to_path_buf(),
            source: Some(e),
        })?;
        let config = Self::parse(&content).map_err(|e| match e {
            HudError::YamlParse { message, .. } => HudError::ConfigInvalid {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        // An empty file deserializes to unit, not a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content).map_err(|e| HudError::YamlParse {
            context: "config".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.filter.debounce_ms == 0 || self.filter.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(HudError::ConfigValidation {
                message: format!(
                    "filter.debounce_ms must be between 1 and {}, got {}",
                    MAX_DEBOUNCE_MS, self.filter.debounce_ms
                ),
            });
        }

        if let Some(status) = self
            .pods
            .crash_statuses
            .iter()
            .find(|s| !self.pods.error_statuses.contains(s))
        {
            return Err(HudError::ConfigValidation {
                message: format!("crash status '{status}' must also be listed in pods.error_statuses"),
            });
        }

        Ok(())
    }
}

/// Filter term configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FilterConfig {
    /// Quiet period (milliseconds) before a typed term is committed.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

/// The designated pod status sets used by the alert predicates.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PodStatusRules {
    /// Statuses that count as a pod error.
    #[serde(default = "default_error_statuses")]
    pub error_statuses: Vec<String>,

    /// Statuses that count as a crash (subset of `error_statuses`).
    #[serde(default = "default_crash_statuses")]
    pub crash_statuses: Vec<String>,
}

impl Default for PodStatusRules {
    fn default() -> Self {
        Self {
            error_statuses: default_error_statuses(),
            crash_statuses: default_crash_statuses(),
        }
    }
}

impl PodStatusRules {
    /// Shared instance of the built-in rules.
    pub fn builtin() -> &'static PodStatusRules {
        &BUILTIN_POD_RULES
    }

    /// Returns true if `status` is one of the error statuses.
    pub fn is_error(&self, status: &str) -> bool {
        self.error_statuses.iter().any(|s| s == status)
    }

    /// Returns true if `status` is one of the crash statuses.
    pub fn is_crash(&self, status: &str) -> bool {
        self.crash_statuses.iter().any(|s| s == status)
    }
}

fn default_error_statuses() -> Vec<String> {
    DEFAULT_ERROR_STATUSES.iter().map(|s| s.to_string()).collect()
}

fn default_crash_statuses() -> Vec<String> {
    DEFAULT_CRASH_STATUSES.iter().map(|s| s.to_string()).collect()
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log at debug level.
    #[serde(default)]
    pub verbose: bool,

    /// Log directory (defaults to ~/.hud/logs).
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = HudConfig::default();
        assert_eq!(config.filter.debounce_ms, 500);
        assert!(config.pods.is_error("CrashLoopBackOff"));
        assert!(config.pods.is_crash("Error"));
        assert!(!config.pods.is_crash("ImagePullBackOff"));
        assert!(!config.logging.verbose);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let yaml = r#"
filter:
  debounce_ms: 250
"#;
        let config = HudConfig::parse(yaml).expect("Failed to parse config");
        assert_eq!(config.filter.debounce_ms, 250);
        assert_eq!(config.pods, PodStatusRules::default());
    }

    #[test]
    fn test_parse_custom_pod_rules() {
        let yaml = r#"
pods:
  error_statuses: [Error, Evicted]
  crash_statuses: [Error]
logging:
  verbose: true
  dir: /var/log/hud
"#;
        let config = HudConfig::parse(yaml).expect("Failed to parse config");
        assert!(config.pods.is_error("Evicted"));
        assert!(!config.pods.is_error("CrashLoopBackOff"));
        assert!(config.logging.verbose);
        assert_eq!(config.logging.dir, Some(PathBuf::from("/var/log/hud")));
    }

    #[test]
    fn test_parse_empty_config() {
        assert_eq!(HudConfig::parse("").unwrap(), HudConfig::default());
        assert_eq!(HudConfig::parse("   \n").unwrap(), HudConfig::default());
    }

    #[test]
    fn test_validate_zero_debounce() {
        let err = HudConfig::parse("filter:\n  debounce_ms: 0\n").unwrap_err();
        assert!(matches!(err, HudError::ConfigValidation { .. }));
        assert!(err.to_string().contains("debounce_ms"));
    }

    #[test]
    fn test_validate_crash_not_in_errors() {
        let yaml = r#"
pods:
  error_statuses: [Error]
  crash_statuses: [Error, CrashLoopBackOff]
"#;
        let err = HudConfig::parse(yaml).unwrap_err();
        assert!(err.to_string().contains("CrashLoopBackOff"));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = HudConfig::parse("filter: [not, a, map").unwrap_err();
        assert!(matches!(err, HudError::YamlParse { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "filter:\n  debounce_ms: 750").unwrap();

        let config = HudConfig::load_from(&path).unwrap();
        assert_eq!(config.filter.debounce_ms, 750);
    }

    #[test]
    fn test_load_from_invalid_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "filter: [").unwrap();

        let err = HudConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, HudError::ConfigInvalid { .. }));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = HudConfig::load_from(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, HudError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_builtin_rules_match_defaults() {
        assert_eq!(PodStatusRules::builtin(), &PodStatusRules::default());
    }
}
