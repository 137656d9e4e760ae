//! Error types for HUD operations.
//!
//! This module defines [`HudError`], the error enum used at the I/O edges of
//! HUD: reading resource snapshots, loading configuration, and setting up logs.
//! Alert classification and filter parsing are total and never produce errors.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`HudError`].
pub type Result<T> = std::result::Result<T, HudError>;

/// Error type for all HUD operations.
#[derive(Debug, Error)]
pub enum HudError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration file not found
    #[error("Configuration not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration file is invalid YAML
    #[error("Invalid configuration at {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    /// Configuration validation failed
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String },

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// Generic I/O error with context
    #[error("I/O error {operation}: {path}")]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Directory creation failed
    #[error("Failed to create directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Parsing Errors
    // =========================================================================
    /// JSON parsing error
    #[error("JSON parse error in {context}: {message}")]
    JsonParse {
        context: String,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// YAML parsing error
    #[error("YAML parse error in {context}: {message}")]
    YamlParse { context: String, message: String },

    /// Snapshot decoded but violates the resource model
    #[error("Invalid resource snapshot: {message}")]
    SnapshotInvalid { message: String },

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error (bug in HUD)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl HudError {
    /// Create a ConfigNotFound error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound {
            path: path.into(),
            source: None,
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a JSON parse error
    pub fn json_parse(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::JsonParse {
            context: context.into(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create an invalid snapshot error
    pub fn snapshot_invalid(message: impl Into<String>) -> Self {
        Self::SnapshotInvalid {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. } | Self::ConfigInvalid { .. } | Self::ConfigValidation { .. }
        )
    }

    /// Returns true if the caller can retry with the next snapshot
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::JsonParse { .. } | Self::SnapshotInvalid { .. } | Self::FileNotFound { .. }
        )
    }

    /// Returns actionable guidance for the user
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            Self::ConfigInvalid { .. } => Some("Check YAML syntax in ~/.hud/config.yaml"),
            Self::ConfigValidation { .. } => {
                Some("Fix the reported field in ~/.hud/config.yaml or delete it to use defaults")
            }
            Self::JsonParse { .. } => Some("The snapshot must be a JSON view or an array of resources"),
            Self::SnapshotInvalid { .. } => Some("Resource names must be unique within a snapshot"),
            Self::DirectoryCreation { .. } => Some("Pass --log-dir to pick a writable log directory"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_error() {
        let err = HudError::config_not_found("/home/user/.hud/config.yaml");
        assert!(err.to_string().contains("Configuration not found"));
        assert!(err.is_config_error());
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_json_parse_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = HudError::json_parse("snapshot", source);
        assert!(err.to_string().starts_with("JSON parse error in snapshot"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_error_guidance() {
        let err = HudError::snapshot_invalid("duplicate resource name: vigoda");
        assert_eq!(
            err.guidance(),
            Some("Resource names must be unique within a snapshot")
        );
        assert!(HudError::internal("bug").guidance().is_none());
    }
}
