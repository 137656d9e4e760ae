//! # hud-core
//!
//! Core types, errors, and utilities for the HUD resource dashboard.
//!
//! This crate provides:
//! - [`HudError`] - Error types for snapshot, config, and logging I/O
//! - [`logging`] - Tracing setup and log file locations
//! - [`config`] - `~/.hud/config.yaml` loading and validation
//! - [`types`] - Resource snapshots, builds, pod state, and filter enums
//! - [`snapshot`] - Decoding views delivered by the monitored system
//!
//! ## Example
//!
//! ```
//! use hud_core::View;
//!
//! let view = View::from_json(r#"[{"Name": "vigoda", "ResourceInfo": {"PodRestarts": 2}}]"#)?;
//! assert!(view.resources[0].pod_restarted());
//! # Ok::<(), hud_core::HudError>(())
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod snapshot;
pub mod types;

// Re-export main types for convenience
pub use config::{HudConfig, PodStatusRules};
pub use error::{HudError, Result};
pub use logging::{LogGuard, init_logging};
pub use types::{Build, FilterLevel, FilterSource, PodInfo, ResourceSnapshot, View};
