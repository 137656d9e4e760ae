//! # hud-alerts
//!
//! Turns resource snapshots into alert records for the HUD.
//!
//! ```
//! use hud_alerts::{AlertKind, compute_alerts, compute_display_alerts};
//! use hud_core::{Build, ResourceSnapshot};
//!
//! let resource = ResourceSnapshot::new("api").with_build(Build {
//!     error: Some("exit status 2".to_string()),
//!     ..Build::default()
//! });
//!
//! // A failed build is not a pod problem...
//! assert!(compute_alerts(&resource).is_empty());
//! // ...but it is shown in the alert pane.
//! let shown = compute_display_alerts(&[resource]);
//! assert_eq!(shown[0].kind, AlertKind::BuildFailed);
//! ```

pub mod alert;

pub use alert::{
    Alert, AlertClassifier, AlertKind, AlertResource, compute_alerts, compute_display_alerts,
};
