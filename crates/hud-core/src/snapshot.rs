//! Decoding resource snapshots delivered by the monitored system.
//!
//! A snapshot is either a full view (`{"Resources": [...]}`) or a bare JSON
//! array of resources. Snapshots are replaced wholesale on every update, so
//! decoding always produces a fresh [`View`].

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info_span};

use crate::error::{HudError, Result};
use crate::types::{ResourceSnapshot, View};

#[derive(Deserialize)]
#[serde(untagged)]
enum ViewShape {
    View(View),
    Resources(Vec<ResourceSnapshot>),
}

impl View {
    /// Decode a view from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let _span = info_span!("decode_snapshot", bytes = json.len()).entered();
        let shape: ViewShape =
            serde_json::from_str(json).map_err(|e| HudError::json_parse("snapshot", e))?;
        let view = match shape {
            ViewShape::View(view) => view,
            ViewShape::Resources(resources) => View { resources },
        };
        view.check_unique_names()?;
        debug!(resources = view.resources.len(), "decoded snapshot");
        Ok(view)
    }

    /// Read and decode a view from a file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HudError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| HudError::io("reading snapshot", path, e))?;
        Self::from_json(&content)
    }

    /// Look up a resource by name.
    pub fn resource(&self, name: &str) -> Option<&ResourceSnapshot> {
        self.resources.iter().find(|r| r.name == name)
    }

    fn check_unique_names(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for resource in &self.resources {
            if !seen.insert(resource.name.as_str()) {
                return Err(HudError::snapshot_invalid(format!(
                    "duplicate resource name: {}",
                    resource.name
                )));
            }
        }
        Ok(())
    }
}
