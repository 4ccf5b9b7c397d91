//! Planning options for building flow specifications

use crate::error::{DistributedError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration used when building specs for a flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistSqlConfig {
    /// The whole flow runs on the gateway node, so expressions may keep
    /// their in-process form instead of being rendered to text
    pub local_flows: bool,
    /// Version string stamped into built expressions
    pub expr_version: String,
}

impl Default for DistSqlConfig {
    fn default() -> Self {
        Self {
            local_flows: false,
            expr_version: "1".to_string(),
        }
    }
}

impl DistSqlConfig {
    /// Configuration for a flow that never leaves the gateway
    pub fn local() -> Self {
        Self {
            local_flows: true,
            ..Default::default()
        }
    }

    /// Set whether flows run on the gateway only
    pub fn with_local_flows(mut self, local_flows: bool) -> Self {
        self.local_flows = local_flows;
        self
    }

    /// Set the version stamped into expressions
    pub fn with_expr_version(mut self, version: impl Into<String>) -> Self {
        self.expr_version = version.into();
        self
    }

    /// Parse a configuration, filling missing fields with defaults
    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).map_err(|e| DistributedError::ConfigError(e.to_string()))
    }

    /// Load a configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Write the configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
