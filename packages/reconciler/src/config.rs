use crate::error::ConfigResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "arbor.config.json";

/// Reconciler configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcilerConfig {
    /// The work loop yields once the deadline reports less time remaining
    /// than this
    #[serde(default = "default_yield_threshold")]
    pub yield_threshold: f64,

    /// What an update does with attributes the new props no longer carry
    #[serde(default)]
    pub stale_attributes: StaleAttributes,
}

fn default_yield_threshold() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaleAttributes {
    /// Remove the attribute from the host node
    #[default]
    Clear,
    /// Leave the stale value on the host node
    Retain,
}

impl ReconcilerConfig {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load config from a directory, falling back to defaults when the
    /// directory has no config file
    pub fn load(dir: &Path) -> ConfigResult<Self> {
        let config_path = dir.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            yield_threshold: default_yield_threshold(),
            stale_attributes: StaleAttributes::default(),
        }
    }
}
