//! Council configuration with TOML file support.

use std::path::Path;

use agora_consensus::ConsensusConfig;
use serde::{Deserialize, Serialize};

use crate::logging::LogFormat;
use crate::CouncilError;

/// Configuration for a council deployment.
///
/// Can be loaded from a TOML file via [`CouncilConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouncilConfig {
    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// History retention and inactivity sweep settings.
    #[serde(default)]
    pub consensus: ConsensusConfig,
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl CouncilConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, CouncilError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CouncilError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, CouncilError> {
        toml::from_str(s).map_err(|e| CouncilError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, CouncilError> {
        toml::to_string_pretty(self).map_err(|e| CouncilError::Config(e.to_string()))
    }

    pub fn log_format(&self) -> Result<LogFormat, CouncilError> {
        self.log_format.parse()
    }
}

impl Default for CouncilConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            log_level: default_log_level(),
            consensus: ConsensusConfig::default(),
        }
    }
}
