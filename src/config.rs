//! Checker configuration
//!
//! Read from YAML or JSON, e.g.
//!
//! ```yaml
//! parallel: true
//! max_diagnostics: 100
//! rules:
//!   disabled: [SHAPE002]
//!   severity:
//!     SHAPE001: error
//! ```

use crate::diagnostic::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error loading a checker configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("malformed JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// Extension other than yaml, yml or json
    #[error("unsupported config format '{0}' (expected yaml, yml or json)")]
    UnsupportedFormat(String),
}

/// Rule configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Disabled rules
    pub disabled: Vec<String>,

    /// Severity overrides (rule_id -> severity)
    pub severity: HashMap<String, Severity>,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Check elements in parallel
    pub parallel: bool,

    /// Number of parallel jobs (0 = rayon default)
    pub jobs: usize,

    /// Stop reporting after this many diagnostics (0 = unlimited)
    pub max_diagnostics: usize,

    pub rules: RulesConfig,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            jobs: 0,
            max_diagnostics: 0,
            rules: RulesConfig::default(),
        }
    }
}

impl CheckerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load configuration from a `.yaml`, `.yml` or `.json` file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let parse: fn(&str) -> Result<Self, ConfigError> = match ext {
            "yaml" | "yml" => Self::from_yaml_str,
            "json" => Self::from_json_str,
            _ => return Err(ConfigError::UnsupportedFormat(ext.to_string())),
        };

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = parse(&content)?;
        log::debug!("loaded checker config from {}", path.display());
        Ok(config)
    }

    /// Check if a rule is enabled
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        !self.rules.disabled.iter().any(|id| id == rule_id)
    }

    /// Get severity override for a rule
    pub fn severity_override(&self, rule_id: &str) -> Option<Severity> {
        self.rules.severity.get(rule_id).copied()
    }

    /// Rule ids mentioned anywhere in this configuration
    pub fn mentioned_rules(&self) -> impl Iterator<Item = &str> {
        self.rules
            .disabled
            .iter()
            .chain(self.rules.severity.keys())
            .map(String::as_str)
    }
}
