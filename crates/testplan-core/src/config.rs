//! Engine configuration
//!
//! Loaded from TOML; every key is optional:
//!
//! ```toml
//! ordering = "lifecycle"   # or "registry"
//! log_filter = "testplan_core=debug"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// How the planner assembles contributor steps into a plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOrdering {
    /// Suite setup, then every test wrapped in all test setup and teardown
    /// steps, then suite teardown
    #[default]
    Lifecycle,
    /// Contributor outputs concatenated in registry order
    Registry,
}

impl fmt::Display for StepOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lifecycle => f.write_str("lifecycle"),
            Self::Registry => f.write_str("registry"),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Plan assembly mode
    pub ordering: StepOrdering,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With step ordering
    #[inline]
    #[must_use]
    pub fn with_ordering(mut self, ordering: StepOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// With log filter
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Parse from a TOML document
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on malformed TOML or unknown values.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file cannot be read, [`ConfigError::Parse`]
    /// if it is not a valid config.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ordering: StepOrdering::Lifecycle,
            log_filter: "warn".to_string(),
        }
    }
}
