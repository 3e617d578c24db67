//! Command line configuration

use anyhow::Context as _;
use cubeviz_import::ImportConfig;
use cubeviz_recommend::RuleConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Log filter used when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Settings read from a TOML file; every field is optional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubevizConfig {
    /// `tracing` filter directives, e.g. `cubeviz_import=debug`
    pub log_filter: String,
    /// Import settings
    pub import: ImportConfig,
    /// Recommendation thresholds
    pub recommend: RuleConfig,
}

impl CubevizConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid configuration.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))
    }

    /// With log filter
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }
}

impl Default for CubevizConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            import: ImportConfig::default(),
            recommend: RuleConfig::default(),
        }
    }
}
