//! Import configuration

use serde::{Deserialize, Serialize};

/// Default language for labels
pub const DEFAULT_LABEL_LANGUAGE: &str = "en";

/// Import settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Preferred language tag for component and element labels
    pub label_language: String,
}

impl ImportConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With preferred label language
    #[inline]
    #[must_use]
    pub fn with_label_language(mut self, language: impl Into<String>) -> Self {
        self.label_language = language.into();
        self
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            label_language: DEFAULT_LABEL_LANGUAGE.to_string(),
        }
    }
}
