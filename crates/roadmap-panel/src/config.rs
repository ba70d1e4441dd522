//! Panel configuration
//!
//! User-facing messages and view-data cache sizing. Every field has a
//! default, so an empty TOML document is a valid configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Panel configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Messages shown to the user
    pub messages: Messages,
    /// View-data cache sizing
    pub cache: CacheConfig,
}

impl PanelConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With messages
    #[inline]
    #[must_use]
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// With cache configuration
    #[inline]
    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Parse configuration from TOML
    ///
    /// # Errors
    /// - `ConfigError::Parse` on malformed TOML
    /// - `ConfigError::Invalid` if a value is out of range
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be read
    /// - any error from [`PanelConfig::from_toml_str`]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.max_capacity == 0 {
            return Err(ConfigError::Invalid(
                "cache.max_capacity must be positive".to_string(),
            ));
        }
        if self.messages.clone_prompt.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "messages.clone_prompt must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Messages shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Prompt asking for the clone's name
    pub clone_prompt: String,
    /// Prefix of the suggested clone name
    pub clone_default_prefix: String,
    /// Success notification after clone and reload
    pub clone_success: String,
    /// Warning when the user declines to name the clone
    pub clone_aborted: String,
}

impl Messages {
    /// Suggested name for a clone of `name`
    #[inline]
    #[must_use]
    pub fn default_clone_name(&self, name: &str) -> String {
        format!("{}{}", self.clone_default_prefix, name)
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            clone_prompt: "Please enter a new name for the scenario".to_string(),
            clone_default_prefix: "Clone of ".to_string(),
            clone_success: "Scenario cloned".to_string(),
            clone_aborted: "Aborting clone".to_string(),
        }
    }
}

/// View-data cache sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum cached selector results per store
    pub max_capacity: u64,
    /// Entry time-to-live in seconds
    pub ttl_secs: u64,
}

impl CacheConfig {
    /// Entry time-to-live
    #[inline]
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 64,
            ttl_secs: 300,
        }
    }
}
