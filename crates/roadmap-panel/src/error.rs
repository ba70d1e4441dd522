//! Error types for the roadmaps panel
//!
//! Covers:
//! - Collaborator (store) failures
//! - Load and clone failures surfaced by the panel
//! - Configuration loading

use crate::types::ScenarioId;

/// Main panel error type
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// One of the two view-data queries failed
    #[error("load failed ({query}): {source}")]
    LoadFailed {
        /// Which query failed
        query: Query,
        /// The store error
        #[source]
        source: ServiceError,
    },

    /// The clone mutation was rejected
    #[error("clone of scenario {scenario_id} failed: {source}")]
    CloneFailed {
        /// Scenario being cloned
        scenario_id: ScenarioId,
        /// The store error
        #[source]
        source: ServiceError,
    },

    /// `init` called on an already initialised panel
    #[error("panel already initialised")]
    AlreadyInitialised,
}

impl PanelError {
    /// Check if a user-initiated retry could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::LoadFailed { source, .. } | Self::CloneFailed { source, .. } => {
                source.is_retryable()
            }
            Self::AlreadyInitialised => false,
        }
    }
}

/// View-data queries issued by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    /// Roadmaps by selector
    Roadmaps,
    /// Scenarios by roadmap selector
    Scenarios,
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Roadmaps => f.write_str("roadmaps"),
            Self::Scenarios => f.write_str("scenarios"),
        }
    }
}

/// Errors reported by store collaborators
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Transport could not reach the service
    #[error("transport error: {0}")]
    Transport(String),

    /// Entity not found
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Service refused the request
    #[error("rejected: {0}")]
    Rejected(String),

    /// Request timed out
    #[error("timed out after {duration_secs}s")]
    Timeout { duration_secs: u64 },
}

impl ServiceError {
    /// Check if the failure is transient
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout { .. })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Could not read the config file
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::PanelConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but is unusable
    #[error("invalid config value: {0}")]
    Invalid(String),
}
