//! Roadmap Panel - view-state controller for roadmaps and scenarios
//!
//! The panel that:
//! - Loads roadmaps and scenarios scoped to a parent entity
//! - Tracks which mode the panel is in and which scenario is selected
//! - Reacts to user intents (add, select, clone, cancel)
//! - Runs the clone workflow: prompt, clone, reload, notify
//!
//! # Example
//!
//! ```rust,ignore
//! use roadmap_panel::{EntityKind, PanelConfig, PanelServices, ParentEntityRef, RoadmapsPanel};
//!
//! # async fn example(services: PanelServices) -> Result<(), Box<dyn std::error::Error>> {
//! let parent = ParentEntityRef::new(EntityKind::OrgUnit, 42);
//! let panel = RoadmapsPanel::new(parent, services, PanelConfig::default());
//!
//! panel.init().await?;
//! println!("{} roadmaps", panel.state().roadmaps.len());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cache;
pub mod config;
pub mod error;
pub mod panel;
pub mod selector;
pub mod services;
pub mod types;

// Re-exports for convenience
pub use cache::{CacheStats, CachingRoadmapStore, CachingScenarioStore};
pub use config::{CacheConfig, Messages, PanelConfig};
pub use error::{ConfigError, PanelError, Query, ServiceError};
pub use panel::RoadmapsPanel;
pub use selector::DefaultSelectorBuilder;
pub use services::{Dialog, Notifier, PanelServices, RoadmapStore, ScenarioStore, SelectorBuilder};
pub use types::{
    CloneOutcome, EntityKind, EntityLifecycleStatus, HierarchyQueryScope, LoadOptions, LoadSummary,
    Mode, ParentEntityRef, ReleaseStatus, Roadmap, RoadmapId, Scenario, ScenarioId,
    SelectorOptions, ViewState,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for hosting a roadmaps panel
    pub use crate::{
        CloneOutcome, Dialog, EntityKind, Mode, Notifier, PanelConfig, PanelError, PanelServices,
        ParentEntityRef, RoadmapStore, RoadmapsPanel, ScenarioStore, ViewState,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
