//! Collaborator interfaces consumed by the panel
//!
//! The panel never resolves its collaborators itself; hosts hand them in
//! through [`PanelServices`].

use crate::error::ServiceError;
use crate::types::{LoadOptions, ParentEntityRef, Roadmap, Scenario, ScenarioId, SelectorOptions};
use async_trait::async_trait;
use std::sync::Arc;

/// Roadmap queries
#[async_trait]
pub trait RoadmapStore: Send + Sync {
    /// Roadmaps matching a selector
    async fn find_roadmaps_by_selector(
        &self,
        selector: &SelectorOptions,
    ) -> Result<Vec<Roadmap>, ServiceError>;
}

/// Scenario queries and mutations
#[async_trait]
pub trait ScenarioStore: Send + Sync {
    /// Scenarios of every roadmap matching a selector
    async fn find_by_roadmap_selector(
        &self,
        selector: &SelectorOptions,
        options: LoadOptions,
    ) -> Result<Vec<Scenario>, ServiceError>;

    /// Copy a scenario under a new name
    async fn clone_by_id(&self, id: ScenarioId, new_name: &str)
        -> Result<Scenario, ServiceError>;
}

/// Derives query selectors from the panel's parent entity
pub trait SelectorBuilder: Send + Sync {
    /// Build selector options for `parent`
    fn build(&self, parent: &ParentEntityRef) -> SelectorOptions;
}

/// Synchronous text input from the user
#[cfg_attr(test, mockall::automock)]
pub trait Dialog: Send + Sync {
    /// Ask for a line of text; `None` when the user cancels
    fn prompt_for_text(&self, message: &str, default_value: &str) -> Option<String>;
}

/// Fire-and-forget user notifications
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn warning(&self, message: &str);
}

/// Everything the panel talks to
#[derive(Clone)]
pub struct PanelServices {
    pub roadmaps: Arc<dyn RoadmapStore>,
    pub scenarios: Arc<dyn ScenarioStore>,
    pub selector: Arc<dyn SelectorBuilder>,
    pub dialog: Arc<dyn Dialog>,
    pub notifier: Arc<dyn Notifier>,
}

impl PanelServices {
    /// Bundle collaborators, using the default selector derivation
    #[must_use]
    pub fn new(
        roadmaps: Arc<dyn RoadmapStore>,
        scenarios: Arc<dyn ScenarioStore>,
        dialog: Arc<dyn Dialog>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            roadmaps,
            scenarios,
            selector: Arc::new(crate::selector::DefaultSelectorBuilder::default()),
            dialog,
            notifier,
        }
    }

    /// With a custom selector builder
    #[inline]
    #[must_use]
    pub fn with_selector(mut self, selector: Arc<dyn SelectorBuilder>) -> Self {
        self.selector = selector;
        self
    }
}

impl std::fmt::Debug for PanelServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelServices").finish_non_exhaustive()
    }
}
