//! In-memory stores backed by a JSON fixture

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use roadmap_panel::{
    LoadOptions, ParentEntityRef, ReleaseStatus, Roadmap, RoadmapId, RoadmapStore, Scenario,
    ScenarioId, ScenarioStore, SelectorOptions, ServiceError,
};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

/// Roadmap attached to an entity
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Link {
    pub(crate) entity: ParentEntityRef,
    pub(crate) roadmap_id: RoadmapId,
}

/// Fixture file contents
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Fixture {
    #[serde(default)]
    pub(crate) roadmaps: Vec<Roadmap>,
    #[serde(default)]
    pub(crate) scenarios: Vec<Scenario>,
    #[serde(default)]
    pub(crate) links: Vec<Link>,
}

impl Fixture {
    pub(crate) fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading fixture {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing fixture {}", path.display()))
    }
}

/// Store answering queries from fixture data; clones share the data
#[derive(Debug, Clone, Default)]
pub(crate) struct FixtureStore {
    data: Arc<RwLock<Fixture>>,
}

impl FixtureStore {
    pub(crate) fn new(fixture: Fixture) -> Self {
        Self {
            data: Arc::new(RwLock::new(fixture)),
        }
    }

    fn roadmap_ids(&self, selector: &SelectorOptions) -> BTreeSet<RoadmapId> {
        let target = &selector.entity_reference;
        self.data
            .read()
            .links
            .iter()
            .filter(|l| l.entity.kind == target.kind && l.entity.id == target.id)
            .map(|l| l.roadmap_id)
            .collect()
    }
}

#[async_trait]
impl RoadmapStore for FixtureStore {
    async fn find_roadmaps_by_selector(
        &self,
        selector: &SelectorOptions,
    ) -> Result<Vec<Roadmap>, ServiceError> {
        let ids = self.roadmap_ids(selector);
        Ok(self
            .data
            .read()
            .roadmaps
            .iter()
            .filter(|r| ids.contains(&r.id))
            .filter(|r| selector.entity_lifecycle_statuses.contains(&r.lifecycle_status))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ScenarioStore for FixtureStore {
    async fn find_by_roadmap_selector(
        &self,
        selector: &SelectorOptions,
        _options: LoadOptions,
    ) -> Result<Vec<Scenario>, ServiceError> {
        let ids = self.roadmap_ids(selector);
        Ok(self
            .data
            .read()
            .scenarios
            .iter()
            .filter(|s| ids.contains(&s.roadmap_id))
            .cloned()
            .collect())
    }

    async fn clone_by_id(
        &self,
        id: ScenarioId,
        new_name: &str,
    ) -> Result<Scenario, ServiceError> {
        let mut data = self.data.write();
        let source = data
            .scenarios
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(ServiceError::NotFound {
                entity: "scenario",
                id: id.0,
            })?;

        let next = data.scenarios.iter().map(|s| s.id.0).max().unwrap_or(0) + 1;
        let copy = Scenario {
            id: ScenarioId(next),
            name: new_name.to_string(),
            release_status: ReleaseStatus::Draft,
            last_updated_at: Utc::now(),
            last_updated_by: "roadmap-panel".to_string(),
            ..source
        };
        data.scenarios.push(copy.clone());
        Ok(copy)
    }
}
