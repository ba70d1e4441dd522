//! Core types for the roadmaps panel
//!
//! Defines:
//! - Entity references and the selector options derived from them
//! - Roadmap and scenario records
//! - The panel's view state and mode

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Roadmap identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoadmapId(pub i64);

impl std::fmt::Display for RoadmapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scenario identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(pub i64);

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of entity a panel can be scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Actor,
    AppGroup,
    Application,
    ChangeInitiative,
    DataType,
    FlowDiagram,
    Measurable,
    MeasurableCategory,
    OrgUnit,
    Person,
    Roadmap,
    Scenario,
}

impl EntityKind {
    /// Whether selections on this kind walk down a hierarchy
    #[inline]
    #[must_use]
    pub fn is_hierarchical(&self) -> bool {
        matches!(
            self,
            Self::AppGroup
                | Self::ChangeInitiative
                | Self::DataType
                | Self::Measurable
                | Self::MeasurableCategory
                | Self::OrgUnit
                | Self::Person
        )
    }
}

/// Reference to the entity the panel is scoped to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentEntityRef {
    /// Entity kind
    pub kind: EntityKind,
    /// Entity identifier
    pub id: i64,
    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ParentEntityRef {
    /// Create a reference without a display name
    #[inline]
    #[must_use]
    pub fn new(kind: EntityKind, id: i64) -> Self {
        Self {
            kind,
            id,
            name: None,
        }
    }

    /// With display name
    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl std::fmt::Display for ParentEntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}/{}", self.kind, self.id)
    }
}

/// How far a selector reaches from its entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HierarchyQueryScope {
    Exact,
    Parents,
    Children,
}

/// Lifecycle status filter values
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityLifecycleStatus {
    Active,
    Pending,
    Removed,
}

/// Query filter derived from a [`ParentEntityRef`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectorOptions {
    /// Entity the selection is anchored on
    pub entity_reference: ParentEntityRef,
    /// Hierarchy scope
    pub scope: HierarchyQueryScope,
    /// Accepted lifecycle statuses
    pub entity_lifecycle_statuses: BTreeSet<EntityLifecycleStatus>,
}

/// Options for view-data queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Bypass any cached result
    pub force: bool,
}

impl LoadOptions {
    /// Options requesting an uncached fetch
    #[inline]
    #[must_use]
    pub fn forced() -> Self {
        Self { force: true }
    }
}

/// Top-level planning container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roadmap {
    pub id: RoadmapId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub row_kind: EntityKind,
    pub column_kind: EntityKind,
    pub rating_scheme_id: i64,
    pub last_updated_at: DateTime<Utc>,
    pub last_updated_by: String,
    pub lifecycle_status: EntityLifecycleStatus,
}

/// Release status of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReleaseStatus {
    Draft,
    Active,
    Deprecated,
    Obsolete,
}

/// Named plan variant belonging to a roadmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: ScenarioId,
    pub roadmap_id: RoadmapId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
    pub release_status: ReleaseStatus,
    #[serde(default)]
    pub position: i32,
    pub last_updated_at: DateTime<Utc>,
    pub last_updated_by: String,
}

/// Panel display mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    /// Waiting on a load
    #[default]
    Loading,
    /// Listing roadmaps and scenarios
    List,
    /// Adding a scenario to a roadmap
    AddScenario,
    /// Inspecting the selected scenario
    ViewScenario,
}

/// Everything the renderer needs to draw the panel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub mode: Mode,
    pub roadmaps: Vec<Roadmap>,
    pub scenarios: Vec<Scenario>,
    pub selected_scenario: Option<Scenario>,
}

impl ViewState {
    /// Initial state: loading, nothing loaded, nothing selected
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scenarios belonging to one roadmap, in position order
    #[must_use]
    pub fn scenarios_for(&self, roadmap_id: RoadmapId) -> Vec<&Scenario> {
        let mut found: Vec<&Scenario> = self
            .scenarios
            .iter()
            .filter(|s| s.roadmap_id == roadmap_id)
            .collect();
        found.sort_by_key(|s| s.position);
        found
    }
}

/// Result of a completed load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Roadmaps assigned
    pub roadmap_count: usize,
    /// Scenarios assigned
    pub scenario_count: usize,
}

/// Result of a clone request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneOutcome {
    /// Clone created and panel reloaded
    Cloned {
        /// Name given to the copy
        name: String,
        /// Reload that followed the clone
        reload: LoadSummary,
    },
    /// User declined the name prompt
    Aborted,
}
