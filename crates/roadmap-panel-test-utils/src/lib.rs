//! Testing utilities for the roadmap panel workspace
//!
//! Shared fakes, fixtures, and a harness wiring them into a panel. Every
//! fake writes to one [`CallLog`] so tests can assert cross-collaborator
//! ordering.

#![allow(missing_docs)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use roadmap_panel::{
    Dialog, EntityKind, EntityLifecycleStatus, LoadOptions, Notifier, PanelConfig, PanelServices,
    ParentEntityRef, ReleaseStatus, Roadmap, RoadmapId, RoadmapStore, RoadmapsPanel, Scenario,
    ScenarioId, ScenarioStore, SelectorOptions, ServiceError,
};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// One observed collaborator call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FindRoadmaps(SelectorOptions),
    FindScenarios { selector: SelectorOptions, force: bool },
    Clone { id: ScenarioId, name: String },
    Prompt { message: String, default_value: String },
    Success(String),
    Warning(String),
}

/// Ordered log shared by all fakes
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.lock().push(call);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }

    #[must_use]
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.lock().iter().filter(|c| pred(c)).count()
    }

    /// Yield until at least `n` calls have been recorded
    ///
    /// # Panics
    /// If that takes longer than a second.
    pub async fn wait_for(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(1), async {
            while self.len() < n {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("expected {n} calls, saw {:?}", self.calls()));
    }
}

/// Holds one query until released
#[derive(Debug, Clone)]
pub struct Gate(Arc<Semaphore>);

impl Gate {
    fn new() -> Self {
        Self(Arc::new(Semaphore::new(0)))
    }

    /// Let the held query complete
    pub fn release(&self) {
        self.0.add_permits(1);
    }

    async fn pass(&self) {
        // Never closed, so acquire cannot fail
        if let Ok(permit) = self.0.acquire().await {
            permit.forget();
        }
    }
}

/// In-memory roadmap and scenario store
///
/// Queries snapshot the stored lists when they are called, then wait on a
/// gate if one was queued with `hold_next_*`.
#[derive(Debug)]
pub struct FakeStore {
    log: CallLog,
    roadmaps: Mutex<Vec<Roadmap>>,
    scenarios: Mutex<Vec<Scenario>>,
    roadmap_failure: Mutex<Option<ServiceError>>,
    scenario_failure: Mutex<Option<ServiceError>>,
    clone_failure: Mutex<Option<ServiceError>>,
    roadmap_gates: Mutex<VecDeque<Gate>>,
    scenario_gates: Mutex<VecDeque<Gate>>,
    next_id: Mutex<i64>,
}

impl FakeStore {
    #[must_use]
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            roadmaps: Mutex::new(Vec::new()),
            scenarios: Mutex::new(Vec::new()),
            roadmap_failure: Mutex::new(None),
            scenario_failure: Mutex::new(None),
            clone_failure: Mutex::new(None),
            roadmap_gates: Mutex::new(VecDeque::new()),
            scenario_gates: Mutex::new(VecDeque::new()),
            next_id: Mutex::new(1000),
        }
    }

    pub fn set_roadmaps(&self, roadmaps: Vec<Roadmap>) {
        *self.roadmaps.lock() = roadmaps;
    }

    pub fn set_scenarios(&self, scenarios: Vec<Scenario>) {
        *self.scenarios.lock() = scenarios;
    }

    #[must_use]
    pub fn scenarios(&self) -> Vec<Scenario> {
        self.scenarios.lock().clone()
    }

    pub fn fail_roadmaps(&self, error: Option<ServiceError>) {
        *self.roadmap_failure.lock() = error;
    }

    pub fn fail_scenarios(&self, error: Option<ServiceError>) {
        *self.scenario_failure.lock() = error;
    }

    pub fn fail_clone(&self, error: Option<ServiceError>) {
        *self.clone_failure.lock() = error;
    }

    /// Hold the next roadmap query until the returned gate is released
    #[must_use]
    pub fn hold_next_roadmaps(&self) -> Gate {
        let gate = Gate::new();
        self.roadmap_gates.lock().push_back(gate.clone());
        gate
    }

    /// Hold the next scenario query until the returned gate is released
    #[must_use]
    pub fn hold_next_scenarios(&self) -> Gate {
        let gate = Gate::new();
        self.scenario_gates.lock().push_back(gate.clone());
        gate
    }
}

#[async_trait]
impl RoadmapStore for FakeStore {
    async fn find_roadmaps_by_selector(
        &self,
        selector: &SelectorOptions,
    ) -> Result<Vec<Roadmap>, ServiceError> {
        self.log.push(Call::FindRoadmaps(selector.clone()));
        let result = match self.roadmap_failure.lock().clone() {
            Some(err) => Err(err),
            None => Ok(self.roadmaps.lock().clone()),
        };
        let gate = self.roadmap_gates.lock().pop_front();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        result
    }
}

#[async_trait]
impl ScenarioStore for FakeStore {
    async fn find_by_roadmap_selector(
        &self,
        selector: &SelectorOptions,
        options: LoadOptions,
    ) -> Result<Vec<Scenario>, ServiceError> {
        self.log.push(Call::FindScenarios {
            selector: selector.clone(),
            force: options.force,
        });
        let result = match self.scenario_failure.lock().clone() {
            Some(err) => Err(err),
            None => Ok(self.scenarios.lock().clone()),
        };
        let gate = self.scenario_gates.lock().pop_front();
        if let Some(gate) = gate {
            gate.pass().await;
        }
        result
    }

    async fn clone_by_id(
        &self,
        id: ScenarioId,
        new_name: &str,
    ) -> Result<Scenario, ServiceError> {
        self.log.push(Call::Clone {
            id,
            name: new_name.to_string(),
        });
        if let Some(err) = self.clone_failure.lock().clone() {
            return Err(err);
        }

        let mut scenarios = self.scenarios.lock();
        let source = scenarios
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(ServiceError::NotFound {
                entity: "scenario",
                id: id.0,
            })?;

        let mut next_id = self.next_id.lock();
        *next_id += 1;
        let copy = Scenario {
            id: ScenarioId(*next_id),
            name: new_name.to_string(),
            release_status: ReleaseStatus::Draft,
            ..source
        };
        scenarios.push(copy.clone());
        Ok(copy)
    }
}

/// Dialog answering from a script
#[derive(Debug)]
pub struct ScriptedDialog {
    log: CallLog,
    answers: Mutex<VecDeque<Option<String>>>,
}

impl ScriptedDialog {
    #[must_use]
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            answers: Mutex::new(VecDeque::new()),
        }
    }

    /// Queue the answer for the next prompt; `None` cancels
    pub fn answer(&self, answer: Option<&str>) {
        self.answers.lock().push_back(answer.map(str::to_string));
    }
}

impl Dialog for ScriptedDialog {
    fn prompt_for_text(&self, message: &str, default_value: &str) -> Option<String> {
        self.log.push(Call::Prompt {
            message: message.to_string(),
            default_value: default_value.to_string(),
        });
        self.answers.lock().pop_front().flatten()
    }
}

/// Notifier recording into the call log
#[derive(Debug)]
pub struct RecordingNotifier {
    log: CallLog,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.log.push(Call::Success(message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.log.push(Call::Warning(message.to_string()));
    }
}

/// Fakes plus a panel wired to them
#[derive(Debug)]
pub struct TestHarness {
    pub log: CallLog,
    pub store: Arc<FakeStore>,
    pub dialog: Arc<ScriptedDialog>,
    pub notifier: Arc<RecordingNotifier>,
    pub panel: Arc<RoadmapsPanel>,
}

impl TestHarness {
    /// Harness for entity E1 with empty stores
    #[must_use]
    pub fn new() -> Self {
        Self::with_parent(parent_e1())
    }

    #[must_use]
    pub fn with_parent(parent: ParentEntityRef) -> Self {
        let log = CallLog::default();
        let store = Arc::new(FakeStore::new(log.clone()));
        let dialog = Arc::new(ScriptedDialog::new(log.clone()));
        let notifier = Arc::new(RecordingNotifier::new(log.clone()));
        let services = PanelServices::new(
            store.clone(),
            store.clone(),
            dialog.clone(),
            notifier.clone(),
        );
        let panel = Arc::new(RoadmapsPanel::new(parent, services, PanelConfig::default()));
        Self {
            log,
            store,
            dialog,
            notifier,
            panel,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// The application entity "E1"
#[must_use]
pub fn parent_e1() -> ParentEntityRef {
    ParentEntityRef::new(EntityKind::Application, 1).with_name("E1")
}

#[must_use]
pub fn roadmap(id: i64, name: &str) -> Roadmap {
    Roadmap {
        id: RoadmapId(id),
        name: name.to_string(),
        description: None,
        row_kind: EntityKind::Application,
        column_kind: EntityKind::Measurable,
        rating_scheme_id: 1,
        last_updated_at: fixed_time(),
        last_updated_by: "admin".to_string(),
        lifecycle_status: EntityLifecycleStatus::Active,
    }
}

#[must_use]
pub fn scenario(id: i64, roadmap_id: i64, name: &str) -> Scenario {
    Scenario {
        id: ScenarioId(id),
        roadmap_id: RoadmapId(roadmap_id),
        name: name.to_string(),
        description: None,
        effective_date: None,
        release_status: ReleaseStatus::Active,
        position: 0,
        last_updated_at: fixed_time(),
        last_updated_by: "admin".to_string(),
    }
}

fn fixed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}
