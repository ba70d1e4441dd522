//! Roadmaps panel
//!
//! Owns the panel's [`ViewState`] and drives it from:
//! - data loads (roadmaps and scenarios fetched concurrently, joined)
//! - user intents (add, select, cancel)
//! - the clone workflow (prompt, clone, reload, notify)
//!
//! State is published through a `watch` channel so a renderer can follow
//! it while loads are in flight. Overlapping loads are not fenced: the
//! last one to complete wins.

use crate::config::PanelConfig;
use crate::error::{PanelError, Query};
use crate::services::PanelServices;
use crate::types::{
    CloneOutcome, LoadOptions, LoadSummary, Mode, ParentEntityRef, Roadmap, Scenario, ViewState,
};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

/// View-state controller for one roadmaps panel instance
#[derive(Debug)]
pub struct RoadmapsPanel {
    /// Entity the panel is scoped to
    parent: ParentEntityRef,
    /// Injected collaborators
    services: PanelServices,
    /// Messages and cache sizing
    config: PanelConfig,
    /// Current view state, observable by renderers
    state: watch::Sender<ViewState>,
    /// Set once `init` has run
    initialised: AtomicBool,
}

impl RoadmapsPanel {
    /// Create a panel in `Loading` mode with nothing loaded
    #[must_use]
    pub fn new(parent: ParentEntityRef, services: PanelServices, config: PanelConfig) -> Self {
        let (state, _) = watch::channel(ViewState::new());
        Self {
            parent,
            services,
            config,
            state,
            initialised: AtomicBool::new(false),
        }
    }

    /// Initialisation hook, run once per panel
    ///
    /// # Errors
    /// - `PanelError::AlreadyInitialised` on a second call
    /// - any error from [`RoadmapsPanel::load_data`]
    pub async fn init(&self) -> Result<LoadSummary, PanelError> {
        if self.initialised.swap(true, Ordering::SeqCst) {
            tracing::warn!(parent = %self.parent, "init called twice");
            return Err(PanelError::AlreadyInitialised);
        }
        self.load_data().await
    }

    /// Load roadmaps and scenarios for the parent entity
    ///
    /// Mode switches to `Loading` before either query starts and to `List`
    /// once both have succeeded; the two collections are assigned together.
    ///
    /// # Errors
    /// `PanelError::LoadFailed` if either query fails. Mode is left at
    /// `Loading` and the previous collections are kept.
    #[tracing::instrument(skip_all, fields(parent = %self.parent))]
    pub async fn load_data(&self) -> Result<LoadSummary, PanelError> {
        let selector = self.services.selector.build(&self.parent);
        self.set_mode(Mode::Loading);

        let roadmaps = async {
            self.services
                .roadmaps
                .find_roadmaps_by_selector(&selector)
                .await
                .map_err(|source| PanelError::LoadFailed {
                    query: Query::Roadmaps,
                    source,
                })
        };
        // Scenario lists go stale after a clone, so never reuse a cached one
        let scenarios = async {
            self.services
                .scenarios
                .find_by_roadmap_selector(&selector, LoadOptions::forced())
                .await
                .map_err(|source| PanelError::LoadFailed {
                    query: Query::Scenarios,
                    source,
                })
        };

        let (roadmaps, scenarios) = match futures::try_join!(roadmaps, scenarios) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!("Load failed, panel stays loading: {}", e);
                return Err(e);
            }
        };

        let summary = LoadSummary {
            roadmap_count: roadmaps.len(),
            scenario_count: scenarios.len(),
        };
        self.state.send_modify(|s| {
            s.roadmaps = roadmaps;
            s.scenarios = scenarios;
            s.mode = Mode::List;
        });

        tracing::info!(
            roadmaps = summary.roadmap_count,
            scenarios = summary.scenario_count,
            "Panel loaded"
        );
        Ok(summary)
    }

    /// Switch to adding a scenario to `roadmap`
    pub fn on_add_scenario(&self, roadmap: &Roadmap) {
        tracing::debug!(roadmap = %roadmap.id, "add scenario");
        self.set_mode(Mode::AddScenario);
    }

    /// Inspect `scenario`
    pub fn on_select_scenario(&self, scenario: &Scenario, roadmap: &Roadmap) {
        tracing::debug!(scenario = %scenario.id, roadmap = %roadmap.id, "select scenario");
        self.state.send_modify(|s| {
            s.mode = Mode::ViewScenario;
            s.selected_scenario = Some(scenario.clone());
        });
    }

    /// Back to the list, dropping any selection
    pub fn on_cancel(&self) {
        tracing::debug!("cancel");
        self.state.send_modify(|s| {
            s.mode = Mode::List;
            s.selected_scenario = None;
        });
    }

    /// Clone `scenario` under a name chosen by the user
    ///
    /// # Workflow
    /// 1. Prompt for a name, suggesting "Clone of <name>"
    /// 2. Clone the scenario
    /// 3. Reload the panel
    /// 4. Notify success
    ///
    /// An empty or cancelled prompt skips steps 2-4 and raises a warning
    /// notification instead. The mode is not reset by this workflow.
    ///
    /// # Errors
    /// - `PanelError::CloneFailed` if the clone is rejected (no reload)
    /// - `PanelError::LoadFailed` if the reload fails (no notification)
    #[tracing::instrument(skip_all, fields(scenario = %scenario.id))]
    pub async fn on_clone_scenario(&self, scenario: &Scenario) -> Result<CloneOutcome, PanelError> {
        let messages = &self.config.messages;
        let suggested = messages.default_clone_name(&scenario.name);

        let answer = self
            .services
            .dialog
            .prompt_for_text(&messages.clone_prompt, &suggested)
            .filter(|name| !name.is_empty());

        let Some(name) = answer else {
            tracing::warn!("Clone aborted by user");
            self.services.notifier.warning(&messages.clone_aborted);
            return Ok(CloneOutcome::Aborted);
        };

        let cloned = self
            .services
            .scenarios
            .clone_by_id(scenario.id, &name)
            .await
            .map_err(|source| PanelError::CloneFailed {
                scenario_id: scenario.id,
                source,
            })?;
        tracing::info!(clone = %cloned.id, name = %name, "Scenario cloned");

        let reload = self.load_data().await?;
        self.services.notifier.success(&messages.clone_success);

        Ok(CloneOutcome::Cloned { name, reload })
    }

    /// Snapshot of the current view state
    #[must_use]
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Current mode
    #[inline]
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.state.borrow().mode
    }

    /// Follow view-state changes
    #[inline]
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Entity the panel is scoped to
    #[inline]
    #[must_use]
    pub fn parent_entity_ref(&self) -> &ParentEntityRef {
        &self.parent
    }

    /// Panel configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    fn set_mode(&self, mode: Mode) {
        self.state.send_modify(|s| {
            if s.mode != mode {
                tracing::debug!(from = ?s.mode, to = ?mode, "mode transition");
            }
            s.mode = mode;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::services::{MockDialog, MockNotifier, RoadmapStore, ScenarioStore};
    use crate::types::{
        EntityKind, EntityLifecycleStatus, ReleaseStatus, RoadmapId, ScenarioId, SelectorOptions,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct Calls(Mutex<Vec<String>>);

    impl Calls {
        fn push(&self, call: impl Into<String>) {
            self.0.lock().push(call.into());
        }

        fn all(&self) -> Vec<String> {
            self.0.lock().clone()
        }
    }

    fn roadmap(id: i64) -> Roadmap {
        Roadmap {
            id: RoadmapId(id),
            name: format!("R{id}"),
            description: None,
            row_kind: EntityKind::Application,
            column_kind: EntityKind::Measurable,
            rating_scheme_id: 1,
            last_updated_at: Utc::now(),
            last_updated_by: "test".to_string(),
            lifecycle_status: EntityLifecycleStatus::Active,
        }
    }

    fn scenario(id: i64, name: &str) -> Scenario {
        Scenario {
            id: ScenarioId(id),
            roadmap_id: RoadmapId(1),
            name: name.to_string(),
            description: None,
            effective_date: None,
            release_status: ReleaseStatus::Draft,
            position: 0,
            last_updated_at: Utc::now(),
            last_updated_by: "test".to_string(),
        }
    }

    #[derive(Default)]
    struct Store {
        calls: Arc<Calls>,
        fail_roadmaps: bool,
        fail_clone: bool,
    }

    #[async_trait]
    impl RoadmapStore for Store {
        async fn find_roadmaps_by_selector(
            &self,
            _selector: &SelectorOptions,
        ) -> Result<Vec<Roadmap>, ServiceError> {
            self.calls.push("roadmaps");
            if self.fail_roadmaps {
                return Err(ServiceError::Transport("down".to_string()));
            }
            Ok(vec![roadmap(1)])
        }
    }

    #[async_trait]
    impl ScenarioStore for Store {
        async fn find_by_roadmap_selector(
            &self,
            _selector: &SelectorOptions,
            options: LoadOptions,
        ) -> Result<Vec<Scenario>, ServiceError> {
            self.calls.push(format!("scenarios force={}", options.force));
            Ok(vec![scenario(10, "S1")])
        }

        async fn clone_by_id(
            &self,
            id: ScenarioId,
            new_name: &str,
        ) -> Result<Scenario, ServiceError> {
            self.calls.push(format!("clone {id} {new_name}"));
            if self.fail_clone {
                return Err(ServiceError::Rejected("duplicate name".to_string()));
            }
            Ok(scenario(11, new_name))
        }
    }

    fn panel(store: Store, dialog: MockDialog, notifier: MockNotifier) -> RoadmapsPanel {
        let store = Arc::new(store);
        let services = PanelServices::new(
            store.clone(),
            store,
            Arc::new(dialog),
            Arc::new(notifier),
        );
        RoadmapsPanel::new(
            ParentEntityRef::new(EntityKind::OrgUnit, 1),
            services,
            PanelConfig::default(),
        )
    }

    #[tokio::test]
    async fn starts_loading_then_lists() {
        let panel = panel(Store::default(), MockDialog::new(), MockNotifier::new());
        assert_eq!(panel.state(), ViewState::new());

        let summary = panel.init().await.unwrap();
        assert_eq!(summary.roadmap_count, 1);
        assert_eq!(summary.scenario_count, 1);
        assert_eq!(panel.mode(), Mode::List);
    }

    #[tokio::test]
    async fn init_runs_once() {
        let panel = panel(Store::default(), MockDialog::new(), MockNotifier::new());
        panel.init().await.unwrap();
        assert!(matches!(
            panel.init().await,
            Err(PanelError::AlreadyInitialised)
        ));
    }

    #[tokio::test]
    async fn failed_load_stays_loading() {
        let store = Store {
            fail_roadmaps: true,
            ..Store::default()
        };
        let panel = panel(store, MockDialog::new(), MockNotifier::new());

        let err = panel.load_data().await.unwrap_err();
        assert!(matches!(
            err,
            PanelError::LoadFailed {
                query: Query::Roadmaps,
                ..
            }
        ));
        let state = panel.state();
        assert_eq!(state.mode, Mode::Loading);
        assert!(state.roadmaps.is_empty());
        assert!(state.scenarios.is_empty());
    }

    #[tokio::test]
    async fn clone_prompts_with_default_name_and_notifies() {
        let mut dialog = MockDialog::new();
        dialog
            .expect_prompt_for_text()
            .withf(|message, default_value| {
                message == "Please enter a new name for the scenario"
                    && default_value == "Clone of S1"
            })
            .times(1)
            .returning(|_, _| Some("X".to_string()));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_success()
            .withf(|message| message == "Scenario cloned")
            .times(1)
            .return_const(());
        notifier.expect_warning().never();

        let store = Store::default();
        let calls = store.calls.clone();
        let panel = panel(store, dialog, notifier);

        let outcome = panel.on_clone_scenario(&scenario(10, "S1")).await.unwrap();
        assert!(matches!(outcome, CloneOutcome::Cloned { ref name, .. } if name == "X"));

        let calls = calls.all();
        assert_eq!(calls[0], "clone 10 X");
        assert!(calls[1..].contains(&"roadmaps".to_string()));
        assert!(calls[1..].contains(&"scenarios force=true".to_string()));
        assert_eq!(calls.len(), 3);
    }

    #[tokio::test]
    async fn empty_name_aborts() {
        for answer in [None, Some(String::new())] {
            let mut dialog = MockDialog::new();
            dialog
                .expect_prompt_for_text()
                .times(1)
                .return_const(answer);
            let mut notifier = MockNotifier::new();
            notifier
                .expect_warning()
                .withf(|message| message == "Aborting clone")
                .times(1)
                .return_const(());
            notifier.expect_success().never();

            let store = Store::default();
            let calls = store.calls.clone();
            let panel = panel(store, dialog, notifier);

            let outcome = panel.on_clone_scenario(&scenario(10, "S1")).await.unwrap();
            assert_eq!(outcome, CloneOutcome::Aborted);
            assert!(calls.all().is_empty());
        }
    }

    #[tokio::test]
    async fn whitespace_name_still_clones() {
        let mut dialog = MockDialog::new();
        dialog
            .expect_prompt_for_text()
            .times(1)
            .returning(|_, _| Some("   ".to_string()));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_success()
            .withf(|message| message == "Scenario cloned")
            .times(1)
            .return_const(());
        notifier.expect_warning().never();

        let store = Store::default();
        let calls = store.calls.clone();
        let panel = panel(store, dialog, notifier);

        let outcome = panel.on_clone_scenario(&scenario(10, "S1")).await.unwrap();
        assert!(matches!(outcome, CloneOutcome::Cloned { ref name, .. } if name == "   "));
        assert_eq!(calls.all()[0], "clone 10    ");
        assert_eq!(calls.all().len(), 3);
    }

    #[tokio::test]
    async fn rejected_clone_skips_reload() {
        let mut dialog = MockDialog::new();
        dialog
            .expect_prompt_for_text()
            .returning(|_, _| Some("X".to_string()));
        let mut notifier = MockNotifier::new();
        notifier.expect_success().never();
        notifier.expect_warning().never();

        let store = Store {
            fail_clone: true,
            ..Store::default()
        };
        let calls = store.calls.clone();
        let panel = panel(store, dialog, notifier);
        panel.on_select_scenario(&scenario(10, "S1"), &roadmap(1));

        let err = panel.on_clone_scenario(&scenario(10, "S1")).await.unwrap_err();
        assert!(matches!(
            err,
            PanelError::CloneFailed {
                scenario_id: ScenarioId(10),
                ..
            }
        ));
        assert_eq!(calls.all(), vec!["clone 10 X".to_string()]);
        assert_eq!(panel.mode(), Mode::ViewScenario);
    }

    #[tokio::test]
    async fn handlers_move_between_modes() {
        let panel = panel(Store::default(), MockDialog::new(), MockNotifier::new());
        let s = scenario(10, "S1");
        let r = roadmap(1);

        panel.on_select_scenario(&s, &r);
        assert_eq!(panel.mode(), Mode::ViewScenario);
        assert_eq!(panel.state().selected_scenario, Some(s.clone()));

        panel.on_add_scenario(&r);
        assert_eq!(panel.mode(), Mode::AddScenario);
        assert_eq!(panel.state().selected_scenario, Some(s));

        panel.on_cancel();
        assert_eq!(panel.mode(), Mode::List);
        assert!(panel.state().selected_scenario.is_none());
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let panel = panel(Store::default(), MockDialog::new(), MockNotifier::new());
        let mut rx = panel.subscribe();

        panel.on_cancel();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().mode, Mode::List);
    }
}
