//! Planner session: the action boundary.
//!
//! Holds the transient state a user works against (current plan, busy flag,
//! editing flag, last message) and turns every failure from generation,
//! editing and persistence into one user-facing message. Actions never
//! return errors; callers read [`PlannerSession::message`] instead.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use tripplan_store::{
    KeyValueStore, Plan, PlanId, PlanKind, PlanStore, StoreError, TravelPlan, share_url,
};

use crate::editor::PlanEdit;
use crate::plan::{Criteria, GenerationClient, Transport};

/// Notice shown when a share link points at a plan this store never saved.
pub const MISSING_PLAN_NOTICE: &str =
    "This plan does not exist (it may have been created in a different browser profile)";

/// Result of opening a share link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The plan is now the session's current plan.
    Loaded,
    /// Nothing to show; notify the user and return to the start page.
    Redirect { notice: String },
}

#[derive(Debug, Default)]
struct SessionState {
    plan: Option<Plan>,
    busy: bool,
    editing: bool,
    message: Option<String>,
}

/// Clears the busy flag when a generation call finishes or is dropped.
struct BusyGuard<'a> {
    state: &'a Mutex<SessionState>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .busy = false;
    }
}

/// One user's planning session.
pub struct PlannerSession<T, S> {
    client: GenerationClient<T>,
    store: Mutex<PlanStore<S>>,
    base_url: String,
    state: Mutex<SessionState>,
}

impl<T: Transport, S: KeyValueStore> PlannerSession<T, S> {
    pub fn new(client: GenerationClient<T>, store: PlanStore<S>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            store: Mutex::new(store),
            base_url: base_url.into(),
            state: Mutex::new(SessionState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn store(&self) -> MutexGuard<'_, PlanStore<S>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fail(&self, message: String) {
        warn!(%message, "session action failed");
        self.state().message = Some(message);
    }

    // -- accessors ------------------------------------------------------

    pub fn plan(&self) -> Option<Plan> {
        self.state().plan.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.state().busy
    }

    pub fn is_editing(&self) -> bool {
        self.state().editing
    }

    /// Last user-facing message, if any.
    pub fn message(&self) -> Option<String> {
        self.state().message.clone()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -- generation -----------------------------------------------------

    /// Generate a plan for `criteria` and make it current.
    ///
    /// Returns `false` without doing anything while another generation is in
    /// flight. On failure the message is set and the previous plan stays.
    pub async fn generate(&self, criteria: &Criteria) -> bool {
        {
            let mut state = self.state();
            if state.busy {
                debug!("generate: refused, already busy");
                return false;
            }
            state.busy = true;
            state.message = None;
        }
        let _busy = BusyGuard { state: &self.state };

        match self.client.request_plan(criteria).await {
            Ok(plan) => {
                info!(kind = %plan.kind(), days = plan.day_count(), "session plan replaced");
                self.state().plan = Some(plan);
                true
            }
            Err(e) => {
                self.fail(e.to_string());
                false
            }
        }
    }

    // -- editing --------------------------------------------------------

    /// Replace the current plan with an empty one of `kind`.
    pub fn start_blank(&self, kind: PlanKind) {
        let plan = match kind {
            PlanKind::Outing => Plan::Outing(Vec::new()),
            PlanKind::Trip => Plan::Trip(TravelPlan::default()),
        };
        self.set_plan(plan);
    }

    pub fn set_plan(&self, plan: Plan) {
        self.state().plan = Some(plan);
    }

    pub fn begin_editing(&self) {
        self.state().editing = true;
    }

    pub fn finish_editing(&self) {
        self.state().editing = false;
    }

    /// Apply one edit to the current plan. Returns whether it was applied.
    pub fn apply(&self, edit: &PlanEdit) -> bool {
        let mut state = self.state();
        let Some(plan) = state.plan.as_ref() else {
            drop(state);
            self.fail("There is no plan to edit".to_string());
            return false;
        };
        match edit.apply(plan) {
            Ok(next) => {
                debug!(op = edit.name(), "edit applied");
                state.plan = Some(next);
                true
            }
            Err(e) => {
                drop(state);
                self.fail(e.to_string());
                false
            }
        }
    }

    // -- persistence ----------------------------------------------------

    /// Save the current plan and return its share URL.
    pub fn save(&self) -> Option<String> {
        let Some(plan) = self.plan() else {
            self.fail("There is no plan to save".to_string());
            return None;
        };
        let result = self.store().save_plan(&plan);
        match result {
            Ok(id) => {
                let url = share_url(&self.base_url, id);
                self.state().message = Some(format!("Plan saved: {url}"));
                Some(url)
            }
            Err(e) => {
                self.fail(format!("Failed to save plan: {e}"));
                None
            }
        }
    }

    /// Open the plan saved under `id` as the current plan.
    pub fn open(&self, id: PlanId) -> OpenOutcome {
        let result = self.store().load_plan(id);
        match result {
            Ok(plan) => {
                self.set_plan(plan);
                OpenOutcome::Loaded
            }
            Err(StoreError::NotFound(_)) => OpenOutcome::Redirect {
                notice: MISSING_PLAN_NOTICE.to_string(),
            },
            Err(e) => {
                let notice = format!("Failed to load plan: {e}");
                warn!(%id, error = %e, "open: load failed");
                OpenOutcome::Redirect { notice }
            }
        }
    }

    /// Share URLs of every saved plan, in save order.
    pub fn saved_plan_urls(&self) -> Vec<String> {
        let result = self.store().list_saved_plan_urls(&self.base_url);
        result.unwrap_or_else(|e| {
            self.fail(format!("Failed to list saved plans: {e}"));
            Vec::new()
        })
    }
}
