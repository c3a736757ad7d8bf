//! Onboarding engine — sole writer of the record, with durable drafts.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::actions::{self, Action, IdCardPatch, LocationPatch};
use crate::api::WorkerProfile;
use crate::record::{MediaFile, OnboardingRecord, Step, draft_keys};
use crate::store::DraftStore;

/// Coordinates the in-memory onboarding record and its persisted draft.
///
/// Every mutation flows through the pure transition in [`crate::actions`],
/// applied under the write lock, then both draft keys are written by a
/// detached task. Writes from successive mutations are independent and may
/// complete out of order, so the persisted snapshot can briefly lag the
/// in-memory record; rehydration always yields the last fully written
/// snapshot.
pub struct OnboardingEngine {
    record: Arc<RwLock<OnboardingRecord>>,
    store: Arc<dyn DraftStore>,
    profile: Arc<RwLock<Option<WorkerProfile>>>,
    /// Draft writes still in flight, drained by [`Self::flush_drafts`].
    pending_writes: std::sync::Mutex<Vec<tokio::task::JoinHandle<()>>>,
}

impl OnboardingEngine {
    /// Create a fresh engine with a default record.
    pub fn new(store: Arc<dyn DraftStore>) -> Self {
        Self {
            record: Arc::new(RwLock::new(OnboardingRecord::default())),
            store,
            profile: Arc::new(RwLock::new(None)),
            pending_writes: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Rebuild the engine from the persisted draft, if any.
    ///
    /// The payload and the step pointer live under separate keys and are
    /// merged here. A missing, unreadable, or out-of-range entry falls back
    /// to defaults; read failures are logged, never fatal.
    pub async fn rehydrate(store: Arc<dyn DraftStore>) -> Self {
        let mut record = match store.get(draft_keys::DRAFT_DATA).await {
            Ok(Some(json)) => match serde_json::from_str::<OnboardingRecord>(&json) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("Discarding unreadable draft payload: {e}");
                    OnboardingRecord::default()
                }
            },
            Ok(None) => OnboardingRecord::default(),
            Err(e) => {
                tracing::warn!("Failed to read draft payload: {e}");
                OnboardingRecord::default()
            }
        };

        record.current_step = match store.get(draft_keys::DRAFT_STEP).await {
            Ok(Some(raw)) => raw
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(Step::from_number)
                .unwrap_or_default(),
            Ok(None) => Step::default(),
            Err(e) => {
                tracing::warn!("Failed to read draft step: {e}");
                Step::default()
            }
        };

        tracing::info!(step = %record.current_step, "Onboarding draft rehydrated");
        Self {
            record: Arc::new(RwLock::new(record)),
            store,
            profile: Arc::new(RwLock::new(None)),
            pending_writes: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Read-only snapshot of the current record.
    pub async fn snapshot(&self) -> OnboardingRecord {
        self.record.read().await.clone()
    }

    pub async fn current_step(&self) -> Step {
        self.record.read().await.current_step
    }

    pub async fn is_submitting(&self) -> bool {
        self.record.read().await.is_submitting
    }

    /// Apply an action under the write lock and queue a draft write.
    async fn dispatch(&self, action: Action) -> OnboardingRecord {
        let next = {
            let mut guard = self.record.write().await;
            let next = actions::apply(&guard, action);
            *guard = next.clone();
            next
        };
        self.persist(next.clone());
        next
    }

    /// Relative-navigation variant of [`dispatch`]: reports whether the
    /// step moved. Only meaningful for `NextStep`/`PreviousStep`, where a
    /// bounds or validation block leaves the pointer in place.
    async fn dispatch_nav(&self, action: Action) -> bool {
        let (next, moved) = {
            let mut guard = self.record.write().await;
            let before = guard.current_step;
            let next = actions::apply(&guard, action);
            let moved = next.current_step != before;
            *guard = next.clone();
            (next, moved)
        };
        self.persist(next);
        moved
    }

    /// Queue a fire-and-forget write of both draft keys. Failures are
    /// logged and never propagate to the mutation that triggered them.
    fn persist(&self, record: OnboardingRecord) {
        let store = Arc::clone(&self.store);
        let handle = tokio::spawn(async move {
            let payload = match serde_json::to_string(&record) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!("Failed to serialize draft payload: {e}");
                    return;
                }
            };
            if let Err(e) = store.set(draft_keys::DRAFT_DATA, &payload).await {
                tracing::warn!("Failed to persist draft payload: {e}");
            }
            let step = record.current_step.number().to_string();
            if let Err(e) = store.set(draft_keys::DRAFT_STEP, &step).await {
                tracing::warn!("Failed to persist draft step: {e}");
            }
        });
        if let Ok(mut pending) = self.pending_writes.lock() {
            pending.retain(|h| !h.is_finished());
            pending.push(handle);
        }
    }

    /// Await any draft writes still in flight.
    ///
    /// Mutations never wait on persistence; call this when the persisted
    /// snapshot must be current (app teardown, tests).
    pub async fn flush_drafts(&self) {
        let handles: Vec<_> = match self.pending_writes.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(_) => Vec::new(),
        };
        for handle in handles {
            let _ = handle.await;
        }
    }

    // ── Field updates ───────────────────────────────────────────────

    pub async fn update_basic_info(&self, bio: Option<String>, phone: Option<String>) {
        self.dispatch(Action::UpdateBasicInfo { bio, phone }).await;
    }

    pub async fn update_location(&self, patch: LocationPatch) {
        self.dispatch(Action::UpdateLocation(patch)).await;
    }

    pub async fn update_skills(&self, skills: Vec<String>) {
        self.dispatch(Action::UpdateSkills(skills)).await;
    }

    pub async fn update_profile_image(&self, file: MediaFile) {
        self.dispatch(Action::UpdateProfileImage(file)).await;
    }

    pub async fn update_id_card(&self, patch: IdCardPatch) {
        self.dispatch(Action::UpdateIdCard(patch)).await;
    }

    // ── Navigation ──────────────────────────────────────────────────

    /// Advance to the next step. Validation-gated: on rule failures the
    /// errors land in the record, the step does not change, and `false` is
    /// returned.
    pub async fn advance_step(&self) -> bool {
        self.dispatch_nav(Action::NextStep).await
    }

    /// Go back one step. Fails (returns `false`) on the first step.
    pub async fn retreat_step(&self) -> bool {
        self.dispatch_nav(Action::PreviousStep).await
    }

    /// Jump to a 1-based step number. Fails outside `1..=TOTAL_STEPS`;
    /// jumping to the current step still succeeds (and clears errors).
    pub async fn go_to_step(&self, n: u8) -> bool {
        if Step::from_number(n).is_none() {
            return false;
        }
        self.dispatch(Action::GoToStep(n)).await;
        true
    }

    // ── Errors and transient flags ──────────────────────────────────

    pub async fn set_errors(&self, errors: std::collections::BTreeMap<String, String>) {
        self.dispatch(Action::SetErrors(errors)).await;
    }

    pub async fn clear_errors(&self) {
        self.dispatch(Action::ClearErrors).await;
    }

    /// Flip the submitting flag. Transient: not an action, never persisted.
    pub(crate) async fn set_submitting(&self, submitting: bool) {
        self.record.write().await.is_submitting = submitting;
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Reset the record to defaults and delete the persisted draft.
    /// Idempotent; removal failures are logged, the in-memory reset always
    /// happens.
    pub async fn clear_progress(&self) {
        {
            let mut guard = self.record.write().await;
            *guard = OnboardingRecord::default();
        }
        // Drain queued writes so a late one cannot resurrect the draft.
        self.flush_drafts().await;
        if let Err(e) = self.store.remove(draft_keys::DRAFT_DATA).await {
            tracing::warn!("Failed to clear draft payload: {e}");
        }
        if let Err(e) = self.store.remove(draft_keys::DRAFT_STEP).await {
            tracing::warn!("Failed to clear draft step: {e}");
        }
    }

    // ── Committed profile cache ─────────────────────────────────────

    /// The worker profile most recently fetched after a successful
    /// submission.
    pub async fn active_profile(&self) -> Option<WorkerProfile> {
        self.profile.read().await.clone()
    }

    pub(crate) async fn set_active_profile(&self, profile: WorkerProfile) {
        *self.profile.write().await = Some(profile);
    }
}
