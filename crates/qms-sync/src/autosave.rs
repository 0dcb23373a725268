//! Debounced, batched auto-save of edited responses.
//!
//! One controller exists per assessment. Every edit lands in the pending map
//! and pushes the debounce deadline out to `delay` from now. When the timer
//! fires, or `save_now` is called, the whole pending map is sent as a single
//! batch:
//!
//! 1. Take the flight lock (a second flush waits for the first to resolve)
//! 2. Snapshot and clear the pending map
//! 3. Send the snapshot through `bulk_upsert_responses`
//! 4. Success: `saved`, then `idle` after the grace interval if nothing new arrived
//! 5. Failure: `error`, snapshot entries re-queued unless a newer edit for the
//!    same question is already pending
//!
//! State is observable through [`AutoSaveController::state`] and a
//! `tokio::sync::watch` channel from [`AutoSaveController::subscribe`].

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use qms_config::AutoSaveConfig;
use qms_core::{QuestionResponse, ResponseUpsert, SaveStatus};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::ResponsesApi;
use crate::error::SaveFailure;

/// Snapshot of the controller exposed to views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SaveState {
    pub status: SaveStatus,
    pub pending_count: usize,
    pub last_saved: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub consecutive_failures: u32,
}

/// Result of one flush attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing was pending.
    Skipped,
    /// The batch was accepted.
    Saved { count: usize, at: DateTime<Utc> },
    /// The batch failed; `requeued` entries went back into the pending map.
    Failed {
        failure: SaveFailure,
        requeued: usize,
    },
}

impl FlushOutcome {
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// Handle to the auto-save controller of one assessment.
///
/// Cloning shares the same pending map and timers. Dropping every handle
/// cancels the timers without flushing.
#[derive(Clone)]
pub struct AutoSaveController {
    shared: Arc<Shared>,
}

struct Shared {
    assessment_id: String,
    api: Arc<dyn ResponsesApi>,
    config: AutoSaveConfig,
    state: Mutex<ControllerState>,
    flight: tokio::sync::Mutex<()>,
    observed: watch::Sender<SaveState>,
}

#[derive(Default)]
struct ControllerState {
    pending: BTreeMap<String, QuestionResponse>,
    status: SaveStatus,
    last_saved: Option<DateTime<Utc>>,
    error: Option<String>,
    consecutive_failures: u32,
    debounce: Option<JoinHandle<()>>,
    debounce_generation: u64,
    idle_revert: Option<JoinHandle<()>>,
    idle_generation: u64,
    /// Flushes waiting on the flight lock.
    queued_flushes: usize,
    /// Bumped by `clear_changes`; a flight started in an older epoch
    /// resolves without touching state.
    epoch: u64,
}

impl ControllerState {
    fn transition(&mut self, next: SaveStatus) {
        debug_assert!(
            self.status.can_transition_to(next),
            "illegal save status transition {} -> {next}",
            self.status
        );
        self.status = next;
    }

    fn cancel_debounce(&mut self) {
        if let Some(handle) = self.debounce.take() {
            handle.abort();
        }
        self.debounce_generation += 1;
    }

    fn cancel_idle_revert(&mut self) {
        if let Some(handle) = self.idle_revert.take() {
            handle.abort();
        }
        self.idle_generation += 1;
    }

    fn observe(&self) -> SaveState {
        SaveState {
            status: self.status,
            pending_count: self.pending.len(),
            last_saved: self.last_saved,
            error: self.error.clone(),
            consecutive_failures: self.consecutive_failures,
        }
    }
}

impl AutoSaveController {
    /// Create a controller for `assessment_id` writing through `api`.
    #[must_use]
    pub fn new(
        assessment_id: impl Into<String>,
        api: Arc<dyn ResponsesApi>,
        config: AutoSaveConfig,
    ) -> Self {
        let (observed, _) = watch::channel(SaveState::default());
        Self {
            shared: Arc::new(Shared {
                assessment_id: assessment_id.into(),
                api,
                config,
                state: Mutex::new(ControllerState::default()),
                flight: tokio::sync::Mutex::new(()),
                observed,
            }),
        }
    }

    #[must_use]
    pub fn assessment_id(&self) -> &str {
        &self.shared.assessment_id
    }

    /// Queue `record` for the next batch and restart the debounce timer.
    ///
    /// Replaces any pending record for the same question. While a batch is
    /// in flight the status stays `saving`; the record goes out with the
    /// next batch.
    pub fn mark_changed(&self, record: QuestionResponse) {
        let mut state = self.shared.lock();
        tracing::debug!(
            assessment = %self.shared.assessment_id,
            question_id = %record.question_id,
            "response marked changed"
        );
        state.pending.insert(record.question_id.clone(), record);
        state.error = None;
        state.cancel_idle_revert();
        if state.status != SaveStatus::Saving {
            state.transition(SaveStatus::Unsaved);
        }
        self.shared.arm_debounce(&mut state, self.shared.config.delay());
        self.shared.publish(&state);
    }

    /// Cancel the debounce timer and flush immediately.
    ///
    /// If a batch is already in flight this waits for it to resolve, then
    /// flushes whatever is pending at that point. The in-flight request is
    /// never cancelled.
    pub async fn save_now(&self) -> FlushOutcome {
        self.shared.lock().cancel_debounce();
        self.shared.flush().await
    }

    /// Drop all pending edits and return to `idle`. Teardown only.
    pub fn clear_changes(&self) {
        let mut state = self.shared.lock();
        state.cancel_debounce();
        state.cancel_idle_revert();
        state.pending.clear();
        state.status = SaveStatus::Idle;
        state.error = None;
        state.consecutive_failures = 0;
        state.epoch += 1;
        self.shared.publish(&state);
    }

    #[must_use]
    pub fn state(&self) -> SaveState {
        self.shared.observed.borrow().clone()
    }

    #[must_use]
    pub fn status(&self) -> SaveStatus {
        self.shared.lock().status
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.shared.lock().pending.len()
    }

    #[must_use]
    pub fn is_pending(&self, question_id: &str) -> bool {
        self.shared.lock().pending.contains_key(question_id)
    }

    /// Records currently waiting for the next batch, ordered by question id.
    #[must_use]
    pub fn pending(&self) -> Vec<QuestionResponse> {
        self.shared.lock().pending.values().cloned().collect()
    }

    /// Receive every published `SaveState`.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SaveState> {
        self.shared.observed.subscribe()
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &ControllerState) {
        self.observed.send_replace(state.observe());
    }

    fn arm_debounce(self: &Arc<Self>, state: &mut ControllerState, delay: Duration) {
        state.cancel_debounce();
        let generation = state.debounce_generation;
        let weak = Arc::downgrade(self);
        state.debounce = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(shared) = weak.upgrade() else {
                return;
            };
            {
                let mut state = shared.lock();
                if state.debounce_generation != generation {
                    return;
                }
                // Past this point the timer can no longer be aborted.
                state.debounce = None;
            }
            shared.flush().await;
        }));
    }

    fn arm_idle_revert(self: &Arc<Self>, state: &mut ControllerState) {
        state.cancel_idle_revert();
        let generation = state.idle_generation;
        let grace = self.config.idle_revert();
        let weak: Weak<Self> = Arc::downgrade(self);
        state.idle_revert = Some(tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let mut state = shared.lock();
            if state.idle_generation != generation {
                return;
            }
            state.idle_revert = None;
            if state.status == SaveStatus::Saved && state.pending.is_empty() {
                state.transition(SaveStatus::Idle);
                shared.publish(&state);
            }
        }));
    }

    async fn flush(self: &Arc<Self>) -> FlushOutcome {
        let queued = QueuedFlush::enter(self);
        let _flight = self.flight.lock().await;
        drop(queued);

        let (batch, epoch) = {
            let mut state = self.lock();
            if state.pending.is_empty() {
                return FlushOutcome::Skipped;
            }
            let batch: Vec<QuestionResponse> =
                std::mem::take(&mut state.pending).into_values().collect();
            if state.status != SaveStatus::Unsaved {
                state.transition(SaveStatus::Unsaved);
            }
            state.transition(SaveStatus::Saving);
            self.publish(&state);
            (batch, state.epoch)
        };

        let count = batch.len();
        let upserts: Vec<ResponseUpsert> = batch.iter().map(QuestionResponse::to_upsert).collect();
        tracing::debug!(assessment = %self.assessment_id, count, "sending response batch");
        let result = self
            .api
            .bulk_upsert_responses(&self.assessment_id, upserts)
            .await;

        let mut state = self.lock();
        let cleared = state.epoch != epoch;
        match result {
            Ok(()) => {
                let at = Utc::now();
                tracing::info!(assessment = %self.assessment_id, count, "response batch saved");
                if !cleared {
                    self.record_success(&mut state, at);
                }
                FlushOutcome::Saved { count, at }
            }
            Err(failure) => {
                let requeued = if cleared {
                    0
                } else {
                    self.record_failure(&mut state, &failure, batch)
                };
                tracing::warn!(
                    assessment = %self.assessment_id,
                    kind = %failure.kind,
                    count,
                    requeued,
                    error = %failure.message,
                    "response batch failed"
                );
                FlushOutcome::Failed { failure, requeued }
            }
        }
    }

    fn record_success(self: &Arc<Self>, state: &mut ControllerState, at: DateTime<Utc>) {
        state.transition(SaveStatus::Saved);
        state.last_saved = Some(at);
        state.error = None;
        state.consecutive_failures = 0;
        if state.pending.is_empty() {
            self.arm_idle_revert(state);
        } else {
            // Edits arrived mid-flight; their debounce timer is already armed.
            state.transition(SaveStatus::Unsaved);
        }
        self.publish(state);
    }

    fn record_failure(
        self: &Arc<Self>,
        state: &mut ControllerState,
        failure: &SaveFailure,
        batch: Vec<QuestionResponse>,
    ) -> usize {
        state.transition(SaveStatus::Error);
        state.error = Some(failure.message.clone());
        state.consecutive_failures += 1;

        let mut requeued = 0;
        for record in batch {
            if let Entry::Vacant(slot) = state.pending.entry(record.question_id.clone()) {
                slot.insert(record);
                requeued += 1;
            }
        }

        // A queued flush picks up the re-queued batch as soon as this flight ends.
        if failure.kind.auto_retries()
            && state.debounce.is_none()
            && state.queued_flushes == 0
            && self.config.allows_auto_retry(state.consecutive_failures)
        {
            self.arm_debounce(state, self.config.delay());
        }
        self.publish(state);
        requeued
    }
}

/// Counts a flush as queued until it holds the flight lock or is dropped.
struct QueuedFlush<'a> {
    shared: &'a Shared,
}

impl<'a> QueuedFlush<'a> {
    fn enter(shared: &'a Shared) -> Self {
        shared.lock().queued_flushes += 1;
        Self { shared }
    }
}

impl Drop for QueuedFlush<'_> {
    fn drop(&mut self) {
        self.shared.lock().queued_flushes -= 1;
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = state.debounce.take() {
            handle.abort();
        }
        if let Some(handle) = state.idle_revert.take() {
            handle.abort();
        }
    }
}
