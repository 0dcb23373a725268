//! In-memory `ResponsesApi` for tests and demos.
//!
//! Records every batch it receives, can fail scripted saves or loads, and
//! can hold upserts in flight until released.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use qms_core::{ResponseUpsert, SectionNode, StoredResponse};
use tokio::sync::{Notify, Semaphore};

use crate::api::ResponsesApi;
use crate::error::{ApiError, SaveFailure};

/// One batch as received by `bulk_upsert_responses`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedBatch {
    pub assessment_id: String,
    pub entries: Vec<ResponseUpsert>,
}

#[derive(Default)]
struct Store {
    trees: HashMap<String, Vec<SectionNode>>,
    responses: HashMap<String, BTreeMap<String, StoredResponse>>,
    batches: Vec<RecordedBatch>,
    save_failures: VecDeque<SaveFailure>,
    load_failure: Option<String>,
    next_id: u64,
}

#[derive(Default)]
pub struct InMemoryResponsesApi {
    store: Mutex<Store>,
    gate: Mutex<Option<Arc<Semaphore>>>,
    arrived: Notify,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl InMemoryResponsesApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the section forest served for `assessment_id`.
    pub fn set_tree(&self, assessment_id: &str, roots: Vec<SectionNode>) {
        self.store().trees.insert(assessment_id.to_string(), roots);
    }

    /// Seed server-side responses for `assessment_id`.
    pub fn seed_responses(&self, assessment_id: &str, records: Vec<StoredResponse>) {
        let mut store = self.store();
        let responses = store.responses.entry(assessment_id.to_string()).or_default();
        for record in records {
            responses.insert(record.question_id.clone(), record);
        }
    }

    /// Fail the next upsert with `failure`. Calls queue up in order.
    pub fn fail_next_save(&self, failure: SaveFailure) {
        self.store().save_failures.push_back(failure);
    }

    /// Make every fetch fail with a transport error until cleared.
    pub fn fail_loads(&self, message: Option<&str>) {
        self.store().load_failure = message.map(str::to_string);
    }

    /// Hold upserts in flight until `release_saves` or `resume_saves`.
    pub fn hold_saves(&self) {
        *self.gate.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(Arc::new(Semaphore::new(0)));
    }

    /// Let `count` held upserts complete.
    pub fn release_saves(&self, count: usize) {
        if let Some(gate) = self.gate.lock().unwrap_or_else(PoisonError::into_inner).as_ref() {
            gate.add_permits(count);
        }
    }

    /// Stop holding upserts and release every waiting one.
    pub fn resume_saves(&self) {
        if let Some(gate) = self.gate.lock().unwrap_or_else(PoisonError::into_inner).take() {
            gate.close();
        }
    }

    #[must_use]
    pub fn batches(&self) -> Vec<RecordedBatch> {
        self.store().batches.clone()
    }

    #[must_use]
    pub fn batch_count(&self) -> usize {
        self.store().batches.len()
    }

    /// Highest number of upserts observed in flight at once.
    #[must_use]
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Server-side responses for `assessment_id`, ordered by question id.
    #[must_use]
    pub fn stored(&self, assessment_id: &str) -> Vec<StoredResponse> {
        self.store()
            .responses
            .get(assessment_id)
            .map(|responses| responses.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Wait until at least `count` batches have arrived.
    pub async fn wait_for_batches(&self, count: usize) {
        loop {
            let notified = self.arrived.notified();
            if self.batch_count() >= count {
                return;
            }
            notified.await;
        }
    }

    fn check_load(&self) -> Result<(), ApiError> {
        match &self.store().load_failure {
            Some(message) => Err(ApiError::Transport(message.clone())),
            None => Ok(()),
        }
    }

    fn persist(&self, assessment_id: &str, entries: Vec<ResponseUpsert>) {
        let mut store = self.store();
        for entry in entries {
            let next_id = store.next_id + 1;
            let responses = store.responses.entry(assessment_id.to_string()).or_default();
            let id = responses
                .get(&entry.question_id)
                .map(|existing| existing.id.clone());
            let assigned = id.is_none();
            responses.insert(
                entry.question_id.clone(),
                StoredResponse {
                    id: id.unwrap_or_else(|| format!("rsp-{next_id}")),
                    question_id: entry.question_id,
                    score: entry.score,
                    justification: entry.justification,
                    section_id: entry.section_id,
                    is_draft: entry.is_draft,
                },
            );
            if assigned {
                store.next_id = next_id;
            }
        }
    }
}

#[async_trait]
impl ResponsesApi for InMemoryResponsesApi {
    async fn fetch_responses(&self, assessment_id: &str) -> Result<Vec<StoredResponse>, ApiError> {
        self.check_load()?;
        Ok(self.stored(assessment_id))
    }

    async fn bulk_upsert_responses(
        &self,
        assessment_id: &str,
        responses: Vec<ResponseUpsert>,
    ) -> Result<(), SaveFailure> {
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        self.store().batches.push(RecordedBatch {
            assessment_id: assessment_id.to_string(),
            entries: responses.clone(),
        });
        self.arrived.notify_waiters();

        let gate = self
            .gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        let failure = self.store().save_failures.pop_front();
        let result = match failure {
            Some(failure) => Err(failure),
            None => {
                self.persist(assessment_id, responses);
                Ok(())
            }
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn fetch_section_tree(&self, assessment_id: &str) -> Result<Vec<SectionNode>, ApiError> {
        self.check_load()?;
        self.store()
            .trees
            .get(assessment_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(assessment_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qms_core::Score;

    fn upsert(question: &str, score: Score) -> ResponseUpsert {
        ResponseUpsert {
            question_id: question.into(),
            score: Some(score),
            justification: String::new(),
            section_id: Some("s1".into()),
            is_draft: true,
        }
    }

    #[tokio::test]
    async fn upsert_assigns_stable_ids() {
        let api = InMemoryResponsesApi::new();
        api.bulk_upsert_responses("a", vec![upsert("q1", Score::One), upsert("q2", Score::Two)])
            .await
            .unwrap();
        api.bulk_upsert_responses("a", vec![upsert("q1", Score::Three)])
            .await
            .unwrap();

        let stored = api.stored("a");
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].id, "rsp-1");
        assert_eq!(stored[0].score, Some(Score::Three));
        assert_eq!(stored[1].id, "rsp-2");
        assert_eq!(api.batch_count(), 2);
    }

    #[tokio::test]
    async fn scripted_failure_is_not_persisted() {
        let api = InMemoryResponsesApi::new();
        api.fail_next_save(SaveFailure::rejected("score out of range"));
        let result = api.bulk_upsert_responses("a", vec![upsert("q1", Score::One)]).await;
        assert_eq!(result, Err(SaveFailure::rejected("score out of range")));
        assert!(api.stored("a").is_empty());
        assert_eq!(api.batch_count(), 1);
    }

    #[tokio::test]
    async fn missing_tree_is_not_found() {
        let api = InMemoryResponsesApi::new();
        assert!(matches!(
            api.fetch_section_tree("nope").await,
            Err(ApiError::NotFound(id)) if id == "nope"
        ));
    }
}
