//! Optimistic merged view of an assessment's responses.
//!
//! Lookups go to the local-edit layer first and fall back to the baseline,
//! so an edit is readable the moment `update` returns. Every edit is also
//! handed to the auto-save controller.

use std::collections::HashMap;

use qms_core::{QuestionResponse, ResponsePatch, ResponseSnapshot, Score};

use crate::autosave::{AutoSaveController, FlushOutcome};
use crate::baseline::ResponseBaseline;

pub struct ResponseOverlay {
    baseline: ResponseBaseline,
    local: HashMap<String, QuestionResponse>,
    autosave: AutoSaveController,
}

impl ResponseOverlay {
    #[must_use]
    pub fn new(baseline: ResponseBaseline, autosave: AutoSaveController) -> Self {
        Self {
            baseline,
            local: HashMap::new(),
            autosave,
        }
    }

    /// The merged record, or `None` while the question is unanswered.
    #[must_use]
    pub fn get(&self, question_id: &str) -> Option<&QuestionResponse> {
        self.local
            .get(question_id)
            .or_else(|| self.baseline.get(question_id))
    }

    #[must_use]
    pub fn score_of(&self, question_id: &str) -> Option<Score> {
        self.get(question_id).and_then(|response| response.score)
    }

    /// Apply `patch` on top of the merged record and queue the result for saving.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn update(&mut self, question_id: &str, patch: &ResponsePatch) -> &QuestionResponse {
        let current = self
            .get(question_id)
            .cloned()
            .unwrap_or_else(|| QuestionResponse::blank(question_id));
        let mut merged = patch.apply_to(current);
        merged.is_draft = true;

        self.autosave.mark_changed(merged.clone());
        self.local
            .entry(question_id.to_string())
            .insert_entry(merged)
            .into_mut()
    }

    /// Every merged record: baseline entries not shadowed, then local edits.
    pub fn merged(&self) -> impl Iterator<Item = &QuestionResponse> {
        self.baseline
            .iter()
            .filter(|response| !self.local.contains_key(&response.question_id))
            .chain(self.local.values())
    }

    /// Immutable copy of the merged view for progress aggregation.
    #[must_use]
    pub fn snapshot(&self) -> ResponseSnapshot {
        self.merged().cloned().collect()
    }

    /// Swap in a freshly fetched baseline.
    ///
    /// Local edits that are no longer pending and already match the new
    /// baseline are dropped; everything else keeps shadowing it.
    pub fn rebase(&mut self, baseline: ResponseBaseline) {
        let autosave = &self.autosave;
        self.local.retain(|question_id, local| {
            autosave.is_pending(question_id)
                || baseline
                    .get(question_id)
                    .is_none_or(|confirmed| !confirmed.same_answer(local))
        });
        self.baseline = baseline;
    }

    #[must_use]
    pub fn local_edit_count(&self) -> usize {
        self.local.len()
    }

    #[must_use]
    pub const fn baseline(&self) -> &ResponseBaseline {
        &self.baseline
    }

    #[must_use]
    pub const fn autosave(&self) -> &AutoSaveController {
        &self.autosave
    }

    /// Flush pending edits now.
    pub async fn save_now(&self) -> FlushOutcome {
        self.autosave.save_now().await
    }
}
