//! Server-confirmed responses for one assessment.

use std::collections::HashMap;

use qms_core::{QuestionResponse, StoredResponse};

/// Last known server state, keyed by question id. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct ResponseBaseline {
    responses: HashMap<String, QuestionResponse>,
}

impl ResponseBaseline {
    /// Build from fetched records. A repeated question keeps the last record.
    pub fn from_records(records: impl IntoIterator<Item = StoredResponse>) -> Self {
        let mut responses = HashMap::new();
        for record in records {
            let response = QuestionResponse::from(record);
            if let Some(previous) = responses.insert(response.question_id.clone(), response) {
                tracing::warn!(
                    question_id = %previous.question_id,
                    "duplicate response in baseline; keeping the later record"
                );
            }
        }
        Self { responses }
    }

    #[must_use]
    pub fn get(&self, question_id: &str) -> Option<&QuestionResponse> {
        self.responses.get(question_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionResponse> {
        self.responses.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

impl FromIterator<QuestionResponse> for ResponseBaseline {
    fn from_iter<I: IntoIterator<Item = QuestionResponse>>(iter: I) -> Self {
        Self {
            responses: iter
                .into_iter()
                .map(|response| (response.question_id.clone(), response))
                .collect(),
        }
    }
}
