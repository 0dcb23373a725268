use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Score;
use crate::records::{ResponseUpsert, StoredResponse};

/// One audit answer as seen by the merged view.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QuestionResponse {
    pub question_id: String,
    pub score: Option<Score>,
    #[serde(default)]
    pub justification: String,
    pub section_id: Option<String>,
    #[serde(default)]
    pub is_draft: bool,
    pub server_id: Option<String>,
}

impl QuestionResponse {
    /// Template used when a question is edited for the first time.
    #[must_use]
    pub fn blank(question_id: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            score: None,
            justification: String::new(),
            section_id: None,
            is_draft: false,
            server_id: None,
        }
    }

    #[must_use]
    pub const fn is_answered(&self) -> bool {
        self.score.is_some()
    }

    /// Whether `other` carries the same answer content (score, justification, section).
    #[must_use]
    pub fn same_answer(&self, other: &Self) -> bool {
        self.score == other.score
            && self.justification == other.justification
            && self.section_id == other.section_id
    }

    /// Shape this record for the bulk-upsert write path.
    #[must_use]
    pub fn to_upsert(&self) -> ResponseUpsert {
        ResponseUpsert {
            question_id: self.question_id.clone(),
            score: self.score,
            justification: self.justification.clone(),
            section_id: self.section_id.clone(),
            is_draft: self.is_draft,
        }
    }
}

impl From<StoredResponse> for QuestionResponse {
    fn from(stored: StoredResponse) -> Self {
        Self {
            question_id: stored.question_id,
            score: stored.score,
            justification: stored.justification,
            section_id: stored.section_id,
            is_draft: stored.is_draft,
            server_id: Some(stored.id),
        }
    }
}
