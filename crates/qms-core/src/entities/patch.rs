use crate::entities::QuestionResponse;
use crate::enums::Score;

/// A partial edit to one response.
///
/// Each nullable field has three states: not mentioned (`None`), explicitly
/// cleared (`Some(None)`), or set (`Some(Some(_))`). Fields left unmentioned
/// keep the value of the record the patch is applied to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponsePatch {
    pub score: Option<Option<Score>>,
    pub justification: Option<String>,
    pub section_id: Option<Option<String>>,
}

impl ResponsePatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn score(mut self, score: Score) -> Self {
        self.score = Some(Some(score));
        self
    }

    /// Clear the answer. Distinct from leaving the score unmentioned.
    #[must_use]
    pub const fn clear_score(mut self) -> Self {
        self.score = Some(None);
        self
    }

    #[must_use]
    pub fn justification(mut self, text: impl Into<String>) -> Self {
        self.justification = Some(text.into());
        self
    }

    #[must_use]
    pub fn section(mut self, section_id: impl Into<String>) -> Self {
        self.section_id = Some(Some(section_id.into()));
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.score.is_none() && self.justification.is_none() && self.section_id.is_none()
    }

    /// Apply the mentioned fields to `base`, leaving everything else intact.
    #[must_use]
    pub fn apply_to(&self, mut base: QuestionResponse) -> QuestionResponse {
        if let Some(score) = self.score {
            base.score = score;
        }
        if let Some(justification) = &self.justification {
            base.justification.clone_from(justification);
        }
        if let Some(section_id) = &self.section_id {
            base.section_id.clone_from(section_id);
        }
        base
    }
}
