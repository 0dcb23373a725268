//! Immutable merged-response view handed to progress aggregation.

use std::collections::{BTreeMap, HashMap};

use crate::entities::QuestionResponse;
use crate::enums::Score;

/// Point-in-time copy of the merged responses for one assessment.
///
/// Answered scores are indexed by section on construction so aggregation
/// can walk the tree without rescanning every response per leaf.
#[derive(Debug, Clone, Default)]
pub struct ResponseSnapshot {
    responses: BTreeMap<String, QuestionResponse>,
    answered_by_section: HashMap<String, Vec<Score>>,
}

impl ResponseSnapshot {
    /// Build a snapshot; a later record for the same question replaces an earlier one.
    pub fn new(responses: impl IntoIterator<Item = QuestionResponse>) -> Self {
        let responses: BTreeMap<String, QuestionResponse> = responses
            .into_iter()
            .map(|response| (response.question_id.clone(), response))
            .collect();

        let mut answered_by_section: HashMap<String, Vec<Score>> = HashMap::new();
        for response in responses.values() {
            if let (Some(section_id), Some(score)) = (&response.section_id, response.score) {
                answered_by_section
                    .entry(section_id.clone())
                    .or_default()
                    .push(score);
            }
        }

        Self {
            responses,
            answered_by_section,
        }
    }

    #[must_use]
    pub fn get(&self, question_id: &str) -> Option<&QuestionResponse> {
        self.responses.get(question_id)
    }

    /// Scores of the answered questions assigned to `section_id`.
    #[must_use]
    pub fn answered_scores(&self, section_id: &str) -> &[Score] {
        self.answered_by_section
            .get(section_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
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

impl FromIterator<QuestionResponse> for ResponseSnapshot {
    fn from_iter<I: IntoIterator<Item = QuestionResponse>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(question: &str, section: Option<&str>, score: Option<Score>) -> QuestionResponse {
        QuestionResponse {
            section_id: section.map(str::to_string),
            score,
            ..QuestionResponse::blank(question)
        }
    }

    #[test]
    fn later_record_for_same_question_wins() {
        let snapshot = ResponseSnapshot::new([
            response("q1", Some("s1"), Some(Score::One)),
            response("q1", Some("s1"), Some(Score::Three)),
        ]);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("q1").unwrap().score, Some(Score::Three));
        assert_eq!(snapshot.answered_scores("s1"), &[Score::Three]);
    }

    #[test]
    fn unanswered_and_unsectioned_are_not_indexed() {
        let snapshot: ResponseSnapshot = [
            response("q1", Some("s1"), None),
            response("q2", None, Some(Score::Two)),
            response("q3", Some("s1"), Some(Score::Two)),
        ]
        .into_iter()
        .collect();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.answered_scores("s1"), &[Score::Two]);
        assert!(snapshot.answered_scores("s2").is_empty());
    }
}
