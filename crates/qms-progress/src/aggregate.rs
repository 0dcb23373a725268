//! Bottom-up progress and score folds over one section subtree.

use std::iter::Sum;
use std::ops::Add;

use qms_core::{ResponseSnapshot, Score, SectionNode, SectionStatus};
use schemars::JsonSchema;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Answered and total question counts of a section, with the derived status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Progress {
    pub answered: u32,
    pub total: u32,
    pub status: SectionStatus,
}

impl Progress {
    #[must_use]
    pub const fn new(answered: u32, total: u32) -> Self {
        Self {
            answered,
            total,
            status: SectionStatus::from_counts(answered, total),
        }
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl Add for Progress {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(
            self.answered.saturating_add(other.answered),
            self.total.saturating_add(other.total),
        )
    }
}

impl Sum for Progress {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Progress of `node` against the merged responses in `snapshot`.
///
/// A leaf counts answered responses whose `section_id` is the leaf's id,
/// capped at its `question_count`. A parent sums its children; its own
/// `question_count` is ignored.
#[must_use]
pub fn compute_progress(node: &SectionNode, snapshot: &ResponseSnapshot) -> Progress {
    if node.is_leaf() {
        let answered = u32::try_from(snapshot.answered_scores(&node.id).len()).unwrap_or(u32::MAX);
        Progress::new(answered.min(node.question_count), node.question_count)
    } else {
        node.children
            .iter()
            .map(|child| compute_progress(child, snapshot))
            .sum()
    }
}

// ---------------------------------------------------------------------------
// ScoreTally
// ---------------------------------------------------------------------------

/// Points earned against points attainable by the answered questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ScoreTally {
    pub points: u32,
    pub max_points: u32,
}

impl ScoreTally {
    #[must_use]
    pub fn from_scores(scores: &[Score]) -> Self {
        scores.iter().fold(Self::default(), |tally, score| Self {
            points: tally.points.saturating_add(score.points()),
            max_points: tally.max_points.saturating_add(Score::MAX_POINTS),
        })
    }

    /// Percentage rounded to one decimal place, `None` when nothing is answered.
    #[must_use]
    pub fn percentage(self) -> Option<f64> {
        if self.max_points == 0 {
            return None;
        }
        let ratio = f64::from(self.points) / f64::from(self.max_points);
        Some((ratio * 100.0 * 10.0).round() / 10.0)
    }
}

impl Add for ScoreTally {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            points: self.points.saturating_add(other.points),
            max_points: self.max_points.saturating_add(other.max_points),
        }
    }
}

impl Sum for ScoreTally {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Score tally of `node`. Unanswered questions contribute nothing.
#[must_use]
pub fn compute_score(node: &SectionNode, snapshot: &ResponseSnapshot) -> ScoreTally {
    if node.is_leaf() {
        ScoreTally::from_scores(snapshot.answered_scores(&node.id))
    } else {
        node.children
            .iter()
            .map(|child| compute_score(child, snapshot))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use qms_core::QuestionResponse;
    use rstest::rstest;

    fn answered(question: &str, section: &str, score: Score) -> QuestionResponse {
        QuestionResponse {
            score: Some(score),
            section_id: Some(section.into()),
            ..QuestionResponse::blank(question)
        }
    }

    fn unanswered(question: &str, section: &str) -> QuestionResponse {
        QuestionResponse {
            section_id: Some(section.into()),
            justification: "draft note".into(),
            ..QuestionResponse::blank(question)
        }
    }

    fn clause_four() -> SectionNode {
        SectionNode::branch(
            "p",
            "4",
            "Context",
            vec![
                SectionNode::leaf("l1", "4.1", "Organization", 2),
                SectionNode::leaf("l2", "4.2", "Interested parties", 3),
                SectionNode::leaf("l3", "4.3", "Scope", 0),
            ],
        )
    }

    #[test]
    fn parent_sums_children() {
        let snapshot = ResponseSnapshot::new([
            answered("q1", "l1", Score::Two),
            unanswered("q2", "l1"),
            unanswered("q3", "l2"),
        ]);
        let tree = clause_four();

        assert_eq!(
            compute_progress(&tree, &snapshot),
            Progress {
                answered: 1,
                total: 5,
                status: SectionStatus::Partial
            }
        );
        assert_eq!(
            compute_progress(&tree.children[0], &snapshot).status,
            SectionStatus::Partial
        );
        assert_eq!(
            compute_progress(&tree.children[1], &snapshot).status,
            SectionStatus::Empty
        );
        assert_eq!(
            compute_progress(&tree.children[2], &snapshot),
            Progress::new(0, 0)
        );
        assert_eq!(
            compute_progress(&tree.children[2], &snapshot).status,
            SectionStatus::NotApplicable
        );
    }

    #[test]
    fn leaf_answered_is_capped_at_question_count() {
        let snapshot = ResponseSnapshot::new([
            answered("q1", "l1", Score::One),
            answered("q2", "l1", Score::One),
            answered("q3", "l1", Score::One),
        ]);
        let progress = compute_progress(&SectionNode::leaf("l1", "4.1", "Organization", 2), &snapshot);
        assert_eq!(progress, Progress::new(2, 2));
        assert_eq!(progress.status, SectionStatus::Complete);
    }

    #[test]
    fn responses_outside_the_subtree_are_ignored() {
        let snapshot = ResponseSnapshot::new([
            answered("q1", "other", Score::Three),
            answered("q2", "p", Score::Three),
        ]);
        assert_eq!(compute_progress(&clause_four(), &snapshot), Progress::new(0, 5));
        assert_eq!(compute_score(&clause_four(), &snapshot), ScoreTally::default());
    }

    #[test]
    fn score_counts_only_answered_questions() {
        let snapshot = ResponseSnapshot::new([
            answered("q1", "l1", Score::One),
            answered("q2", "l1", Score::Two),
            answered("q3", "l2", Score::Three),
            unanswered("q4", "l2"),
        ]);
        let tally = compute_score(&clause_four(), &snapshot);
        assert_eq!(
            tally,
            ScoreTally {
                points: 6,
                max_points: 9
            }
        );
        assert_eq!(tally.percentage(), Some(66.7));
    }

    #[test]
    fn huge_sibling_counts_saturate() {
        let tree = SectionNode::branch(
            "p",
            "9",
            "Imported",
            vec![
                SectionNode::leaf("big", "9.1", "Bulk", u32::MAX),
                SectionNode::leaf("one", "9.2", "Single", 1),
            ],
        );
        let snapshot = ResponseSnapshot::new([answered("q1", "one", Score::Two)]);

        let progress = compute_progress(&tree, &snapshot);
        assert_eq!(progress, Progress::new(1, u32::MAX));
        assert_eq!(progress.status, SectionStatus::Partial);

        let tally = ScoreTally {
            points: u32::MAX,
            max_points: u32::MAX,
        } + ScoreTally {
            points: 2,
            max_points: 3,
        };
        assert_eq!(tally.max_points, u32::MAX);
        assert_eq!(tally.percentage(), Some(100.0));
    }

    #[rstest]
    #[case(0, 0, None)]
    #[case(3, 3, Some(100.0))]
    #[case(1, 3, Some(33.3))]
    #[case(2, 3, Some(66.7))]
    #[case(5, 9, Some(55.6))]
    #[case(7, 12, Some(58.3))]
    #[case(123, 240, Some(51.2))]
    fn percentage_rounds_to_one_decimal(
        #[case] points: u32,
        #[case] max_points: u32,
        #[case] expected: Option<f64>,
    ) {
        let tally = ScoreTally { points, max_points };
        assert_eq!(tally.percentage(), expected);
    }
}
