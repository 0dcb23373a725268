//! Navigator rows, overall totals and tab-bar counts over a small clause forest.

use pretty_assertions::assert_eq;
use qms_core::{QuestionResponse, ResponseSnapshot, Score, SectionNode, SectionStatus, SectionTree};
use qms_progress::{
    Progress, ScoreTally, overall_progress, overall_score, progress_rows, status_counts,
};

fn forest() -> SectionTree {
    SectionTree::new(vec![
        SectionNode::branch(
            "c4",
            "4",
            "Context of the organization",
            vec![
                SectionNode::leaf("c4-1", "4.1", "Understanding the organization", 2),
                SectionNode::leaf("c4-2", "4.2", "Interested parties", 3),
            ],
        ),
        SectionNode::branch(
            "c5",
            "5",
            "Leadership",
            vec![SectionNode::branch(
                "c5-1",
                "5.1",
                "Leadership and commitment",
                vec![
                    SectionNode::leaf("c5-1-1", "5.1.1", "General", 1),
                    SectionNode::leaf("c5-1-2", "5.1.2", "Customer focus", 0),
                ],
            )],
        ),
    ])
    .unwrap()
}

fn answer(question: &str, section: &str, score: Option<Score>) -> QuestionResponse {
    QuestionResponse {
        score,
        section_id: Some(section.into()),
        ..QuestionResponse::blank(question)
    }
}

fn snapshot() -> ResponseSnapshot {
    ResponseSnapshot::new([
        answer("q-4.1-a", "c4-1", Some(Score::One)),
        answer("q-4.1-b", "c4-1", Some(Score::Two)),
        answer("q-4.2-a", "c4-2", None),
        answer("q-5.1.1-a", "c5-1-1", Some(Score::Three)),
    ])
}

#[test]
fn rows_are_preorder_with_subtree_totals() {
    let rows = progress_rows(&forest(), &snapshot());

    let outline: Vec<(&str, usize, bool)> = rows
        .iter()
        .map(|row| (row.section_number.as_str(), row.depth, row.is_leaf))
        .collect();
    assert_eq!(
        outline,
        vec![
            ("4", 0, false),
            ("4.1", 1, true),
            ("4.2", 1, true),
            ("5", 0, false),
            ("5.1", 1, false),
            ("5.1.1", 2, true),
            ("5.1.2", 2, true),
        ]
    );

    let statuses: Vec<SectionStatus> = rows.iter().map(|row| row.progress.status).collect();
    assert_eq!(
        statuses,
        vec![
            SectionStatus::Partial,
            SectionStatus::Complete,
            SectionStatus::Empty,
            SectionStatus::Complete,
            SectionStatus::Complete,
            SectionStatus::Complete,
            SectionStatus::NotApplicable,
        ]
    );

    assert_eq!(rows[0].progress, Progress::new(2, 5));
    assert_eq!(
        rows[0].score,
        ScoreTally {
            points: 3,
            max_points: 6
        }
    );
    assert_eq!(rows[0].percentage, Some(50.0));
    assert_eq!(rows[2].percentage, None);
    assert_eq!(rows[6].progress, Progress::new(0, 0));
}

#[test]
fn overall_totals_sum_the_roots() {
    let tree = forest();
    let snapshot = snapshot();

    assert_eq!(overall_progress(&tree, &snapshot), Progress::new(3, 6));
    let score = overall_score(&tree, &snapshot);
    assert_eq!(
        score,
        ScoreTally {
            points: 6,
            max_points: 9
        }
    );
    assert_eq!(score.percentage(), Some(66.7));
}

#[test]
fn tab_bar_counts_leaf_statuses() {
    let counts = status_counts(&forest(), &snapshot());
    assert_eq!(counts.complete, 2);
    assert_eq!(counts.empty, 1);
    assert_eq!(counts.partial, 0);
    assert_eq!(counts.not_applicable, 1);
    assert_eq!(counts.get(SectionStatus::Complete), 2);
    assert_eq!(counts.total(), 4);
}

#[test]
fn empty_snapshot_scores_nothing() {
    let tree = forest();
    let empty = ResponseSnapshot::default();

    assert_eq!(overall_progress(&tree, &empty), Progress::new(0, 6));
    assert_eq!(overall_progress(&tree, &empty).status, SectionStatus::Empty);
    assert_eq!(overall_score(&tree, &empty).percentage(), None);
    assert_eq!(status_counts(&tree, &empty).empty, 3);
}

#[test]
fn rows_serialize_flat_for_json_output() {
    let rows = progress_rows(&forest(), &snapshot());
    let json = serde_json::to_value(&rows[1]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "section_id": "c4-1",
            "section_number": "4.1",
            "title": "Understanding the organization",
            "depth": 1,
            "is_leaf": true,
            "answered": 2,
            "total": 2,
            "status": "complete",
            "points": 3,
            "max_points": 6,
            "percentage": 50.0
        })
    );
}
