//! Forest-level reports built on the per-node folds.

use qms_core::{ResponseSnapshot, SectionNode, SectionStatus, SectionTree};
use schemars::JsonSchema;
use serde::Serialize;

use crate::aggregate::{Progress, ScoreTally, compute_progress, compute_score};

/// One section as shown by the navigator and the score summary.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct ProgressRow {
    pub section_id: String,
    pub section_number: String,
    pub title: String,
    pub depth: usize,
    pub is_leaf: bool,
    #[serde(flatten)]
    pub progress: Progress,
    #[serde(flatten)]
    pub score: ScoreTally,
    pub percentage: Option<f64>,
}

/// Every section of the forest in preorder, each with its own subtree totals.
#[must_use]
pub fn progress_rows(tree: &SectionTree, snapshot: &ResponseSnapshot) -> Vec<ProgressRow> {
    let mut rows = Vec::new();
    for root in tree.roots() {
        collect_rows(root, 0, snapshot, &mut rows);
    }
    rows
}

fn collect_rows(
    node: &SectionNode,
    depth: usize,
    snapshot: &ResponseSnapshot,
    rows: &mut Vec<ProgressRow>,
) -> (Progress, ScoreTally) {
    let slot = rows.len();
    // Placeholder keeps the parent ahead of its children.
    rows.push(row(node, depth, Progress::default(), ScoreTally::default()));
    let (progress, score) = if node.is_leaf() {
        (compute_progress(node, snapshot), compute_score(node, snapshot))
    } else {
        node.children
            .iter()
            .map(|child| collect_rows(child, depth + 1, snapshot, rows))
            .fold(
                (Progress::default(), ScoreTally::default()),
                |(progress, score), (child_progress, child_score)| {
                    (progress + child_progress, score + child_score)
                },
            )
    };
    rows[slot] = row(node, depth, progress, score);
    (progress, score)
}

fn row(node: &SectionNode, depth: usize, progress: Progress, score: ScoreTally) -> ProgressRow {
    ProgressRow {
        section_id: node.id.clone(),
        section_number: node.section_number.clone(),
        title: node.title.clone(),
        depth,
        is_leaf: node.is_leaf(),
        progress,
        score,
        percentage: score.percentage(),
    }
}

#[must_use]
pub fn overall_progress(tree: &SectionTree, snapshot: &ResponseSnapshot) -> Progress {
    tree.roots()
        .iter()
        .map(|root| compute_progress(root, snapshot))
        .sum()
}

#[must_use]
pub fn overall_score(tree: &SectionTree, snapshot: &ResponseSnapshot) -> ScoreTally {
    tree.roots()
        .iter()
        .map(|root| compute_score(root, snapshot))
        .sum()
}

/// Number of leaf sections in each status, as shown on the tab bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct StatusCounts {
    pub not_applicable: usize,
    pub empty: usize,
    pub partial: usize,
    pub complete: usize,
}

impl StatusCounts {
    #[must_use]
    pub const fn get(&self, status: SectionStatus) -> usize {
        match status {
            SectionStatus::NotApplicable => self.not_applicable,
            SectionStatus::Empty => self.empty,
            SectionStatus::Partial => self.partial,
            SectionStatus::Complete => self.complete,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.not_applicable + self.empty + self.partial + self.complete
    }

    const fn bump(&mut self, status: SectionStatus) {
        match status {
            SectionStatus::NotApplicable => self.not_applicable += 1,
            SectionStatus::Empty => self.empty += 1,
            SectionStatus::Partial => self.partial += 1,
            SectionStatus::Complete => self.complete += 1,
        }
    }
}

#[must_use]
pub fn status_counts(tree: &SectionTree, snapshot: &ResponseSnapshot) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for leaf in tree.leaves() {
        counts.bump(compute_progress(leaf, snapshot).status);
    }
    counts
}
