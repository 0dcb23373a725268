//! # qms-progress
//!
//! Pure aggregation over a `ResponseSnapshot`: per-section answered counts,
//! completion status and score tallies, plus the forest-level reports the
//! navigator, score summary and tab bar render from.
//!
//! Nothing here is cached. Callers recompute from a fresh snapshot whenever
//! the merged view changes.

pub mod aggregate;
pub mod report;

pub use aggregate::{Progress, ScoreTally, compute_progress, compute_score};
pub use report::{
    ProgressRow, StatusCounts, overall_progress, overall_score, progress_rows, status_counts,
};
