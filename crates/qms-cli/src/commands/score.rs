use qms_config::QmsConfig;
use qms_core::SectionStatus;
use qms_progress::{StatusCounts, overall_progress, overall_score, status_counts};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AssessmentArgs;
use crate::commands::shared::open_session;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ScoreSummary {
    assessment_id: String,
    answered: u32,
    total: u32,
    status: SectionStatus,
    points: u32,
    max_points: u32,
    percentage: Option<f64>,
    sections: StatusCounts,
}

/// Handle `qms score`.
pub async fn handle(
    args: &AssessmentArgs,
    config: &QmsConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let session = open_session(&args.assessment, config, flags).await?;
    let snapshot = session.snapshot();

    let progress = overall_progress(session.tree(), &snapshot);
    let score = overall_score(session.tree(), &snapshot);
    let summary = ScoreSummary {
        assessment_id: session.assessment_id().to_string(),
        answered: progress.answered,
        total: progress.total,
        status: progress.status,
        points: score.points,
        max_points: score.max_points,
        percentage: score.percentage(),
        sections: status_counts(session.tree(), &snapshot),
    };

    output(&summary, flags.format)
}
