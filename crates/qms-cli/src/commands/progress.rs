use qms_config::QmsConfig;
use qms_progress::{ProgressRow, progress_rows};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AssessmentArgs;
use crate::commands::shared::open_session;
use crate::output::output_rows;

const HEADERS: [&str; 5] = ["section", "answered", "status", "score", "percent"];

/// Handle `qms progress`.
pub async fn handle(
    args: &AssessmentArgs,
    config: &QmsConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let session = open_session(&args.assessment, config, flags).await?;
    let rows = progress_rows(session.tree(), &session.snapshot());
    let cells = rows.iter().map(table_row).collect::<Vec<_>>();
    output_rows(&rows, &HEADERS, &cells, flags.format)
}

/// Navigator-style cells: indented section label, counts, status, score.
pub fn table_row(row: &ProgressRow) -> Vec<String> {
    vec![
        format!(
            "{}{} {}",
            "  ".repeat(row.depth),
            row.section_number,
            row.title
        ),
        format!("{}/{}", row.progress.answered, row.progress.total),
        row.progress.status.to_string(),
        format!("{}/{}", row.score.points, row.score.max_points),
        row.percentage
            .map_or_else(|| String::from("-"), |percent| format!("{percent:.1}%")),
    ]
}
