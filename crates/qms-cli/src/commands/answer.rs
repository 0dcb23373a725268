use anyhow::bail;
use qms_config::QmsConfig;
use qms_core::{ResponsePatch, Score};
use qms_sync::FlushOutcome;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AnswerArgs;
use crate::commands::shared::open_session;
use crate::output::output;

/// Handle `qms answer`.
///
/// Applies one edit through the overlay and flushes it immediately instead
/// of waiting out the debounce delay.
pub async fn handle(args: &AnswerArgs, config: &QmsConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let patch = build_patch(args)?;
    let mut session = open_session(&args.assessment, config, flags).await?;

    let response = session.overlay_mut().update(&args.question, &patch).clone();
    if response.section_id.is_none() {
        tracing::warn!(
            question = %args.question,
            "response has no section and will not count toward progress"
        );
    }

    let outcome = session.overlay().save_now().await;
    let state = session.autosave().state();
    session.teardown();

    match outcome {
        FlushOutcome::Saved { .. } | FlushOutcome::Skipped => output(
            &json!({
                "response": response,
                "save": state,
            }),
            flags.format,
        ),
        FlushOutcome::Failed { failure, .. } => {
            bail!("answer to {} was not saved: {failure}", args.question)
        }
    }
}

fn build_patch(args: &AnswerArgs) -> anyhow::Result<ResponsePatch> {
    let mut patch = ResponsePatch::new();
    if let Some(value) = args.score {
        patch = patch.score(Score::try_from(value)?);
    }
    if args.clear_score {
        patch = patch.clear_score();
    }
    if let Some(justification) = &args.justification {
        patch = patch.justification(justification.clone());
    }
    if let Some(section) = &args.section {
        patch = patch.section(section.clone());
    }

    if patch.is_empty() {
        bail!("nothing to change: pass --score, --clear-score, --justification or --section");
    }
    Ok(patch)
}
