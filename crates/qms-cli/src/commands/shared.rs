use std::sync::Arc;

use anyhow::Context;
use qms_config::QmsConfig;
use qms_sync::AssessmentSession;

use crate::bootstrap::resolve_data_dir;
use crate::cli::GlobalFlags;
use crate::store::JsonFileApi;

/// Load the section tree and responses of `assessment_id` from the data dir.
pub async fn open_session(
    assessment_id: &str,
    config: &QmsConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<AssessmentSession> {
    let data_dir = resolve_data_dir(flags, config);
    tracing::debug!(data_dir = %data_dir.display(), assessment = %assessment_id, "opening assessment");

    let api = Arc::new(JsonFileApi::new(data_dir));
    AssessmentSession::load(api, assessment_id, &config.autosave)
        .await
        .with_context(|| format!("failed to open assessment {assessment_id}"))
}
