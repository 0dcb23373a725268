//! Per-assessment wiring of section tree, overlay and auto-save controller.

use std::sync::Arc;

use qms_config::AutoSaveConfig;
use qms_core::{ResponseSnapshot, SectionTree};

use crate::api::ResponsesApi;
use crate::autosave::AutoSaveController;
use crate::baseline::ResponseBaseline;
use crate::error::LoadError;
use crate::overlay::ResponseOverlay;

/// Everything a view needs to edit and summarize one assessment.
///
/// Built only when both the section tree and the baseline load; a failed
/// load leaves nothing behind and is not retried here.
pub struct AssessmentSession {
    assessment_id: String,
    api: Arc<dyn ResponsesApi>,
    tree: SectionTree,
    overlay: ResponseOverlay,
}

impl AssessmentSession {
    /// Fetch the section tree and baseline, then build overlay and controller.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the config is invalid, either fetch fails, or
    /// the fetched tree is malformed.
    pub async fn load(
        api: Arc<dyn ResponsesApi>,
        assessment_id: impl Into<String>,
        config: &AutoSaveConfig,
    ) -> Result<Self, LoadError> {
        let assessment_id = assessment_id.into();
        config.validate()?;

        let roots = api
            .fetch_section_tree(&assessment_id)
            .await
            .map_err(|source| LoadError::SectionTree {
                assessment_id: assessment_id.clone(),
                source,
            })?;
        let tree = SectionTree::new(roots)?;

        let baseline = Self::fetch_baseline(api.as_ref(), &assessment_id).await?;
        tracing::debug!(
            assessment = %assessment_id,
            sections = tree.walk().count(),
            responses = baseline.len(),
            "assessment session loaded"
        );

        let autosave =
            AutoSaveController::new(assessment_id.clone(), Arc::clone(&api), config.clone());
        Ok(Self {
            assessment_id,
            api,
            tree,
            overlay: ResponseOverlay::new(baseline, autosave),
        })
    }

    async fn fetch_baseline(
        api: &dyn ResponsesApi,
        assessment_id: &str,
    ) -> Result<ResponseBaseline, LoadError> {
        let records = api
            .fetch_responses(assessment_id)
            .await
            .map_err(|source| LoadError::Responses {
                assessment_id: assessment_id.to_string(),
                source,
            })?;
        Ok(ResponseBaseline::from_records(records))
    }

    /// Refetch the baseline and rebase the overlay onto it.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Responses` if the fetch fails; the current
    /// baseline is kept in that case.
    pub async fn reload_baseline(&mut self) -> Result<(), LoadError> {
        let baseline = Self::fetch_baseline(self.api.as_ref(), &self.assessment_id).await?;
        self.overlay.rebase(baseline);
        Ok(())
    }

    #[must_use]
    pub fn assessment_id(&self) -> &str {
        &self.assessment_id
    }

    #[must_use]
    pub const fn tree(&self) -> &SectionTree {
        &self.tree
    }

    #[must_use]
    pub const fn overlay(&self) -> &ResponseOverlay {
        &self.overlay
    }

    pub const fn overlay_mut(&mut self) -> &mut ResponseOverlay {
        &mut self.overlay
    }

    #[must_use]
    pub const fn autosave(&self) -> &AutoSaveController {
        self.overlay.autosave()
    }

    #[must_use]
    pub fn snapshot(&self) -> ResponseSnapshot {
        self.overlay.snapshot()
    }

    /// Discard pending edits and stop timers when the view goes away.
    pub fn teardown(self) {
        self.overlay.autosave().clear_changes();
    }
}
