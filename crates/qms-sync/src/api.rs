//! Remote persistence collaborator.

use async_trait::async_trait;
use qms_core::{ResponseUpsert, SectionNode, StoredResponse};

use crate::error::{ApiError, SaveFailure};

/// Operations the engine needs from the persistence/API layer.
///
/// Implementations own transport concerns such as timeouts; a timed-out
/// upsert must surface as a transient `SaveFailure`.
#[async_trait]
pub trait ResponsesApi: Send + Sync {
    /// Current server-side responses for an assessment.
    async fn fetch_responses(&self, assessment_id: &str) -> Result<Vec<StoredResponse>, ApiError>;

    /// Insert or update a batch of responses. This is the only write path.
    async fn bulk_upsert_responses(
        &self,
        assessment_id: &str,
        responses: Vec<ResponseUpsert>,
    ) -> Result<(), SaveFailure>;

    /// The section forest the assessment is scored against.
    async fn fetch_section_tree(&self, assessment_id: &str) -> Result<Vec<SectionNode>, ApiError>;
}
