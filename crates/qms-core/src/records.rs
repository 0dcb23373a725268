//! Record shapes exchanged with the persistence collaborator.
//!
//! These mirror the remote contract and serialize as `camelCase`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Score;

/// A response as returned by `fetch_responses`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredResponse {
    pub id: String,
    pub question_id: String,
    pub score: Option<Score>,
    #[serde(default)]
    pub justification: String,
    pub section_id: Option<String>,
    #[serde(default)]
    pub is_draft: bool,
}

/// One entry of a `bulk_upsert_responses` batch.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseUpsert {
    pub question_id: String,
    pub score: Option<Score>,
    pub justification: String,
    pub section_id: Option<String>,
    pub is_draft: bool,
}
