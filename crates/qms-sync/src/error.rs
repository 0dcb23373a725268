//! Error types for loading and saving assessment responses.
//!
//! Save failures never escape as `Err`: the controller turns them into an
//! `error` status and re-queues the batch. Load failures are returned to the
//! caller and leave nothing initialized.

use qms_config::ConfigError;
use qms_core::{CoreError, SaveFailureKind};
use thiserror::Error;

/// Failure reported by the remote bulk-upsert operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind} save failure: {message}")]
pub struct SaveFailure {
    pub kind: SaveFailureKind,
    pub message: String,
}

impl SaveFailure {
    /// Network failure, timeout or 5xx.
    #[must_use]
    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            kind: SaveFailureKind::Transient,
            message: message.into(),
        }
    }

    /// Batch rejected with a structured reason.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: SaveFailureKind::Rejected,
            message: message.into(),
        }
    }
}

/// Errors from the read side of the remote collaborator.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request did not complete (network, timeout, server error).
    #[error("Request failed: {0}")]
    Transport(String),

    /// The assessment does not exist remotely.
    #[error("Assessment not found: {0}")]
    NotFound(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors raised while building an assessment session.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to load section tree for assessment {assessment_id}: {source}")]
    SectionTree {
        assessment_id: String,
        #[source]
        source: ApiError,
    },

    #[error("Failed to load responses for assessment {assessment_id}: {source}")]
    Responses {
        assessment_id: String,
        #[source]
        source: ApiError,
    },

    /// The fetched section tree is malformed.
    #[error("Invalid section tree: {0}")]
    InvalidTree(#[from] CoreError),

    /// Auto-save settings cannot be used.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
