//! Cross-cutting error types.
//!
//! Save and load failures are defined in `qms-sync` where the remote
//! collaborator lives; this module only covers data-model errors.

use thiserror::Error;

/// Errors raised while building or validating core data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (tree shape, score range).
    #[error("Validation error: {0}")]
    Validation(String),
}
