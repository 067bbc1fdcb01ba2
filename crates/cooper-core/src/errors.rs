//! Cross-cutting error types for Cooper.
//!
//! Storage-level errors (`DatabaseError`) live in `cooper-db`; configuration
//! errors live in `cooper-config`. The CLI converges all of them via `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any Cooper crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (unknown enum label, malformed email, bad value).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
