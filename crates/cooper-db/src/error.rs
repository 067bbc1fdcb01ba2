//! Database error types for cooper-db.
//!
//! The first four variants are the mutation taxonomy callers act on:
//! `NotFound` and `Validation` are client errors, `Forbidden` is an ownership
//! denial, and `ConcurrencyConflict` is safe to retry once. The rest are
//! infrastructure failures.

use cooper_core::enums::EntityType;
use cooper_core::errors::CoreError;
use cooper_core::policy::DenialReason;
use thiserror::Error;

use crate::retry::is_busy_error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The referenced opportunity or user does not exist.
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// The ownership policy refused the mutation.
    #[error("Forbidden: {reason}")]
    Forbidden { reason: DenialReason },

    /// Malformed patch, interaction, or user payload.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The row changed between read and write, or the store was busy.
    #[error("Concurrent modification of {entity_id}; retry the operation")]
    ConcurrencyConflict { entity_id: String },

    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    #[must_use]
    pub fn not_found(entity_type: EntityType, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_str().to_string(),
            id: id.to_string(),
        }
    }

    /// Whether repeating the whole operation may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ConcurrencyConflict { .. } => true,
            Self::LibSql(e) => is_busy_error(e),
            _ => false,
        }
    }
}

impl From<CoreError> for DatabaseError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            CoreError::Validation(message) => Self::Validation(message),
            CoreError::Other(e) => Self::Other(e),
        }
    }
}
