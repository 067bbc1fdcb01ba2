//! Retry for transactional collisions.
//!
//! A mutation that hits `ConcurrencyConflict` (compare-and-swap miss) or a
//! `database is locked` error from another writer may be repeated as a whole.
//! The default allows one retry. Ownership denials, validation errors, and
//! not-found are never retried.

use std::future::Future;
use std::time::Duration;

use crate::error::DatabaseError;

/// Configuration for retry behavior on conflicts.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay: Duration::from_millis(25),
            max_delay: Duration::from_millis(250),
        }
    }
}

/// Detect SQLite lock contention surfaced through libSQL.
///
/// The predicate is intentionally narrow so genuine SQL or constraint errors
/// are not retried.
pub fn is_busy_error(e: &libsql::Error) -> bool {
    let msg = e.to_string();
    msg.contains("database is locked")
        || msg.contains("database table is locked")
        || msg.contains("SQLITE_BUSY")
}

/// Run `op`, repeating it while it fails with a retryable error and attempts
/// remain.
///
/// # Errors
///
/// Returns the last error from `op`.
pub async fn with_conflict_retry<T, F, Fut>(
    config: &RetryConfig,
    mut op: F,
) -> Result<T, DatabaseError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DatabaseError>>,
{
    let mut attempt = 1;
    let mut delay = config.base_delay;
    loop {
        match op().await {
            Err(error) if error.is_retryable() && attempt < config.max_attempts => {
                tracing::warn!(%error, attempt, "retrying after transactional conflict");
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(config.max_delay);
                attempt += 1;
            }
            other => return other,
        }
    }
}
