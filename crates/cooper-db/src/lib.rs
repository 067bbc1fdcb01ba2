//! # cooper-db
//!
//! libSQL persistence for Cooper CRM: users, opportunities, interactions, and
//! the audit trail.
//!
//! Every mutation runs inside one `BEGIN IMMEDIATE` transaction, gated by the
//! ownership claim policy from `cooper-core`. See [`service::CrmService`].

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod retry;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use std::time::Duration;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle.
///
/// Wraps a libSQL database and its single connection. Repository methods live
/// on [`service::CrmService`].
pub struct CrmDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl CrmDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        Self::open_local_with(path, None).await
    }

    /// Open a local database, waiting up to `busy_timeout` for locks held by
    /// other processes before failing with `database is locked`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened, a pragma
    /// fails, or migrations fail.
    pub async fn open_local_with(
        path: &str,
        busy_timeout: Option<Duration>,
    ) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        if let Some(timeout) = busy_timeout {
            // busy_timeout echoes the new value back as a row.
            let mut rows = conn
                .query(&format!("PRAGMA busy_timeout = {}", timeout.as_millis()), ())
                .await
                .map_err(|e| DatabaseError::Migration(format!("PRAGMA busy_timeout: {e}")))?;
            while rows.next().await?.is_some() {}
        }

        let crm_db = Self { db, conn };
        crm_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(crm_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"opp-a3f8b2c1"`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        generate_id(&self.conn, prefix).await
    }
}

/// Generate a prefixed ID on an arbitrary connection (or open transaction).
///
/// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails or returns no rows.
pub async fn generate_id(conn: &libsql::Connection, prefix: &str) -> Result<String, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
            (),
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<String>(0)?)
}
