//! Service layer running every mutation as one gated unit of work.
//!
//! `CrmService` wraps `CrmDb` and the claim policy. All repo methods are
//! implemented as `impl CrmService` blocks under `repos/`.
//!
//! Every mutation method follows this protocol:
//! 1. Validate input (nothing touched on failure)
//! 2. Acquire the write gate and `BEGIN IMMEDIATE`
//! 3. Load, evaluate the policy, write with a revision check
//! 4. Append audit entries (inside the transaction)
//! 5. Commit, or roll back on any error
//!
//! Reads share the connection with the unit of work, so they take the gate
//! in shared mode and never observe an uncommitted transaction.

use std::time::Duration;

use cooper_core::policy::ClaimPolicy;
use libsql::TransactionBehavior;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::CrmDb;
use crate::error::DatabaseError;

pub struct CrmService {
    db: CrmDb,
    policy: ClaimPolicy,
    allowed_email_domain: String,
    gate: RwLock<()>,
}

impl CrmService {
    /// Create a new service wrapping a local database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str, policy: ClaimPolicy) -> Result<Self, DatabaseError> {
        let db = CrmDb::open_local(db_path).await?;
        Ok(Self::from_db(db, policy))
    }

    /// Like [`Self::new_local`], with a lock wait for multi-process use.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local_with(
        db_path: &str,
        policy: ClaimPolicy,
        busy_timeout: Duration,
    ) -> Result<Self, DatabaseError> {
        let db = CrmDb::open_local_with(db_path, Some(busy_timeout)).await?;
        Ok(Self::from_db(db, policy))
    }

    #[must_use]
    pub fn from_db(db: CrmDb, policy: ClaimPolicy) -> Self {
        Self {
            db,
            policy,
            allowed_email_domain: String::new(),
            gate: RwLock::new(()),
        }
    }

    /// Restrict `create_user` to one email domain. Empty means any domain.
    #[must_use]
    pub fn with_allowed_email_domain(mut self, domain: impl Into<String>) -> Self {
        self.allowed_email_domain = domain.into();
        self
    }

    #[must_use]
    pub const fn db(&self) -> &CrmDb {
        &self.db
    }

    #[must_use]
    pub const fn policy(&self) -> ClaimPolicy {
        self.policy
    }

    #[must_use]
    pub fn allowed_email_domain(&self) -> &str {
        &self.allowed_email_domain
    }

    /// Shared side of the gate. Held for the duration of a read query.
    pub(crate) async fn read_gate(&self) -> RwLockReadGuard<'_, ()> {
        self.gate.read().await
    }

    /// Open a write transaction.
    ///
    /// Waits for exclusive use of the gate, then takes the database write
    /// lock with `BEGIN IMMEDIATE`. The gate is held until the unit of work
    /// is finished.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the transaction cannot start, e.g.
    /// `database is locked` (retryable).
    pub async fn begin(&self) -> Result<UnitOfWork<'_>, DatabaseError> {
        let gate = self.gate.write().await;
        let tx = self
            .db
            .conn()
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?;
        Ok(UnitOfWork { tx, _gate: gate })
    }
}

/// An open `BEGIN IMMEDIATE` transaction plus the write gate.
///
/// Consumed by [`UnitOfWork::finish`]. Dropping it unfinished rolls back.
pub struct UnitOfWork<'a> {
    tx: libsql::Transaction,
    _gate: RwLockWriteGuard<'a, ()>,
}

impl UnitOfWork<'_> {
    #[must_use]
    pub fn conn(&self) -> &libsql::Connection {
        &self.tx
    }

    /// Commit when `result` is `Ok`, roll back otherwise.
    ///
    /// A failed rollback is logged and the original error is returned.
    ///
    /// # Errors
    ///
    /// Returns the error carried by `result`, or the commit failure.
    pub async fn finish<T>(self, result: Result<T, DatabaseError>) -> Result<T, DatabaseError> {
        let Self { tx, _gate } = self;
        match result {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!(%error, %rollback, "rollback failed");
                }
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn count_users(svc: &CrmService) -> i64 {
        let mut rows = svc
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM users", ())
            .await
            .unwrap();
        rows.next().await.unwrap().unwrap().get(0).unwrap()
    }

    async fn insert_user(conn: &libsql::Connection) -> Result<(), DatabaseError> {
        conn.execute(
            "INSERT INTO users (id, email, created_at) VALUES ('usr-1', 'a@x.com', 't')",
            (),
        )
        .await?;
        Ok(())
    }

    #[tokio::test]
    async fn finish_commits_on_ok() {
        let svc = CrmService::new_local(":memory:", ClaimPolicy::default())
            .await
            .unwrap();
        let uow = svc.begin().await.unwrap();
        let result = insert_user(uow.conn()).await;
        uow.finish(result).await.unwrap();
        assert_eq!(count_users(&svc).await, 1);
    }

    #[tokio::test]
    async fn finish_rolls_back_on_err() {
        let svc = CrmService::new_local(":memory:", ClaimPolicy::default())
            .await
            .unwrap();
        let uow = svc.begin().await.unwrap();
        insert_user(uow.conn()).await.unwrap();
        let err = uow
            .finish::<()>(Err(DatabaseError::Validation("late failure".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
        assert_eq!(count_users(&svc).await, 0);
    }

    #[tokio::test]
    async fn reads_wait_for_open_unit_of_work() {
        let svc = CrmService::new_local(":memory:", ClaimPolicy::default())
            .await
            .unwrap();
        let uow = svc.begin().await.unwrap();
        insert_user(uow.conn()).await.unwrap();

        let read = svc.get_user("usr-1");
        tokio::pin!(read);
        let during = tokio::time::timeout(Duration::from_millis(50), &mut read).await;
        assert!(during.is_err(), "read completed while the transaction was open");

        uow.finish::<()>(Err(DatabaseError::Validation("abort".into())))
            .await
            .unwrap_err();
        let after = read.await.unwrap_err();
        assert!(matches!(after, DatabaseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn policy_and_domain_accessors() {
        let svc = CrmService::new_local(":memory:", ClaimPolicy::new(30))
            .await
            .unwrap()
            .with_allowed_email_domain("coopercard.com.br");
        assert_eq!(svc.policy().window_days(), 30);
        assert_eq!(svc.allowed_email_domain(), "coopercard.com.br");
    }
}
