//! User repository: registration and lookup.

use chrono::{DateTime, Utc};
use cooper_core::entities::User;
use cooper_core::enums::{AuditAction, EntityType};
use cooper_core::ids::PREFIX_USER;
use cooper_core::validate::normalize_email;

use crate::error::DatabaseError;
use crate::generate_id;
use crate::helpers::{format_datetime, get_opt_string, parse_datetime};
use crate::repos::audit;
use crate::service::CrmService;

const SELECT_COLS: &str = "id, email, name, created_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: get_opt_string(row, 2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

/// Look a user up by id on an open connection or transaction.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn fetch_user(conn: &libsql::Connection, id: &str) -> Result<Option<User>, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"), [id])
        .await?;
    rows.next().await?.as_ref().map(row_to_user).transpose()
}

async fn fetch_user_by_email(
    conn: &libsql::Connection,
    email: &str,
) -> Result<Option<User>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM users WHERE email = ?1"),
            [email],
        )
        .await?;
    rows.next().await?.as_ref().map(row_to_user).transpose()
}

/// Fail with `NotFound` unless the user exists.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` for an unknown id.
pub async fn require_user(conn: &libsql::Connection, id: &str) -> Result<User, DatabaseError> {
    fetch_user(conn, id)
        .await?
        .ok_or_else(|| DatabaseError::not_found(EntityType::User, id))
}

async fn insert_user(
    conn: &libsql::Connection,
    email: &str,
    name: Option<String>,
    now: DateTime<Utc>,
) -> Result<User, DatabaseError> {
    if fetch_user_by_email(conn, email).await?.is_some() {
        return Err(DatabaseError::Validation(
            "email already registered".to_string(),
        ));
    }

    let id = generate_id(conn, PREFIX_USER).await?;
    conn.execute(
        "INSERT INTO users (id, email, name, created_at) VALUES (?1, ?2, ?3, ?4)",
        libsql::params![id.as_str(), email, name.as_deref(), format_datetime(now)],
    )
    .await?;

    audit::record(
        conn,
        None,
        EntityType::User,
        &id,
        AuditAction::Created,
        None,
        now,
    )
    .await?;

    Ok(User {
        id,
        email: email.to_string(),
        name,
        created_at: now,
    })
}

impl CrmService {
    /// Register a user. The email is trimmed and lowercased and must match
    /// the configured domain, if any.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for a malformed, foreign-domain, or
    /// already registered email.
    pub async fn create_user(
        &self,
        email: &str,
        name: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<User, DatabaseError> {
        let email = normalize_email(email, self.allowed_email_domain())?;
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from);

        let uow = self.begin().await?;
        let result = insert_user(uow.conn(), &email, name, now).await;
        let user = uow.finish(result).await?;
        tracing::info!(user_id = %user.id, email = %user.email, "user created");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown id.
    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        let _read = self.read_gate().await;
        require_user(self.db().conn(), id).await
    }

    /// Look up by email, normalized the same way as at registration.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when no user has that email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<User, DatabaseError> {
        let normalized = email.trim().to_lowercase();
        let _read = self.read_gate().await;
        fetch_user_by_email(self.db().conn(), &normalized)
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::User, &normalized))
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_users(&self, limit: u32) -> Result<Vec<User>, DatabaseError> {
        let _read = self.read_gate().await;
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users ORDER BY email LIMIT {limit}"),
                (),
            )
            .await?;

        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }
}
