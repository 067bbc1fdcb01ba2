//! Opportunity repository: creation, reads, and ownership-gated updates.

use chrono::{DateTime, Utc};
use cooper_core::entities::{NewOpportunity, Opportunity};
use cooper_core::enums::{AuditAction, EntityType};
use cooper_core::ids::PREFIX_OPPORTUNITY;
use cooper_core::policy::ClaimPolicy;
use cooper_core::validate::{check_estimated_value, normalize_cnpj, normalize_company_name};

use crate::error::DatabaseError;
use crate::generate_id;
use crate::helpers::{format_datetime, parse_datetime, parse_enum, parse_opt_enum, to_detail};
use crate::repos::{audit, claim, user};
use crate::service::CrmService;
use crate::updates::opportunity::OpportunityUpdate;

pub(crate) const SELECT_COLS: &str = "id, cnpj, company_name, owner_id, status, temperature, product, \
     estimated_value, created_at, last_interaction_at, revision";

pub(crate) fn row_to_opportunity(row: &libsql::Row) -> Result<Opportunity, DatabaseError> {
    Ok(Opportunity {
        id: row.get(0)?,
        cnpj: row.get(1)?,
        company_name: row.get(2)?,
        owner_id: row.get(3)?,
        status: parse_enum(&row.get::<String>(4)?)?,
        temperature: parse_opt_enum(row, 5)?,
        product: parse_opt_enum(row, 6)?,
        estimated_value: row.get::<f64>(7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        last_interaction_at: parse_datetime(&row.get::<String>(9)?)?,
        revision: row.get::<i64>(10)?,
    })
}

/// # Errors
///
/// Returns `DatabaseError` if the query fails.
pub async fn fetch_opportunity(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Option<Opportunity>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM opportunities WHERE id = ?1"),
            [id],
        )
        .await?;
    rows.next().await?.as_ref().map(row_to_opportunity).transpose()
}

/// # Errors
///
/// Returns `DatabaseError::NotFound` for an unknown id.
pub async fn require_opportunity(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Opportunity, DatabaseError> {
    fetch_opportunity(conn, id)
        .await?
        .ok_or_else(|| DatabaseError::not_found(EntityType::Opportunity, id))
}

/// Write `columns` onto the opportunity and bump its revision, provided the
/// stored revision still equals `current.revision`.
///
/// # Errors
///
/// Returns `DatabaseError::ConcurrencyConflict` when the row changed since
/// `current` was read.
pub(crate) async fn write_columns(
    conn: &libsql::Connection,
    current: &Opportunity,
    columns: Vec<(&'static str, libsql::Value)>,
) -> Result<(), DatabaseError> {
    let mut sets = Vec::with_capacity(columns.len() + 1);
    let mut params: Vec<libsql::Value> = Vec::with_capacity(columns.len() + 2);
    for (column, value) in columns {
        params.push(value);
        sets.push(format!("{column} = ?{}", params.len()));
    }
    sets.push("revision = revision + 1".to_string());

    params.push(current.id.clone().into());
    let id_idx = params.len();
    params.push(current.revision.into());
    let rev_idx = params.len();

    let sql = format!(
        "UPDATE opportunities SET {} WHERE id = ?{id_idx} AND revision = ?{rev_idx}",
        sets.join(", ")
    );
    let affected = conn.execute(&sql, libsql::params_from_iter(params)).await?;
    if affected == 0 {
        tracing::warn!(
            opportunity_id = %current.id,
            expected_revision = current.revision,
            "revision check failed"
        );
        return Err(DatabaseError::ConcurrencyConflict {
            entity_id: current.id.clone(),
        });
    }
    Ok(())
}

fn patch_columns(patch: &OpportunityUpdate) -> Vec<(&'static str, libsql::Value)> {
    let mut columns: Vec<(&'static str, libsql::Value)> = Vec::new();
    if let Some(ref name) = patch.company_name {
        columns.push(("company_name", name.clone().into()));
    }
    if let Some(status) = patch.status {
        columns.push(("status", status.as_str().into()));
    }
    if let Some(temperature) = patch.temperature {
        columns.push((
            "temperature",
            temperature.map_or(libsql::Value::Null, |t| t.as_str().into()),
        ));
    }
    if let Some(product) = patch.product {
        columns.push((
            "product",
            product.map_or(libsql::Value::Null, |p| p.as_str().into()),
        ));
    }
    if let Some(value) = patch.estimated_value {
        columns.push(("estimated_value", value.into()));
    }
    columns
}

async fn insert_opportunity(
    conn: &libsql::Connection,
    owner_id: &str,
    new: NewOpportunity,
    now: DateTime<Utc>,
) -> Result<Opportunity, DatabaseError> {
    user::require_user(conn, owner_id).await?;

    let id = generate_id(conn, PREFIX_OPPORTUNITY).await?;
    let opportunity = Opportunity {
        id,
        cnpj: new.cnpj,
        company_name: new.company_name,
        owner_id: owner_id.to_string(),
        status: new.status,
        temperature: new.temperature,
        product: new.product,
        estimated_value: new.estimated_value,
        created_at: now,
        last_interaction_at: new.last_interaction_at.unwrap_or(now),
        revision: 0,
    };

    conn.execute(
        "INSERT INTO opportunities (id, cnpj, company_name, owner_id, status, temperature, product,
             estimated_value, created_at, last_interaction_at, revision)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        libsql::params![
            opportunity.id.as_str(),
            opportunity.cnpj.as_str(),
            opportunity.company_name.as_str(),
            opportunity.owner_id.as_str(),
            opportunity.status.as_str(),
            opportunity.temperature.map(|t| t.as_str()),
            opportunity.product.map(|p| p.as_str()),
            opportunity.estimated_value,
            format_datetime(opportunity.created_at),
            format_datetime(opportunity.last_interaction_at),
            opportunity.revision
        ],
    )
    .await?;

    audit::record(
        conn,
        Some(owner_id),
        EntityType::Opportunity,
        &opportunity.id,
        AuditAction::Created,
        Some(to_detail(&opportunity)?),
        now,
    )
    .await?;

    Ok(opportunity)
}

async fn update_in_tx(
    conn: &libsql::Connection,
    policy: ClaimPolicy,
    opportunity_id: &str,
    patch: &OpportunityUpdate,
    acting_user_id: &str,
    now: DateTime<Utc>,
) -> Result<Opportunity, DatabaseError> {
    let (current, new_owner) =
        claim::authorize(conn, policy, opportunity_id, acting_user_id, now).await?;

    let mut columns = Vec::new();
    if let Some(ref owner) = new_owner {
        columns.push(("owner_id", libsql::Value::from(owner.clone())));
    }
    columns.extend(patch_columns(patch));
    columns.push(("last_interaction_at", format_datetime(now).into()));
    write_columns(conn, &current, columns).await?;

    if let Some(ref owner) = new_owner {
        claim::record_transfer(conn, &current, owner, now).await?;
    }
    audit::record(
        conn,
        Some(acting_user_id),
        EntityType::Opportunity,
        opportunity_id,
        AuditAction::Updated,
        Some(to_detail(patch)?),
        now,
    )
    .await?;

    require_opportunity(conn, opportunity_id).await
}

impl CrmService {
    /// Create an opportunity owned by `owner_id`.
    ///
    /// `last_interaction_at` defaults to `now` unless the input backdates it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for a bad CNPJ, name, or value, and
    /// `DatabaseError::NotFound` if the owner does not exist.
    pub async fn create_opportunity(
        &self,
        owner_id: &str,
        new: NewOpportunity,
        now: DateTime<Utc>,
    ) -> Result<Opportunity, DatabaseError> {
        let new = NewOpportunity {
            cnpj: normalize_cnpj(&new.cnpj)?,
            company_name: normalize_company_name(&new.company_name)?,
            estimated_value: check_estimated_value(new.estimated_value)?,
            ..new
        };

        let uow = self.begin().await?;
        let result = insert_opportunity(uow.conn(), owner_id, new, now).await;
        let opportunity = uow.finish(result).await?;
        tracing::info!(opportunity_id = %opportunity.id, owner_id, "opportunity created");
        Ok(opportunity)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown id.
    pub async fn get_opportunity(&self, id: &str) -> Result<Opportunity, DatabaseError> {
        let _read = self.read_gate().await;
        require_opportunity(self.db().conn(), id).await
    }

    /// Page through all opportunities, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_opportunities(
        &self,
        skip: u32,
        limit: u32,
    ) -> Result<Vec<Opportunity>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM opportunities \
             ORDER BY created_at DESC, id LIMIT {limit} OFFSET {skip}"
        );
        self.collect_opportunities(&sql, Vec::new()).await
    }

    /// Opportunities currently owned by `user_id`, most recently touched first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_owned_by(&self, user_id: &str) -> Result<Vec<Opportunity>, DatabaseError> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM opportunities WHERE owner_id = ?1 \
             ORDER BY last_interaction_at DESC, id"
        );
        self.collect_opportunities(&sql, vec![user_id.into()]).await
    }

    pub(crate) async fn collect_opportunities(
        &self,
        sql: &str,
        params: Vec<libsql::Value>,
    ) -> Result<Vec<Opportunity>, DatabaseError> {
        let _read = self.read_gate().await;
        let mut rows = self
            .db()
            .conn()
            .query(sql, libsql::params_from_iter(params))
            .await?;
        let mut opportunities = Vec::new();
        while let Some(row) = rows.next().await? {
            opportunities.push(row_to_opportunity(&row)?);
        }
        Ok(opportunities)
    }

    /// Apply a partial update on behalf of `acting_user_id`.
    ///
    /// The claim policy gates the write. A non-owner past the claim window
    /// takes ownership as part of the same transaction. Present fields are
    /// written, omitted ones are untouched, `last_interaction_at` becomes
    /// `now` and the revision is bumped.
    ///
    /// # Errors
    ///
    /// - `Validation` if the patch is malformed (nothing is read or written)
    /// - `NotFound` for an unknown opportunity or acting user
    /// - `Forbidden` if the policy denies the write
    /// - `ConcurrencyConflict` if the row changed underneath (retryable)
    pub async fn update_fields(
        &self,
        opportunity_id: &str,
        patch: &OpportunityUpdate,
        acting_user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Opportunity, DatabaseError> {
        let patch = patch.clone().normalized()?;

        let uow = self.begin().await?;
        let result = update_in_tx(
            uow.conn(),
            self.policy(),
            opportunity_id,
            &patch,
            acting_user_id,
            now,
        )
        .await;
        uow.finish(result).await
    }

    /// Touch an opportunity without changing any field: claims it when the
    /// window has elapsed, and resets the clock either way.
    ///
    /// # Errors
    ///
    /// Same as [`Self::update_fields`].
    pub async fn claim_opportunity(
        &self,
        opportunity_id: &str,
        acting_user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Opportunity, DatabaseError> {
        self.update_fields(
            opportunity_id,
            &OpportunityUpdate::default(),
            acting_user_id,
            now,
        )
        .await
    }
}
