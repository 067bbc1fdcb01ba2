//! Ownership claims: the policy gate shared by every mutation, plus the
//! read-only claim views.

use chrono::{DateTime, TimeDelta, Utc};
use cooper_core::audit_detail::OwnershipTransferredDetail;
use cooper_core::entities::Opportunity;
use cooper_core::enums::{AuditAction, EntityType};
use cooper_core::policy::{ClaimPolicy, ClaimStatus, Decision};

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, to_detail};
use crate::repos::audit;
use crate::repos::opportunity::{SELECT_COLS, require_opportunity};
use crate::repos::user::require_user;
use crate::service::CrmService;

/// Load the opportunity and acting user, then evaluate the policy.
///
/// Returns the current row and, when the write claims it, the new owner.
pub(crate) async fn authorize(
    conn: &libsql::Connection,
    policy: ClaimPolicy,
    opportunity_id: &str,
    acting_user_id: &str,
    now: DateTime<Utc>,
) -> Result<(Opportunity, Option<String>), DatabaseError> {
    let current = require_opportunity(conn, opportunity_id).await?;
    require_user(conn, acting_user_id).await?;

    match policy.evaluate_for(&current, acting_user_id, now) {
        Decision::Allowed { new_owner_id } => Ok((current, new_owner_id)),
        Decision::Denied { reason } => Err(DatabaseError::Forbidden { reason }),
    }
}

/// Audit an ownership change caused by a claim.
pub(crate) async fn record_transfer(
    conn: &libsql::Connection,
    previous: &Opportunity,
    new_owner_id: &str,
    now: DateTime<Utc>,
) -> Result<(), DatabaseError> {
    let detail = OwnershipTransferredDetail {
        from_owner_id: previous.owner_id.clone(),
        to_owner_id: new_owner_id.to_string(),
        days_since_interaction: ClaimPolicy::elapsed_days(previous.last_interaction_at, now),
    };
    tracing::info!(
        opportunity_id = %previous.id,
        from = %detail.from_owner_id,
        to = %detail.to_owner_id,
        days = detail.days_since_interaction,
        "ownership transferred"
    );
    audit::record(
        conn,
        Some(new_owner_id),
        EntityType::Opportunity,
        &previous.id,
        AuditAction::OwnershipTransferred,
        Some(to_detail(&detail)?),
        now,
    )
    .await?;
    Ok(())
}

impl CrmService {
    /// Claim view of one opportunity for `acting_user_id`. Read-only.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown opportunity.
    pub async fn claim_status(
        &self,
        opportunity_id: &str,
        acting_user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ClaimStatus, DatabaseError> {
        let opportunity = self.get_opportunity(opportunity_id).await?;
        Ok(self.policy().claim_status(&opportunity, acting_user_id, now))
    }

    /// Opportunities owned by someone else that `acting_user_id` may claim
    /// right now, stalest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_claimable(
        &self,
        acting_user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Opportunity>, DatabaseError> {
        let policy = self.policy();
        let Some(cutoff) = TimeDelta::try_days(i64::from(policy.window_days()) + 1)
            .and_then(|window| now.checked_sub_signed(window))
        else {
            return Ok(Vec::new());
        };

        let sql = format!(
            "SELECT {SELECT_COLS} FROM opportunities \
             WHERE owner_id != ?1 AND last_interaction_at <= ?2 \
             ORDER BY last_interaction_at, id"
        );
        let candidates = self
            .collect_opportunities(&sql, vec![acting_user_id.into(), format_datetime(cutoff).into()])
            .await?;

        Ok(candidates
            .into_iter()
            .filter(|opp| policy.is_free_to_claim(opp.last_interaction_at, now))
            .collect())
    }
}
