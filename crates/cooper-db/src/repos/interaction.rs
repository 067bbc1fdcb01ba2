//! Interaction repository: append-only contact log per opportunity.

use chrono::{DateTime, Utc};
use cooper_core::audit_detail::InteractionLoggedDetail;
use cooper_core::entities::{Interaction, NewInteraction};
use cooper_core::enums::{AuditAction, EntityType, InteractionKind};
use cooper_core::ids::PREFIX_INTERACTION;
use cooper_core::policy::ClaimPolicy;

use crate::error::DatabaseError;
use crate::generate_id;
use crate::helpers::{format_datetime, get_opt_string, parse_datetime, parse_enum, to_detail};
use crate::repos::opportunity::{require_opportunity, write_columns};
use crate::repos::{audit, claim};
use crate::service::CrmService;

const SELECT_COLS: &str = "id, opportunity_id, kind, notes, occurred_at, logged_by, created_at";

fn row_to_interaction(row: &libsql::Row) -> Result<Interaction, DatabaseError> {
    Ok(Interaction {
        id: row.get(0)?,
        opportunity_id: row.get(1)?,
        kind: parse_enum(&row.get::<String>(2)?)?,
        notes: get_opt_string(row, 3)?,
        occurred_at: parse_datetime(&row.get::<String>(4)?)?,
        logged_by: row.get(5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

/// Trim notes and re-parse the kind, so `Other("Call")` is stored as `call`
/// and reads back equal to what was returned.
fn normalized(data: &NewInteraction) -> Result<NewInteraction, DatabaseError> {
    Ok(NewInteraction {
        kind: data.kind.as_str().parse::<InteractionKind>()?,
        notes: data
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from),
        occurred_at: data.occurred_at,
    })
}

async fn log_in_tx(
    conn: &libsql::Connection,
    policy: ClaimPolicy,
    opportunity_id: &str,
    data: NewInteraction,
    acting_user_id: &str,
    now: DateTime<Utc>,
) -> Result<Interaction, DatabaseError> {
    let (current, new_owner) =
        claim::authorize(conn, policy, opportunity_id, acting_user_id, now).await?;

    let interaction = Interaction {
        id: generate_id(conn, PREFIX_INTERACTION).await?,
        opportunity_id: opportunity_id.to_string(),
        kind: data.kind,
        notes: data.notes,
        occurred_at: data.occurred_at.unwrap_or(now),
        logged_by: acting_user_id.to_string(),
        created_at: now,
    };
    conn.execute(
        "INSERT INTO interactions (id, opportunity_id, kind, notes, occurred_at, logged_by, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        libsql::params![
            interaction.id.as_str(),
            interaction.opportunity_id.as_str(),
            interaction.kind.as_str(),
            interaction.notes.as_deref(),
            format_datetime(interaction.occurred_at),
            interaction.logged_by.as_str(),
            format_datetime(interaction.created_at)
        ],
    )
    .await?;

    // The interaction's own date becomes the last contact, even if older.
    let mut columns = Vec::new();
    if let Some(ref owner) = new_owner {
        columns.push(("owner_id", libsql::Value::from(owner.clone())));
    }
    columns.push((
        "last_interaction_at",
        format_datetime(interaction.occurred_at).into(),
    ));
    write_columns(conn, &current, columns).await?;

    if let Some(ref owner) = new_owner {
        claim::record_transfer(conn, &current, owner, now).await?;
    }
    let detail = InteractionLoggedDetail {
        interaction_id: interaction.id.clone(),
        occurred_at: interaction.occurred_at,
        previous_last_interaction_at: current.last_interaction_at,
    };
    audit::record(
        conn,
        Some(acting_user_id),
        EntityType::Opportunity,
        opportunity_id,
        AuditAction::InteractionLogged,
        Some(to_detail(&detail)?),
        now,
    )
    .await?;

    Ok(interaction)
}

impl CrmService {
    /// Log an interaction on behalf of `acting_user_id`.
    ///
    /// Gated by the claim policy exactly like [`Self::update_fields`]. On
    /// success the opportunity's `last_interaction_at` is set to the
    /// interaction's `occurred_at` (defaulting to `now`).
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty interaction type
    /// - `NotFound` for an unknown opportunity or acting user
    /// - `Forbidden` if the policy denies the write
    /// - `ConcurrencyConflict` if the row changed underneath (retryable)
    pub async fn log_interaction(
        &self,
        opportunity_id: &str,
        data: &NewInteraction,
        acting_user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Interaction, DatabaseError> {
        let data = normalized(data)?;

        let uow = self.begin().await?;
        let result = log_in_tx(
            uow.conn(),
            self.policy(),
            opportunity_id,
            data,
            acting_user_id,
            now,
        )
        .await;
        let interaction = uow.finish(result).await?;
        tracing::debug!(
            interaction_id = %interaction.id,
            opportunity_id,
            kind = %interaction.kind,
            "interaction logged"
        );
        Ok(interaction)
    }

    /// Interactions of one opportunity, most recent `occurred_at` first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` for an unknown opportunity.
    pub async fn list_interactions(
        &self,
        opportunity_id: &str,
    ) -> Result<Vec<Interaction>, DatabaseError> {
        let _read = self.read_gate().await;
        let conn = self.db().conn();
        require_opportunity(conn, opportunity_id).await?;

        let mut rows = conn
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM interactions WHERE opportunity_id = ?1 \
                     ORDER BY occurred_at DESC, created_at DESC, id"
                ),
                [opportunity_id],
            )
            .await?;
        let mut interactions = Vec::new();
        while let Some(row) = rows.next().await? {
            interactions.push(row_to_interaction(&row)?);
        }
        Ok(interactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{days_ago, now, seed_opportunity, seed_user, test_service};
    use chrono::TimeDelta;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn owner_logs_interaction() {
        let svc = test_service().await;
        let ana = seed_user(&svc, "ana@x.com").await;
        let opp = seed_opportunity(&svc, &ana, 10).await;

        let logged = svc
            .log_interaction(
                &opp.id,
                &NewInteraction::new(InteractionKind::Call).notes("  retorno  "),
                &ana.id,
                now(),
            )
            .await
            .unwrap();

        assert!(logged.id.starts_with("int-"));
        assert_eq!(logged.notes.as_deref(), Some("retorno"));
        assert_eq!(logged.occurred_at, now());
        assert_eq!(logged.logged_by, ana.id);

        let after = svc.get_opportunity(&opp.id).await.unwrap();
        assert_eq!(after.last_interaction_at, now());
        assert_eq!(after.revision, opp.revision + 1);
        assert_eq!(svc.list_interactions(&opp.id).await.unwrap(), vec![logged]);
    }

    #[tokio::test]
    async fn other_kind_roundtrips_through_storage() {
        let svc = test_service().await;
        let ana = seed_user(&svc, "ana@x.com").await;
        let opp = seed_opportunity(&svc, &ana, 1).await;

        svc.log_interaction(
            &opp.id,
            &NewInteraction::new("WhatsApp".parse().unwrap()),
            &ana.id,
            now(),
        )
        .await
        .unwrap();
        let listed = svc.list_interactions(&opp.id).await.unwrap();
        assert_eq!(listed[0].kind, InteractionKind::Other("whatsapp".into()));
    }

    #[tokio::test]
    async fn hand_built_kind_is_stored_canonically() {
        let svc = test_service().await;
        let ana = seed_user(&svc, "ana@x.com").await;
        let opp = seed_opportunity(&svc, &ana, 1).await;

        let call = svc
            .log_interaction(
                &opp.id,
                &NewInteraction::new(InteractionKind::Other("Call".into())),
                &ana.id,
                now(),
            )
            .await
            .unwrap();
        let visit = svc
            .log_interaction(
                &opp.id,
                &NewInteraction::new(InteractionKind::Other(" Visit ".into())),
                &ana.id,
                now() + TimeDelta::minutes(1),
            )
            .await
            .unwrap();

        assert_eq!(call.kind, InteractionKind::Call);
        assert_eq!(visit.kind, InteractionKind::Other("visit".into()));
        let mut listed = svc.list_interactions(&opp.id).await.unwrap();
        listed.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        assert_eq!(listed, vec![call, visit]);
    }

    #[tokio::test]
    async fn empty_other_kind_rejected() {
        let svc = test_service().await;
        let ana = seed_user(&svc, "ana@x.com").await;
        let opp = seed_opportunity(&svc, &ana, 1).await;

        let err = svc
            .log_interaction(
                &opp.id,
                &NewInteraction::new(InteractionKind::Other("  ".into())),
                &ana.id,
                now(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
        assert!(svc.list_interactions(&opp.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_orders_by_occurred_at_desc() {
        let svc = test_service().await;
        let ana = seed_user(&svc, "ana@x.com").await;
        let opp = seed_opportunity(&svc, &ana, 30).await;

        for days in [20, 5, 12] {
            svc.log_interaction(
                &opp.id,
                &NewInteraction::new(InteractionKind::Email).occurred_at(days_ago(days)),
                &ana.id,
                now(),
            )
            .await
            .unwrap();
        }
        let dates: Vec<_> = svc
            .list_interactions(&opp.id)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.occurred_at)
            .collect();
        assert_eq!(dates, vec![days_ago(5), days_ago(12), days_ago(20)]);
        // Last write wins, not the latest date.
        assert_eq!(
            svc.get_opportunity(&opp.id).await.unwrap().last_interaction_at,
            days_ago(12)
        );
    }

    #[tokio::test]
    async fn audit_detail_records_previous_timestamp() {
        let svc = test_service().await;
        let ana = seed_user(&svc, "ana@x.com").await;
        let opp = seed_opportunity(&svc, &ana, 3).await;
        let occurred = now() - TimeDelta::hours(2);

        let logged = svc
            .log_interaction(
                &opp.id,
                &NewInteraction::new(InteractionKind::Meeting).occurred_at(occurred),
                &ana.id,
                now(),
            )
            .await
            .unwrap();

        let entries = svc
            .query_audit(&crate::repos::audit::AuditFilter {
                action: Some(AuditAction::InteractionLogged),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        let detail: InteractionLoggedDetail =
            serde_json::from_value(entries[0].detail.clone().unwrap()).unwrap();
        assert_eq!(detail.interaction_id, logged.id);
        assert_eq!(detail.occurred_at, occurred);
        assert_eq!(detail.previous_last_interaction_at, days_ago(3));
    }

    #[tokio::test]
    async fn list_unknown_opportunity() {
        let svc = test_service().await;
        assert!(matches!(
            svc.list_interactions("opp-missing").await,
            Err(DatabaseError::NotFound { .. })
        ));
    }
}
