//! Shared test utilities for cooper-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use cooper_core::entities::{NewOpportunity, Opportunity, User};
    use cooper_core::policy::ClaimPolicy;

    use crate::CrmDb;
    use crate::service::CrmService;

    /// In-memory service with the default 90-day window.
    pub async fn test_service() -> CrmService {
        let db = CrmDb::open_local(":memory:").await.unwrap();
        CrmService::from_db(db, ClaimPolicy::default())
    }

    /// Fixed reference instant used as "now" across tests.
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 9, 30, 0).unwrap()
    }

    pub fn days_ago(days: i64) -> DateTime<Utc> {
        now() - TimeDelta::days(days)
    }

    pub async fn seed_user(svc: &CrmService, email: &str) -> User {
        svc.create_user(email, None, now()).await.unwrap()
    }

    /// An opportunity owned by `owner` whose last interaction was `days` ago.
    pub async fn seed_opportunity(svc: &CrmService, owner: &User, days: i64) -> Opportunity {
        let new = NewOpportunity {
            last_interaction_at: Some(days_ago(days)),
            ..NewOpportunity::new("12.345.678/0001-90", "Padaria Estrela LTDA")
        };
        svc.create_opportunity(&owner.id, new, days_ago(days))
            .await
            .unwrap()
    }
}
