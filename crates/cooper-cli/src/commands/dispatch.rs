use crate::cli::{Commands, GlobalFlags};
use crate::commands;
use crate::context::AppContext;

/// Route a parsed command to its handler.
pub async fn dispatch(command: &Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::User { action } => commands::user::handle(action, ctx, flags).await,
        Commands::Opp { action } => commands::opportunity::handle(action, ctx, flags).await,
        Commands::Interaction { action } => commands::interaction::handle(action, ctx, flags).await,
        Commands::Audit(args) => commands::audit::handle(args, ctx, flags).await,
        Commands::Schema(args) => commands::schema::handle(args, flags),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use cooper_config::CooperConfig;
    use cooper_core::clock::FixedClock;
    use cooper_core::entities::NewOpportunity;
    use cooper_core::policy::ClaimPolicy;
    use cooper_db::error::DatabaseError;
    use cooper_db::service::CrmService;

    use super::*;
    use crate::cli::OutputFormat;
    use crate::cli::subcommands::OpportunityCommands;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 9, 30, 0).unwrap()
    }

    fn flags() -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Raw,
            limit: None,
            quiet: true,
            verbose: false,
            acting_as: None,
            db: None,
        }
    }

    async fn context_as(path: &str, email: &str) -> AppContext {
        let service = CrmService::new_local(path, ClaimPolicy::default()).await.unwrap();
        AppContext::new(
            service,
            CooperConfig::default(),
            Box::new(FixedClock::new(now())),
            Some(email.to_string()),
        )
    }

    #[tokio::test]
    async fn claim_and_update_go_through_policy() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("crm.db");
        let path = path.to_str().unwrap();

        let ana = context_as(path, "ana@coopercard.com.br").await;
        let owner = ana
            .service
            .create_user("ana@coopercard.com.br", Some("Ana"), now())
            .await
            .unwrap();
        ana.service
            .create_user("bruno@coopercard.com.br", None, now())
            .await
            .unwrap();

        let stale = ana
            .service
            .create_opportunity(
                &owner.id,
                NewOpportunity {
                    last_interaction_at: Some(now() - TimeDelta::days(120)),
                    ..NewOpportunity::new("12.345.678/0001-90", "Padaria Estrela")
                },
                now(),
            )
            .await
            .unwrap();
        let fresh = ana
            .service
            .create_opportunity(&owner.id, NewOpportunity::new("98.765.432/0001-10", "Mercado Sol"), now())
            .await
            .unwrap();

        let bruno = context_as(path, "bruno@coopercard.com.br").await;

        let claim = Commands::Opp {
            action: OpportunityCommands::Claim { id: stale.id.clone() },
        };
        dispatch(&claim, &bruno, &flags()).await.unwrap();
        let claimed = bruno.service.get_opportunity(&stale.id).await.unwrap();
        assert_ne!(claimed.owner_id, owner.id);

        let update = Commands::Opp {
            action: OpportunityCommands::Update {
                id: fresh.id.clone(),
                company: None,
                status: Some("proposta".into()),
                temperature: None,
                product: None,
                value: None,
            },
        };
        let err = dispatch(&update, &bruno, &flags()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DatabaseError>(),
            Some(DatabaseError::Forbidden { .. })
        ));
        let untouched = bruno.service.get_opportunity(&fresh.id).await.unwrap();
        assert_eq!(untouched.owner_id, owner.id);
        assert_eq!(untouched.revision, fresh.revision);
    }
}
