use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use cooper_config::CooperConfig;
use cooper_core::clock::{Clock, SystemClock};
use cooper_core::identity::ActingUser;
use cooper_core::policy::ClaimPolicy;
use cooper_db::service::CrmService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: CrmService,
    pub config: CooperConfig,
    clock: Box<dyn Clock>,
    acting_email: Option<String>,
}

impl AppContext {
    /// Open the database named by `--db` or `database.path`.
    pub async fn init(config: CooperConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let db_path = flags
            .db
            .clone()
            .unwrap_or_else(|| config.database.path.clone());
        ensure_parent_dir(&db_path)?;

        let policy = ClaimPolicy::new(config.claim.window_days);
        let service = CrmService::new_local_with(
            &db_path,
            policy,
            Duration::from_millis(config.database.busy_timeout_ms),
        )
        .await
        .with_context(|| format!("failed to open database at {db_path}"))?
        .with_allowed_email_domain(config.auth.allowed_email_domain.clone());

        let acting_email = flags
            .acting_as
            .clone()
            .or_else(|| config.auth.has_default_user().then(|| config.auth.default_user.clone()));

        tracing::debug!(db_path, window_days = policy.window_days(), "context ready");
        Ok(Self::new(service, config, Box::new(SystemClock), acting_email))
    }

    pub fn new(
        service: CrmService,
        config: CooperConfig,
        clock: Box<dyn Clock>,
        acting_email: Option<String>,
    ) -> Self {
        Self {
            service,
            config,
            clock,
            acting_email,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Resolve the acting user from `--as` or `auth.default_user`.
    pub async fn acting_user(&self) -> anyhow::Result<ActingUser> {
        let email = self.acting_email.as_deref().context(
            "no acting user: pass --as <email> or set auth.default_user in .cooper/config.toml",
        )?;
        let user = self.service.get_user_by_email(email).await?;
        Ok(ActingUser {
            user_id: user.id,
            email: user.email,
        })
    }
}

fn ensure_parent_dir(db_path: &str) -> anyhow::Result<()> {
    if db_path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = Path::new(db_path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}
