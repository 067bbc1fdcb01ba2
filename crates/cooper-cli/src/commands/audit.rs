use anyhow::Context;
use cooper_core::enums::{AuditAction, EntityType};
use cooper_core::errors::CoreError;
use cooper_db::repos::audit::AuditFilter;
use serde::de::DeserializeOwned;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cooper audit`.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let actor_id = match args.actor.as_deref() {
        Some(actor) if actor.contains('@') => Some(ctx.service.get_user_by_email(actor).await?.id),
        Some(actor) => Some(actor.to_string()),
        None => None,
    };

    let filter = AuditFilter {
        entity_type: args
            .entity_type
            .as_deref()
            .map(|raw| parse_snake::<EntityType>(raw, "entity type"))
            .transpose()?,
        entity_id: args.entity_id.clone(),
        action: args
            .action
            .as_deref()
            .map(|raw| parse_snake::<AuditAction>(raw, "action"))
            .transpose()?,
        actor_id,
        limit: Some(effective_limit(None, flags.limit, ctx.config.general.default_limit)),
    };

    let entries = ctx.service.query_audit(&filter).await?;
    output(&entries, flags.format)
}

/// Parse a `snake_case` enum through its serde representation.
fn parse_snake<T: DeserializeOwned>(raw: &str, field: &str) -> anyhow::Result<T> {
    let value = serde_json::Value::String(raw.trim().to_lowercase().replace('-', "_"));
    serde_json::from_value(value)
        .map_err(|_| CoreError::Validation(format!("unknown {field}")))
        .with_context(|| format!("invalid {field} '{raw}'"))
}
