use cooper_core::audit_detail::{InteractionLoggedDetail, OwnershipTransferredDetail};
use cooper_core::entities::{AuditEntry, Interaction, NewInteraction, NewOpportunity, Opportunity, User};
use cooper_core::identity::ActingUser;
use cooper_core::policy::ClaimStatus;
use schemars::schema_for;

use crate::cli::root_commands::SchemaArgs;
use crate::cli::GlobalFlags;
use crate::output::output;

const TYPE_NAMES: &[&str] = &[
    "user",
    "opportunity",
    "new-opportunity",
    "interaction",
    "new-interaction",
    "audit-entry",
    "claim-status",
    "acting-user",
    "ownership-transferred",
    "interaction-logged",
];

/// Handle `cooper schema <type>`. Needs no database.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema_for_name(&args.type_name)?, flags.format)
}

fn schema_for_name(name: &str) -> anyhow::Result<serde_json::Value> {
    let schema = match name.trim().to_lowercase().replace('_', "-").as_str() {
        "user" => schema_for!(User),
        "opportunity" => schema_for!(Opportunity),
        "new-opportunity" => schema_for!(NewOpportunity),
        "interaction" => schema_for!(Interaction),
        "new-interaction" => schema_for!(NewInteraction),
        "audit-entry" | "audit" => schema_for!(AuditEntry),
        "claim-status" => schema_for!(ClaimStatus),
        "acting-user" => schema_for!(ActingUser),
        "ownership-transferred" => schema_for!(OwnershipTransferredDetail),
        "interaction-logged" => schema_for!(InteractionLoggedDetail),
        _ => anyhow::bail!(
            "unknown schema type '{name}'. Available: {}",
            TYPE_NAMES.join(", ")
        ),
    };
    Ok(serde_json::to_value(schema)?)
}
