use clap::{Args, Subcommand};

use crate::cli::subcommands::{InteractionCommands, OpportunityCommands, UserCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Users.
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Pipeline opportunities.
    Opp {
        #[command(subcommand)]
        action: OpportunityCommands,
    },
    /// Interactions (calls, emails, meetings).
    Interaction {
        #[command(subcommand)]
        action: InteractionCommands,
    },
    /// Query the audit trail.
    Audit(AuditArgs),
    /// Dump JSON schema for an entity type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    /// user, opportunity, interaction
    #[arg(long)]
    pub entity_type: Option<String>,
    #[arg(long)]
    pub entity_id: Option<String>,
    /// created, updated, ownership_transferred, interaction_logged
    #[arg(long)]
    pub action: Option<String>,
    /// Actor email or id
    #[arg(long)]
    pub actor: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    pub type_name: String,
}
