use clap::Subcommand;

/// Interaction commands.
#[derive(Clone, Debug, Subcommand)]
pub enum InteractionCommands {
    /// Log an interaction on an opportunity.
    Log {
        opportunity_id: String,
        /// call, email, meeting, or any other label
        #[arg(long)]
        kind: String,
        #[arg(long)]
        notes: Option<String>,
        /// When it happened (RFC 3339 or YYYY-MM-DD); defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// List interactions of an opportunity.
    List { opportunity_id: String },
}
