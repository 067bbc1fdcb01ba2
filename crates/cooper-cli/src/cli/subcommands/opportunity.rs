use clap::Subcommand;

/// Opportunity commands.
#[derive(Clone, Debug, Subcommand)]
pub enum OpportunityCommands {
    /// Create an opportunity owned by the acting user.
    Create {
        #[arg(long)]
        cnpj: String,
        /// Company name (razão social)
        #[arg(long)]
        company: String,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        temperature: Option<String>,
        #[arg(long)]
        product: Option<String>,
        #[arg(long)]
        value: Option<f64>,
        /// Backdate the last contact (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        last_interaction: Option<String>,
    },
    /// Get an opportunity by ID.
    Get { id: String },
    /// List opportunities.
    List {
        /// Only those owned by the acting user
        #[arg(long, conflicts_with_all = ["claimable", "owner"])]
        mine: bool,
        /// Only those the acting user may claim now
        #[arg(long, conflicts_with = "owner")]
        claimable: bool,
        /// Only those owned by this email
        #[arg(long)]
        owner: Option<String>,
        #[arg(long, default_value_t = 0)]
        skip: u32,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Update fields. Claims the opportunity if its window has elapsed.
    Update {
        id: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// Temperature label, or "none" to clear
        #[arg(long)]
        temperature: Option<String>,
        /// Product label, or "none" to clear
        #[arg(long)]
        product: Option<String>,
        #[arg(long)]
        value: Option<f64>,
    },
    /// Claim a stale opportunity without changing fields.
    Claim { id: String },
    /// Show claim status from the acting user's point of view.
    Status { id: String },
}
