use clap::Subcommand;

/// User commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Register a user.
    Create {
        email: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// List users.
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get a user by ID or email.
    Get { id_or_email: String },
}
