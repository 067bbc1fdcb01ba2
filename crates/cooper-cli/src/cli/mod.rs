use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `cooper` binary.
#[derive(Debug, Parser)]
#[command(name = "cooper", version, about = "Cooper CRM - sales pipeline with ownership claims")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Act as the user with this email (defaults to auth.default_user)
    #[arg(long = "as", global = true, value_name = "EMAIL")]
    pub acting_as: Option<String>,

    /// Database file (defaults to database.path from config)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only in logs)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
            acting_as: self.acting_as.clone(),
            db: self.db.clone(),
        }
    }
}
