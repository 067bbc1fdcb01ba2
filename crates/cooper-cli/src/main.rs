use anyhow::Context;
use clap::Parser;
use cooper_config::CooperConfig;
use cooper_core::errors::CoreError;
use cooper_db::error::DatabaseError;

mod cli;
mod commands;
mod context;
mod output;
mod ui;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("cooper error: {error:#}");
        std::process::exit(exit_code(&error));
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    if let cli::Commands::Schema(args) = &cli.command {
        return commands::schema::handle(args, &flags);
    }

    let config = CooperConfig::load_with_dotenv().context("failed to load configuration")?;
    let ctx = context::AppContext::init(config, &flags)
        .await
        .context("failed to initialize cooper application context")?;

    commands::dispatch::dispatch(&cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("COOPER_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// Process exit status: 2 invalid input, 3 ownership denied, 4 not found,
/// 5 conflict or busy database (safe to rerun), 1 anything else.
fn exit_code(error: &anyhow::Error) -> i32 {
    for cause in error.chain() {
        if let Some(db) = cause.downcast_ref::<DatabaseError>() {
            return match db {
                DatabaseError::Validation(_) => 2,
                DatabaseError::Forbidden { .. } => 3,
                DatabaseError::NotFound { .. } => 4,
                other if other.is_retryable() => 5,
                _ => 1,
            };
        }
        if let Some(core) = cause.downcast_ref::<CoreError>() {
            return match core {
                CoreError::Validation(_) => 2,
                CoreError::NotFound { .. } => 4,
                CoreError::Other(_) => 1,
            };
        }
    }
    1
}

#[cfg(test)]
mod tests {
    use cooper_core::enums::EntityType;
    use cooper_core::policy::DenialReason;

    use super::*;

    #[test]
    fn exit_codes_follow_error_kind() {
        let forbidden = anyhow::Error::from(DatabaseError::Forbidden {
            reason: DenialReason::NotOwnerWindowOpen {
                days_since_interaction: 10,
                window_days: 90,
            },
        });
        assert_eq!(exit_code(&forbidden), 3);

        let missing = anyhow::Error::from(DatabaseError::not_found(EntityType::Opportunity, "opp-x"));
        assert_eq!(exit_code(&missing), 4);

        let conflict = anyhow::Error::from(DatabaseError::ConcurrencyConflict {
            entity_id: "opp-x".into(),
        });
        assert_eq!(exit_code(&conflict), 5);

        assert_eq!(exit_code(&anyhow::anyhow!("boom")), 1);
    }

    #[test]
    fn exit_code_sees_through_context() {
        let err = anyhow::Error::from(CoreError::Validation("bad status".into()))
            .context("invalid status 'x'");
        assert_eq!(exit_code(&err), 2);
    }
}
