use cooper_core::entities::NewInteraction;
use cooper_core::enums::InteractionKind;
use cooper_db::retry::{RetryConfig, with_conflict_retry};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::InteractionCommands;
use crate::commands::shared::parse::{parse_label, parse_timestamp};
use crate::context::AppContext;
use crate::output::output;

/// Handle `cooper interaction`.
pub async fn handle(
    action: &InteractionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        InteractionCommands::Log {
            opportunity_id,
            kind,
            notes,
            at,
        } => {
            let data = build_new_interaction(kind, notes.as_deref(), at.as_deref())?;
            let actor = ctx.acting_user().await?;
            let now = ctx.now();
            let interaction = with_conflict_retry(&RetryConfig::default(), || {
                ctx.service
                    .log_interaction(opportunity_id, &data, &actor.user_id, now)
            })
            .await?;
            output(&interaction, flags.format)
        }
        InteractionCommands::List { opportunity_id } => {
            let interactions = ctx.service.list_interactions(opportunity_id).await?;
            output(&interactions, flags.format)
        }
    }
}

fn build_new_interaction(
    kind: &str,
    notes: Option<&str>,
    at: Option<&str>,
) -> anyhow::Result<NewInteraction> {
    let mut data = NewInteraction::new(parse_label::<InteractionKind>(kind, "kind")?);
    if let Some(notes) = notes {
        data = data.notes(notes);
    }
    if let Some(at) = at {
        data = data.occurred_at(parse_timestamp(at, "--at")?);
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn known_and_free_form_kinds() {
        let data = build_new_interaction("Reunião", Some("demo"), Some("2025-06-01")).unwrap();
        assert_eq!(data.kind, InteractionKind::Meeting);
        assert_eq!(data.notes.as_deref(), Some("demo"));
        assert_eq!(
            data.occurred_at,
            Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap())
        );

        let data = build_new_interaction("whatsapp", None, None).unwrap();
        assert_eq!(data.kind, InteractionKind::Other("whatsapp".into()));
        assert_eq!(data.occurred_at, None);
    }

    #[test]
    fn empty_kind_rejected() {
        assert!(build_new_interaction("  ", None, None).is_err());
    }
}
