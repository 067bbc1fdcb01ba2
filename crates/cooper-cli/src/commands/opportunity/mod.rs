mod create;
mod list;
mod update;

use cooper_db::retry::{RetryConfig, with_conflict_retry};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::OpportunityCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cooper opp`.
pub async fn handle(
    action: &OpportunityCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        OpportunityCommands::Create {
            cnpj,
            company,
            status,
            temperature,
            product,
            value,
            last_interaction,
        } => {
            create::run(
                create::Params {
                    cnpj: cnpj.clone(),
                    company: company.clone(),
                    status: status.clone(),
                    temperature: temperature.clone(),
                    product: product.clone(),
                    value: *value,
                    last_interaction: last_interaction.clone(),
                },
                ctx,
                flags,
            )
            .await
        }
        OpportunityCommands::Get { id } => {
            let opportunity = ctx.service.get_opportunity(id).await?;
            output(&opportunity, flags.format)
        }
        OpportunityCommands::List {
            mine,
            claimable,
            owner,
            skip,
            limit,
        } => {
            let filter = if *mine {
                list::Filter::Mine
            } else if *claimable {
                list::Filter::Claimable
            } else if let Some(email) = owner {
                list::Filter::Owner(email.clone())
            } else {
                list::Filter::All
            };
            list::run(&filter, *skip, *limit, ctx, flags).await
        }
        OpportunityCommands::Update {
            id,
            company,
            status,
            temperature,
            product,
            value,
        } => {
            update::run(
                update::Params {
                    id: id.clone(),
                    company: company.clone(),
                    status: status.clone(),
                    temperature: temperature.clone(),
                    product: product.clone(),
                    value: *value,
                },
                ctx,
                flags,
            )
            .await
        }
        OpportunityCommands::Claim { id } => {
            let actor = ctx.acting_user().await?;
            let now = ctx.now();
            let opportunity = with_conflict_retry(&RetryConfig::default(), || {
                ctx.service.claim_opportunity(id, &actor.user_id, now)
            })
            .await?;
            output(&opportunity, flags.format)
        }
        OpportunityCommands::Status { id } => {
            let actor = ctx.acting_user().await?;
            let status = ctx.service.claim_status(id, &actor.user_id, ctx.now()).await?;
            output(&status, flags.format)
        }
    }
}
