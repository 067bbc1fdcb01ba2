use cooper_core::entities::Opportunity;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

pub enum Filter {
    All,
    Mine,
    Claimable,
    Owner(String),
}

pub async fn run(
    filter: &Filter,
    skip: u32,
    limit: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let limit = effective_limit(limit, flags.limit, ctx.config.general.default_limit);

    let opportunities: Vec<Opportunity> = match filter {
        Filter::All => ctx.service.list_opportunities(skip, limit).await?,
        Filter::Mine => {
            let actor = ctx.acting_user().await?;
            page(ctx.service.list_owned_by(&actor.user_id).await?, skip, limit)
        }
        Filter::Claimable => {
            let actor = ctx.acting_user().await?;
            page(
                ctx.service.list_claimable(&actor.user_id, ctx.now()).await?,
                skip,
                limit,
            )
        }
        Filter::Owner(email) => {
            let owner = ctx.service.get_user_by_email(email).await?;
            page(ctx.service.list_owned_by(&owner.id).await?, skip, limit)
        }
    };

    output(&opportunities, flags.format)
}

fn page<T>(items: Vec<T>, skip: u32, limit: u32) -> Vec<T> {
    items
        .into_iter()
        .skip(skip as usize)
        .take(limit as usize)
        .collect()
}
