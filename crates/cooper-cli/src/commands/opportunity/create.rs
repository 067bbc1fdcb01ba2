use cooper_core::entities::NewOpportunity;
use cooper_core::enums::{PipelineStatus, Product, Temperature};

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::{parse_label, parse_timestamp};
use crate::context::AppContext;
use crate::output::output;

pub struct Params {
    pub cnpj: String,
    pub company: String,
    pub status: Option<String>,
    pub temperature: Option<String>,
    pub product: Option<String>,
    pub value: Option<f64>,
    pub last_interaction: Option<String>,
}

pub async fn run(params: Params, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let new = build_new_opportunity(params)?;
    let actor = ctx.acting_user().await?;
    let opportunity = ctx
        .service
        .create_opportunity(&actor.user_id, new, ctx.now())
        .await?;
    output(&opportunity, flags.format)
}

fn build_new_opportunity(params: Params) -> anyhow::Result<NewOpportunity> {
    Ok(NewOpportunity {
        status: params
            .status
            .as_deref()
            .map(|raw| parse_label::<PipelineStatus>(raw, "status"))
            .transpose()?
            .unwrap_or_default(),
        temperature: params
            .temperature
            .as_deref()
            .map(|raw| parse_label::<Temperature>(raw, "temperature"))
            .transpose()?,
        product: params
            .product
            .as_deref()
            .map(|raw| parse_label::<Product>(raw, "product"))
            .transpose()?,
        estimated_value: params.value.unwrap_or_default(),
        last_interaction_at: params
            .last_interaction
            .as_deref()
            .map(|raw| parse_timestamp(raw, "last interaction"))
            .transpose()?,
        ..NewOpportunity::new(params.cnpj, params.company)
    })
}
