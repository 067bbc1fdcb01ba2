use cooper_core::enums::{PipelineStatus, Product, Temperature};
use cooper_core::errors::CoreError;
use cooper_db::retry::{RetryConfig, with_conflict_retry};
use cooper_db::updates::opportunity::{OpportunityUpdate, OpportunityUpdateBuilder};

use crate::cli::GlobalFlags;
use crate::commands::shared::parse::{parse_label, parse_nullable_label};
use crate::context::AppContext;
use crate::output::output;

pub struct Params {
    pub id: String,
    pub company: Option<String>,
    pub status: Option<String>,
    pub temperature: Option<String>,
    pub product: Option<String>,
    pub value: Option<f64>,
}

pub async fn run(params: Params, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let patch = build_patch(&params)?;
    let actor = ctx.acting_user().await?;
    let now = ctx.now();

    let opportunity = with_conflict_retry(&RetryConfig::default(), || {
        ctx.service
            .update_fields(&params.id, &patch, &actor.user_id, now)
    })
    .await?;
    output(&opportunity, flags.format)
}

fn build_patch(params: &Params) -> anyhow::Result<OpportunityUpdate> {
    let mut builder = OpportunityUpdateBuilder::new();
    if let Some(company) = params.company.as_deref() {
        builder = builder.company_name(company);
    }
    if let Some(status) = params.status.as_deref() {
        builder = builder.status(parse_label::<PipelineStatus>(status, "status")?);
    }
    if let Some(temperature) = params.temperature.as_deref() {
        builder = builder.temperature(parse_nullable_label::<Temperature>(
            temperature,
            "temperature",
        )?);
    }
    if let Some(product) = params.product.as_deref() {
        builder = builder.product(parse_nullable_label::<Product>(product, "product")?);
    }
    if let Some(value) = params.value {
        builder = builder.estimated_value(value);
    }

    let patch = builder.build();
    if patch.is_empty() {
        return Err(CoreError::Validation(
            "at least one of --company, --status, --temperature, --product, or --value must be provided (use `cooper opp claim` to only claim)"
                .to_string(),
        )
        .into());
    }
    Ok(patch)
}
