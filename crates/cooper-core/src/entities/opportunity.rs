use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{PipelineStatus, Product, Temperature};

/// A sales opportunity (one company in the pipeline).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Opportunity {
    pub id: String,
    /// Company tax id, 14 digits without punctuation.
    pub cnpj: String,
    pub company_name: String,
    pub owner_id: String,
    pub status: PipelineStatus,
    pub temperature: Option<Temperature>,
    pub product: Option<Product>,
    pub estimated_value: f64,
    pub created_at: DateTime<Utc>,
    pub last_interaction_at: DateTime<Utc>,
    /// Incremented on every write; used for compare-and-swap.
    pub revision: i64,
}

/// Input for creating an opportunity. The creator becomes the owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct NewOpportunity {
    pub cnpj: String,
    pub company_name: String,
    #[serde(default)]
    pub status: PipelineStatus,
    pub temperature: Option<Temperature>,
    pub product: Option<Product>,
    #[serde(default)]
    pub estimated_value: f64,
    /// Backdated last contact; defaults to the creation instant.
    pub last_interaction_at: Option<DateTime<Utc>>,
}

impl NewOpportunity {
    #[must_use]
    pub fn new(cnpj: impl Into<String>, company_name: impl Into<String>) -> Self {
        Self {
            cnpj: cnpj.into(),
            company_name: company_name.into(),
            ..Self::default()
        }
    }
}
