//! Opportunity patch and its builder.

use cooper_core::enums::{PipelineStatus, Product, Temperature};
use cooper_core::errors::CoreError;
use cooper_core::validate::{check_estimated_value, normalize_company_name};
use serde::Serialize;

/// Partial update of an opportunity. `cnpj`, owner, and timestamps are not
/// patchable; ownership moves only through the claim policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OpportunityUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PipelineStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Option<Temperature>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Option<Product>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_value: Option<f64>,
}

impl OpportunityUpdate {
    /// No field present. Applying an empty patch only claims and touches.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.company_name.is_none()
            && self.status.is_none()
            && self.temperature.is_none()
            && self.product.is_none()
            && self.estimated_value.is_none()
    }

    /// Check and normalize present fields.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a blank company name or a negative
    /// or non-finite estimated value.
    pub fn normalized(mut self) -> Result<Self, CoreError> {
        if let Some(name) = self.company_name.take() {
            self.company_name = Some(normalize_company_name(&name)?);
        }
        if let Some(value) = self.estimated_value {
            self.estimated_value = Some(check_estimated_value(value)?);
        }
        Ok(self)
    }
}

#[derive(Default)]
pub struct OpportunityUpdateBuilder(OpportunityUpdate);

impl OpportunityUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn company_name(mut self, company_name: impl Into<String>) -> Self {
        self.0.company_name = Some(company_name.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: PipelineStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub fn temperature(mut self, temperature: Option<Temperature>) -> Self {
        self.0.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub fn product(mut self, product: Option<Product>) -> Self {
        self.0.product = Some(product);
        self
    }

    #[must_use]
    pub fn estimated_value(mut self, value: f64) -> Self {
        self.0.estimated_value = Some(value);
        self
    }

    #[must_use]
    pub fn build(self) -> OpportunityUpdate {
        self.0
    }
}
