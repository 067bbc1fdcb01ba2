//! Typed audit detail payloads.
//!
//! Each audit action can carry a structured `detail` JSON blob. These types
//! give the ownership-related actions a stable shape.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Detail for `AuditAction::OwnershipTransferred`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OwnershipTransferredDetail {
    pub from_owner_id: String,
    pub to_owner_id: String,
    /// Whole days since the last interaction at the moment of the claim.
    pub days_since_interaction: i64,
}

/// Detail for `AuditAction::InteractionLogged`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InteractionLoggedDetail {
    pub interaction_id: String,
    pub occurred_at: DateTime<Utc>,
    pub previous_last_interaction_at: DateTime<Utc>,
}
