use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A salesperson who can own opportunities.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub id: String,
    /// Unique, stored lowercased.
    pub email: String,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}
