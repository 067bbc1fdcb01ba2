use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Already-authenticated user acting on the pipeline.
///
/// Produced by whatever sits in front of the service (the CLI resolves it from
/// `--as <email>`). The core trusts this identity and does no credential checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ActingUser {
    pub user_id: String,
    pub email: String,
}
