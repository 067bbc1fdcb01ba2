//! ID prefixes for generated entity identifiers.
//!
//! IDs are `{prefix}-{8 hex chars}`, e.g. `opp-a3f8b2c1`. The random part is
//! produced by the database (`randomblob(4)`), see `CrmDb::generate_id`.

pub const PREFIX_USER: &str = "usr";
pub const PREFIX_OPPORTUNITY: &str = "opp";
pub const PREFIX_INTERACTION: &str = "int";
pub const PREFIX_AUDIT: &str = "aud";

/// Every prefix in use, for exhaustive ID tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_USER,
    PREFIX_OPPORTUNITY,
    PREFIX_INTERACTION,
    PREFIX_AUDIT,
];
