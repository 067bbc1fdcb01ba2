//! Entity structs for all Cooper domain objects.
//!
//! Each persisted entity maps to a table in the libSQL database (see
//! `cooper-db/migrations`). All structs derive `Serialize`, `Deserialize`,
//! and `JsonSchema` for JSON output and schema checks.

mod audit;
mod interaction;
mod opportunity;
mod user;

pub use audit::AuditEntry;
pub use interaction::{Interaction, NewInteraction};
pub use opportunity::{NewOpportunity, Opportunity};
pub use user::User;
