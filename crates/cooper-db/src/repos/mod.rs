//! Repository modules implementing reads and mutations for all CRM entities.
//!
//! Each module adds methods to `CrmService` via `impl CrmService` blocks.
//! Statements that must run inside an open unit of work are free functions
//! taking the transaction's `&libsql::Connection`.

pub mod audit;
pub mod claim;
pub mod interaction;
pub mod opportunity;
pub mod user;
