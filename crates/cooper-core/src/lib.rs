//! # cooper-core
//!
//! Core types, ownership claim policy, and error types for Cooper CRM.
//!
//! This crate provides the foundational types shared across all Cooper crates:
//! - Entity structs for users, opportunities, interactions, and audit entries
//! - Closed pipeline enums (status, temperature, product) parsed at the boundary
//! - The ownership claim policy (pure decision logic, no I/O)
//! - An injectable clock
//! - ID prefix constants and input validation helpers
//! - Cross-cutting error types

pub mod audit_detail;
pub mod clock;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod policy;
pub mod validate;
