//! # taxrisk-core
//!
//! Core types, ID prefixes, and error types for taxrisk.
//!
//! This crate provides the foundational types shared across all taxrisk crates:
//! - Entity structs for documents, analysis results, and audit entries
//! - Risk, compliance, and status enums
//! - ID prefix constants
//! - Cross-cutting error types
//! - The JSON export envelope and keyword profile format
//! - Aggregate response types (dashboard, history)
//! - Audit detail sub-types

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod export;
pub mod ids;
pub mod responses;
