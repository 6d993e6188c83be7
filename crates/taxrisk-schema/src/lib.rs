//! # taxrisk-schema
//!
//! JSON Schema generation and validation for taxrisk.
//!
//! Types are defined in `taxrisk-core` with `#[derive(JsonSchema)]`. This
//! crate builds a [`SchemaRegistry`] from them so untrusted JSON (imported
//! exports, keyword profiles) can be checked before deserialization, and so
//! `taxrisk config schema` can print the schemas for external tooling.

mod error;
mod registry;

pub use error::SchemaError;
pub use registry::SchemaRegistry;
