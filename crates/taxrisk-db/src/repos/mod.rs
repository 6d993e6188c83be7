//! Repository modules implementing persistence for all taxrisk entities.
//!
//! Each module adds methods to `TaxService` via `impl TaxService` blocks.

pub mod analysis;
pub mod audit;
pub mod document;
