//! Request handlers, one module per resource.

pub mod aggregates;
pub mod analysis;
pub mod health;
pub mod quarterly;
