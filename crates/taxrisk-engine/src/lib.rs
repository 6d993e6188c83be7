//! # taxrisk-engine
//!
//! Pure analysis logic for taxrisk. Nothing here touches the database.
//!
//! - [`text`]: whitespace normalization, word counts, previews, match context
//! - [`extract`]: plain-text extraction from uploaded documents
//! - [`profile`]: the built-in keyword profile and category metadata
//! - [`matcher`]: compiled case-insensitive keyword matching
//! - [`engine`]: the weighted keyword [`RiskEngine`]
//! - [`contingency`] and [`compliance`]: audit probability, ASC 450 contingency,
//!   escrow adequacy, and standards assessment
//! - [`dashboard`] and [`history`]: aggregates over stored analyses
//! - [`quarterly`]: penalty / late-filing volatility and ARIMA(1,1,1) forecasts

pub mod compliance;
pub mod contingency;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod extract;
pub mod history;
pub mod matcher;
pub mod profile;
pub mod quarterly;
pub mod text;

mod arima;

pub use engine::RiskEngine;
pub use error::EngineError;

/// Round `value` to `places` decimal places.
#[must_use]
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
