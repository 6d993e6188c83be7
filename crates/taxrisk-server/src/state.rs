//! Shared state handed to every handler.

use taxrisk_config::QuarterlyConfig;
use taxrisk_db::TaxService;
use taxrisk_engine::RiskEngine;
use tokio::sync::Mutex;

/// Engine, storage, and model settings for the HTTP handlers.
///
/// The service sits behind a mutex because all requests share one libSQL
/// connection and its transactions must not interleave.
pub struct AppState {
    pub service: Mutex<TaxService>,
    pub engine: RiskEngine,
    pub quarterly: QuarterlyConfig,
    pub default_limit: u32,
}

impl AppState {
    #[must_use]
    pub fn new(
        service: TaxService,
        engine: RiskEngine,
        quarterly: QuarterlyConfig,
        default_limit: u32,
    ) -> Self {
        Self {
            service: Mutex::new(service),
            engine,
            quarterly,
            default_limit,
        }
    }
}
