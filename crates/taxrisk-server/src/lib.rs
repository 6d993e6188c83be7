//! # taxrisk-server
//!
//! HTTP surface for taxrisk: document analysis, stored results, dashboard and
//! history aggregates, and the quarterly penalty / late-filing model.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

pub use error::AppError;
pub use router::build_router;
pub use state::AppState;

/// Bind `addr` and serve until the process is stopped.
///
/// # Errors
///
/// Returns an I/O error if the address cannot be bound or the server fails.
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "taxrisk server listening");
    axum::serve(listener, build_router(state)).await
}
