//! Points Gateway
//!
//! Thin HTTP boundary over the points ledger: validates input, forwards the
//! three core operations to the single-writer ledger actor, and translates
//! results and errors into JSON responses with distinct status codes.

#![forbid(unsafe_code)]

pub mod error;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use points_ledger::{LedgerHandle, Metrics};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// Handle to the ledger actor
    pub ledger: LedgerHandle,

    /// Prometheus metrics
    pub metrics: Arc<Metrics>,
}

/// Build the gateway router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/add", post(handlers::add))
        .route("/spend", post(handlers::spend))
        .route("/balances", get(handlers::balances))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
