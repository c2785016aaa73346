//! HTTP handlers for the three core operations plus health and metrics
//!
//! All boundary validation happens here: the core never sees a malformed
//! payer, a zero amount, or an unparseable timestamp.

use crate::error::GatewayError;
use crate::AppState;
use axum::{extract::State, Json};
use chrono::Utc;
use points_ledger::{parse_timestamp, Payer, SpendReceipt, TIMESTAMP_FORMAT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `POST /add`
#[derive(Debug, Deserialize)]
pub struct AddRequest {
    /// Payer identifier, non-empty
    pub payer: String,
    /// Signed point amount, non-zero
    pub points: i64,
    /// Timestamp string, `YYYY-MM-DDTHH:MM:SSZ`
    pub timestamp: String,
}

/// Body of `POST /spend`
#[derive(Debug, Deserialize)]
pub struct SpendRequest {
    /// Points to redeem, positive
    pub points: i64,
}

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: &'static str,
    /// Service name
    pub service: &'static str,
    /// Service version
    pub version: &'static str,
}

/// `POST /add` — record a grant or manual deduction
pub async fn add(
    State(state): State<AppState>,
    Json(req): Json<AddRequest>,
) -> Result<Json<serde_json::Value>, GatewayError> {
    if req.payer.trim().is_empty() {
        state.metrics.record_rejection();
        return Err(GatewayError::InvalidInput(
            "payer must be a non-empty string".to_string(),
        ));
    }
    if req.points == 0 {
        state.metrics.record_rejection();
        return Err(GatewayError::InvalidInput(
            "points must be a non-zero integer".to_string(),
        ));
    }

    let timestamp = parse_timestamp(&req.timestamp).map_err(|_| {
        state.metrics.record_rejection();
        GatewayError::InvalidInput(format!(
            "timestamp format incorrect, use {TIMESTAMP_FORMAT}"
        ))
    })?;
    if timestamp > Utc::now() {
        state.metrics.record_rejection();
        return Err(GatewayError::InvalidInput(
            "timestamp is in the future".to_string(),
        ));
    }

    let points = req.points;
    match state
        .ledger
        .add_transaction(Payer::new(req.payer), points, timestamp)
        .await
    {
        Ok(_) => {
            state.metrics.record_transaction(points);
            Ok(Json(serde_json::json!({})))
        }
        Err(e) => {
            if e.is_client_error() {
                state.metrics.record_rejection();
            }
            Err(e.into())
        }
    }
}

/// `POST /spend` — redeem points oldest-first across all payers
pub async fn spend(
    State(state): State<AppState>,
    Json(req): Json<SpendRequest>,
) -> Result<Json<SpendReceipt>, GatewayError> {
    if req.points <= 0 {
        state.metrics.record_rejection();
        return Err(GatewayError::InvalidInput(
            "points must be a positive integer".to_string(),
        ));
    }

    let timer = state.metrics.spend_duration.start_timer();
    let result = state.ledger.spend(req.points).await;
    timer.observe_duration();

    match result {
        Ok(receipt) => {
            state.metrics.record_spend(req.points);
            Ok(Json(receipt))
        }
        Err(e) => {
            if e.is_client_error() {
                state.metrics.record_rejection();
            }
            Err(e.into())
        }
    }
}

/// `GET /balances` — current balance per payer (zero balances included)
pub async fn balances(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<Payer, i64>>, GatewayError> {
    let balances = state
        .ledger
        .balances()
        .await
        .map_err(|e| GatewayError::Internal(e.to_string()))?;
    Ok(Json(balances))
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "points-gateway",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /metrics` — Prometheus text exposition
pub async fn metrics(State(state): State<AppState>) -> Result<String, GatewayError> {
    state
        .metrics
        .export()
        .map_err(|e| GatewayError::Internal(format!("Failed to export metrics: {e}")))
}
