//! Gateway error handling
//!
//! Maps core ledger errors onto distinct HTTP status codes so callers can
//! tell invalid input, would-go-negative adds, and insufficient-points spends
//! apart without parsing error text.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use points_ledger::Error as LedgerError;

/// Errors surfaced by gateway handlers
#[derive(Debug)]
pub enum GatewayError {
    /// Malformed request: bad payer, zero/negative amount, bad timestamp
    InvalidInput(String),

    /// Deduction would take a payer's balance below zero
    WouldGoNegative(String),

    /// Spend request exceeds total available points
    InsufficientPoints(String),

    /// Actor or other server-side failure
    Internal(String),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            GatewayError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            GatewayError::WouldGoNegative(msg) => (StatusCode::CONFLICT, msg),
            GatewayError::InsufficientPoints(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            GatewayError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<LedgerError> for GatewayError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidPayer | LedgerError::InvalidAmount { .. } => {
                GatewayError::InvalidInput(err.to_string())
            }
            LedgerError::WouldGoNegative { .. } => GatewayError::WouldGoNegative(err.to_string()),
            LedgerError::InsufficientPoints { .. } => {
                GatewayError::InsufficientPoints(err.to_string())
            }
            other => GatewayError::Internal(other.to_string()),
        }
    }
}
