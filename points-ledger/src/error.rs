//! Error types for the points ledger

use crate::types::Payer;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Empty or malformed payer identifier
    #[error("Invalid payer: identifier must be a non-empty string")]
    InvalidPayer,

    /// Zero-point transaction or non-positive spend request
    #[error("Invalid amount: {points}")]
    InvalidAmount {
        /// The offending amount
        points: i64,
    },

    /// A negative add that would drop the payer's balance below zero
    #[error("Transaction would take payer {payer} negative (balance {balance}, points {points})")]
    WouldGoNegative {
        /// Payer whose balance would go negative
        payer: Payer,
        /// Balance at the time of the attempt
        balance: i64,
        /// Requested (negative) point amount
        points: i64,
    },

    /// A spend request exceeding total available remaining points
    #[error("Insufficient points: requested {requested}, available {available}")]
    InsufficientPoints {
        /// Points requested
        requested: i64,
        /// Total remaining points across all payers
        available: i64,
    },

    /// Seed data could not be loaded or applied
    #[error("Seed error: {0}")]
    Seed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is a client-input problem rather than a server fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidPayer
                | Error::InvalidAmount { .. }
                | Error::WouldGoNegative { .. }
                | Error::InsufficientPoints { .. }
        )
    }
}
