//! Core types for the points ledger
//!
//! All types are designed for:
//! - Deterministic ordering (timestamp + insertion sequence)
//! - Lossless JSON serialization (serde)
//! - Exact arithmetic (integer points, no fractions)

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Timestamp format accepted at the boundary and in seed files.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse a boundary timestamp (`YYYY-MM-DDTHH:MM:SSZ`, second resolution).
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).map(|naive| Utc.from_utc_datetime(&naive))
}

/// Payer identifier (the entity that contributed or is losing points)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payer(String);

impl Payer {
    /// Create new payer identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is usable (non-empty after trimming)
    pub fn is_valid(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl fmt::Display for Payer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction identifier (UUIDv7 for time-ordering)
pub type TxId = Uuid;

/// A single point transaction in the ledger
///
/// Positive `points` is a grant; `remaining` tracks the unspent portion and is
/// drawn down by spends and by manual deductions against the same payer.
/// Negative `points` is a manual deduction, applied in full at insertion,
/// with `remaining` fixed at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID
    pub id: TxId,

    /// Payer the points belong to
    pub payer: Payer,

    /// Signed point amount (positive = grant, negative = deduction)
    pub points: i64,

    /// Transaction timestamp (second resolution, total ordering key)
    pub timestamp: DateTime<Utc>,

    /// Unspent portion of a grant; always zero for deductions
    pub remaining: i64,

    /// Insertion sequence, breaks ties between equal timestamps
    pub seq: u64,
}

impl Transaction {
    /// Ordering key within the ledger: timestamp first, insertion order second
    pub fn order_key(&self) -> OrderKey {
        (self.timestamp, self.seq)
    }

    /// Whether this transaction is a grant with spendable capacity left
    pub fn is_spendable(&self) -> bool {
        self.points > 0 && self.remaining > 0
    }
}

/// Total ordering key for ledger entries
pub type OrderKey = (DateTime<Utc>, u64);

/// Per-payer deductions produced by a successful spend
///
/// Values are negative totals (e.g. payer "DANNON" spent 100 points → `-100`).
/// Payers untouched by the spend are omitted.
pub type SpendReceipt = BTreeMap<Payer, i64>;
