//! Points Ledger Core
//!
//! Append-only, time-ordered ledger of point transactions contributed by
//! multiple payers, with an oldest-first spend allocator.
//!
//! # Architecture
//!
//! - **Ledger**: authoritative ordered record of transactions; the single
//!   place where balances are computed and enforced
//! - **Allocator**: pure decision pass that plans a spend against a snapshot
//!   of grant capacities, applied afterwards as one atomic batch
//! - **Single Writer**: a Tokio actor serializes all operations, so no
//!   reader ever observes a half-applied add or spend
//!
//! # Invariants
//!
//! - Non-negativity: every payer's balance is `>= 0` at all times
//! - Conservation: Σ(balances) == Σ(applied points) − Σ(spent points)
//! - Oldest-first: spends consume grants in `(timestamp, insertion)` order,
//!   regardless of payer
//! - Atomicity: a failed add or spend leaves the ledger untouched

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

pub mod actor;
pub mod allocator;
pub mod config;
pub mod error;
pub mod ledger;
pub mod metrics;
pub mod seed;
pub mod types;

// Re-exports
pub use actor::{spawn_ledger_actor, LedgerHandle};
pub use config::Config;
pub use error::{Error, Result};
pub use ledger::Ledger;
pub use metrics::Metrics;
pub use types::{parse_timestamp, Payer, SpendReceipt, Transaction, TxId, TIMESTAMP_FORMAT};
