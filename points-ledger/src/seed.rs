//! Seed data loading
//!
//! Applies a JSON file of transactions to a fresh ledger before the service
//! accepts requests. Records are applied in file order, so timestamp ordering
//! and tie-breaking are reproducible across runs given identical seed data.
//!
//! File shape:
//!
//! ```json
//! {
//!   "transactions": [
//!     { "payer": "DANNON", "points": 300, "timestamp": "2022-10-31T10:00:00Z" }
//!   ]
//! }
//! ```

use crate::error::{Error, Result};
use crate::ledger::Ledger;
use crate::types::{parse_timestamp, Payer};
use serde::Deserialize;
use std::path::Path;

/// One record in the seed file
#[derive(Debug, Clone, Deserialize)]
pub struct SeedRecord {
    /// Payer identifier
    pub payer: String,
    /// Signed point amount
    pub points: i64,
    /// Timestamp string, `YYYY-MM-DDTHH:MM:SSZ`
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
struct SeedFile {
    transactions: Vec<SeedRecord>,
}

/// Load seed transactions from `path` into `ledger`, in file order.
///
/// Any invalid record aborts the load with an error naming its index; the
/// ledger should be discarded in that case rather than served half-seeded.
pub fn load_seed(ledger: &mut Ledger, path: impl AsRef<Path>) -> Result<usize> {
    let content = std::fs::read_to_string(&path)?;
    let seed: SeedFile = serde_json::from_str(&content)?;

    let count = seed.transactions.len();
    for (index, record) in seed.transactions.into_iter().enumerate() {
        apply_record(ledger, index, record)?;
    }

    tracing::info!(count, path = %path.as_ref().display(), "seed transactions loaded");
    Ok(count)
}

fn apply_record(ledger: &mut Ledger, index: usize, record: SeedRecord) -> Result<()> {
    let timestamp = parse_timestamp(&record.timestamp)
        .map_err(|e| Error::Seed(format!("record {index}: bad timestamp: {e}")))?;

    ledger
        .add_transaction(Payer::new(record.payer), record.points, timestamp)
        .map_err(|e| Error::Seed(format!("record {index}: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_seed(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn test_load_seed_in_file_order() {
        let file = write_seed(
            r#"{ "transactions": [
                { "payer": "DANNON", "points": 300, "timestamp": "2022-10-31T10:00:00Z" },
                { "payer": "UNILEVER", "points": 200, "timestamp": "2022-10-31T11:00:00Z" },
                { "payer": "DANNON", "points": -200, "timestamp": "2022-10-31T15:00:00Z" }
            ] }"#,
        );

        let mut ledger = Ledger::new();
        let count = load_seed(&mut ledger, file.path()).unwrap();
        assert_eq!(count, 3);

        let balances = ledger.balances();
        assert_eq!(balances[&Payer::new("DANNON")], 100);
        assert_eq!(balances[&Payer::new("UNILEVER")], 200);
    }

    #[test]
    fn test_load_seed_reports_offending_record() {
        let file = write_seed(
            r#"{ "transactions": [
                { "payer": "DANNON", "points": 300, "timestamp": "2022-10-31T10:00:00Z" },
                { "payer": "DANNON", "points": -500, "timestamp": "2022-10-31T15:00:00Z" }
            ] }"#,
        );

        let mut ledger = Ledger::new();
        let err = load_seed(&mut ledger, file.path()).unwrap_err();
        match err {
            Error::Seed(msg) => assert!(msg.starts_with("record 1:"), "got: {msg}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_seed_rejects_bad_timestamp() {
        let file = write_seed(
            r#"{ "transactions": [
                { "payer": "DANNON", "points": 300, "timestamp": "next tuesday" }
            ] }"#,
        );

        let mut ledger = Ledger::new();
        let err = load_seed(&mut ledger, file.path()).unwrap_err();
        assert!(matches!(err, Error::Seed(_)));
    }

    #[test]
    fn test_load_seed_rejects_malformed_json() {
        let file = write_seed("{ not json");
        let mut ledger = Ledger::new();
        assert!(matches!(
            load_seed(&mut ledger, file.path()),
            Err(Error::Serialization(_))
        ));
    }
}
