//! Property-based tests for ledger invariants
//!
//! These tests use proptest to verify critical invariants:
//! - Conservation: Σ(balances) == Σ(applied points) − Σ(spent points)
//! - Non-negativity: every payer's balance >= 0 at all times
//! - Capacity: per payer, Σ(grant remaining) == balance
//! - Atomic failure: a rejected spend leaves the ledger untouched
//! - Determinism: same operation sequence → same state and receipts

use chrono::{DateTime, Duration, TimeZone, Utc};
use points_ledger::{Error, Ledger, Payer};
use proptest::prelude::*;

const PAYERS: &[&str] = &["DANNON", "UNILEVER", "MILLER COORS", "FETCH"];

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 11, 1, 12, 0, 0).unwrap()
}

/// One operation against the ledger
#[derive(Debug, Clone)]
enum Op {
    Add {
        payer: usize,
        points: i64,
        offset_secs: i64,
    },
    Spend {
        points: i64,
    },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..PAYERS.len(), -300i64..=500, 0i64..600)
            .prop_filter("zero-point adds are invalid", |(_, points, _)| *points != 0)
            .prop_map(|(payer, points, offset_secs)| Op::Add {
                payer,
                points,
                offset_secs,
            }),
        1 => (1i64..=600).prop_map(|points| Op::Spend { points }),
    ]
}

/// Apply an operation sequence, tracking totals of accepted operations
fn apply_ops(ledger: &mut Ledger, ops: &[Op]) -> (i64, i64) {
    let mut applied = 0i64;
    let mut spent = 0i64;

    for op in ops {
        match op {
            Op::Add {
                payer,
                points,
                offset_secs,
            } => {
                let timestamp = base_time() + Duration::seconds(*offset_secs);
                if ledger
                    .add_transaction(Payer::new(PAYERS[*payer]), *points, timestamp)
                    .is_ok()
                {
                    applied += points;
                }
            }
            Op::Spend { points } => {
                if ledger.spend(*points).is_ok() {
                    spent += points;
                }
            }
        }
    }

    (applied, spent)
}

/// Per-payer sum of grant remaining capacity
fn remaining_by_payer(ledger: &Ledger) -> std::collections::BTreeMap<Payer, i64> {
    let mut map = std::collections::BTreeMap::new();
    for tx in ledger.transactions() {
        *map.entry(tx.payer.clone()).or_insert(0) += tx.remaining;
    }
    map
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: balances never go negative, whatever the operation mix
    #[test]
    fn prop_non_negativity(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut ledger = Ledger::new();
        apply_ops(&mut ledger, &ops);

        for (payer, balance) in ledger.balances() {
            prop_assert!(balance >= 0, "payer {payer} went negative: {balance}");
        }
    }

    /// Property: points are conserved across accepted adds and spends
    #[test]
    fn prop_conservation(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut ledger = Ledger::new();
        let (applied, spent) = apply_ops(&mut ledger, &ops);

        let total: i64 = ledger.balances().values().sum();
        prop_assert_eq!(total, applied - spent);
    }

    /// Property: every grant keeps 0 <= remaining <= points, and per payer
    /// the grants' remaining capacity sums to the balance
    #[test]
    fn prop_remaining_matches_balance(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut ledger = Ledger::new();
        apply_ops(&mut ledger, &ops);

        for tx in ledger.transactions() {
            if tx.points > 0 {
                prop_assert!(tx.remaining >= 0 && tx.remaining <= tx.points);
            } else {
                prop_assert_eq!(tx.remaining, 0);
            }
        }

        let balances = ledger.balances();
        for (payer, remaining) in remaining_by_payer(&ledger) {
            prop_assert_eq!(remaining, balances[&payer]);
        }
    }

    /// Property: a spend that exceeds capacity fails without side effects
    #[test]
    fn prop_failed_spend_is_atomic(
        ops in prop::collection::vec(op_strategy(), 1..40),
        excess in 1i64..1000,
    ) {
        let mut ledger = Ledger::new();
        apply_ops(&mut ledger, &ops);

        let before_balances = ledger.balances();
        let before_remaining: Vec<i64> =
            ledger.transactions().map(|tx| tx.remaining).collect();
        let available = ledger.total_remaining();

        let err = ledger.spend(available + excess).unwrap_err();
        prop_assert!(
            matches!(err, Error::InsufficientPoints { .. }),
            "expected Error::InsufficientPoints, got {:?}",
            err
        );

        prop_assert_eq!(ledger.balances(), before_balances);
        let after_remaining: Vec<i64> =
            ledger.transactions().map(|tx| tx.remaining).collect();
        prop_assert_eq!(after_remaining, before_remaining);
    }

    /// Property: replaying the same operations produces an identical ledger
    #[test]
    fn prop_deterministic_replay(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut first = Ledger::new();
        let mut second = Ledger::new();

        apply_ops(&mut first, &ops);
        apply_ops(&mut second, &ops);

        prop_assert_eq!(first.balances(), second.balances());

        let first_remaining: Vec<i64> = first.transactions().map(|tx| tx.remaining).collect();
        let second_remaining: Vec<i64> = second.transactions().map(|tx| tx.remaining).collect();
        prop_assert_eq!(first_remaining, second_remaining);
    }

    /// Property: a spend equal to total capacity always succeeds and empties
    /// every balance
    #[test]
    fn prop_full_spend_drains_everything(
        grants in prop::collection::vec((0..PAYERS.len(), 1i64..=500, 0i64..600), 1..20),
    ) {
        let mut ledger = Ledger::new();
        for (payer, points, offset_secs) in &grants {
            let timestamp = base_time() + Duration::seconds(*offset_secs);
            ledger
                .add_transaction(Payer::new(PAYERS[*payer]), *points, timestamp)
                .unwrap();
        }

        let available = ledger.total_remaining();
        let receipt = ledger.spend(available).unwrap();

        let deducted: i64 = receipt.values().sum();
        prop_assert_eq!(deducted, -available);

        for (payer, balance) in ledger.balances() {
            prop_assert_eq!(balance, 0, "payer {} not drained", payer);
        }
    }
}

mod integration_tests {
    use super::*;

    /// The worked example: grants at t1 < t2 < t3 for payers A, B, A with
    /// 100, 200, 50 points; spending 120 takes 100 from A's t1 grant and 20
    /// from B's t2 grant; a following spend of 50 draws only on B.
    #[test]
    fn test_oldest_first_worked_example() {
        let mut ledger = Ledger::new();
        let t = base_time();
        ledger
            .add_transaction(Payer::new("A"), 100, t)
            .unwrap();
        ledger
            .add_transaction(Payer::new("B"), 200, t + Duration::hours(1))
            .unwrap();
        ledger
            .add_transaction(Payer::new("A"), 50, t + Duration::hours(2))
            .unwrap();

        let receipt = ledger.spend(120).unwrap();
        assert_eq!(receipt[&Payer::new("A")], -100);
        assert_eq!(receipt[&Payer::new("B")], -20);

        let receipt = ledger.spend(50).unwrap();
        assert_eq!(receipt.len(), 1);
        assert_eq!(receipt[&Payer::new("B")], -50);

        let balances = ledger.balances();
        assert_eq!(balances[&Payer::new("A")], 50);
        assert_eq!(balances[&Payer::new("B")], 130);
    }

    /// Fully-spent payers remain visible with a zero balance
    #[test]
    fn test_zero_balance_visibility() {
        let mut ledger = Ledger::new();
        ledger
            .add_transaction(Payer::new("DANNON"), 100, base_time())
            .unwrap();
        ledger.spend(100).unwrap();

        assert_eq!(ledger.balances().get(&Payer::new("DANNON")), Some(&0));
    }
}
