//! Main ledger state machine
//!
//! Append-only, time-ordered record of point transactions plus the derived
//! per-payer balance table. All mutation goes through [`Ledger::add_transaction`]
//! and [`Ledger::spend`]; both are atomic (fully applied or not applied at all).
//!
//! # Invariants
//!
//! - Non-negativity: `balance(payer) >= 0` for every payer at all times
//! - Conservation: Σ(balances) == Σ(applied points) − Σ(spent points)
//! - For every grant: `0 <= remaining <= points`
//! - Per payer: Σ(remaining of grants) == balance
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use points_ledger::{Ledger, Payer};
//!
//! let mut ledger = Ledger::new();
//! ledger.add_transaction(Payer::new("DANNON"), 300, Utc::now())?;
//! let receipt = ledger.spend(100)?;
//! assert_eq!(receipt[&Payer::new("DANNON")], -100);
//! # Ok::<(), points_ledger::Error>(())
//! ```

use crate::allocator::{plan_spend, SpendPlan};
use crate::error::{Error, Result};
use crate::types::{OrderKey, Payer, SpendReceipt, Transaction, TxId};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Authoritative, ordered record of all transactions and balances
#[derive(Debug, Default)]
pub struct Ledger {
    /// Transactions ordered by `(timestamp, seq)`
    entries: BTreeMap<OrderKey, Transaction>,

    /// Derived balance per payer, maintained incrementally
    balances: HashMap<Payer, i64>,

    /// Next insertion sequence number
    next_seq: u64,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a point grant (`points > 0`) or manual deduction (`points < 0`)
    ///
    /// A deduction is rejected with [`Error::WouldGoNegative`] if it would
    /// drop the payer's balance below zero; otherwise it lowers the balance
    /// and drains the same amount from the payer's oldest grants, so future
    /// spends cannot re-consume points the payer no longer has.
    pub fn add_transaction(
        &mut self,
        payer: Payer,
        points: i64,
        timestamp: DateTime<Utc>,
    ) -> Result<TxId> {
        if !payer.is_valid() {
            return Err(Error::InvalidPayer);
        }
        if points == 0 {
            return Err(Error::InvalidAmount { points });
        }

        let balance = self.balances.get(&payer).copied().unwrap_or(0);
        if points < 0 && balance + points < 0 {
            tracing::warn!(%payer, balance, points, "rejected deduction");
            return Err(Error::WouldGoNegative {
                payer,
                balance,
                points,
            });
        }

        if points < 0 {
            self.drain_grants(&payer, -points);
        }

        let seq = self.next_seq;
        self.next_seq += 1;

        let tx = Transaction {
            id: Uuid::now_v7(),
            payer: payer.clone(),
            points,
            timestamp,
            remaining: points.max(0),
            seq,
        };
        let id = tx.id;

        tracing::debug!(%payer, points, %timestamp, seq, "transaction added");
        self.entries.insert(tx.order_key(), tx);
        *self.balances.entry(payer).or_insert(0) += points;

        Ok(id)
    }

    /// Current balance for every payer with at least one transaction
    ///
    /// Zero balances stay listed: a fully-spent payer has history worth
    /// surfacing. Repeated calls with no intervening mutation return
    /// identical results.
    pub fn balances(&self) -> BTreeMap<Payer, i64> {
        self.balances
            .iter()
            .map(|(payer, balance)| (payer.clone(), *balance))
            .collect()
    }

    /// Redeem `points_requested` points, consuming grants oldest-first
    /// across all payers
    ///
    /// The allocation plan is computed in a read-only pass and then applied
    /// as a single batch; on any failure nothing is mutated. Returns the
    /// negative total deducted per payer.
    pub fn spend(&mut self, points_requested: i64) -> Result<SpendReceipt> {
        let plan = plan_spend(self.entries.values(), points_requested)?;
        Ok(self.apply_plan(&plan))
    }

    /// Apply a spend plan: decrement each grant's remaining capacity and the
    /// owning payer's balance, accumulating per-payer totals.
    fn apply_plan(&mut self, plan: &SpendPlan) -> SpendReceipt {
        let mut receipt = SpendReceipt::new();

        for allocation in &plan.allocations {
            let tx = self
                .entries
                .get_mut(&allocation.key)
                .expect("plan references a live ledger entry");
            tx.remaining -= allocation.take;

            *self.balances.entry(allocation.payer.clone()).or_insert(0) -= allocation.take;
            *receipt.entry(allocation.payer.clone()).or_insert(0) -= allocation.take;
        }

        tracing::debug!(total = plan.total(), payers = receipt.len(), "spend applied");
        receipt
    }

    /// Drain `amount` points of remaining capacity from the payer's grants,
    /// oldest first. Callers must have verified the payer's balance covers
    /// `amount`; the per-payer invariant Σ(remaining) == balance then
    /// guarantees the drain completes.
    fn drain_grants(&mut self, payer: &Payer, mut amount: i64) {
        for tx in self.entries.values_mut() {
            if amount == 0 {
                break;
            }
            if tx.payer != *payer || !tx.is_spendable() {
                continue;
            }
            let take = tx.remaining.min(amount);
            tx.remaining -= take;
            amount -= take;
        }
        debug_assert_eq!(amount, 0, "balance check must cover the drain");
    }

    /// Transactions in ledger order (oldest first, ties by insertion order)
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.entries.values()
    }

    /// Total unspent points across all grants
    pub fn total_remaining(&self) -> i64 {
        self.entries.values().map(|tx| tx.remaining).sum()
    }

    /// Number of transactions recorded
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger holds no transactions
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
