//! Spend allocator
//!
//! Pure allocation pass over a snapshot of the ledger's grants: decides how
//! much to take from each grant so that points are consumed strictly
//! oldest-first across all payers, without ever taking more than a grant's
//! remaining capacity. The decision is separated from application so the
//! ledger can apply the whole plan as one atomic batch (or nothing at all).

use crate::error::{Error, Result};
use crate::types::{OrderKey, Payer, Transaction};

/// A single planned deduction against one grant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// Ledger key of the grant to draw from
    pub key: OrderKey,

    /// Payer the grant belongs to
    pub payer: Payer,

    /// Points to take from this grant; `0 < take <= remaining`
    pub take: i64,
}

/// Complete plan for one spend request
#[derive(Debug, Clone, Default)]
pub struct SpendPlan {
    /// Per-grant deductions, oldest grant first
    pub allocations: Vec<Allocation>,
}

impl SpendPlan {
    /// Total points taken by this plan
    pub fn total(&self) -> i64 {
        self.allocations.iter().map(|a| a.take).sum()
    }
}

/// Plan a spend of `requested` points against grants in ascending
/// `(timestamp, seq)` order.
///
/// The iterator must yield transactions in ledger order; deductions and
/// exhausted grants are skipped. Fails with [`Error::InsufficientPoints`]
/// when the grants cannot cover the request, in which case nothing may be
/// applied (no partial fulfillment).
pub fn plan_spend<'a>(
    transactions: impl Iterator<Item = &'a Transaction>,
    requested: i64,
) -> Result<SpendPlan> {
    if requested <= 0 {
        return Err(Error::InvalidAmount { points: requested });
    }

    let mut plan = SpendPlan::default();
    let mut still_needed = requested;
    let mut available = 0i64;

    for tx in transactions {
        if !tx.is_spendable() {
            continue;
        }
        available += tx.remaining;

        if still_needed > 0 {
            let take = tx.remaining.min(still_needed);
            still_needed -= take;
            plan.allocations.push(Allocation {
                key: tx.order_key(),
                payer: tx.payer.clone(),
                take,
            });
        }
    }

    if still_needed > 0 {
        tracing::debug!(requested, available, "spend request exceeds capacity");
        return Err(Error::InsufficientPoints {
            requested,
            available,
        });
    }

    Ok(plan)
}
