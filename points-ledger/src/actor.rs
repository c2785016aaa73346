//! Actor-based concurrency for the ledger
//!
//! Single-writer pattern over a Tokio task: all three operations flow through
//! one mailbox and are processed one at a time, so every add, spend, and
//! balances read observes a fully consistent ledger. No reader can see a
//! half-applied mutation, and `spend`'s allocation decision and its
//! application always execute against the same snapshot.

use crate::error::{Error, Result};
use crate::ledger::Ledger;
use crate::types::{Payer, SpendReceipt, TxId};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::{mpsc, oneshot};

/// Message sent to the ledger actor
pub enum LedgerMessage {
    /// Record a grant or manual deduction
    AddTransaction {
        /// Payer the points belong to
        payer: Payer,
        /// Signed point amount
        points: i64,
        /// Transaction timestamp
        timestamp: DateTime<Utc>,
        /// Response channel
        response: oneshot::Sender<Result<TxId>>,
    },

    /// Read current balances
    Balances {
        /// Response channel
        response: oneshot::Sender<BTreeMap<Payer, i64>>,
    },

    /// Redeem points oldest-first across all payers
    Spend {
        /// Points requested
        points: i64,
        /// Response channel
        response: oneshot::Sender<Result<SpendReceipt>>,
    },

    /// Shutdown actor
    Shutdown,
}

/// Actor that owns the ledger and processes messages sequentially
pub struct LedgerActor {
    ledger: Ledger,
    mailbox: mpsc::Receiver<LedgerMessage>,
}

impl LedgerActor {
    /// Create new actor around an existing (possibly seeded) ledger
    pub fn new(ledger: Ledger, mailbox: mpsc::Receiver<LedgerMessage>) -> Self {
        Self { ledger, mailbox }
    }

    /// Run the actor event loop until shutdown or all handles drop
    pub async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            match msg {
                LedgerMessage::AddTransaction {
                    payer,
                    points,
                    timestamp,
                    response,
                } => {
                    let result = self.ledger.add_transaction(payer, points, timestamp);
                    let _ = response.send(result);
                }

                LedgerMessage::Balances { response } => {
                    let _ = response.send(self.ledger.balances());
                }

                LedgerMessage::Spend { points, response } => {
                    let result = self.ledger.spend(points);
                    let _ = response.send(result);
                }

                LedgerMessage::Shutdown => break,
            }
        }

        tracing::info!("ledger actor stopped");
    }
}

/// Handle for sending messages to the actor
#[derive(Clone)]
pub struct LedgerHandle {
    sender: mpsc::Sender<LedgerMessage>,
}

impl LedgerHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<LedgerMessage>) -> Self {
        Self { sender }
    }

    /// Record a grant or manual deduction
    pub async fn add_transaction(
        &self,
        payer: Payer,
        points: i64,
        timestamp: DateTime<Utc>,
    ) -> Result<TxId> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(LedgerMessage::AddTransaction {
                payer,
                points,
                timestamp,
                response: tx,
            })
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?
    }

    /// Read current balances for every payer with history
    pub async fn balances(&self) -> Result<BTreeMap<Payer, i64>> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(LedgerMessage::Balances { response: tx })
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))
    }

    /// Redeem points oldest-first across all payers
    pub async fn spend(&self, points: i64) -> Result<SpendReceipt> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(LedgerMessage::Spend {
                points,
                response: tx,
            })
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))?
    }

    /// Shutdown actor
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(LedgerMessage::Shutdown)
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;
        Ok(())
    }
}

/// Spawn the ledger actor, returning the handle used by the boundary layer
pub fn spawn_ledger_actor(ledger: Ledger, mailbox_capacity: usize) -> LedgerHandle {
    let (tx, rx) = mpsc::channel(mailbox_capacity); // Bounded channel for backpressure
    let actor = LedgerActor::new(ledger, rx);

    tokio::spawn(async move {
        actor.run().await;
    });

    LedgerHandle::new(tx)
}
