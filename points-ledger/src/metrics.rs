//! Metrics collection for observability
//!
//! Prometheus metrics for monitoring the points service:
//!
//! - `points_transactions_total` - Transactions recorded (grants + deductions)
//! - `points_grants_total` - Grants recorded
//! - `points_deductions_total` - Manual deductions recorded
//! - `points_spends_total` - Successful spend operations
//! - `points_spent_total` - Points redeemed across all spends
//! - `points_rejected_total` - Rejected adds and spends
//! - `points_spend_duration_seconds` - Spend latency histogram

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry, Encoder, Histogram,
    HistogramOpts, IntCounter, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Transactions recorded
    pub transactions_total: IntCounter,

    /// Grants recorded
    pub grants_total: IntCounter,

    /// Manual deductions recorded
    pub deductions_total: IntCounter,

    /// Successful spends
    pub spends_total: IntCounter,

    /// Points redeemed
    pub spent_total: IntCounter,

    /// Rejected operations
    pub rejected_total: IntCounter,

    /// Spend latency
    pub spend_duration: Histogram,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector with its own registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let transactions_total = register_int_counter_with_registry!(
            Opts::new(
                "points_transactions_total",
                "Transactions recorded (grants + deductions)"
            ),
            registry
        )?;

        let grants_total = register_int_counter_with_registry!(
            Opts::new("points_grants_total", "Grants recorded"),
            registry
        )?;

        let deductions_total = register_int_counter_with_registry!(
            Opts::new("points_deductions_total", "Manual deductions recorded"),
            registry
        )?;

        let spends_total = register_int_counter_with_registry!(
            Opts::new("points_spends_total", "Successful spend operations"),
            registry
        )?;

        let spent_total = register_int_counter_with_registry!(
            Opts::new("points_spent_total", "Points redeemed across all spends"),
            registry
        )?;

        let rejected_total = register_int_counter_with_registry!(
            Opts::new("points_rejected_total", "Rejected adds and spends"),
            registry
        )?;

        let spend_duration = register_histogram_with_registry!(
            HistogramOpts::new(
                "points_spend_duration_seconds",
                "Spend operation latency in seconds"
            )
            .buckets(vec![0.0005, 0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250]),
            registry
        )?;

        Ok(Self {
            transactions_total,
            grants_total,
            deductions_total,
            spends_total,
            spent_total,
            rejected_total,
            spend_duration,
            registry: Arc::new(registry),
        })
    }

    /// Record a successful add
    pub fn record_transaction(&self, points: i64) {
        self.transactions_total.inc();
        if points > 0 {
            self.grants_total.inc();
        } else {
            self.deductions_total.inc();
        }
    }

    /// Record a successful spend of `points`
    pub fn record_spend(&self, points: i64) {
        self.spends_total.inc();
        self.spent_total.inc_by(points.max(0) as u64);
    }

    /// Record a rejected add or spend
    pub fn record_rejection(&self) {
        self.rejected_total.inc();
    }

    /// Export metrics in Prometheus text exposition format
    pub fn export(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert_eq!(metrics.transactions_total.get(), 0);
        assert_eq!(metrics.spends_total.get(), 0);
    }

    #[test]
    fn test_record_transaction_splits_by_sign() {
        let metrics = Metrics::new().unwrap();
        metrics.record_transaction(300);
        metrics.record_transaction(-200);

        assert_eq!(metrics.transactions_total.get(), 2);
        assert_eq!(metrics.grants_total.get(), 1);
        assert_eq!(metrics.deductions_total.get(), 1);
    }

    #[test]
    fn test_record_spend() {
        let metrics = Metrics::new().unwrap();
        metrics.record_spend(120);
        metrics.record_spend(50);

        assert_eq!(metrics.spends_total.get(), 2);
        assert_eq!(metrics.spent_total.get(), 170);
    }

    #[test]
    fn test_export_contains_metric_names() {
        let metrics = Metrics::new().unwrap();
        metrics.record_transaction(100);

        let exported = metrics.export().unwrap();
        assert!(exported.contains("points_transactions_total"));
    }
}
