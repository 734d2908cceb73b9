//! Lock-free counters for garage activity
//!
//! NOTE: All atomics use Relaxed ordering intentionally; these are statistical
//! counters only. Do NOT use them for coordination or logic decisions.

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Garage activity counters
pub struct Metrics {
    /// Vehicles that received an open ticket (monotonic)
    vehicles_parked: AtomicU64,
    /// Vehicles whose ticket was closed and spot released (monotonic)
    vehicles_exited: AtomicU64,
    /// Exits since last report (reset on report)
    exits_since_report: AtomicU64,
    /// Closed tickets priced with the recurring-customer discount (monotonic)
    discounts_granted: AtomicU64,
    /// Sequences aborted by a domain error (monotonic)
    sequences_rejected: AtomicU64,
    /// Storage writes that failed and halted a sequence (monotonic)
    storage_failures: AtomicU64,
    /// Sum of closed-ticket prices in cents (monotonic)
    revenue_cents: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            vehicles_parked: AtomicU64::new(0),
            vehicles_exited: AtomicU64::new(0),
            exits_since_report: AtomicU64::new(0),
            discounts_granted: AtomicU64::new(0),
            sequences_rejected: AtomicU64::new(0),
            storage_failures: AtomicU64::new(0),
            revenue_cents: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_parked(&self) {
        self.vehicles_parked.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed exit and the fare charged
    pub fn record_exit(&self, price: f64, discounted: bool) {
        self.vehicles_exited.fetch_add(1, Ordering::Relaxed);
        self.exits_since_report.fetch_add(1, Ordering::Relaxed);
        if discounted {
            self.discounts_granted.fetch_add(1, Ordering::Relaxed);
        }
        let cents = (price.max(0.0) * 100.0).round() as u64;
        self.revenue_cents.fetch_add(cents, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rejected(&self) {
        self.sequences_rejected.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_storage_failure(&self) {
        self.storage_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn vehicles_parked(&self) -> u64 {
        self.vehicles_parked.load(Ordering::Relaxed)
    }

    pub fn vehicles_exited(&self) -> u64 {
        self.vehicles_exited.load(Ordering::Relaxed)
    }

    pub fn storage_failures(&self) -> u64 {
        self.storage_failures.load(Ordering::Relaxed)
    }

    /// Snapshot of all counters; resets the per-report exit count
    pub fn report(&self) -> MetricsSummary {
        MetricsSummary {
            vehicles_parked: self.vehicles_parked.load(Ordering::Relaxed),
            vehicles_exited: self.vehicles_exited.load(Ordering::Relaxed),
            exits_since_report: self.exits_since_report.swap(0, Ordering::Relaxed),
            discounts_granted: self.discounts_granted.load(Ordering::Relaxed),
            sequences_rejected: self.sequences_rejected.load(Ordering::Relaxed),
            storage_failures: self.storage_failures.load(Ordering::Relaxed),
            revenue_cents: self.revenue_cents.load(Ordering::Relaxed),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSummary {
    pub vehicles_parked: u64,
    pub vehicles_exited: u64,
    pub exits_since_report: u64,
    pub discounts_granted: u64,
    pub sequences_rejected: u64,
    pub storage_failures: u64,
    pub revenue_cents: u64,
}

impl MetricsSummary {
    /// Vehicles currently holding an open ticket, as far as these counters know
    pub fn vehicles_inside(&self) -> u64 {
        self.vehicles_parked.saturating_sub(self.vehicles_exited)
    }

    pub fn log(&self) {
        info!(
            parked = %self.vehicles_parked,
            exited = %self.vehicles_exited,
            exits_since_report = %self.exits_since_report,
            inside = %self.vehicles_inside(),
            discounts = %self.discounts_granted,
            rejected = %self.sequences_rejected,
            storage_failures = %self.storage_failures,
            revenue = format!("{:.2}", self.revenue_cents as f64 / 100.0),
            "metrics"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = Metrics::new();
        assert_eq!(metrics.vehicles_parked(), 0);
        assert_eq!(metrics.vehicles_exited(), 0);
        assert_eq!(metrics.storage_failures(), 0);
    }

    #[test]
    fn test_record_exit_revenue() {
        let metrics = Metrics::new();
        metrics.record_parked();
        metrics.record_parked();
        metrics.record_exit(1.5, false);
        metrics.record_exit(2.25, true);

        let summary = metrics.report();
        assert_eq!(summary.vehicles_parked, 2);
        assert_eq!(summary.vehicles_exited, 2);
        assert_eq!(summary.discounts_granted, 1);
        assert_eq!(summary.revenue_cents, 375);
        assert_eq!(summary.vehicles_inside(), 0);
    }

    #[test]
    fn test_report_resets_exits_since_report() {
        let metrics = Metrics::new();
        metrics.record_exit(0.0, false);

        assert_eq!(metrics.report().exits_since_report, 1);
        let second = metrics.report();
        assert_eq!(second.exits_since_report, 0);
        assert_eq!(second.vehicles_exited, 1);
    }

    #[test]
    fn test_failure_counters() {
        let metrics = Metrics::new();
        metrics.record_rejected();
        metrics.record_storage_failure();
        metrics.record_storage_failure();

        let summary = metrics.report();
        assert_eq!(summary.sequences_rejected, 1);
        assert_eq!(summary.storage_failures, 2);
    }
}
