//! Metrics collector for the tick scheduler
//!
//! Counters and histograms are registered through the `metrics` facade. When no
//! recorder is installed (tests, metrics disabled) every call is a no-op.

use anyhow::Result;
use metrics::{counter, gauge, histogram, Counter, Gauge, Histogram};
use tracing::debug;

/// Metrics collector for the scheduling and dispatch engine
pub struct MetricsCollector {
    // Tick metrics
    ticks_total: Counter,
    fetch_failures_total: Counter,
    tick_duration: Histogram,

    // Dispatch metrics
    dispatched_total: Counter,
    work_unit_failures_total: Counter,
    work_unit_panics_total: Counter,
    work_unit_duration: Histogram,
    in_flight: Gauge,
}

impl MetricsCollector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            ticks_total: counter!("redditminer_ticks_total"),
            fetch_failures_total: counter!("redditminer_fetch_failures_total"),
            tick_duration: histogram!("redditminer_tick_duration_seconds"),
            dispatched_total: counter!("redditminer_dispatched_total"),
            work_unit_failures_total: counter!("redditminer_work_unit_failures_total"),
            work_unit_panics_total: counter!("redditminer_work_unit_panics_total"),
            work_unit_duration: histogram!("redditminer_work_unit_duration_seconds"),
            in_flight: gauge!("redditminer_work_units_in_flight"),
        })
    }

    // Tick metrics

    /// Record one timer firing and how long fetch + spawn took
    pub fn record_tick(&self, duration_seconds: f64) {
        self.ticks_total.increment(1);
        self.tick_duration.record(duration_seconds);
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failures_total.increment(1);
    }

    // Dispatch metrics

    pub fn record_dispatched(&self, count: usize) {
        self.dispatched_total.increment(count as u64);

        debug!(dispatched = count, "Dispatch batch spawned");
    }

    /// Record a work unit completion
    pub fn record_work_unit(&self, success: bool, duration_seconds: f64) {
        self.work_unit_duration.record(duration_seconds);
        if !success {
            self.work_unit_failures_total.increment(1);
        }
    }

    pub fn record_work_unit_panic(&self) {
        self.work_unit_panics_total.increment(1);
        self.work_unit_failures_total.increment(1);
    }

    pub fn update_in_flight(&self, count: usize) {
        self.in_flight.set(count as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_without_recorder_are_noops() {
        let metrics = MetricsCollector::new().unwrap();
        metrics.record_tick(0.01);
        metrics.record_fetch_failure();
        metrics.record_dispatched(3);
        metrics.record_work_unit(true, 0.5);
        metrics.record_work_unit(false, 0.5);
        metrics.record_work_unit_panic();
        metrics.update_in_flight(2);
    }
}
