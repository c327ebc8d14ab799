//! Metrics collector - thread-safe collection with latency tracking

use std::sync::Arc;
use std::time::Instant;

use hdrhistogram::Histogram;
use parking_lot::RwLock;
use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

use super::types::TestMetrics;

/// Write-only sink for per-iteration error samples.
///
/// A `true` sample means the iteration failed validation. Scenario code only
/// appends; it never reads aggregates back.
pub trait ErrorSink: Send + Sync {
    fn record(&self, error: bool);
}

#[derive(Clone)]
pub struct MetricsCollector {
    metrics: Arc<RwLock<TestMetrics>>,
    request_latencies: Arc<RwLock<Histogram<u64>>>,
    system: Arc<RwLock<System>>,
    start_time: Instant,
}

impl MetricsCollector {
    pub fn new() -> Self {
        // Histogram with 3 significant digits of precision
        let request_hist = Histogram::new(3).expect("Failed to create request histogram");

        // Initialize system monitor
        let system = System::new_with_specifics(
            RefreshKind::nothing()
                .with_cpu(CpuRefreshKind::everything())
                .with_memory(MemoryRefreshKind::everything()),
        );

        Self {
            metrics: Arc::new(RwLock::new(TestMetrics::default())),
            request_latencies: Arc::new(RwLock::new(request_hist)),
            system: Arc::new(RwLock::new(system)),
            start_time: Instant::now(),
        }
    }

    pub fn request_started(&self) {
        let mut metrics = self.metrics.write();
        metrics.request.started += 1;
        metrics.request.in_flight += 1;
    }

    pub fn request_completed(&self, duration_ms: u64) {
        let mut metrics = self.metrics.write();
        metrics.request.completed += 1;
        metrics.request.in_flight = metrics.request.in_flight.saturating_sub(1);
        drop(metrics);

        let mut hist = self.request_latencies.write();
        let _ = hist.record(duration_ms);
    }

    pub fn request_failed(&self, duration_ms: u64) {
        let mut metrics = self.metrics.write();
        metrics.request.failed += 1;
        metrics.request.in_flight = metrics.request.in_flight.saturating_sub(1);
        drop(metrics);

        // Still record latency for failed requests
        let mut hist = self.request_latencies.write();
        let _ = hist.record(duration_ms);
    }

    /// Update system metrics (CPU, memory)
    pub fn update_system_metrics(&self) {
        let mut system = self.system.write();
        system.refresh_cpu_all();
        system.refresh_memory();

        let mut metrics = self.metrics.write();
        metrics.system.cpu_usage = system.global_cpu_usage();
        metrics.system.memory_used_mb = system.used_memory() / 1024 / 1024;
        metrics.system.memory_total_mb = system.total_memory() / 1024 / 1024;
    }

    pub fn get_snapshot(&self) -> TestMetrics {
        self.metrics.read().clone()
    }

    pub fn get_request_latency_percentiles(&self) -> LatencyStats {
        let hist = self.request_latencies.read();
        LatencyStats {
            min: hist.min(),
            p50: hist.value_at_quantile(0.50),
            p95: hist.value_at_quantile(0.95),
            p99: hist.value_at_quantile(0.99),
            max: hist.max(),
            mean: hist.mean(),
            count: hist.len(),
        }
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorSink for MetricsCollector {
    fn record(&self, error: bool) {
        let mut metrics = self.metrics.write();
        metrics.errors.samples += 1;
        if error {
            metrics.errors.errors += 1;
        }
    }
}

#[derive(Debug, Clone)]
pub struct LatencyStats {
    pub min: u64,
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub max: u64,
    pub mean: f64,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_track_request_lifecycle() {
        let collector = MetricsCollector::new();

        collector.request_started();
        collector.request_started();
        collector.request_completed(12);
        collector.request_failed(40);

        let snapshot = collector.get_snapshot();
        assert_eq!(snapshot.request.started, 2);
        assert_eq!(snapshot.request.completed, 1);
        assert_eq!(snapshot.request.failed, 1);
        assert_eq!(snapshot.request.in_flight, 0);
    }

    #[test]
    fn error_sink_accumulates_boolean_samples() {
        let collector = MetricsCollector::new();

        collector.record(false);
        collector.record(true);
        collector.record(false);
        collector.record(false);

        let snapshot = collector.get_snapshot();
        assert_eq!(snapshot.errors.samples, 4);
        assert_eq!(snapshot.errors.errors, 1);
        assert!((snapshot.errors.rate() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn latency_percentiles_reflect_recorded_values() {
        let collector = MetricsCollector::new();

        for ms in 1..=100 {
            collector.request_completed(ms);
        }

        let stats = collector.get_request_latency_percentiles();
        assert_eq!(stats.count, 100);
        assert_eq!(stats.min, 1);
        assert_eq!(stats.max, 100);
        assert!(stats.p95 >= 90 && stats.p95 <= 100, "p95 = {}", stats.p95);
        assert!(stats.p50 >= 45 && stats.p50 <= 55, "p50 = {}", stats.p50);
    }
}
