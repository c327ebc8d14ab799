//! Final run summary: the full statistics tree, serialized per output channel

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

use crate::metrics::collector::MetricsCollector;

#[derive(Debug, Clone, Serialize)]
pub struct RequestSummary {
    pub started: usize,
    pub passed: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LatencySummary {
    pub min_ms: u64,
    pub p50_ms: u64,
    pub p95_ms: u64,
    pub p99_ms: u64,
    pub max_ms: u64,
    pub mean_ms: f64,
    pub count: u64,
}

/// One pass/fail condition evaluated against an aggregated series.
#[derive(Debug, Clone, Serialize)]
pub struct ThresholdResult {
    pub observed: f64,
    pub limit: f64,
    pub passed: bool,
}

impl ThresholdResult {
    fn below(observed: f64, limit: f64) -> Self {
        Self {
            observed,
            limit,
            passed: observed < limit,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub target: String,
    pub hosts: Vec<String>,
    pub vus: usize,
    pub duration_secs: u64,
    pub requests: RequestSummary,
    pub latency: LatencySummary,
    pub error_rate: f64,
    pub thresholds: BTreeMap<String, ThresholdResult>,
}

impl RunSummary {
    /// True when every configured threshold held at run end.
    pub fn passed(&self) -> bool {
        self.thresholds.values().all(|t| t.passed)
    }
}

/// Threshold limits the summary is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub p95_limit_ms: u64,
    pub error_rate_limit: f64,
}

/// Assembles the final statistics tree from the collector's aggregates.
pub fn build(
    target: &str,
    hosts: &[String],
    vus: usize,
    collector: &MetricsCollector,
    thresholds: Thresholds,
) -> RunSummary {
    let metrics = collector.get_snapshot();
    let latency = collector.get_request_latency_percentiles();
    let error_rate = metrics.errors.rate();

    let mut results = BTreeMap::new();
    results.insert(
        "http_req_duration_p95_ms".to_string(),
        ThresholdResult::below(latency.p95 as f64, thresholds.p95_limit_ms as f64),
    );
    results.insert(
        "error_rate".to_string(),
        ThresholdResult::below(error_rate, thresholds.error_rate_limit),
    );

    RunSummary {
        target: target.to_string(),
        hosts: hosts.to_vec(),
        vus,
        duration_secs: collector.elapsed_seconds(),
        requests: RequestSummary {
            started: metrics.request.started,
            passed: metrics.request.completed,
            failed: metrics.request.failed,
        },
        latency: LatencySummary {
            min_ms: latency.min,
            p50_ms: latency.p50,
            p95_ms: latency.p95,
            p99_ms: latency.p99,
            max_ms: latency.max,
            mean_ms: latency.mean,
            count: latency.count,
        },
        error_rate,
        thresholds: results,
    }
}

/// Serializes the summary once per output channel.
///
/// Exactly one channel today: `stdout`, holding the full statistics tree as
/// 2-space-indented JSON with no values filtered or transformed.
pub fn render_channels(summary: &RunSummary) -> Result<BTreeMap<&'static str, String>> {
    let mut channels = BTreeMap::new();
    channels.insert("stdout", serde_json::to_string_pretty(summary)?);
    Ok(channels)
}
