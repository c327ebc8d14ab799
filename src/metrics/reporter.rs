//! Console reporter for metrics with real-time updates

use std::io::{self, Write};

use tokio::time::{interval, Duration};

use super::collector::MetricsCollector;

/// Start periodic metrics reporting (every N seconds)
pub async fn start_periodic_reporter(collector: MetricsCollector, interval_secs: u64) {
    let mut ticker = interval(Duration::from_secs(interval_secs));

    loop {
        ticker.tick().await;

        // Update system metrics before printing
        collector.update_system_metrics();

        print_live_metrics(&collector);
    }
}

/// Print live metrics (clears screen and updates in place)
pub fn print_live_metrics(collector: &MetricsCollector) {
    // Clear screen and move cursor to top
    print!("\x1B[2J\x1B[1;1H");

    let metrics = collector.get_snapshot();
    let elapsed = collector.elapsed_seconds();
    let latency = collector.get_request_latency_percentiles();

    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║             Ingress Load Test - Live Metrics                  ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    println!(
        "\n⏱️  Elapsed Time: {:02}:{:02}:{:02}",
        elapsed / 3600,
        (elapsed % 3600) / 60,
        elapsed % 60
    );

    println!("\n┌─ REQUESTS ──────────────────────────────────────────────────┐");
    println!(
        "│  Started:      {:>8}    In-Flight:  {:>8}              │",
        metrics.request.started, metrics.request.in_flight
    );
    println!(
        "│  Passed:       {:>8}    Failed:     {:>8}              │",
        metrics.request.completed, metrics.request.failed
    );

    if metrics.errors.samples > 0 {
        let throughput = if elapsed > 0 {
            metrics.errors.samples as f64 / elapsed as f64
        } else {
            0.0
        };
        println!(
            "│  Error Rate:   {:>7.2}%    Throughput: {:>7.2}/sec        │",
            metrics.errors.rate() * 100.0,
            throughput
        );
    }
    println!("└─────────────────────────────────────────────────────────────┘");

    if latency.count > 0 {
        println!("\n┌─ REQUEST LATENCY (ms) ──────────────────────────────────────┐");
        println!(
            "│  Min: {:>6}  P50: {:>6}  P95: {:>6}  P99: {:>6}  Max: {:>6}│",
            latency.min, latency.p50, latency.p95, latency.p99, latency.max
        );
        println!(
            "│  Mean: {:>8.2} ms    Count: {:>10}                    │",
            latency.mean, latency.count
        );
        println!("└─────────────────────────────────────────────────────────────┘");
    }

    println!("\n┌─ SYSTEM ────────────────────────────────────────────────────┐");
    println!(
        "│  CPU Usage:    {:>6.1}%    Memory: {:>6} / {:>6} MB       │",
        metrics.system.cpu_usage, metrics.system.memory_used_mb, metrics.system.memory_total_mb
    );
    println!("└─────────────────────────────────────────────────────────────┘");

    println!("\n  [Press Ctrl+C to stop test]");

    // Flush stdout to ensure immediate display
    let _ = io::stdout().flush();
}
