//! Virtual-user pool driving the iteration loop for the configured duration

pub mod hosts;
pub mod iteration;
pub mod random;

use std::time::Duration;

use anyhow::Result;
use tokio::time::Instant;

use crate::cli::Cli;
use crate::metrics::collector::MetricsCollector;
use crate::metrics::reporter;
use crate::summary::{self, RunSummary, Thresholds};

use hosts::HostPool;
use random::ThreadRngSource;

/// Runs the scenario to completion and returns the final statistics tree.
pub async fn run(cli: Cli) -> Result<RunSummary> {
    let pool = HostPool::from_slice(&cli.hosts)?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cli.request_timeout))
        .build()?;

    let collector = MetricsCollector::new();

    // Start periodic metrics reporter
    if cli.report_interval > 0 {
        let collector_clone = collector.clone();
        let interval = cli.report_interval;
        tokio::spawn(async move {
            reporter::start_periodic_reporter(collector_clone, interval).await;
        });
    }

    let deadline = Instant::now() + Duration::from_secs(cli.duration);

    tracing::info!("Spawning {} virtual users", cli.vus);

    let mut user_handles = Vec::with_capacity(cli.vus);
    for _ in 0..cli.vus {
        let client = client.clone();
        let target = cli.target.clone();
        let pool = pool.clone();
        let collector = collector.clone();

        user_handles.push(tokio::spawn(async move {
            run_virtual_user(client, target, pool, collector, deadline).await;
        }));
    }

    // Wait for every virtual user to finish its last iteration
    for (idx, handle) in user_handles.into_iter().enumerate() {
        if let Err(e) = handle.await {
            tracing::error!("Virtual user {} panicked: {}", idx, e);
        }
    }

    tracing::info!("All virtual users finished");

    collector.update_system_metrics();

    Ok(summary::build(
        &cli.target,
        pool.as_slice(),
        cli.vus,
        &collector,
        Thresholds {
            p95_limit_ms: cli.p95_limit_ms,
            error_rate_limit: cli.error_rate_limit,
        },
    ))
}

/// One virtual user: iterate until the deadline, pausing between iterations.
async fn run_virtual_user(
    client: reqwest::Client,
    target: String,
    pool: HostPool,
    collector: MetricsCollector,
    deadline: Instant,
) {
    let mut rng = ThreadRngSource;

    while Instant::now() < deadline {
        let host = pool.pick(&mut rng).to_string();

        collector.request_started();
        let started = Instant::now();
        let observation = iteration::fetch(&client, &target, &host).await;
        let latency_ms = started.elapsed().as_millis() as u64;

        let checks = iteration::observe(&host, &observation, &collector);
        if checks.success() {
            collector.request_completed(latency_ms);
        } else {
            collector.request_failed(latency_ms);
        }

        tokio::time::sleep(random::think_time(&mut rng)).await;
    }
}
