use anyhow::Result;
use clap::Parser;

mod cli;
mod metrics;
mod scenario;
mod summary;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!("Ingress Load Test Starting...");
    tracing::info!("Target: {}", cli.target);
    tracing::info!("Hosts: {}", cli.hosts.join(", "));
    tracing::info!("Virtual Users: {}", cli.vus);
    tracing::info!("Duration: {}s", cli.duration);
    tracing::warn!(
        "NOTE: Ensure an ingress listener is reachable at '{}' routing by Host header",
        cli.target
    );

    let summary = scenario::run(cli).await?;

    for (channel, document) in summary::render_channels(&summary)? {
        match channel {
            "stdout" => println!("{document}"),
            other => tracing::warn!("Unknown summary channel: {}", other),
        }
    }

    if !summary.passed() {
        tracing::error!("Thresholds violated");
        // Same convention as common load runners: dedicated exit code for
        // threshold failures so CI can tell them from crashes.
        std::process::exit(99);
    }

    tracing::info!("Load test complete");

    Ok(())
}
