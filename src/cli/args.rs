use clap::Parser;

/// Ingress Load Testing Tool
#[derive(Parser, Debug, Clone)]
#[command(name = "ingress-load-test")]
#[command(about = "Load testing tool for Host-header routed ingress endpoints")]
#[command(version)]
pub struct Cli {
    /// Target URL the ingress listens on
    #[arg(long, default_value = "http://localhost/", env = "INGRESS_TARGET_URL")]
    pub target: String,

    /// Host header values to route between (exactly two, comma separated)
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "foo.localhost,bar.localhost",
        env = "INGRESS_HOSTS"
    )]
    pub hosts: Vec<String>,

    /// Number of concurrent virtual users
    #[arg(long, default_value = "50")]
    pub vus: usize,

    /// Test duration in seconds
    #[arg(long, default_value = "120")]
    pub duration: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    pub request_timeout: u64,

    /// 95th percentile request duration threshold in milliseconds
    #[arg(long, default_value = "500")]
    pub p95_limit_ms: u64,

    /// Error rate threshold as a decimal (0.0-1.0)
    #[arg(long, default_value = "0.1")]
    pub error_rate_limit: f64,

    /// Live metrics reporting interval in seconds (0 disables live output)
    #[arg(long, default_value = "5")]
    pub report_interval: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
