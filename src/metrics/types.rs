//! Metric types

#[derive(Debug, Clone, Default)]
pub struct RequestMetrics {
    pub started: usize,
    pub completed: usize,
    pub failed: usize,
    pub in_flight: usize,
}

/// Accumulated boolean error samples, one per finished iteration.
#[derive(Debug, Clone, Default)]
pub struct ErrorRateMetrics {
    pub samples: usize,
    pub errors: usize,
}

impl ErrorRateMetrics {
    /// Fraction of iterations whose combined validation failed.
    pub fn rate(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.errors as f64 / self.samples as f64
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SystemMetrics {
    pub cpu_usage: f32,
    pub memory_used_mb: u64,
    pub memory_total_mb: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TestMetrics {
    pub request: RequestMetrics,
    pub errors: ErrorRateMetrics,
    pub system: SystemMetrics,
}
