//! Fixed pool of Host header values routed by the ingress under test

use anyhow::{bail, Result};

use super::random::RandomSource;

/// Exactly two host identifiers, fixed for the lifetime of the run.
#[derive(Debug, Clone)]
pub struct HostPool {
    hosts: [String; 2],
}

impl HostPool {
    /// Builds the pool from the configured host list.
    ///
    /// The scenario routes between exactly two backends; any other count is a
    /// configuration error and is rejected before traffic starts.
    pub fn from_slice(hosts: &[String]) -> Result<Self> {
        match hosts {
            [first, second] => Ok(Self {
                hosts: [first.clone(), second.clone()],
            }),
            other => bail!("expected exactly two hosts, got {}", other.len()),
        }
    }

    /// Picks one of the two hosts with uniform probability.
    pub fn pick(&self, rng: &mut dyn RandomSource) -> &str {
        let idx = ((rng.sample() * self.hosts.len() as f64) as usize).min(self.hosts.len() - 1);
        &self.hosts[idx]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.hosts
    }
}

/// Substring a backend response must contain for a given routed host.
///
/// `foo.localhost` routes to the backend identifying itself with "foo" in the
/// body; the leading DNS label is the identifying fragment.
pub fn expected_fragment(host: &str) -> &str {
    host.split('.').next().unwrap_or(host)
}
