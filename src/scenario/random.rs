//! Injectable randomness for host selection and think-time pauses

use std::time::Duration;

use rand::Rng;

/// Lower bound of the pause between iterations, in seconds.
pub const THINK_TIME_MIN_SECS: f64 = 0.5;
/// Upper bound of the pause between iterations, in seconds.
pub const THINK_TIME_MAX_SECS: f64 = 2.0;

/// Uniform sample source consumed by the scenario logic.
///
/// Production code draws from the thread-local generator; tests substitute a
/// scripted sequence to pin down both host branches and both pause bounds.
pub trait RandomSource: Send {
    /// Returns a uniform sample in `[0.0, 1.0)`.
    fn sample(&mut self) -> f64;
}

/// Thread-local RNG backed source used by the live run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn sample(&mut self) -> f64 {
        rand::thread_rng().gen()
    }
}

/// Draws the pause between two iterations of one virtual user.
pub fn think_time(rng: &mut dyn RandomSource) -> Duration {
    let secs = THINK_TIME_MIN_SECS + rng.sample() * (THINK_TIME_MAX_SECS - THINK_TIME_MIN_SECS);
    Duration::from_secs_f64(secs)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::RandomSource;

    /// Replays a fixed sequence of samples, then repeats the last one.
    pub struct ScriptedSource {
        samples: Vec<f64>,
        next: usize,
    }

    impl ScriptedSource {
        pub fn new(samples: impl Into<Vec<f64>>) -> Self {
            Self {
                samples: samples.into(),
                next: 0,
            }
        }
    }

    impl RandomSource for ScriptedSource {
        fn sample(&mut self) -> f64 {
            let idx = self.next.min(self.samples.len() - 1);
            self.next += 1;
            self.samples[idx]
        }
    }
}
