//! Wait timing configuration (exponential backoff with a floor)

use std::time::Duration;

/// Timing for a convergence wait.
///
/// The poll interval starts at `min_interval` and backs off by
/// `multiplier`, capped at `max_interval`. It never falls below
/// `min_interval`: the floor bounds the request rate against the remote
/// system.
#[derive(Debug, Clone)]
pub struct WaitTiming {
    /// Overall deadline for the wait.
    pub timeout: Duration,

    /// Delay before the first fetch. Remote systems are frequently not yet
    /// consistent right after the synchronous acknowledgment of a mutation.
    pub initial_delay: Duration,

    /// Minimum interval between fetches.
    pub min_interval: Duration,

    /// Maximum interval between fetches.
    pub max_interval: Duration,

    /// Backoff multiplier applied per attempt.
    pub multiplier: f64,
}

impl Default for WaitTiming {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20 * 60),
            initial_delay: Duration::from_secs(5),
            min_interval: Duration::from_secs(3),
            max_interval: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl WaitTiming {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    /// Interval to sleep before fetch number `attempt + 1`.
    pub fn interval_for_attempt(&self, attempt: u32) -> Duration {
        let floor = self.min_interval.as_millis() as u64;
        let cap = self.max_interval.as_millis() as u64;
        let interval = self.min_interval.as_millis() as f64 * self.multiplier.powi(attempt as i32);
        Duration::from_millis((interval as u64).min(cap).max(floor))
    }
}
