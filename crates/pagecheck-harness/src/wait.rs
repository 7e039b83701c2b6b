//! Poll-based wait helper for progressive snapshot assertions.
//!
//! Quiescence waiting itself is a condition-variable wait with a deadline
//! inside the scheduler; this module covers the remaining cases - waiting
//! for a predicate over a log snapshot - where there is no signal to wait
//! on and a bounded poll loop is the right tool.

use std::thread;
use std::time::{Duration, Instant};

use crate::error::{HarnessError, Result};

/// Default timeout for poll-based wait operations (10 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default poll interval for checking conditions (10ms).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Configuration for poll-based wait operations.
///
/// Allows customizing timeout and poll interval for different scenarios;
/// CI environments tend to need longer timeouts.
#[derive(Debug, Clone, Copy)]
pub struct WaitConfig {
    /// Maximum time to wait for the condition.
    pub timeout: Duration,

    /// How often to check if the condition is satisfied.
    pub poll_interval: Duration,
}

impl WaitConfig {
    /// Creates a new wait configuration.
    #[must_use]
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Creates a config with a custom timeout and the default poll interval.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(timeout, DEFAULT_POLL_INTERVAL)
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }
}

/// Blocks until `condition` returns true, polling at `config.poll_interval`.
///
/// # Errors
///
/// Returns [`HarnessError::WaitTimeout`] when the condition is still false
/// after `config.timeout`.
pub fn wait_for<F>(mut condition: F, config: WaitConfig, description: &str) -> Result<()>
where
    F: FnMut() -> bool,
{
    let start = Instant::now();

    loop {
        if condition() {
            return Ok(());
        }

        if start.elapsed() >= config.timeout {
            return Err(HarnessError::WaitTimeout {
                condition: description.to_string(),
                timeout: config.timeout,
            });
        }

        thread::sleep(config.poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn wait_for_succeeds_immediately() {
        let result = wait_for(|| true, WaitConfig::default(), "test condition");
        assert!(result.is_ok());
    }

    #[test]
    fn wait_for_succeeds_eventually() {
        let counter = AtomicU32::new(0);

        let result = wait_for(
            || counter.fetch_add(1, Ordering::SeqCst) >= 3,
            WaitConfig::with_timeout(Duration::from_secs(5)),
            "counter >= 3",
        );

        assert!(result.is_ok());
        assert!(counter.load(Ordering::SeqCst) >= 3);
    }

    #[test]
    fn wait_for_times_out() {
        let result = wait_for(
            || false,
            WaitConfig::new(Duration::from_millis(50), Duration::from_millis(5)),
            "impossible condition",
        );

        assert!(matches!(result, Err(HarnessError::WaitTimeout { .. })));
    }
}
