//! The ordered, append-only log collector fixtures record into.
//!
//! # Design Rationale
//!
//! An `Arc<Mutex<Vec<String>>>` accumulator rather than a channel:
//! 1. Tests query the accumulated entries multiple times
//! 2. Arrival order must be preserved exactly
//! 3. No backpressure concerns (fixture workloads are small)
//! 4. Simpler API - no draining
//!
//! The collector is gated by a liveness flag shared with its owning page:
//! after teardown, `record` calls from stale callbacks are dropped without
//! raising, because fixtures assert "zero entries after navigation" and an
//! error surfaced from a background thread would corrupt their control
//! flow.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::trace;

use crate::error::Result;
use crate::wait::{wait_for, WaitConfig};

/// Thread-safe, insertion-ordered accumulator of fixture log entries.
///
/// Cheaply cloneable (Arc); clones share the same buffer and liveness gate.
/// Background callback threads append through [`record`](Self::record), the
/// test thread reads after quiescence through
/// [`snapshot`](Self::snapshot).
#[derive(Debug, Clone)]
pub struct LogCollector {
    entries: Arc<Mutex<Vec<String>>>,
    live: Arc<AtomicBool>,
}

impl LogCollector {
    /// Creates a new, empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Appends an entry in arrival order. Never fails.
    ///
    /// After the owning page has been torn down the call is silently
    /// dropped - "page already replaced" semantics, intentional rather than
    /// an error.
    ///
    /// # Behavior on Mutex Poisoning
    ///
    /// If the buffer mutex is poisoned (a panic occurred while holding it),
    /// the entry is dropped: the panic is the primary failure and will
    /// surface on its own.
    pub fn record(&self, value: impl Into<String>) {
        if !self.live.load(Ordering::Acquire) {
            trace!("log entry dropped: page context torn down");
            return;
        }
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(value.into());
        }
    }

    /// Returns the current contents without blocking appenders for long;
    /// used for partial/progressive assertions.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Total number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the buffer. Useful when one page serves several sub-cases.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Blocks until some entry contains `needle`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::WaitTimeout`](crate::HarnessError) when no
    /// such entry appears within the configured budget.
    pub fn wait_for_entry(&self, needle: &str, config: WaitConfig) -> Result<()> {
        wait_for(
            || self.snapshot().iter().any(|entry| entry.contains(needle)),
            config,
            &format!("log entry containing '{needle}'"),
        )
    }

    /// Revokes the liveness gate: all subsequent `record` calls are
    /// dropped. Called by the owning page on teardown.
    pub(crate) fn revoke(&self) {
        self.live.store(false, Ordering::Release);
    }
}

impl Default for LogCollector {
    fn default() -> Self {
        Self::new()
    }
}
