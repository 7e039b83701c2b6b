//! Error types for harness operations.
//!
//! The taxonomy is small on purpose: sequence divergence and poll-helper
//! exhaustion are the only failures a test case can hit, and both are fatal
//! to that single case only. A quiescence wait running out of budget is not
//! an error - it returns the remaining task count for the caller to assert
//! on - and a stale-context `record` is silently dropped, never raised.

use std::time::Duration;
use thiserror::Error;

use crate::check::SequenceMismatch;

/// A specialized Result type for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// The main error type for all harness operations.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The collected log diverged from the expected vector.
    ///
    /// Carries the first divergent index and both full sequences; the
    /// Display form is a diff-style report.
    #[error(transparent)]
    SequenceMismatch(#[from] SequenceMismatch),

    /// A poll-based wait condition was not satisfied within its budget.
    ///
    /// Only the snapshot-polling helper raises this; quiescence waits
    /// report a remaining-task count instead.
    #[error("wait condition '{condition}' timed out after {timeout:?}")]
    WaitTimeout {
        /// Description of the condition that timed out.
        condition: String,
        /// How long we waited before giving up.
        timeout: Duration,
    },

    /// Configuration could not be loaded or merged.
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    /// I/O failure (window worker spawn, config file access).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
