//! # pagecheck-harness
//!
//! A fixture-driven verification harness for headless browser engines.
//!
//! The harness drives the pattern behind every page-behavior regression
//! test: build an HTML+script fixture, hand it to a host environment,
//! collect the ordered log the fixture's script emits, wait - bounded -
//! for its timers and event callbacks to drain, then assert the log
//! against the expected vector for the active browser variant.
//!
//! ## Architecture
//!
//! - **Fixture / FixtureBuilder**: document assembly with template
//!   substitution and a secondary-resource response table
//! - **LogCollector**: thread-safe, arrival-ordered accumulation of the
//!   fixture's observations
//! - **Page**: one simulated window - scheduler, log, and lifecycle
//!   (`Active → Replaced | Closed`)
//! - **HostEnvironment**: the seam the engine under test implements;
//!   `ScriptedHost` is the closure-backed reference double
//! - **Expectations / BrowserVariant**: per-variant expected-output matrix
//! - **run_case**: load → drain → resolve → assert, one case at a time
//!
//! ## Example
//!
//! ```
//! use pagecheck_harness::{
//!     BrowserFamily, BrowserVariant, Expectations, Fixture, ScriptedHost, TestCase,
//! };
//! use std::time::Duration;
//!
//! // The closure stands in for the fixture's embedded script.
//! let host = ScriptedHost::completing(|_fixture, page| {
//!     let log = page.log().clone();
//!     page.set_timeout(Duration::from_millis(1), Box::new(move || log.record("Yo!")));
//! });
//!
//! let case = TestCase::new(
//!     Fixture::page("", "setTimeout(function() { log('Yo!'); }, 1);"),
//!     Expectations::of(["Yo!"]),
//! );
//!
//! let variant = BrowserVariant::new(BrowserFamily::Chromium, 120);
//! let report = pagecheck_harness::run_case(&host, variant, &case).unwrap();
//! assert_eq!(report.remaining_tasks, 0);
//! ```
//!
//! ## Concurrency
//!
//! The test thread is the only one that asserts; each page's worker thread
//! is the only one that fires callbacks. The collector and the pending
//! task set are the only shared state, and both preserve wall-clock
//! arrival order. Quiescence waits are condition-variable waits with a
//! deadline - the suite stays finite even when the engine under test has a
//! bug that prevents quiescence.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod check;
pub mod config;
pub mod error;
pub mod fixture;
pub mod host;
pub mod log;
pub mod page;
pub mod resources;
pub mod runner;
pub mod variant;
pub mod wait;

// Re-export main types for convenience
pub use check::{assert_sequence, first_divergence, SequenceMismatch};
pub use config::HarnessConfig;
pub use error::{HarnessError, Result};
pub use fixture::{Fixture, FixtureBuilder};
pub use host::{HostEnvironment, ScriptOutcome, ScriptedHost};
pub use log::LogCollector;
pub use page::Page;
pub use resources::{Response, ResponseTable};
pub use runner::{run_case, run_case_with_default_variant, CaseReport, TestCase};
pub use variant::{BrowserFamily, BrowserVariant, Expectations};
pub use wait::{wait_for, WaitConfig, DEFAULT_POLL_INTERVAL, DEFAULT_TIMEOUT};

// Re-export the scheduling vocabulary pages hand out.
pub use pagecheck_sched::{PageState, SchedulerHandle, TaskId, TaskJob, TaskKind};
