//! # pagecheck-sched
//!
//! Per-window scheduling of asynchronous page callbacks for the pagecheck
//! harness.
//!
//! Every simulated window owns a [`WindowScheduler`]: a pending set of
//! timeout, interval, and event callbacks drained by a dedicated worker
//! thread. The test thread blocks in the bounded quiescence waits
//! ([`WindowScheduler::wait_for_quiescence`] and
//! [`WindowScheduler::wait_for_tasks_started_before`]), which are
//! condition-variable waits with a deadline rather than sleep polling.
//!
//! ## Task lifecycle
//!
//! A task is `Scheduled` until it either fires or is cancelled; both are
//! terminal. A fired one-shot task leaves the pending set after its job
//! returns, an interval re-arms unless it was cancelled (including from
//! inside its own callback), and a cancelled task is guaranteed never to
//! run again.
//!
//! ## Window lifecycle
//!
//! A window starts [`PageState::Active`]. Navigating away
//! ([`WindowScheduler::replace_page`]) or closing the window
//! ([`WindowScheduler::close_window`]) cancels every pending task and makes
//! later schedule calls inert. Both transitions are terminal.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod task;
pub mod window;

pub use task::{TaskId, TaskJob, TaskKind};
pub use window::{PageState, SchedulerHandle, WindowScheduler};
