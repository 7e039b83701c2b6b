//! The page handle: one simulated window's scheduler, log collector, and
//! lifecycle.
//!
//! # Teardown
//!
//! Replacing the page (navigation) or closing the window cancels every
//! pending task and revokes the collector's liveness gate. The gate is
//! revoked before the tasks are cancelled, so a callback already mid-flight
//! cannot append after the teardown call returns.

use std::time::{Duration, Instant};

use pagecheck_sched::{PageState, SchedulerHandle, TaskId, TaskJob, WindowScheduler};
use tracing::debug;

use crate::error::Result;
use crate::log::LogCollector;

/// One simulated window under test.
///
/// Owns the window's [`WindowScheduler`] and [`LogCollector`]; the host
/// environment schedules fixture callbacks through it and fixtures record
/// observations into its log.
#[derive(Debug)]
pub struct Page {
    scheduler: WindowScheduler,
    log: LogCollector,
}

impl Page {
    /// Opens a fresh page with an empty log and a running worker.
    ///
    /// # Errors
    ///
    /// Returns an error if the window's worker thread cannot be spawned.
    pub fn open() -> Result<Self> {
        Ok(Self {
            scheduler: WindowScheduler::new()?,
            log: LogCollector::new(),
        })
    }

    /// The page's log collector. Clone it into fixture callbacks.
    #[must_use]
    pub fn log(&self) -> &LogCollector {
        &self.log
    }

    /// The page's scheduler, for the host to register fixture callbacks.
    #[must_use]
    pub fn scheduler(&self) -> &WindowScheduler {
        &self.scheduler
    }

    /// A non-owning scheduler handle for callbacks that re-schedule.
    #[must_use]
    pub fn scheduler_handle(&self) -> SchedulerHandle {
        self.scheduler.handle()
    }

    /// Schedules a one-shot fixture callback.
    pub fn set_timeout(&self, delay: Duration, job: TaskJob) -> TaskId {
        self.scheduler.schedule_timeout(delay, job)
    }

    /// Schedules a repeating fixture callback.
    pub fn set_interval(&self, period: Duration, job: TaskJob) -> TaskId {
        self.scheduler.schedule_interval(period, job)
    }

    /// Cancels a scheduled callback; idempotent.
    pub fn clear_task(&self, id: TaskId) {
        self.scheduler.cancel(id);
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PageState {
        self.scheduler.page_state()
    }

    /// Navigates away: cancels all pending tasks and stops the old page's
    /// script context from recording.
    pub fn replace_page(&self) {
        debug!("replacing page");
        self.log.revoke();
        self.scheduler.replace_page();
    }

    /// Closes the window: same teardown as a replace, terminal state
    /// [`PageState::Closed`].
    pub fn close_window(&self) {
        debug!("closing window");
        self.log.revoke();
        self.scheduler.close_window();
    }

    /// Blocks until all pending tasks drain or `timeout` elapses; returns
    /// the number still pending (0 = quiescent).
    pub fn wait_for_quiescence(&self, timeout: Duration) -> usize {
        self.scheduler.wait_for_quiescence(timeout)
    }

    /// Bounded wait covering only tasks armed before `cutoff`; recursive
    /// chains created afterwards are ignored.
    pub fn wait_for_tasks_started_before(&self, cutoff: Instant, timeout: Duration) -> usize {
        self.scheduler.wait_for_tasks_started_before(cutoff, timeout)
    }
}
