//! The per-window pending task set, its worker thread, and quiescence waits.
//!
//! # Design
//!
//! All shared state lives behind one mutex: the pending map, the page
//! lifecycle state, and the shutdown flag. Two condition variables hang off
//! it - one wakes the worker (new or earlier work, cancellation, teardown),
//! one wakes quiescence waiters (a task left the pending set). Waits are
//! always bounded by a deadline.
//!
//! The worker is the only thread that fires jobs; jobs run with the lock
//! released so they can schedule and cancel freely.

use std::collections::BTreeMap;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace, warn};

use crate::task::{TaskId, TaskJob, TaskKind};

/// Lifecycle of one simulated window's page context.
///
/// `Replaced` and `Closed` are terminal: once a window leaves `Active`,
/// no further transition is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// The page is live; scheduling and recording proceed normally.
    Active,
    /// The page was navigated away from.
    Replaced,
    /// The window was closed.
    Closed,
}

impl PageState {
    /// Returns true while the page accepts new work.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, PageState::Active)
    }
}

struct TaskEntry {
    kind: TaskKind,
    deadline: Instant,
    period: Duration,
    /// Last arm time. Re-arming an interval advances this, so recursive
    /// chains and self-perpetuating pollers age out of cutoff-bounded waits.
    started_at: Instant,
    job: Option<TaskJob>,
    firing: bool,
    cancelled: bool,
}

struct SchedState {
    entries: BTreeMap<TaskId, TaskEntry>,
    page: PageState,
    shutdown: bool,
}

struct Inner {
    state: Mutex<SchedState>,
    /// Wakes the worker thread.
    work: Condvar,
    /// Wakes quiescence waiters.
    idle: Condvar,
    next_id: AtomicU64,
}

impl Inner {
    fn allocate_id(&self) -> TaskId {
        TaskId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn schedule(&self, kind: TaskKind, delay: Duration, job: TaskJob) -> TaskId {
        let id = self.allocate_id();
        let now = Instant::now();
        let mut state = self.state.lock();
        if !state.page.is_active() {
            trace!(%id, "schedule ignored: window torn down");
            return id;
        }
        state.entries.insert(
            id,
            TaskEntry {
                kind,
                deadline: now + delay,
                period: if kind == TaskKind::Interval {
                    delay
                } else {
                    Duration::ZERO
                },
                started_at: now,
                job: Some(job),
                firing: false,
                cancelled: false,
            },
        );
        trace!(%id, ?kind, ?delay, "task scheduled");
        self.work.notify_all();
        id
    }

    /// Idempotent: cancelling an unknown, already-fired, or already-cancelled
    /// task is a no-op.
    fn cancel(&self, id: TaskId) {
        let mut state = self.state.lock();
        let firing = match state.entries.get(&id) {
            Some(entry) => entry.firing,
            None => return,
        };
        if firing {
            // The callback is mid-flight (possibly cancelling itself). The
            // worker drops the entry instead of re-arming once the job
            // returns; until then it still counts as pending.
            if let Some(entry) = state.entries.get_mut(&id) {
                entry.cancelled = true;
            }
            trace!(%id, "cancel during fire: entry retired after the job returns");
        } else {
            state.entries.remove(&id);
            trace!(%id, "task cancelled");
            self.idle.notify_all();
            self.work.notify_all();
        }
    }

    fn teardown(&self, target: PageState) {
        let mut state = self.state.lock();
        if state.page.is_active() {
            state.page = target;
        }
        if state.shutdown {
            return;
        }
        state.shutdown = true;
        let dropped = state.entries.len();
        for entry in state.entries.values_mut() {
            entry.cancelled = true;
        }
        // A mid-flight job keeps its bookkeeping entry until it returns;
        // everything else leaves the pending set now.
        state.entries.retain(|_, entry| entry.firing);
        drop(state);
        if dropped > 0 {
            debug!(dropped, state = ?target, "window teardown cancelled pending tasks");
        }
        self.work.notify_all();
        self.idle.notify_all();
    }

    fn wait_drained<P>(&self, timeout: Duration, pred: P) -> usize
    where
        P: Fn(&TaskEntry) -> bool,
    {
        // Cap keeps the Instant arithmetic below from overflowing on
        // effectively-infinite budgets.
        let timeout = timeout.min(Duration::from_secs(86_400));
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        loop {
            let remaining = state.entries.values().filter(|e| pred(e)).count();
            if remaining == 0 {
                return 0;
            }
            if self.idle.wait_until(&mut state, deadline).timed_out() {
                return state.entries.values().filter(|e| pred(e)).count();
            }
        }
    }
}

fn worker_loop(inner: &Inner) {
    let mut state = inner.state.lock();
    loop {
        if state.shutdown {
            break;
        }
        let now = Instant::now();
        let due = state
            .entries
            .iter()
            .filter(|(_, e)| !e.firing && !e.cancelled && e.job.is_some())
            .min_by_key(|(_, e)| e.deadline)
            .map(|(id, e)| (*id, e.deadline));
        match due {
            None => {
                inner.work.wait(&mut state);
            }
            Some((_, deadline)) if deadline > now => {
                // Spurious wakeups are fine: the loop re-evaluates.
                let _ = inner.work.wait_until(&mut state, deadline);
            }
            Some((id, _)) => {
                let Some(entry) = state.entries.get_mut(&id) else {
                    continue;
                };
                let Some(mut job) = entry.job.take() else {
                    continue;
                };
                entry.firing = true;
                let kind = entry.kind;
                drop(state);
                trace!(%id, ?kind, "firing task");
                job();
                state = inner.state.lock();
                let rearm = !state.shutdown
                    && state
                        .entries
                        .get(&id)
                        .is_some_and(|e| !e.cancelled && e.kind == TaskKind::Interval);
                if rearm {
                    if let Some(entry) = state.entries.get_mut(&id) {
                        let now = Instant::now();
                        entry.firing = false;
                        entry.job = Some(job);
                        entry.deadline = now + entry.period;
                        entry.started_at = now;
                    }
                } else if state.entries.remove(&id).is_some() {
                    inner.idle.notify_all();
                }
            }
        }
    }
}

/// The pending task set of one simulated window, drained by a dedicated
/// worker thread.
///
/// The scheduler is the single owner of the worker; dropping it tears the
/// window down and joins the thread. Jobs that need to schedule follow-up
/// work capture a [`SchedulerHandle`] instead.
pub struct WindowScheduler {
    inner: Arc<Inner>,
    worker: Option<JoinHandle<()>>,
}

impl WindowScheduler {
    /// Starts the window's worker thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the operating system refuses to spawn the
    /// worker thread.
    pub fn new() -> io::Result<Self> {
        let inner = Arc::new(Inner {
            state: Mutex::new(SchedState {
                entries: BTreeMap::new(),
                page: PageState::Active,
                shutdown: false,
            }),
            work: Condvar::new(),
            idle: Condvar::new(),
            next_id: AtomicU64::new(1),
        });
        let worker_inner = Arc::clone(&inner);
        let worker = thread::Builder::new()
            .name("pagecheck-window".into())
            .spawn(move || worker_loop(&worker_inner))?;
        Ok(Self {
            inner,
            worker: Some(worker),
        })
    }

    /// Returns a lightweight handle for use inside jobs.
    ///
    /// The handle holds no ownership: once the window is torn down (or the
    /// scheduler dropped), its operations become no-ops.
    #[must_use]
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Schedules a one-shot callback after `delay`.
    ///
    /// Ignored (the returned id is inert) once the page is torn down.
    pub fn schedule_timeout(&self, delay: Duration, job: TaskJob) -> TaskId {
        self.inner.schedule(TaskKind::Timeout, delay, job)
    }

    /// Schedules a repeating callback every `period`, first firing one
    /// `period` from now. The task stays pending until cancelled.
    pub fn schedule_interval(&self, period: Duration, job: TaskJob) -> TaskId {
        self.inner.schedule(TaskKind::Interval, period, job)
    }

    /// Schedules a callback for asynchronous delivery as soon as the worker
    /// is free (socket message, posted event).
    pub fn schedule_event(&self, job: TaskJob) -> TaskId {
        self.inner.schedule(TaskKind::Event, Duration::ZERO, job)
    }

    /// Cancels a pending task. Idempotent; cancelling a fired task is a
    /// no-op, and the effect is visible to waiters immediately.
    pub fn cancel(&self, id: TaskId) {
        self.inner.cancel(id);
    }

    /// Number of tasks currently pending (a mid-flight callback counts
    /// until its job returns).
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.state.lock().entries.len()
    }

    /// Current page lifecycle state.
    #[must_use]
    pub fn page_state(&self) -> PageState {
        self.inner.state.lock().page
    }

    /// Marks the page as navigated away and cancels every pending task.
    pub fn replace_page(&self) {
        self.inner.teardown(PageState::Replaced);
    }

    /// Marks the window as closed and cancels every pending task.
    pub fn close_window(&self) {
        self.inner.teardown(PageState::Closed);
    }

    /// Blocks until the pending set drains or `timeout` elapses.
    ///
    /// Returns the number of tasks still pending - `0` on a full drain. A
    /// nonzero return is not an error; callers assert on the count.
    pub fn wait_for_quiescence(&self, timeout: Duration) -> usize {
        self.inner.wait_drained(timeout, |_| true)
    }

    /// Like [`wait_for_quiescence`](Self::wait_for_quiescence), but only
    /// waits for tasks armed before `cutoff`.
    ///
    /// Tasks created afterwards - typically by a recursive chain or a
    /// re-armed interval - are ignored, which bounds fixtures that
    /// legitimately re-schedule themselves forever.
    pub fn wait_for_tasks_started_before(&self, cutoff: Instant, timeout: Duration) -> usize {
        self.inner
            .wait_drained(timeout, move |entry| entry.started_at < cutoff)
    }
}

impl std::fmt::Debug for WindowScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("WindowScheduler")
            .field("pending", &state.entries.len())
            .field("page", &state.page)
            .finish()
    }
}

impl Drop for WindowScheduler {
    fn drop(&mut self) {
        self.inner.teardown(PageState::Closed);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("window worker panicked during shutdown");
            }
        }
    }
}

/// Clonable, non-owning access to a window's scheduler for use inside jobs.
///
/// Holding a handle does not keep the window alive; every operation becomes
/// a no-op once the owning [`WindowScheduler`] is gone or torn down.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Inner>,
}

impl SchedulerHandle {
    /// Schedules a one-shot callback; `None` if the window is gone.
    pub fn schedule_timeout(&self, delay: Duration, job: TaskJob) -> Option<TaskId> {
        self.inner
            .upgrade()
            .map(|inner| inner.schedule(TaskKind::Timeout, delay, job))
    }

    /// Schedules a repeating callback; `None` if the window is gone.
    pub fn schedule_interval(&self, period: Duration, job: TaskJob) -> Option<TaskId> {
        self.inner
            .upgrade()
            .map(|inner| inner.schedule(TaskKind::Interval, period, job))
    }

    /// Schedules an asynchronously delivered callback; `None` if the window
    /// is gone.
    pub fn schedule_event(&self, job: TaskJob) -> Option<TaskId> {
        self.inner
            .upgrade()
            .map(|inner| inner.schedule(TaskKind::Event, Duration::ZERO, job))
    }

    /// Cancels a pending task; idempotent, no-op once the window is gone.
    pub fn cancel(&self, id: TaskId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel(id);
        }
    }
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("live", &(self.inner.strong_count() > 0))
            .finish()
    }
}
