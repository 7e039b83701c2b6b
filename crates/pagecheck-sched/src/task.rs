//! Task identity and classification for window-scheduled callbacks.

use std::fmt;

/// Identifies one scheduled callback within a window.
///
/// Ids are allocated from a per-window monotonic counter and never reused,
/// so a stale id held across a cancel or a fire always cancels into a
/// no-op instead of hitting an unrelated task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub(crate) u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// How a callback was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// One-shot delayed callback. Leaves the pending set once fired.
    Timeout,
    /// Repeating callback. Stays in the pending set, re-arming after each
    /// firing, until cancelled.
    Interval,
    /// Asynchronously delivered callback (socket message, posted event).
    /// Fires as soon as the worker is free.
    Event,
}

/// The job body executed on the window's worker thread.
///
/// Jobs may record log entries, schedule further tasks through a
/// [`SchedulerHandle`](crate::SchedulerHandle), and cancel tasks, including
/// the one currently running. They must not block on the quiescence waits
/// of their own window.
pub type TaskJob = Box<dyn FnMut() + Send + 'static>;
