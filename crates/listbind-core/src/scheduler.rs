//! Deferred task scheduler for the UI loop.
//!
//! The scheduler keeps one-shot tasks ordered by due time. It never spawns
//! threads: the owning loop calls [`Scheduler::process_ready`] (typically once
//! per frame or after waiting [`Scheduler::time_until_next`]) and due tasks run
//! on that thread, in due-time order.
//!
//! # Example
//!
//! ```
//! use listbind_core::Scheduler;
//! use std::time::{Duration, Instant};
//!
//! let scheduler = Scheduler::new();
//! scheduler.schedule_once(Duration::from_millis(50), || {
//!     println!("ran after 50ms");
//! });
//!
//! // Drive the loop with an explicit clock.
//! let ran = scheduler.process_ready_at(Instant::now() + Duration::from_millis(60));
//! assert_eq!(ran, 1);
//! ```

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::error::{Result, SchedulerError};

new_key_type! {
    /// A unique identifier for a scheduled task.
    pub struct ScheduledTaskId;
}

/// A one-shot task.
type Task = Box<dyn FnOnce() + Send + 'static>;

/// Heap entry; the heap pops the earliest due time first.
#[derive(Debug, Clone, Copy)]
struct DueEntry {
    id: ScheduledTaskId,
    due: Instant,
    /// Insertion sequence, keeps equal due times in FIFO order.
    seq: u64,
}

impl PartialEq for DueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for DueEntry {}

impl PartialOrd for DueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Queue of one-shot tasks ordered by due time.
///
/// This is the single-owner core; [`Scheduler`] wraps it for shared use.
#[derive(Default)]
pub(crate) struct TaskScheduler {
    tasks: SlotMap<ScheduledTaskId, Task>,
    queue: BinaryHeap<DueEntry>,
    next_seq: u64,
}

impl TaskScheduler {
    /// Create a new task scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task to execute after the specified delay.
    pub fn schedule_once<F>(&mut self, delay: Duration, task: F) -> ScheduledTaskId
    where
        F: FnOnce() + Send + 'static,
    {
        self.schedule_at(Instant::now() + delay, task)
    }

    /// Schedule a task to execute at a specific instant.
    ///
    /// If the instant is in the past, the task runs on the next processing
    /// cycle.
    pub fn schedule_at<F>(&mut self, due: Instant, task: F) -> ScheduledTaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.tasks.insert(Box::new(task));
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(DueEntry { id, due, seq });
        id
    }

    /// Cancel a pending task.
    ///
    /// Returns an error if the task already ran or was cancelled.
    pub fn cancel(&mut self, id: ScheduledTaskId) -> Result<()> {
        self.tasks
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| SchedulerError::InvalidTaskId.into())
    }

    /// Check if a task is still pending.
    pub fn is_active(&self, id: ScheduledTaskId) -> bool {
        self.tasks.contains_key(id)
    }

    /// Number of pending tasks.
    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }

    fn prune(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.tasks.contains_key(entry.id) {
                break;
            }
            self.queue.pop();
        }
    }

    /// Get the duration until the next task is due, measured from `now`.
    ///
    /// Returns `None` if there are no pending tasks.
    pub fn time_until_next_at(&mut self, now: Instant) -> Option<Duration> {
        self.prune();
        self.queue
            .peek()
            .map(|entry| entry.due.saturating_duration_since(now))
    }

    /// Remove and return every task due at `now`, in due-time order.
    pub fn take_ready(&mut self, now: Instant) -> Vec<(ScheduledTaskId, Task)> {
        let mut ready = Vec::new();
        while let Some(entry) = self.queue.peek().copied() {
            if entry.due > now {
                break;
            }
            self.queue.pop();
            if let Some(task) = self.tasks.remove(entry.id) {
                ready.push((entry.id, task));
            }
        }
        ready
    }

    /// Check if any task is due at `now`.
    pub fn has_ready_at(&mut self, now: Instant) -> bool {
        self.prune();
        self.queue.peek().is_some_and(|entry| entry.due <= now)
    }
}

/// A thread-safe scheduler handle shared between producers and the UI loop.
///
/// Tasks run outside the internal lock, so a task may schedule or cancel
/// other tasks.
#[derive(Default)]
pub struct Scheduler {
    inner: Mutex<TaskScheduler>,
}

impl Scheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a task to run after `delay`.
    pub fn schedule_once<F>(&self, delay: Duration, task: F) -> ScheduledTaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.inner.lock().schedule_once(delay, task);
        tracing::trace!(target: "listbind_core::scheduler", ?id, ?delay, "task scheduled");
        id
    }

    /// Schedule a task to run at `instant`.
    pub fn schedule_at<F>(&self, instant: Instant, task: F) -> ScheduledTaskId
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.lock().schedule_at(instant, task)
    }

    /// Cancel a pending task.
    pub fn cancel(&self, id: ScheduledTaskId) -> Result<()> {
        self.inner.lock().cancel(id)
    }

    /// Check if a task is still pending.
    pub fn is_active(&self, id: ScheduledTaskId) -> bool {
        self.inner.lock().is_active(id)
    }

    /// Number of pending tasks.
    pub fn active_count(&self) -> usize {
        self.inner.lock().active_count()
    }

    /// Time until the next task is due, or `None` when idle.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.inner.lock().time_until_next_at(Instant::now())
    }

    /// Check if any task is due now.
    pub fn has_ready(&self) -> bool {
        self.inner.lock().has_ready_at(Instant::now())
    }

    /// Run every task that is due now.
    ///
    /// Returns the number of tasks executed.
    pub fn process_ready(&self) -> usize {
        self.process_ready_at(Instant::now())
    }

    /// Run every task due at `now`.
    #[tracing::instrument(skip(self), target = "listbind_core::scheduler", level = "trace")]
    pub fn process_ready_at(&self, now: Instant) -> usize {
        let ready = self.inner.lock().take_ready(now);
        let count = ready.len();
        for (id, task) in ready {
            tracing::trace!(target: "listbind_core::scheduler", ?id, "executing scheduled task");
            task();
        }
        count
    }
}

static_assertions::assert_impl_all!(Scheduler: Send, Sync);
