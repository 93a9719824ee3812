//! # Events emitted by the coordinator.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Admission events**: submissions accepted or rejected, cancel requests
//! - **Lifecycle events**: task execution flow and slot release
//! - **Runtime events**: shutdown progress and subscriber health
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Within one admission (`task_id`) the order is always:
//! ```text
//! TaskAdmitted → TaskStarting → TaskCompleted | TaskFailed | TaskCancelled
//!              → [CallbackPanicked] → SlotReleased
//! ```
//! `SlotReleased` is skipped when a newer admission already replaced a finished
//! task whose outcome was still being delivered.
//!
//! ## Example
//! ```rust
//! use slotvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_task("sync")
//!     .with_task_id(3)
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.task.as_deref(), Some("sync"));
//! assert_eq!(ev.task_id, Some(3));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of coordinator events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Admission events ===
    /// Submission accepted; the task now occupies the slot.
    ///
    /// Sets: `task`, `task_id`
    TaskAdmitted,

    /// Submission rejected because the slot is busy or the coordinator is closed.
    ///
    /// Sets: `task` (rejected task), `reason` (`"busy"`, `"closed"`, `"worker_full"`, `"worker_closed"`)
    TaskRejected,

    /// Cancellation requested for the task in the slot.
    ///
    /// Sets: `task`, `task_id`
    CancelRequested,

    // === Lifecycle events ===
    /// The worker began running the task.
    ///
    /// Sets: `task`, `task_id`
    TaskStarting,

    /// Task returned a value.
    ///
    /// Sets: `task`, `task_id`
    TaskCompleted,

    /// Task returned an error or panicked.
    ///
    /// Sets: `task`, `task_id`, `reason`
    TaskFailed,

    /// Task run was interrupted.
    ///
    /// Sets: `task`, `task_id`
    TaskCancelled,

    /// The caller's callback panicked while receiving the outcome.
    ///
    /// Sets: `task`, `task_id`, `reason` (panic message)
    CallbackPanicked,

    /// The slot was cleared after outcome delivery.
    ///
    /// Sets: `task`, `task_id`
    SlotReleased,

    // === Runtime events ===
    /// Shutdown requested.
    ShutdownRequested,

    /// Worker and watchers stopped within the configured grace period.
    AllStoppedWithin,

    /// Grace period exceeded; the slot was still occupied.
    ///
    /// Sets: `task` (stuck task, if any)
    GraceExceeded,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `task` (subscriber name), `reason`
    SubscriberOverflow,

    /// Subscriber panicked during event processing.
    ///
    /// Sets: `task` (subscriber name), `reason` (panic info)
    SubscriberPanicked,
}

/// Coordinator event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the task (or subscriber), if applicable.
    pub task: Option<Arc<str>>,
    /// Admission id of the task, unique per coordinator.
    pub task_id: Option<u64>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            task: None,
            task_id: None,
            reason: None,
        }
    }

    /// Attaches a task name.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches an admission id.
    #[inline]
    pub fn with_task_id(mut self, id: u64) -> Self {
        self.task_id = Some(id);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_task(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_task(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::TaskAdmitted);
        let b = Event::new(EventKind::SlotReleased);
        assert!(b.seq > a.seq);
    }
}
