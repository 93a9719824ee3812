//! Execution state of an admitted task.
//!
//! The state lives in an atomic cell shared by the slot (readers: admission,
//! `status`) and the worker (the only writer). Transitions:
//!
//! ```text
//! NotStarted ──► Running ──► Completed
//!     │             │
//!     └─────────────┴──────► Cancelled
//! ```

use std::sync::atomic::{AtomicU8, Ordering};

/// Queryable state of the task occupying the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TaskState {
    /// Dispatched to the worker, not yet picked up.
    NotStarted = 0,
    /// The worker is driving the task.
    Running = 1,
    /// The task resolved with a value, an error, or a panic.
    Completed = 2,
    /// The task was interrupted and will not produce a value.
    Cancelled = 3,
}

impl TaskState {
    /// True once the task can no longer make progress.
    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Cancelled)
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => TaskState::NotStarted,
            1 => TaskState::Running,
            2 => TaskState::Completed,
            _ => TaskState::Cancelled,
        }
    }
}

/// Atomic holder for a [`TaskState`].
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(TaskState::NotStarted as u8))
    }

    #[inline]
    pub(crate) fn load(&self) -> TaskState {
        TaskState::from_u8(self.0.load(Ordering::Acquire))
    }

    #[inline]
    pub(crate) fn store(&self, state: TaskState) {
        self.0.store(state as u8, Ordering::Release);
    }
}
