//! The single slot a coordinator admits tasks into.
//!
//! The slot is the only shared mutable state of a coordinator. It is claimed by
//! `submit`, read by `is_busy`/`status`, and cleared by the watcher of the task
//! that claimed it.
//!
//! ## Rules
//! - Check-and-claim happens under one lock, so two submissions can never both win.
//! - Clearing is compare-and-clear on the admission id: a watcher that finishes
//!   late never clears a slot that was claimed again by a newer task.
//! - Busyness follows the execution state, not occupancy: a task that finished
//!   but whose outcome is still being delivered does not block admission.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

use super::state::{StateCell, TaskState};

/// Handle to the task occupying the slot.
pub(crate) struct RunningTask {
    /// Admission id (unique per coordinator).
    pub id: u64,
    /// Task name, for events and status.
    pub name: Arc<str>,
    /// Interrupt signal for this run.
    pub token: CancellationToken,
    /// Execution state, written by the worker.
    pub state: Arc<StateCell>,
}

impl RunningTask {
    /// True while the task has not reached a terminal state.
    #[inline]
    pub fn is_active(&self) -> bool {
        !self.state.load().is_finished()
    }
}

/// Snapshot of the slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotStatus {
    /// No task occupies the slot.
    Idle,

    /// A task is dispatched or running; submissions are rejected.
    Running {
        /// Admission id.
        id: u64,
        /// Task name.
        task: Arc<str>,
        /// `NotStarted` or `Running`.
        state: TaskState,
    },

    /// The task finished and its outcome is being delivered; submissions are accepted.
    Delivering {
        /// Admission id.
        id: u64,
        /// Task name.
        task: Arc<str>,
        /// `Completed` or `Cancelled`.
        state: TaskState,
    },
}

impl SlotStatus {
    /// True for [`SlotStatus::Running`].
    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self, SlotStatus::Running { .. })
    }
}

/// Mutex-guarded optional [`RunningTask`].
pub(crate) struct Slot {
    current: Mutex<Option<RunningTask>>,
}

impl Slot {
    pub(crate) fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    /// Locks the slot for a check-and-claim.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Option<RunningTask>> {
        self.current.lock()
    }

    /// True if the slot holds a task that has not finished.
    pub(crate) fn is_busy(&self) -> bool {
        self.current
            .lock()
            .as_ref()
            .is_some_and(RunningTask::is_active)
    }

    pub(crate) fn status(&self) -> SlotStatus {
        match self.current.lock().as_ref() {
            None => SlotStatus::Idle,
            Some(rt) => {
                let state = rt.state.load();
                let (id, task) = (rt.id, Arc::clone(&rt.name));
                if state.is_finished() {
                    SlotStatus::Delivering { id, task, state }
                } else {
                    SlotStatus::Running { id, task, state }
                }
            }
        }
    }

    /// Signals the active task, if any. Returns its id and name when signalled.
    pub(crate) fn cancel(&self) -> Option<(u64, Arc<str>)> {
        let current = self.current.lock();
        let rt = current.as_ref().filter(|rt| rt.is_active())?;
        rt.token.cancel();
        Some((rt.id, Arc::clone(&rt.name)))
    }

    /// Clears the slot if it still holds admission `id`.
    pub(crate) fn release(&self, id: u64) -> bool {
        let mut current = self.current.lock();
        if current.as_ref().is_some_and(|rt| rt.id == id) {
            *current = None;
            true
        } else {
            false
        }
    }

    /// Name of the task occupying the slot, finished or not.
    pub(crate) fn occupant(&self) -> Option<Arc<str>> {
        self.current.lock().as_ref().map(|rt| Arc::clone(&rt.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(slot: &Slot, id: u64) -> Arc<StateCell> {
        let state = Arc::new(StateCell::new());
        *slot.lock() = Some(RunningTask {
            id,
            name: Arc::from("t"),
            token: CancellationToken::new(),
            state: Arc::clone(&state),
        });
        state
    }

    #[test]
    fn test_busy_follows_execution_state() {
        let slot = Slot::new();
        assert!(!slot.is_busy());
        assert_eq!(slot.status(), SlotStatus::Idle);

        let state = claim(&slot, 1);
        assert!(slot.is_busy());
        state.store(TaskState::Running);
        assert!(slot.status().is_running());

        state.store(TaskState::Completed);
        assert!(!slot.is_busy());
        assert!(matches!(
            slot.status(),
            SlotStatus::Delivering { id: 1, state: TaskState::Completed, .. }
        ));
    }

    #[test]
    fn test_release_ignores_stale_id() {
        let slot = Slot::new();
        claim(&slot, 1);
        claim(&slot, 2);

        assert!(!slot.release(1));
        assert_eq!(slot.occupant().as_deref(), Some("t"));
        assert!(slot.release(2));
        assert!(slot.occupant().is_none());
    }

    #[test]
    fn test_cancel_skips_finished_task() {
        let slot = Slot::new();
        assert!(slot.cancel().is_none());

        let state = claim(&slot, 7);
        state.store(TaskState::Completed);
        assert!(slot.cancel().is_none());

        state.store(TaskState::Running);
        let (id, _) = slot.cancel().expect("signalled");
        assert_eq!(id, 7);
        assert!(slot.lock().as_ref().is_some_and(|rt| rt.token.is_cancelled()));
    }
}
