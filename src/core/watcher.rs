//! # Per-admission watcher.
//!
//! A watcher waits for the worker's result of exactly one admitted task,
//! hands it to the caller's callback as an [`Outcome`], then releases the slot.
//!
//! ## Rules
//! - The callback fires **at most once** (it is consumed) and **before** the slot is cleared.
//! - The slot is cleared by a drop guard, so it is released even if the callback
//!   panics or the watcher future is dropped (runtime shutdown).
//! - The guard clears only its own admission id.
//! - A result that never arrives (worker gone) is reported as `TaskError::Unexpected`.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use tokio::sync::oneshot;

use super::panic::panic_message;
use super::slot::Slot;
use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};
use crate::outcome::{OnFinish, Outcome};

/// Releases the slot for one admission when dropped.
struct SlotRelease {
    slot: Arc<Slot>,
    bus: Bus,
    id: u64,
    name: Arc<str>,
}

impl Drop for SlotRelease {
    fn drop(&mut self) {
        if self.slot.release(self.id) {
            self.bus.publish(
                Event::new(EventKind::SlotReleased)
                    .with_task(Arc::clone(&self.name))
                    .with_task_id(self.id),
            );
        }
    }
}

/// Everything a watcher needs, captured at admission time.
pub(crate) struct Watcher<C> {
    pub id: u64,
    pub name: Arc<str>,
    pub slot: Arc<Slot>,
    pub bus: Bus,
    pub callback: C,
}

impl<C> Watcher<C> {
    /// Waits for the result, delivers the outcome, releases the slot.
    pub(crate) async fn watch<T>(self, result: oneshot::Receiver<Result<T, TaskError>>)
    where
        T: Send + 'static,
        C: OnFinish<T>,
    {
        let Watcher {
            id,
            name,
            slot,
            bus,
            callback,
        } = self;
        let _release = SlotRelease {
            slot,
            bus: bus.clone(),
            id,
            name: Arc::clone(&name),
        };

        let outcome: Outcome<T> = match result.await {
            Ok(res) => res.into(),
            Err(_) => Outcome::Error(TaskError::unexpected(
                "execution context dropped the task before it resolved",
            )),
        };

        let delivered = std::panic::catch_unwind(AssertUnwindSafe(move || {
            callback.on_finish(outcome);
        }));
        if let Err(panic) = delivered {
            let info = panic_message(panic.as_ref());
            tracing::warn!(task = %name, id, %info, "callback panicked");
            bus.publish(
                Event::new(EventKind::CallbackPanicked)
                    .with_task(name)
                    .with_task_id(id)
                    .with_reason(info),
            );
        }
    }
}
