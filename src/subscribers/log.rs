//! # LogWriter: event to `tracing` bridge
//!
//! A minimal subscriber that forwards incoming [`Event`]s as `tracing` records.
//! Install any `tracing` subscriber (for example `tracing_subscriber::fmt`) to see them.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! INFO slotvisor: admitted task="sync" id=1
//! INFO slotvisor: rejected task="sync" reason="busy"
//!  WARN slotvisor: failed task="sync" id=1 err="execution failed: boom"
//! INFO slotvisor: slot released task="sync" id=1
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let task = e.task.as_deref().unwrap_or("-");
        let id = e.task_id.unwrap_or_default();
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::TaskAdmitted => {
                tracing::info!(target: "slotvisor", task, id, "admitted");
            }
            EventKind::TaskRejected => {
                tracing::info!(target: "slotvisor", task, reason, "rejected");
            }
            EventKind::CancelRequested => {
                tracing::info!(target: "slotvisor", task, id, "cancel requested");
            }
            EventKind::TaskStarting => {
                tracing::debug!(target: "slotvisor", task, id, "starting");
            }
            EventKind::TaskCompleted => {
                tracing::info!(target: "slotvisor", task, id, "completed");
            }
            EventKind::TaskFailed => {
                tracing::warn!(target: "slotvisor", task, id, err = reason, "failed");
            }
            EventKind::TaskCancelled => {
                tracing::info!(target: "slotvisor", task, id, "cancelled");
            }
            EventKind::CallbackPanicked => {
                tracing::error!(target: "slotvisor", task, id, info = reason, "callback panicked");
            }
            EventKind::SlotReleased => {
                tracing::info!(target: "slotvisor", task, id, "slot released");
            }
            EventKind::ShutdownRequested => {
                tracing::info!(target: "slotvisor", "shutdown requested");
            }
            EventKind::AllStoppedWithin => {
                tracing::info!(target: "slotvisor", "all stopped within grace");
            }
            EventKind::GraceExceeded => {
                tracing::warn!(target: "slotvisor", stuck = task, "grace exceeded");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(target: "slotvisor", subscriber = task, reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(target: "slotvisor", subscriber = task, info = reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
