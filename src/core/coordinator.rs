//! # Coordinator: at most one task in flight, non-blocking admission.
//!
//! The [`Coordinator`] owns a single slot, a single-capacity worker and a
//! tracker of per-admission watchers.
//!
//! ## Architecture
//! ```text
//! submit(task, callback)
//!   └─► lock slot
//!         ├─ busy / closed ─► publish TaskRejected, return false  (callback dropped unused)
//!         └─ free:
//!              ├─► jobs.try_reserve()        (no permit ─► reject)
//!              ├─► slot = RunningTask{id, child token}
//!              ├─► publish TaskAdmitted
//!              ├─► permit.send(Job)          ──► Worker (capacity 1, runs jobs one by one)
//!              ├─► tracker.spawn(Watcher)    ◄──────── oneshot ────┘ Result<T, TaskError>
//!              │        └─► callback(Outcome) ─► release slot (compare id) ─► SlotReleased
//!              └─► return true
//!
//! cancel_task()
//!   └─► slot holds an unfinished task ─► token.cancel() ─► worker drops the future
//!                                                          at its next await ─► Err(Canceled)
//!
//! shutdown()
//!   └─► drop job sender, root.cancel(), tracker.close()
//!       └─► wait (grace) for worker + watchers ─► AllStoppedWithin | GraceExceeded
//! ```
//!
//! ## Rules
//! - `submit` never suspends and never blocks on the task; `true` means accepted, not finished.
//! - Check-and-claim is atomic under the slot lock; a rejected call changes nothing.
//! - Every accepted task yields exactly one callback invocation, unless the runtime
//!   itself goes away first.
//! - The slot is cleared after the callback returns (or panics), never before.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::builder::CoordinatorBuilder;
use super::slot::{RunningTask, Slot, SlotStatus};
use super::state::StateCell;
use super::watcher::Watcher;
use super::worker::Job;
use crate::config::Config;
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::outcome::OnFinish;
use crate::tasks::TaskRef;

/// Single-slot task coordinator.
///
/// Admits a task only while idle, reports its outcome through a one-shot
/// callback, and never queues a second task.
///
/// # Example
/// ```rust
/// use tokio_util::sync::CancellationToken;
/// use slotvisor::{Config, Coordinator, Outcome, TaskError, TaskFn, TaskRef, outcome};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let coordinator: Coordinator<u32> = Coordinator::new(Config::default())?;
///
///     let answer: TaskRef<u32> = TaskFn::arc("answer", |_ctx: CancellationToken| async {
///         Ok::<_, TaskError>(42)
///     });
///
///     let (callback, done) = outcome::channel();
///     assert!(coordinator.submit(answer, callback));
///     assert_eq!(done.await?, Outcome::Success(42));
///
///     coordinator.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct Coordinator<T: Send + 'static> {
    pub(crate) cfg: Config,
    pub(crate) bus: Bus,
    pub(crate) slot: Arc<Slot>,
    /// Dispatch side of the worker channel; `None` once closed.
    pub(crate) jobs: Mutex<Option<mpsc::Sender<Job<T>>>>,
    pub(crate) worker: Mutex<Option<JoinHandle<()>>>,
    pub(crate) watchers: TaskTracker,
    /// Parent of every task token; cancelled on shutdown and drop.
    pub(crate) root: CancellationToken,
    /// Stops the subscriber listener; cancelled on drop only.
    pub(crate) listener: CancellationToken,
    pub(crate) runtime: Handle,
    pub(crate) next_id: AtomicU64,
}

impl<T: Send + 'static> Coordinator<T> {
    /// Returns a builder for a coordinator with the given configuration.
    pub fn builder(cfg: Config) -> CoordinatorBuilder<T> {
        CoordinatorBuilder::new(cfg)
    }

    /// Builds a coordinator without subscribers on the current tokio runtime.
    pub fn new(cfg: Config) -> Result<Self, RuntimeError> {
        Self::builder(cfg).build()
    }

    /// Submits `task` if the slot is free.
    ///
    /// Returns `true` once the task is dispatched and its watcher spawned; the task
    /// may still be running. Returns `false` if another task is running or the
    /// coordinator is closed; in that case `task` is not run and `callback` is
    /// dropped without being invoked.
    ///
    /// Safe to call from any thread; it never blocks on the task.
    pub fn submit<C>(&self, task: TaskRef<T>, callback: C) -> bool
    where
        C: OnFinish<T>,
    {
        let name: Arc<str> = Arc::from(task.name());

        let jobs = self.jobs.lock();
        let Some(tx) = jobs.as_ref() else {
            self.reject(name, "closed");
            return false;
        };

        let mut current = self.slot.lock();
        if current.as_ref().is_some_and(RunningTask::is_active) {
            self.reject(name, "busy");
            return false;
        }

        let permit = match tx.try_reserve() {
            Ok(permit) => permit,
            Err(err) => {
                let reason = match err {
                    mpsc::error::TrySendError::Full(()) => "worker_full",
                    mpsc::error::TrySendError::Closed(()) => "worker_closed",
                };
                self.reject(name, reason);
                return false;
            }
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let token = self.root.child_token();
        let state = Arc::new(StateCell::new());
        let (result_tx, result_rx) = oneshot::channel();

        *current = Some(RunningTask {
            id,
            name: Arc::clone(&name),
            token: token.clone(),
            state: Arc::clone(&state),
        });
        self.bus.publish(
            Event::new(EventKind::TaskAdmitted)
                .with_task(Arc::clone(&name))
                .with_task_id(id),
        );
        permit.send(Job {
            id,
            task,
            token,
            state,
            result: result_tx,
        });
        drop(current);
        drop(jobs);

        let watcher = Watcher {
            id,
            name,
            slot: Arc::clone(&self.slot),
            bus: self.bus.clone(),
            callback,
        };
        self.watchers
            .spawn_on(watcher.watch(result_rx), &self.runtime);
        true
    }

    /// Requests interruption of the running task.
    ///
    /// No-op if the slot is empty or its task already finished. The task stops at
    /// its next `.await`; a task that never yields keeps the slot until it returns.
    /// The outcome still arrives through the task's callback, typically as
    /// `Outcome::Error(TaskError::Canceled)`.
    pub fn cancel_task(&self) {
        if let Some((id, name)) = self.slot.cancel() {
            self.bus.publish(
                Event::new(EventKind::CancelRequested)
                    .with_task(name)
                    .with_task_id(id),
            );
        }
    }

    /// True if a task occupies the slot and has neither finished nor been cancelled.
    pub fn is_busy(&self) -> bool {
        self.slot.is_busy()
    }

    /// Snapshot of the slot.
    pub fn status(&self) -> SlotStatus {
        self.slot.status()
    }

    /// True after [`shutdown`](Self::shutdown) was called.
    pub fn is_closed(&self) -> bool {
        self.jobs.lock().is_none()
    }

    /// Configuration this coordinator was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Creates a receiver for subsequent coordinator events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Stops admitting, interrupts the running task and waits for the worker and
    /// all watchers within [`Config::grace`].
    ///
    /// The running task's callback still fires (typically with
    /// `TaskError::Canceled`). Returns [`RuntimeError::Closed`] if already shut down,
    /// or [`RuntimeError::GraceExceeded`] if the task did not yield in time.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let Some(tx) = self.jobs.lock().take() else {
            return Err(RuntimeError::Closed);
        };
        drop(tx);

        self.bus.publish(Event::new(EventKind::ShutdownRequested));
        self.root.cancel();
        self.watchers.close();

        let worker = self.worker.lock().take();
        let grace = self.cfg.grace;
        let done = async {
            if let Some(handle) = worker {
                let _ = handle.await;
            }
            self.watchers.wait().await;
        };

        match tokio::time::timeout(grace, done).await {
            Ok(()) => {
                self.bus.publish(Event::new(EventKind::AllStoppedWithin));
                Ok(())
            }
            Err(_elapsed) => {
                let stuck = self.slot.occupant();
                let mut ev = Event::new(EventKind::GraceExceeded);
                if let Some(name) = &stuck {
                    ev = ev.with_task(Arc::clone(name));
                }
                self.bus.publish(ev);
                Err(RuntimeError::GraceExceeded {
                    grace,
                    stuck: stuck.map(|n| n.to_string()),
                })
            }
        }
    }

    fn reject(&self, name: Arc<str>, reason: &'static str) {
        tracing::debug!(task = %name, reason, "submission rejected");
        self.bus.publish(
            Event::new(EventKind::TaskRejected)
                .with_task(name)
                .with_reason(reason),
        );
    }
}

impl<T: Send + 'static> Drop for Coordinator<T> {
    fn drop(&mut self) {
        self.root.cancel();
        self.listener.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaskError;
    use crate::outcome::{self, Outcome};
    use crate::tasks::TaskFn;
    use std::time::Duration;

    fn sleeper(ms: u64) -> TaskRef<&'static str> {
        TaskFn::arc("sleeper", move |_ctx: CancellationToken| async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            Ok::<_, TaskError>("OK")
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_admission_ids_increase() {
        let c: Coordinator<&'static str> = Coordinator::new(Config::default()).expect("build");
        let mut events = c.subscribe();

        let (cb, rx) = outcome::channel();
        assert!(c.submit(sleeper(5), cb));
        assert!(matches!(c.status(), SlotStatus::Running { id: 1, .. }));
        rx.await.expect("outcome");

        let (cb, rx) = outcome::channel();
        assert!(c.submit(sleeper(5), cb));
        rx.await.expect("outcome");

        let admitted: Vec<u64> = std::iter::from_fn(|| events.try_recv().ok())
            .filter(|e| e.kind == EventKind::TaskAdmitted)
            .filter_map(|e| e.task_id)
            .collect();
        assert_eq!(admitted, vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_drops_callback_unused() {
        let c: Coordinator<&'static str> = Coordinator::new(Config::default()).expect("build");
        let (cb, _first) = outcome::channel();
        assert!(c.submit(sleeper(1000), cb));

        let (cb, second) = outcome::channel();
        assert!(!c.submit(sleeper(1), cb));
        assert!(second.await.is_err(), "rejected callback must never fire");
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_after_shutdown_is_rejected() {
        let c: Coordinator<&'static str> = Coordinator::new(Config::default()).expect("build");
        c.shutdown().await.expect("shutdown");
        assert!(c.is_closed());

        let (cb, rx) = outcome::channel();
        assert!(!c.submit(sleeper(1), cb));
        assert!(rx.await.is_err());
        assert!(matches!(c.shutdown().await, Err(RuntimeError::Closed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts_running_task() {
        let c: Coordinator<&'static str> = Coordinator::new(Config::default()).expect("build");
        let (cb, rx) = outcome::channel();
        assert!(c.submit(sleeper(60_000), cb));

        c.shutdown().await.expect("shutdown");
        assert_eq!(rx.await.expect("outcome"), Outcome::Error(TaskError::Canceled));
        assert_eq!(c.status(), SlotStatus::Idle);
    }
}
