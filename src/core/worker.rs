//! # Single-capacity execution context.
//!
//! The worker owns the receiving end of a capacity-1 job channel and runs jobs
//! strictly one after another, the way a single-threaded executor would.
//!
//! ## Job flow
//! ```text
//! Job received
//!   ├─ token already cancelled ─► state=Cancelled, publish TaskCancelled, send Err(Canceled)
//!   └─ state=Running, publish TaskStarting
//!        select (biased):
//!          ├─ task.run(child) resolves
//!          │     ├─ Ok(v)            ─► state=Completed, publish TaskCompleted
//!          │     ├─ Err(Canceled)    ─► state=Cancelled, publish TaskCancelled
//!          │     ├─ Err(e)           ─► state=Completed, publish TaskFailed
//!          │     └─ panic            ─► Err(Unexpected), state=Completed, publish TaskFailed
//!          └─ token cancelled        ─► future dropped at its await point,
//!                                       state=Cancelled, publish TaskCancelled
//!        send result to the watcher
//! ```
//!
//! ## Rules
//! - Exactly **one** result is sent per job (the receiver may be gone; that is ignored).
//! - The state is written **before** the result is sent, so admission sees the slot
//!   as free no later than the watcher sees the outcome.
//! - Interruption only lands at an `.await`; a task that never yields keeps running
//!   until it returns.
//! - The loop ends when every sender is dropped (shutdown or coordinator drop).

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use super::panic::panic_message;
use super::state::{StateCell, TaskState};
use crate::error::TaskError;
use crate::events::{Bus, Event, EventKind};
use crate::tasks::TaskRef;

/// One admitted task on its way to the worker.
pub(crate) struct Job<T: Send + 'static> {
    pub id: u64,
    pub task: TaskRef<T>,
    pub token: CancellationToken,
    pub state: Arc<StateCell>,
    pub result: oneshot::Sender<Result<T, TaskError>>,
}

/// Drives jobs from the channel one at a time.
pub(crate) struct Worker<T: Send + 'static> {
    rx: mpsc::Receiver<Job<T>>,
    bus: Bus,
}

impl<T: Send + 'static> Worker<T> {
    /// Creates the worker and the sender used for dispatch.
    pub(crate) fn new(bus: Bus) -> (mpsc::Sender<Job<T>>, Self) {
        let (tx, rx) = mpsc::channel(1);
        (tx, Self { rx, bus })
    }

    /// Runs jobs until all senders are dropped.
    pub(crate) async fn run(mut self) {
        while let Some(job) = self.rx.recv().await {
            run_job(job, &self.bus).await;
        }
    }
}

/// Executes one job and reports its result.
async fn run_job<T: Send + 'static>(job: Job<T>, bus: &Bus) {
    let Job {
        id,
        task,
        token,
        state,
        result,
    } = job;
    let name: Arc<str> = Arc::from(task.name());

    if token.is_cancelled() {
        state.store(TaskState::Cancelled);
        publish(bus, EventKind::TaskCancelled, &name, id);
        let _ = result.send(Err(TaskError::Canceled));
        return;
    }

    state.store(TaskState::Running);
    publish(bus, EventKind::TaskStarting, &name, id);

    let run = AssertUnwindSafe(task.run(token.clone())).catch_unwind();
    let res = tokio::select! {
        biased;
        res = run => match res {
            Ok(r) => r,
            Err(panic) => Err(TaskError::unexpected(format!(
                "task panicked: {}",
                panic_message(panic.as_ref())
            ))),
        },
        _ = token.cancelled() => Err(TaskError::Canceled),
    };

    match &res {
        Ok(_) => {
            state.store(TaskState::Completed);
            publish(bus, EventKind::TaskCompleted, &name, id);
        }
        Err(TaskError::Canceled) => {
            state.store(TaskState::Cancelled);
            publish(bus, EventKind::TaskCancelled, &name, id);
        }
        Err(e) => {
            state.store(TaskState::Completed);
            bus.publish(
                Event::new(EventKind::TaskFailed)
                    .with_task(Arc::clone(&name))
                    .with_task_id(id)
                    .with_reason(e.to_string()),
            );
        }
    }
    let _ = result.send(res);
}

fn publish(bus: &Bus, kind: EventKind, name: &Arc<str>, id: u64) {
    bus.publish(Event::new(kind).with_task(Arc::clone(name)).with_task_id(id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskFn;
    use std::time::Duration;

    fn job<T: Send + 'static>(task: TaskRef<T>) -> (Job<T>, oneshot::Receiver<Result<T, TaskError>>) {
        let (tx, rx) = oneshot::channel();
        let job = Job {
            id: 1,
            task,
            token: CancellationToken::new(),
            state: Arc::new(StateCell::new()),
            result: tx,
        };
        (job, rx)
    }

    #[tokio::test]
    async fn test_panic_becomes_unexpected_fault() {
        let task: TaskRef<()> = TaskFn::arc("panics", |_ctx: CancellationToken| async {
            if true {
                panic!("kaboom");
            }
            Ok::<(), TaskError>(())
        });
        let (job, rx) = job(task);
        let state = Arc::clone(&job.state);

        run_job(job, &Bus::new(8)).await;

        let res = rx.await.expect("result");
        assert_eq!(
            res,
            Err(TaskError::unexpected("task panicked: kaboom"))
        );
        assert_eq!(state.load(), TaskState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_sleeping_task() {
        let task: TaskRef<()> = TaskFn::arc("sleeper", |_ctx: CancellationToken| async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok::<(), TaskError>(())
        });
        let (job, rx) = job(task);
        let state = Arc::clone(&job.state);
        let token = job.token.clone();

        let bus = Bus::new(8);
        let handle = tokio::spawn(async move { run_job(job, &bus).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(state.load(), TaskState::Running);

        token.cancel();
        handle.await.expect("join");
        assert_eq!(rx.await.expect("result"), Err(TaskError::Canceled));
        assert_eq!(state.load(), TaskState::Cancelled);
    }

    #[tokio::test]
    async fn test_cancelled_before_start_never_runs() {
        let ran = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let task: TaskRef<u8> = TaskFn::arc("never", move |_ctx: CancellationToken| {
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
            async { Ok::<u8, TaskError>(0) }
        });
        let (job, rx) = job(task);
        job.token.cancel();

        let bus = Bus::new(8);
        let mut events = bus.subscribe();
        run_job(job, &bus).await;

        assert_eq!(rx.await.expect("result"), Err(TaskError::Canceled));
        assert_eq!(
            events.recv().await.expect("event").kind,
            EventKind::TaskCancelled
        );
        assert!(!ran.load(std::sync::atomic::Ordering::SeqCst));
    }
}
