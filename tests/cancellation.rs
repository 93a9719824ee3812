use std::time::Duration;

use slotvisor::{
    Config, Coordinator, Event, EventKind, Outcome, RuntimeError, SlotStatus, TaskError, TaskFn,
    TaskRef, outcome,
};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tokio_util::sync::CancellationToken;

async fn wait_for(rx: &mut broadcast::Receiver<Event>, kind: EventKind) -> Event {
    loop {
        let ev = rx.recv().await.expect("bus open");
        if ev.kind == kind {
            return ev;
        }
    }
}

/// Blocks its worker thread without ever reaching an `.await`.
fn non_yielding(block: Duration) -> TaskRef<&'static str> {
    TaskFn::arc("spinner", move |_ctx: CancellationToken| async move {
        std::thread::sleep(block);
        Ok::<_, TaskError>("done")
    })
}

#[tokio::test(start_paused = true)]
async fn cancel_interrupts_running_task() {
    let c: Coordinator<&'static str> = Coordinator::new(Config::default()).expect("build");
    let mut events = c.subscribe();
    let long: TaskRef<&'static str> = TaskFn::arc("long", |_ctx: CancellationToken| async {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok::<_, TaskError>("late")
    });

    let (cb, rx) = outcome::channel();
    assert!(c.submit(long, cb));
    wait_for(&mut events, EventKind::TaskStarting).await;

    c.cancel_task();
    assert_eq!(rx.await.expect("outcome"), Outcome::Error(TaskError::Canceled));
    assert!(!c.is_busy(), "a cancelled task no longer counts as busy");

    let requested = wait_for(&mut events, EventKind::CancelRequested).await;
    assert_eq!(requested.task.as_deref(), Some("long"));
    wait_for(&mut events, EventKind::TaskCancelled).await;
    wait_for(&mut events, EventKind::SlotReleased).await;
    assert_eq!(c.status(), SlotStatus::Idle);

    // A second cancel after the slot emptied has nothing to act on.
    c.cancel_task();
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test(start_paused = true)]
async fn cooperative_task_can_observe_its_token() {
    let c: Coordinator<u32> = Coordinator::new(Config::default()).expect("build");
    let mut events = c.subscribe();
    let polite: TaskRef<u32> = TaskFn::arc("polite", |ctx: CancellationToken| async move {
        ctx.cancelled().await;
        Err::<u32, _>(TaskError::Canceled)
    });

    let (cb, rx) = outcome::channel();
    assert!(c.submit(polite, cb));
    wait_for(&mut events, EventKind::TaskStarting).await;
    c.cancel_task();

    let out = rx.await.expect("outcome");
    assert!(out.error().is_some_and(TaskError::is_interrupted));
}

#[tokio::test(start_paused = true)]
async fn cancel_on_idle_coordinator_is_a_no_op() {
    let c: Coordinator<&'static str> = Coordinator::new(Config::default()).expect("build");
    let mut events = c.subscribe();

    c.cancel_task();
    c.cancel_task();
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
    assert!(!c.is_busy());

    let quick: TaskRef<&'static str> =
        TaskFn::arc("quick", |_ctx: CancellationToken| async { Ok::<_, TaskError>("OK") });
    let (cb, rx) = outcome::channel();
    assert!(c.submit(quick, cb));
    assert_eq!(rx.await.expect("outcome"), Outcome::Success("OK"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn non_yielding_task_keeps_slot_after_cancel() {
    let c: Coordinator<&'static str> = Coordinator::new(Config::default()).expect("build");
    let mut events = c.subscribe();

    let (cb, rx) = outcome::channel();
    assert!(c.submit(non_yielding(Duration::from_millis(300)), cb));
    wait_for(&mut events, EventKind::TaskStarting).await;

    c.cancel_task();
    assert!(c.is_busy(), "interruption only lands at the next await");

    let (cb, rejected) = outcome::channel();
    assert!(!c.submit(non_yielding(Duration::from_millis(1)), cb));
    assert!(rejected.await.is_err());

    assert_eq!(rx.await.expect("outcome"), Outcome::Success("done"));
    wait_for(&mut events, EventKind::SlotReleased).await;
    assert!(!c.is_busy());
}

#[tokio::test(start_paused = true)]
async fn shutdown_on_idle_coordinator_stops_within_grace() {
    let c: Coordinator<()> = Coordinator::new(Config::default()).expect("build");
    let mut events = c.subscribe();

    c.shutdown().await.expect("shutdown");
    wait_for(&mut events, EventKind::ShutdownRequested).await;
    wait_for(&mut events, EventKind::AllStoppedWithin).await;
    assert!(c.is_closed());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn shutdown_reports_task_that_ignores_interruption() {
    let cfg = Config {
        grace: Duration::from_millis(50),
        ..Config::default()
    };
    let c: Coordinator<&'static str> = Coordinator::new(cfg).expect("build");
    let mut events = c.subscribe();

    let (cb, rx) = outcome::channel();
    assert!(c.submit(non_yielding(Duration::from_millis(500)), cb));
    wait_for(&mut events, EventKind::TaskStarting).await;

    match c.shutdown().await {
        Err(RuntimeError::GraceExceeded { grace, stuck }) => {
            assert_eq!(grace, Duration::from_millis(50));
            assert_eq!(stuck.as_deref(), Some("spinner"));
        }
        other => panic!("expected grace exceeded, got {other:?}"),
    }
    wait_for(&mut events, EventKind::GraceExceeded).await;

    // The stuck task still reports once it returns.
    assert_eq!(rx.await.expect("outcome"), Outcome::Success("done"));
}
