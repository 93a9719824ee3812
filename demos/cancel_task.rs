//! # Example: cancel_task
//!
//! Demonstrates how to interrupt the running task and how admission reacts.
//!
//! Shows how to:
//! - Submit a long-running task that loops until its token fires
//! - Request interruption with [`Coordinator::cancel_task`]
//! - Observe the `Canceled` outcome and submit again once the slot is free
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► Coordinator::builder(cfg).with_subscribers([LogWriter]).build()
//!   ├─► submit("ticker")              ─► true
//!   ├─► sleep 2 seconds (let it tick)
//!   ├─► cancel_task()
//!   │     ├─► publish CancelRequested
//!   │     ├─► worker drops the task at its next await
//!   │     ├─► publish TaskCancelled
//!   │     └─► callback(Outcome::Error(Canceled)) ─► SlotReleased
//!   └─► submit("ticker") again        ─► true
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example cancel_task --features logging
//! ```

use std::{sync::Arc, time::Duration};

use slotvisor::{
    Config, Coordinator, EventKind, LogWriter, Outcome, Subscribe, TaskError, TaskFn, TaskRef,
    outcome,
};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slotvisor=info".into()),
        )
        .init();

    // 1. Configure runtime
    let cfg = Config {
        grace: Duration::from_secs(5),
        bus_capacity: 256,
    };

    // 2. Build the coordinator with the tracing bridge attached
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let coordinator: Coordinator<u64> = Coordinator::builder(cfg).with_subscribers(subs).build()?;
    let mut events = coordinator.subscribe();

    // 3. A task that ticks forever; only interruption stops it
    let ticker: TaskRef<u64> = TaskFn::arc("ticker", |_ctx: CancellationToken| async move {
        let mut ticks = 0u64;
        loop {
            tokio::time::sleep(Duration::from_millis(500)).await;
            ticks += 1;
            println!("[ticker] tick #{ticks}");
            if ticks == u64::MAX {
                return Ok::<u64, TaskError>(ticks);
            }
        }
    });

    let (callback, done) = outcome::channel();
    anyhow::ensure!(coordinator.submit(ticker.clone(), callback), "slot should be free");

    tokio::time::sleep(Duration::from_secs(2)).await;
    println!("[main] busy = {}, cancelling", coordinator.is_busy());
    coordinator.cancel_task();

    match done.await? {
        Outcome::Success(ticks) => println!("[main] finished on its own after {ticks} ticks"),
        Outcome::Error(err) => println!("[main] outcome: {} ({})", err.as_label(), err),
    }

    // 4. Wait until the slot is handed back, then reuse it
    while events.recv().await?.kind != EventKind::SlotReleased {}
    println!("[main] slot released, busy = {}", coordinator.is_busy());

    let (callback, done) = outcome::channel();
    anyhow::ensure!(coordinator.submit(ticker, callback), "slot should be free again");
    tokio::time::sleep(Duration::from_secs(1)).await;

    // 5. Shutdown interrupts the second run and still delivers its outcome
    coordinator.shutdown().await?;
    println!("[main] after shutdown: {:?}", done.await?);
    Ok(())
}
