//! # Example: basic_submit
//!
//! Shows the admission contract of a single-slot coordinator.
//!
//! - A submission made while idle is accepted and its callback fires once.
//! - A submission made while busy is rejected immediately; its callback is never called.
//! - A failing task reports `Outcome::Error` and frees the slot like any other.
//!
//! ## Flow
//! ```text
//! submit(A: sleep 1s, "OK")   ─► true
//! submit(B)                   ─► false   (busy)
//! ... 1s ...                  ─► callback(A, Success("OK"))
//! submit(C: fails)            ─► true    ─► callback(C, Error(Fail))
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=slotvisor=debug cargo run --example basic_submit --features logging
//! ```

use std::{sync::Arc, time::Duration};

use slotvisor::{
    Config, Coordinator, LogWriter, Outcome, Subscribe, TaskError, TaskFn, TaskRef, outcome,
};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slotvisor=info".into()),
        )
        .init();

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let coordinator: Coordinator<String> = Coordinator::builder(Config::default())
        .with_subscribers(subs)
        .build()?;

    let slow: TaskRef<String> = TaskFn::arc("slow", |_ctx: CancellationToken| async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        Ok::<_, TaskError>("OK".to_string())
    });

    let (callback, done) = outcome::channel();
    println!("[main] submit A -> {}", coordinator.submit(slow.clone(), callback));

    let accepted = coordinator.submit(slow.clone(), |outcome: Outcome<String>| {
        println!("[B] never printed: {outcome:?}");
    });
    println!("[main] submit B -> {accepted}");

    println!("[main] A finished: {:?}", done.await?);

    let failing: TaskRef<String> = TaskFn::arc("failing", |_ctx: CancellationToken| async {
        let raw = std::fs::read_to_string("/definitely/missing");
        let body = raw.map_err(|e| anyhow::Error::from(e).context("reading input"))?;
        Ok::<_, TaskError>(body)
    });

    // The slot is released right after A's callback returns; give the watcher a moment.
    tokio::time::sleep(Duration::from_millis(10)).await;

    let (callback, done) = outcome::channel();
    println!("[main] submit C -> {}", coordinator.submit(failing, callback));
    match done.await? {
        Outcome::Success(body) => println!("[main] C read {} bytes", body.len()),
        Outcome::Error(err) => println!("[main] C failed: {}", err.as_message()),
    }

    coordinator.shutdown().await?;
    Ok(())
}
