//! # slotvisor
//!
//! **Slotvisor** is a single-slot task coordinator for tokio.
//!
//! It guarantees that at most one asynchronous unit of work is in flight at a time,
//! answers every submission immediately (accepted or rejected), and reports the
//! outcome of each accepted task through a one-shot callback.
//!
//! It is not a pool and not a queue: a submission made while a task is running is
//! rejected, never buffered.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   caller ── submit(task, callback) ──► Coordinator ──► false   (busy / closed)
//!                                            │
//!                                            ▼ true
//!     ┌──────────────────────────────────────────────────────────────────┐
//!     │  Coordinator                                                     │
//!     │  - Slot (one RunningTask: id, token, atomic TaskState)           │
//!     │  - Worker (capacity-1 channel, runs jobs one at a time)          │
//!     │  - TaskTracker of watchers (one per accepted task)               │
//!     │  - Bus (broadcast events) ──► SubscriberSet (optional)           │
//!     └──────────┬───────────────────────────────────┬───────────────────┘
//!                ▼                                   ▼
//!         Worker: task.run(ctx)  ── Result<T> ──►  Watcher
//!                                                    ├─► callback(Outcome<T>)
//!                                                    └─► release slot
//! ```
//!
//! ### Lifecycle of one admission
//! ```text
//! TaskAdmitted ─► TaskStarting ─► TaskCompleted | TaskFailed | TaskCancelled
//!              ─► callback(Outcome) ─► SlotReleased
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                     |
//! |-------------------|--------------------------------------------------------------|----------------------------------------|
//! | **Coordination**  | Admit one task at a time, cancel it, shut down gracefully.   | [`Coordinator`], [`SlotStatus`]        |
//! | **Tasks**         | Define tasks as trait impls or closures with typed output.   | [`Task`], [`TaskFn`], [`TaskRef`]      |
//! | **Outcomes**      | One-shot delivery of success or normalized failure.          | [`Outcome`], [`OnFinish`]              |
//! | **Errors**        | Typed errors for task execution and the coordinator itself.  | [`TaskError`], [`RuntimeError`]        |
//! | **Subscriber API**| Observe admission and lifecycle events.                      | [`Subscribe`], [`Event`]               |
//! | **Configuration** | Bus capacity and shutdown grace.                             | [`Config`]                             |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a subscriber that forwards events to `tracing`.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use slotvisor::{Config, Coordinator, Outcome, TaskError, TaskFn, TaskRef, outcome};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let coordinator: Coordinator<&'static str> = Coordinator::builder(Config::default())
//!         // .with_subscribers(vec![Arc::new(LogWriter)])  // if feature = "logging"
//!         .build()?;
//!
//!     let slow: TaskRef<&'static str> = TaskFn::arc("slow", |_ctx: CancellationToken| async {
//!         tokio::time::sleep(Duration::from_millis(50)).await;
//!         Ok::<_, TaskError>("OK")
//!     });
//!
//!     let (first, done) = outcome::channel();
//!     assert!(coordinator.submit(slow.clone(), first));
//!
//!     // Busy: rejected immediately, the callback is never called.
//!     let (second, never) = outcome::channel();
//!     assert!(!coordinator.submit(slow.clone(), second));
//!     assert!(never.await.is_err());
//!
//!     assert_eq!(done.await?, Outcome::Success("OK"));
//!     coordinator.shutdown().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
pub mod outcome;
mod subscribers;
mod tasks;

// ---- Public re-exports ----

pub use config::Config;
pub use crate::core::{Coordinator, CoordinatorBuilder, SlotStatus, TaskState};
pub use error::{RuntimeError, TaskError};
pub use events::{Bus, Event, EventKind};
pub use outcome::{OnFinish, Outcome};
pub use subscribers::{Subscribe, SubscriberSet};
pub use tasks::{Task, TaskFn, TaskRef};

// Optional: expose a built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
