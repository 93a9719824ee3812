//! Coordinator core: admission, execution and outcome delivery.
//!
//! The only public API from this module is [`Coordinator`] (with its builder)
//! and the state types it reports.
//!
//! Internal modules:
//! - [`coordinator`]: admission gate, cancellation, shutdown;
//! - [`slot`]: the guarded single slot and its status snapshot;
//! - [`state`]: atomic execution state of the admitted task;
//! - [`worker`]: single-capacity execution context;
//! - [`watcher`]: per-admission outcome delivery and slot release;
//! - [`builder`]: wiring of bus, subscribers, worker.

mod builder;
mod coordinator;
mod panic;
mod slot;
mod state;
mod watcher;
mod worker;

pub(crate) use panic::panic_message;

pub use builder::CoordinatorBuilder;
pub use coordinator::Coordinator;
pub use slot::SlotStatus;
pub use state::TaskState;
