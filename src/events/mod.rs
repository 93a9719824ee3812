//! Coordinator events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the coordinator, its worker and
//! its watchers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Coordinator` (admission, cancel, shutdown), the worker
//!   (starting, completed, failed, cancelled), watchers (callback panic, slot release),
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the listener spawned by `CoordinatorBuilder::build`, which fans
//!   events out to the `SubscriberSet`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
