//! # Event subscribers for the coordinator.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out and
//! (with the `logging` feature) the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Coordinator / worker / watcher ── publish(Event) ──► Bus ──► listener
//!                                                                 │
//!                                                                 ▼
//!                                                          SubscriberSet::emit
//!                                                   ┌─────────────┼─────────────┐
//!                                                   ▼             ▼             ▼
//!                                              LogWriter       Metrics        Custom
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use slotvisor::{Subscribe, Event, EventKind};
//! use async_trait::async_trait;
//!
//! struct Rejections;
//!
//! #[async_trait]
//! impl Subscribe for Rejections {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::TaskRejected {
//!             // increment a counter
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "rejections" }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscriber;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
