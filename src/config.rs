//! # Coordinator configuration.
//!
//! Provides [`Config`], the settings a [`Coordinator`](crate::Coordinator) is built with.
//!
//! The coordinator itself has no tuning knobs for admission: the slot holds one
//! task, a busy slot rejects. Configuration only covers the surrounding runtime:
//! how large the event bus is and how long shutdown may wait.
//!
//! ## Sentinel values
//! - `grace = 0s` → shutdown does not wait; a still-running task is reported as stuck.
//! - `bus_capacity = 0` → clamped to 1.

use std::time::Duration;

/// Configuration for a coordinator instance.
///
/// ## Field semantics
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
/// - `grace`: Maximum wait for the worker and watchers during [`shutdown`](crate::Coordinator::shutdown)
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages will
    /// skip older items.
    pub bus_capacity: usize,

    /// Maximum time to wait for graceful shutdown.
    ///
    /// When shutdown is requested:
    /// - The running task is interrupted via its `CancellationToken`
    /// - The coordinator waits up to `grace` for the worker and all watchers
    /// - If the wait times out, returns `RuntimeError::GraceExceeded`
    pub grace: Duration,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `grace = 30s`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            grace: Duration::from_secs(30),
        }
    }
}
