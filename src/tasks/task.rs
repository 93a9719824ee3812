//! # Task abstraction.
//!
//! This module defines the [`Task`] trait (async, cancelable, typed output) and the
//! shared handle type [`TaskRef`], an `Arc<dyn Task>` the caller keeps ownership of.
//!
//! A task receives a [`CancellationToken`]. The coordinator interrupts a running task
//! at its next `.await` when the token fires; tasks that spin without awaiting should
//! check the token themselves, otherwise they keep the slot until they return.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;

/// Shared handle to a task producing `T`.
pub type TaskRef<T> = Arc<dyn Task<Output = T>>;

/// # Asynchronous, cancelable unit of work.
///
/// A `Task` has a stable [`name`](Task::name) used in events and an async
/// [`run`](Task::run) method that produces a value of type [`Output`](Task::Output)
/// or a [`TaskError`].
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use slotvisor::{Task, TaskError};
///
/// struct Fetch;
///
/// #[async_trait]
/// impl Task for Fetch {
///     type Output = String;
///
///     fn name(&self) -> &str { "fetch" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<String, TaskError> {
///         if ctx.is_cancelled() {
///             return Err(TaskError::Canceled);
///         }
///         Ok("payload".to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait Task: Send + Sync + 'static {
    /// Value handed to the callback as [`Outcome::Success`](crate::Outcome::Success).
    type Output: Send + 'static;

    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Executes the task once.
    ///
    /// Return `Err(TaskError::Canceled)` when `ctx` is observed as cancelled.
    async fn run(&self, ctx: CancellationToken) -> Result<Self::Output, TaskError>;
}
