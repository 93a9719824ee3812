//! # Completion outcome and one-shot callbacks.
//!
//! [`Outcome`] is what a caller eventually receives for every admitted task:
//! either the value the task returned or a [`TaskError`] describing why it
//! produced none. [`OnFinish`] is the sink the outcome is delivered to.
//!
//! ## Rules
//! - A callback is consumed by [`OnFinish::on_finish`], so it fires at most once.
//! - A rejected submission never touches its callback; it is dropped unused.
//!
//! ## Example
//! ```rust
//! use slotvisor::{OnFinish, Outcome, TaskError};
//!
//! let cb = |outcome: Outcome<u32>| {
//!     assert_eq!(outcome.into_result(), Ok(7));
//! };
//! cb.on_finish(Outcome::Success(7));
//!
//! let failed: Outcome<u32> = Err(TaskError::Canceled).into();
//! assert!(failed.is_error());
//! ```

use tokio::sync::oneshot;

use crate::error::TaskError;

/// Result of one admitted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The task finished and returned a value.
    Success(T),
    /// The task failed, was interrupted, or hit an unexpected fault.
    Error(TaskError),
}

impl<T> Outcome<T> {
    /// True for [`Outcome::Success`].
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// True for [`Outcome::Error`].
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    /// Borrows the error, if any.
    pub fn error(&self) -> Option<&TaskError> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Error(e) => Some(e),
        }
    }

    /// Converts into a plain `Result`.
    pub fn into_result(self) -> Result<T, TaskError> {
        match self {
            Outcome::Success(v) => Ok(v),
            Outcome::Error(e) => Err(e),
        }
    }
}

impl<T> From<Result<T, TaskError>> for Outcome<T> {
    fn from(res: Result<T, TaskError>) -> Self {
        match res {
            Ok(v) => Outcome::Success(v),
            Err(e) => Outcome::Error(e),
        }
    }
}

/// One-shot completion sink.
///
/// Implemented for any `FnOnce(Outcome<T>)` closure. Use [`channel`] when the
/// outcome should be awaited instead of handled inline.
///
/// Called from a watcher task, never from the thread that submitted.
/// Panics are caught by the coordinator and do not keep the slot occupied.
pub trait OnFinish<T>: Send + 'static {
    /// Receives the outcome of the task this callback was submitted with.
    fn on_finish(self, outcome: Outcome<T>);
}

impl<T, F> OnFinish<T> for F
where
    F: FnOnce(Outcome<T>) + Send + 'static,
{
    fn on_finish(self, outcome: Outcome<T>) {
        self(outcome)
    }
}

/// Creates a callback paired with a receiver for its outcome.
///
/// The callback forwards into a `oneshot` channel; if the receiver is gone the
/// outcome is dropped. A rejected submission drops the callback, which closes
/// the receiver with `RecvError`.
pub fn channel<T: Send + 'static>() -> (impl OnFinish<T>, oneshot::Receiver<Outcome<T>>) {
    let (tx, rx) = oneshot::channel();
    let cb = move |outcome: Outcome<T>| {
        let _ = tx.send(outcome);
    };
    (cb, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_conversion_keeps_variant() {
        let ok: Outcome<&str> = Ok("OK").into();
        assert_eq!(ok, Outcome::Success("OK"));
        assert!(ok.error().is_none());

        let err: Outcome<&str> = Err(TaskError::fail("boom")).into();
        assert_eq!(err.error(), Some(&TaskError::fail("boom")));
        assert_eq!(err.into_result(), Err(TaskError::fail("boom")));
    }

    #[test]
    fn test_channel_delivers_and_tolerates_dropped_receiver() {
        let (cb, mut rx) = channel::<u8>();
        cb.on_finish(Outcome::Success(1));
        assert_eq!(rx.try_recv().ok(), Some(Outcome::Success(1)));

        let (cb, rx) = channel::<u8>();
        drop(rx);
        cb.on_finish(Outcome::Error(TaskError::Canceled));
    }

    #[test]
    fn test_dropped_callback_closes_receiver() {
        let (cb, mut rx) = channel::<u8>();
        drop(cb);
        assert!(rx.try_recv().is_err());
    }
}
