//! Error types used by the slotvisor coordinator and tasks.
//!
//! This module defines two error enums:
//!
//! - [`TaskError`]: failures of an admitted task, delivered to the caller only
//!   through [`Outcome::Error`](crate::Outcome::Error).
//! - [`RuntimeError`]: failures of the coordinator itself (construction, shutdown).
//!
//! Admission never fails with an error: a busy slot is an expected condition and
//! [`Coordinator::submit`](crate::Coordinator::submit) reports it as `false`.

use std::fmt::Display;
use std::time::Duration;

use thiserror::Error;

/// # Errors produced by the coordinator runtime.
///
/// These never describe a task outcome; they come from building or shutting
/// down a [`Coordinator`](crate::Coordinator).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The coordinator was built outside of a tokio runtime.
    #[error("no tokio runtime available to drive the coordinator")]
    NoRuntime,

    /// The coordinator has already been shut down.
    #[error("coordinator is closed")]
    Closed,

    /// Shutdown grace period was exceeded; the running task did not stop in time.
    #[error("shutdown timeout {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Name of the task still occupying the slot, if any.
        stuck: Option<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use slotvisor::RuntimeError;
    ///
    /// assert_eq!(RuntimeError::Closed.as_label(), "runtime_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::NoRuntime => "runtime_missing",
            RuntimeError::Closed => "runtime_closed",
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }
}

/// # Errors produced by task execution.
///
/// Every execution-phase failure is normalized into one of these variants and
/// handed to the callback as [`Outcome::Error`](crate::Outcome::Error):
/// - [`TaskError::Fail`]: the task's own logic failed;
/// - [`TaskError::Canceled`]: the run was interrupted (cancel or shutdown);
/// - [`TaskError::Unexpected`]: anything else (panic, lost result).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Task was interrupted before it produced a value.
    #[error("context cancelled")]
    Canceled,

    /// Unexpected fault while running the task or waiting for its result.
    #[error("unexpected fault: {error}")]
    Unexpected {
        /// Description of the fault.
        error: String,
    },
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`] from anything printable.
    ///
    /// # Example
    /// ```
    /// use slotvisor::TaskError;
    ///
    /// let err = TaskError::fail("disk full");
    /// assert_eq!(err.to_string(), "execution failed: disk full");
    /// ```
    pub fn fail(error: impl Display) -> Self {
        TaskError::Fail {
            error: error.to_string(),
        }
    }

    /// Shorthand for [`TaskError::Unexpected`] from anything printable.
    pub fn unexpected(error: impl Display) -> Self {
        TaskError::Unexpected {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use slotvisor::TaskError;
    ///
    /// assert_eq!(TaskError::Canceled.as_label(), "task_canceled");
    /// assert_eq!(TaskError::fail("boom").as_label(), "task_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
            TaskError::Unexpected { .. } => "task_unexpected",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Canceled => "context cancelled".to_string(),
            TaskError::Unexpected { error } => format!("unexpected: {error}"),
        }
    }

    /// True if the run ended because it was interrupted.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, TaskError::Canceled)
    }
}

impl From<anyhow::Error> for TaskError {
    fn from(err: anyhow::Error) -> Self {
        TaskError::Fail {
            error: format!("{err:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anyhow_maps_to_fail_with_context_chain() {
        let err = anyhow::anyhow!("root cause").context("reading config");
        let task_err: TaskError = err.into();
        assert_eq!(
            task_err,
            TaskError::Fail {
                error: "reading config: root cause".into()
            }
        );
    }

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(TaskError::fail("x").as_label(), "task_failed");
        assert_eq!(TaskError::Canceled.as_label(), "task_canceled");
        assert_eq!(TaskError::unexpected("x").as_label(), "task_unexpected");
        assert_eq!(RuntimeError::NoRuntime.as_label(), "runtime_missing");
    }

    #[test]
    fn test_only_canceled_is_interrupted() {
        assert!(TaskError::Canceled.is_interrupted());
        assert!(!TaskError::fail("x").is_interrupted());
        assert!(!TaskError::unexpected("panic").is_interrupted());
    }
}
