//! Error types returned by coordinated invocations.
//!
//! Only genuine failures are errors. Being superseded or suppressed is an
//! [`Outcome`](crate::Outcome), not an [`InvokeError`].
//!
//! [`InvokeError`] provides helper methods (`as_label`, `as_message`) for
//! logging, mirroring what the event stream reports.

use std::time::Duration;
use thiserror::Error;

/// # Failure of a coordinated invocation.
///
/// `E` is the unit of work's own error type; [`InvokeError::Failed`] carries
/// it unchanged so callers can match on the original cause.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum InvokeError<E> {
    /// The unit of work failed for a reason unrelated to coordination.
    #[error("operation failed: {0}")]
    Failed(#[source] E),

    /// The invocation exceeded the configured timeout and was cancelled.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },
}

impl<E> InvokeError<E> {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use callvisor::InvokeError;
    /// use std::time::Duration;
    ///
    /// let err: InvokeError<std::io::Error> = InvokeError::Timeout { timeout: Duration::from_secs(1) };
    /// assert_eq!(err.as_label(), "invoke_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            InvokeError::Failed(_) => "invoke_failed",
            InvokeError::Timeout { .. } => "invoke_timeout",
        }
    }

    /// Returns the underlying cause, if the unit of work itself failed.
    pub fn into_failure(self) -> Option<E> {
        match self {
            InvokeError::Failed(e) => Some(e),
            InvokeError::Timeout { .. } => None,
        }
    }

    /// Returns `true` if the invocation was cut short by the timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, InvokeError::Timeout { .. })
    }
}

impl<E: std::fmt::Display> InvokeError<E> {
    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            InvokeError::Failed(e) => format!("error: {e}"),
            InvokeError::Timeout { timeout } => format!("timeout: {timeout:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error, PartialEq)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn failed_keeps_cause_unchanged() {
        let err = InvokeError::Failed(Boom);
        assert_eq!(err.as_label(), "invoke_failed");
        assert_eq!(err.to_string(), "operation failed: boom");
        assert_eq!(err.as_message(), "error: boom");
        assert_eq!(err.into_failure(), Some(Boom));
    }

    #[test]
    fn timeout_has_no_cause() {
        let err: InvokeError<Boom> = InvokeError::Timeout {
            timeout: Duration::from_millis(5),
        };
        assert!(err.is_timeout());
        assert_eq!(err.as_message(), "timeout: 5ms");
        assert_eq!(err.into_failure(), None);
    }
}
