//! Error types used by the rollvisor monitor and its storage seam.
//!
//! This module defines two main error enums:
//!
//! - [`MonitorError`] — internal failures of the rollback monitor itself.
//! - [`StoreError`] — failures raised by the persistence collaborator.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging
//! and fault reporting.
//!
//! None of these errors ever reach the host application through a lifecycle
//! entry point: the monitor's failure shield intercepts them at the operation
//! boundary, logs them, and forwards them to the registered
//! [`ReportFault`](crate::ReportFault) collaborator. They appear in public
//! signatures only where wiring happens (construction, install).

use thiserror::Error;

/// # Errors produced by the persistence collaborator.
///
/// The concrete key-value engine lives on the host side of the
/// [`Store`](crate::Store) seam; whatever it fails with is carried here as a
/// rendered message. The monitor treats every store failure as recoverable:
/// a failed read collapses to "no prior state", a failed write means a
/// possibly missing or misclassified report, never a crash.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing engine rejected or failed the operation.
    #[error("storage backend failure: {message}")]
    Backend {
        /// Rendered description of the backend failure.
        message: String,
    },
}

impl StoreError {
    /// Builds a [`StoreError::Backend`] from anything displayable.
    pub fn backend(message: impl std::fmt::Display) -> Self {
        StoreError::Backend {
            message: message.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            StoreError::Backend { .. } => "store_backend",
        }
    }
}

/// # Internal failures of the rollback monitor.
///
/// These are intercepted by the failure shield and routed to the
/// [`ReportFault`](crate::ReportFault) collaborator; the only variant a
/// caller can observe directly is [`MonitorError::AlreadyInitialized`],
/// returned by [`install`](crate::install) on a second installation attempt.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum MonitorError {
    /// A second process-scoped monitor installation was attempted.
    ///
    /// Installing twice is a programming error in the host integration, not
    /// a runtime condition to tolerate.
    #[error("rollback monitor already installed for this process")]
    AlreadyInitialized,

    /// The persistence collaborator failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The event log could not be serialized for persistence.
    #[error("event log serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Report dispatch was requested outside a tokio runtime.
    ///
    /// The report is dropped (delivery is at-most-once, best-effort).
    #[error("no async runtime available for report dispatch")]
    NoRuntime,

    /// An operation panicked; the payload was captured by the shield.
    #[error("operation panicked: {message}")]
    Panicked {
        /// Rendered panic payload, if it was a string.
        message: String,
    },
}

impl MonitorError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use rollvisor::MonitorError;
    ///
    /// assert_eq!(MonitorError::AlreadyInitialized.as_label(), "monitor_already_initialized");
    /// assert_eq!(MonitorError::NoRuntime.as_label(), "monitor_no_runtime");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            MonitorError::AlreadyInitialized => "monitor_already_initialized",
            MonitorError::Store(_) => "monitor_store",
            MonitorError::Serialize(_) => "monitor_serialize",
            MonitorError::NoRuntime => "monitor_no_runtime",
            MonitorError::Panicked { .. } => "monitor_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            MonitorError::AlreadyInitialized => "already installed".to_string(),
            MonitorError::Store(e) => format!("store: {e}"),
            MonitorError::Serialize(e) => format!("serialize: {e}"),
            MonitorError::NoRuntime => "no tokio runtime".to_string(),
            MonitorError::Panicked { message } => format!("panic: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        let err = MonitorError::Store(StoreError::backend("disk full"));
        assert_eq!(err.as_label(), "monitor_store");
        assert_eq!(StoreError::backend("disk full").as_label(), "store_backend");
    }

    #[test]
    fn test_store_error_carries_message() {
        let err = StoreError::backend("remount ro");
        assert!(err.to_string().contains("remount ro"));
    }
}
