//! Errors reported by signals and the scheduler.

use thiserror::Error;

/// Any failure from `listbind-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// The task already fired, was cancelled, or never existed.
    #[error("Invalid or expired scheduled task ID")]
    InvalidTaskId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    /// No live connection has this ID.
    #[error("Invalid or disconnected connection ID")]
    InvalidConnection,
}

pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_cancel_error_message() {
        let err: CoreError = SchedulerError::InvalidTaskId.into();
        assert_eq!(
            err.to_string(),
            "Scheduler error: Invalid or expired scheduled task ID"
        );
    }

    #[test]
    fn test_disconnect_error_keeps_cause() {
        let err: CoreError = SignalError::InvalidConnection.into();
        assert_eq!(
            err.source().map(|cause| cause.to_string()),
            Some("Invalid or disconnected connection ID".to_string())
        );
    }
}
