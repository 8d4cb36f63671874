// Central Error Type for the Dispatch Engine

use std::time::Duration;
use thiserror::Error;

/// Dispatch-level error type
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The pool has begun shutdown; the queue no longer accepts jobs.
    /// Returned to producers instead of crashing their task.
    #[error("queue closed: dispatch pool is shutting down")]
    QueueClosed,

    #[error("send failed: {0}")]
    Send(#[from] crate::port::SendError),

    #[error("delivery timed out after {}ms", .elapsed.as_millis())]
    Timeout { elapsed: Duration },
}

/// Result type alias using DispatchError
pub type Result<T> = std::result::Result<T, DispatchError>;
