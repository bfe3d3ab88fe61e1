//! Error types for delivery queue operations and configuration.

use thiserror::Error;

/// Errors that can occur when enqueueing a frame.
#[non_exhaustive]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The queue was at capacity and the policy was `ReturnErrorIfFull`.
    #[error("delivery queue full")]
    Full,
    /// The receiving end of the queue has been dropped or closed.
    #[error("delivery queue closed")]
    Closed,
}

/// Errors returned when creating a delivery queue.
#[non_exhaustive]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueueConfigError {
    /// The configured capacity was zero.
    #[error("invalid capacity {0}; must be >= 1")]
    InvalidCapacity(usize),
}
