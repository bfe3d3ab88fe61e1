//! Error types for connection setup and the outbound path.

use std::io;

use thiserror::Error;

use crate::{codec::CodecError, queue::QueueConfigError};

/// Errors emitted by [`Connection`](super::Connection) and its builder.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Socket configuration, connect or write failure.
    #[error("transport error: {0}")]
    Io(#[from] io::Error),
    /// Name resolution failed.
    #[error("failed to resolve {host}: {source}")]
    Resolve {
        /// Host name that was looked up.
        host: String,
        /// Underlying resolver error.
        #[source]
        source: io::Error,
    },
    /// Name resolution succeeded but returned no addresses.
    #[error("no addresses found for {0}")]
    NoAddress(String),
    /// The connection is closed or closing.
    #[error("connection is not active")]
    Disconnected,
    /// An outbound frame violates the wire bounds.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
    /// The delivery queue could not be built.
    #[error("invalid delivery queue configuration: {0}")]
    Queue(#[from] QueueConfigError),
}
