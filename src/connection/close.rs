//! Reasons a connection stops reading.

use std::io;

use thiserror::Error;

use crate::codec::{CodecError, EofError, FramingError};

/// Why the reader task ended.
///
/// Published once through [`Connection::closed`](super::Connection::closed)
/// and passed to the `on_disconnect` hook.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CloseReason {
    /// The peer closed the stream at a frame boundary.
    #[error("peer closed the connection")]
    PeerClosed,
    /// The peer closed the stream partway through a frame.
    #[error("peer closed mid-frame: {0}")]
    Truncated(EofError),
    /// A header declared an invalid payload size.
    #[error("corrupt frame: {0}")]
    CorruptFrame(FramingError),
    /// The delivery queue was full under `ReturnErrorIfFull`.
    #[error("delivery queue full")]
    QueueFull,
    /// The consumer dropped its receiver.
    #[error("frame consumer gone")]
    ConsumerGone,
    /// Reading from the transport failed.
    #[error("transport error: {0}")]
    Io(io::ErrorKind),
    /// [`Connection::shutdown`](super::Connection::shutdown) was called or
    /// the connection was dropped.
    #[error("connection shut down locally")]
    Shutdown,
}

impl CloseReason {
    /// Returns `true` for closes that lost no data.
    #[must_use]
    pub fn is_clean(&self) -> bool { matches!(self, Self::PeerClosed | Self::Shutdown) }
}

impl From<CodecError> for CloseReason {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Framing(e) => Self::CorruptFrame(e),
            CodecError::Eof(e) => Self::Truncated(e),
            CodecError::Io(e) => Self::Io(e.kind()),
            CodecError::Buffer(_) => Self::Io(io::ErrorKind::InvalidData),
        }
    }
}
