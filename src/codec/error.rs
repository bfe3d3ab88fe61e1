//! Error types for the codec layer.
//!
//! # Error Categories
//!
//! - [`FramingError`]: the declared payload size violates the wire bounds. Always fatal to the
//!   connection: the buffered bytes can no longer be trusted to sit on a frame boundary.
//! - [`EofError`]: the transport closed while a partial frame was buffered.
//! - [`CodecError`]: top-level enum wrapping both plus I/O and buffer errors.

use std::io;

use thiserror::Error;

use crate::buffer::BufferError;

/// Framing-level errors detected while validating a header.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FramingError {
    /// Declared payload size exceeds the configured maximum.
    #[error("payload size {size} exceeds maximum {max}")]
    PayloadTooLarge {
        /// Payload size declared by the header.
        size: usize,
        /// Largest payload accepted.
        max: usize,
    },

    /// Declared payload size is negative when read as a signed integer.
    #[error("negative payload size {0}")]
    NegativePayloadSize(i32),

    /// Zero-length payload received while the decoder rejects them.
    #[error("empty payload not permitted")]
    EmptyPayload,
}

/// EOF conditions distinguishing a clean close from a truncated frame.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum EofError {
    /// The transport closed before a full header arrived.
    #[error("premature EOF during header: {bytes_received} of {header_size} header bytes")]
    MidHeader {
        /// Header bytes received before EOF.
        bytes_received: usize,
        /// Expected header size.
        header_size: usize,
    },

    /// The transport closed after the header but before the full payload.
    #[error("premature EOF: {bytes_received} bytes of {expected} byte frame received")]
    MidFrame {
        /// Frame bytes received before EOF, header included.
        bytes_received: usize,
        /// Total frame size declared by the header.
        expected: usize,
    },
}

/// Top-level codec error taxonomy.
///
/// # Examples
///
/// ```
/// use streamframe::codec::{CodecError, FramingError};
///
/// let err = CodecError::Framing(FramingError::PayloadTooLarge {
///     size: 70_000,
///     max: 65_535,
/// });
/// assert!(err.should_disconnect());
/// assert_eq!(err.error_type(), "framing");
/// ```
#[derive(Debug, Error)]
pub enum CodecError {
    /// Malformed header.
    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    /// End of stream with a partial frame buffered.
    #[error("EOF: {0}")]
    Eof(#[from] EofError),

    /// Transport layer I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A guarded read found fewer bytes than the decoder had checked for.
    #[error("buffer error: {0}")]
    Buffer(#[from] BufferError),
}

impl CodecError {
    /// Returns true if the connection should be terminated.
    ///
    /// Every codec error is fatal: the decoder cannot resynchronise on a
    /// stream without frame delimiters.
    #[must_use]
    pub fn should_disconnect(&self) -> bool {
        match self {
            Self::Framing(_) | Self::Eof(_) | Self::Io(_) | Self::Buffer(_) => true,
        }
    }

    /// Returns the error category as a string for logging and metrics.
    ///
    /// One of: `"framing"`, `"eof"`, `"io"`, or `"buffer"`.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Framing(_) => "framing",
            Self::Eof(_) => "eof",
            Self::Io(_) => "io",
            Self::Buffer(_) => "buffer",
        }
    }
}

impl From<CodecError> for io::Error {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Io(e) => e,
            CodecError::Framing(e) => io::Error::new(io::ErrorKind::InvalidData, e),
            CodecError::Buffer(e) => io::Error::new(io::ErrorKind::InvalidData, e),
            CodecError::Eof(e) => io::Error::new(io::ErrorKind::UnexpectedEof, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::framing(CodecError::Framing(FramingError::EmptyPayload), io::ErrorKind::InvalidData)]
    #[case::eof(
        CodecError::Eof(EofError::MidFrame { bytes_received: 3, expected: 17 }),
        io::ErrorKind::UnexpectedEof
    )]
    #[case::buffer(
        CodecError::Buffer(BufferError::Underflow { requested: 4, available: 0 }),
        io::ErrorKind::InvalidData
    )]
    fn codec_errors_map_to_io_kinds(#[case] err: CodecError, #[case] kind: io::ErrorKind) {
        assert!(err.should_disconnect());
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), kind);
    }

    #[test]
    fn negative_size_message_names_the_value() {
        let err = FramingError::NegativePayloadSize(-1);
        assert_eq!(err.to_string(), "negative payload size -1");
    }
}
