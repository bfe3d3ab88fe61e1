//! Stream decoder turning arbitrary byte chunks into frames.
//!
//! TCP delivers bytes, not messages: one read may hold half a header, or
//! three frames and the start of a fourth. [`StreamDecoder`] accumulates
//! arrivals in an [`AccumulationBuffer`] and on every arrival extracts as
//! many complete frames as are present, leaving any residual partial frame
//! buffered for the next one.
//!
//! Each decode attempt:
//!
//! 1. Stops if fewer than [`HEADER_SIZE`] bytes are buffered.
//! 2. Marks the read cursor and reads the little-endian `payload_size`.
//! 3. Validates the size. A violation is fatal: every buffered byte is discarded and a
//!    [`FramingError`] is returned so the owner closes the connection.
//! 4. Rewinds to the mark and stops if the rest of the frame has not arrived.
//! 5. Otherwise consumes the frame, then either clears the buffer (nothing left) or compacts it
//!    and tries again.
//!
//! Repetition is an explicit loop bounded by the number of headers that
//! could fit in the buffered bytes.

use bytes::Bytes;

use crate::{
    buffer::AccumulationBuffer,
    byte_order::{read_le_i32, read_le_u32, write_le_u32},
    frame::{Frame, FrameHeader, HEADER_REMAINDER_SIZE, HEADER_SIZE, LENGTH_FIELD_SIZE},
};

mod config;
pub mod error;

pub use config::{DecoderConfig, ZeroLengthPolicy};
pub use error::{CodecError, EofError, FramingError};

/// Result of a single decode attempt.
enum Attempt {
    /// A frame was extracted; `more` is set when bytes remain buffered.
    Frame { frame: Frame, more: bool },
    /// Not enough data for a full frame.
    NeedMore,
}

/// Stateful per-connection frame decoder.
///
/// # Examples
///
/// ```
/// use streamframe::{codec::StreamDecoder, frame::Frame};
///
/// let wire = Frame::new([0; 8], &b"hello"[..])
///     .expect("payload fits")
///     .to_bytes();
/// let mut decoder = StreamDecoder::default();
/// let mut frames = Vec::new();
///
/// decoder.feed(&wire[..10], &mut frames).expect("valid prefix");
/// assert!(frames.is_empty());
/// decoder.feed(&wire[10..], &mut frames).expect("valid frame");
/// assert_eq!(frames[0].payload().as_ref(), b"hello");
/// ```
#[derive(Debug)]
pub struct StreamDecoder {
    buffer: AccumulationBuffer,
    config: DecoderConfig,
    corrupted: Option<FramingError>,
    frames_decoded: u64,
    bytes_received: u64,
}

impl StreamDecoder {
    /// Create a decoder with the given configuration.
    #[must_use]
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            buffer: AccumulationBuffer::with_capacity(config.initial_capacity_value()),
            config,
            corrupted: None,
            frames_decoded: 0,
            bytes_received: 0,
        }
    }

    /// Append a chunk from the transport and extract every complete frame.
    ///
    /// Decoded frames are pushed onto `out` in stream order. Frames that
    /// precede a malformed header in the same chunk are still pushed before
    /// the error is returned. Returns the number of frames pushed.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Framing`] if a header declares an invalid
    /// payload size. The decoder stays failed afterwards and discards any
    /// further input.
    pub fn feed(&mut self, chunk: &[u8], out: &mut Vec<Frame>) -> Result<usize, CodecError> {
        if let Some(err) = &self.corrupted {
            return Err(err.clone().into());
        }
        self.bytes_received += chunk.len() as u64;
        self.buffer.extend_from_slice(chunk);
        self.decode(out)
    }

    /// Extract every complete frame already buffered, without new input.
    ///
    /// Calling this repeatedly with nothing new buffered leaves the cursors
    /// untouched and produces no frames.
    ///
    /// # Errors
    ///
    /// See [`feed`](Self::feed).
    pub fn decode(&mut self, out: &mut Vec<Frame>) -> Result<usize, CodecError> {
        if let Some(err) = &self.corrupted {
            return Err(err.clone().into());
        }
        // Every frame consumes at least a header, so this bounds the loop
        // by the data present rather than by recursion depth.
        let max_attempts = self.buffer.readable_bytes() / HEADER_SIZE + 1;
        let mut produced = 0;
        let mut outcome = Ok(());
        for _ in 0..max_attempts {
            match self.decode_one() {
                Ok(Attempt::Frame { frame, more }) => {
                    out.push(frame);
                    produced += 1;
                    self.frames_decoded += 1;
                    if !more {
                        break;
                    }
                }
                Ok(Attempt::NeedMore) => break,
                Err(err) => {
                    outcome = Err(err);
                    break;
                }
            }
        }
        if produced > 0 {
            crate::metrics::inc_frames_decoded(produced as u64);
            tracing::trace!(
                frames = produced,
                buffered = self.buffer.readable_bytes(),
                "decode pass complete"
            );
        }
        outcome.map(|()| produced)
    }

    /// Check the buffer once the transport reports end of stream.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Eof`] if a partial frame is still buffered.
    pub fn decode_eof(&self) -> Result<(), CodecError> {
        let unconsumed = self.buffer.unconsumed();
        if unconsumed.is_empty() || self.corrupted.is_some() {
            return Ok(());
        }
        let err = match unconsumed.get(..LENGTH_FIELD_SIZE) {
            Some(prefix) if unconsumed.len() >= HEADER_SIZE => {
                let mut raw = [0u8; LENGTH_FIELD_SIZE];
                raw.copy_from_slice(prefix);
                let payload_size = read_le_u32(raw);
                EofError::MidFrame {
                    bytes_received: unconsumed.len(),
                    expected: HEADER_SIZE + payload_size as usize,
                }
            }
            _ => EofError::MidHeader {
                bytes_received: unconsumed.len(),
                header_size: HEADER_SIZE,
            },
        };
        Err(err.into())
    }

    /// Unconsumed bytes waiting for the rest of their frame.
    #[must_use]
    pub fn buffered_bytes(&self) -> usize { self.buffer.readable_bytes() }

    /// Read-only view of the accumulation buffer.
    #[must_use]
    pub const fn buffer(&self) -> &AccumulationBuffer { &self.buffer }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &DecoderConfig { &self.config }

    /// Frames extracted over the decoder's lifetime.
    #[must_use]
    pub const fn frames_decoded(&self) -> u64 { self.frames_decoded }

    /// Bytes received over the decoder's lifetime.
    #[must_use]
    pub const fn bytes_received(&self) -> u64 { self.bytes_received }

    /// Returns `true` once a malformed header has been seen.
    #[must_use]
    pub const fn is_corrupted(&self) -> bool { self.corrupted.is_some() }

    fn decode_one(&mut self) -> Result<Attempt, CodecError> {
        if self.buffer.readable_bytes() < HEADER_SIZE {
            return Ok(Attempt::NeedMore);
        }

        self.buffer.mark();
        let raw_size = self.buffer.read_u32_le()?;
        let payload_size = match self.validate(raw_size) {
            Ok(size) => size,
            Err(err) => return Err(self.fail(err)),
        };

        let remaining = HEADER_REMAINDER_SIZE + payload_size as usize;
        let available = self.buffer.readable_bytes();
        if available < remaining {
            self.buffer.reset();
            return Ok(Attempt::NeedMore);
        }

        let remainder = self.buffer.read_array::<HEADER_REMAINDER_SIZE>()?;
        let payload: Bytes = self.buffer.read_exact(payload_size as usize)?;
        let frame = Frame::from_parts(FrameHeader::new(payload_size, remainder), payload);
        tracing::debug!(payload_size, "frame decoded");

        if available == remaining {
            self.buffer.clear();
            Ok(Attempt::Frame { frame, more: false })
        } else {
            self.buffer.compact();
            Ok(Attempt::Frame { frame, more: true })
        }
    }

    fn validate(&self, raw_size: u32) -> Result<u32, FramingError> {
        let signed = read_le_i32(write_le_u32(raw_size));
        if signed < 0 {
            return Err(FramingError::NegativePayloadSize(signed));
        }
        if raw_size == 0 && self.config.zero_length_policy() == ZeroLengthPolicy::Reject {
            return Err(FramingError::EmptyPayload);
        }
        let max = self.config.max_payload_size_value();
        if raw_size > max {
            return Err(FramingError::PayloadTooLarge {
                size: raw_size as usize,
                max: max as usize,
            });
        }
        Ok(raw_size)
    }

    fn fail(&mut self, err: FramingError) -> CodecError {
        tracing::warn!(
            error = %err,
            discarded = self.buffer.readable_bytes() + LENGTH_FIELD_SIZE,
            "corrupt frame header; discarding buffered bytes"
        );
        crate::metrics::inc_corrupt_frames();
        self.buffer.discard_all();
        self.corrupted = Some(err.clone());
        err.into()
    }
}

impl Default for StreamDecoder {
    fn default() -> Self { Self::new(DecoderConfig::default()) }
}

#[cfg(test)]
mod tests;
