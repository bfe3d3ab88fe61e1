//! Outbound length-prefix framing.

use std::io;

use bytes::BytesMut;
use tokio_util::codec::Encoder;

use super::{Frame, MAX_PAYLOAD_SIZE};
use crate::codec::{CodecError, FramingError};

/// `tokio_util` encoder writing frames in the 12-byte header format.
///
/// The encoder re-checks the payload bound so peers never receive a frame
/// the decoder on the other side would reject.
#[derive(Clone, Copy, Debug)]
pub struct FrameEncoder {
    max_payload_size: u32,
}

impl FrameEncoder {
    /// Create an encoder accepting payloads up to `max_payload_size` bytes.
    ///
    /// Values above [`MAX_PAYLOAD_SIZE`] are clamped.
    #[must_use]
    pub fn new(max_payload_size: u32) -> Self {
        Self {
            max_payload_size: max_payload_size.min(MAX_PAYLOAD_SIZE),
        }
    }

    /// Largest payload this encoder writes.
    #[must_use]
    pub const fn max_payload_size(&self) -> u32 { self.max_payload_size }
}

impl Default for FrameEncoder {
    fn default() -> Self { Self::new(MAX_PAYLOAD_SIZE) }
}

impl Encoder<Frame> for FrameEncoder {
    type Error = io::Error;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if item.payload_size() > self.max_payload_size {
            return Err(CodecError::Framing(FramingError::PayloadTooLarge {
                size: item.payload_size() as usize,
                max: self.max_payload_size as usize,
            })
            .into());
        }
        item.encode_into(dst);
        Ok(())
    }
}
