//! Frame types and the outbound frame encoder.
//!
//! A frame is a 12-byte little-endian header followed by `payload_size`
//! payload bytes. Frames are immutable once built and are moved, never
//! shared, from the decoder through the delivery queue to the consumer.

mod encoder;
mod header;

use bytes::{BufMut, Bytes, BytesMut};
pub use encoder::FrameEncoder;
pub use header::{
    FrameHeader,
    HEADER_REMAINDER_SIZE,
    HEADER_SIZE,
    LENGTH_FIELD_SIZE,
    MAX_PAYLOAD_SIZE,
};

use crate::codec::FramingError;

/// One complete application message extracted from the byte stream.
///
/// # Examples
///
/// ```
/// use streamframe::frame::Frame;
///
/// let frame = Frame::new([0; 8], &b"hello"[..]).expect("payload fits");
/// assert_eq!(frame.payload_size(), 5);
/// assert_eq!(frame.payload().as_ref(), b"hello");
/// assert_eq!(frame.encoded_len(), 17);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    header: FrameHeader,
    payload: Bytes,
}

impl Frame {
    /// Build a frame from raw header remainder bytes and a payload.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::PayloadTooLarge`] if the payload exceeds
    /// [`MAX_PAYLOAD_SIZE`].
    pub fn new(
        header_remainder: [u8; HEADER_REMAINDER_SIZE],
        payload: impl Into<Bytes>,
    ) -> Result<Self, FramingError> {
        let payload = payload.into();
        let payload_size = u32::try_from(payload.len())
            .ok()
            .filter(|size| *size <= MAX_PAYLOAD_SIZE)
            .ok_or(FramingError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD_SIZE as usize,
            })?;
        Ok(Self {
            header: FrameHeader::new(payload_size, header_remainder),
            payload,
        })
    }

    /// Build a frame using the conventional `id`/`context`/`packet_type`
    /// header fields.
    ///
    /// # Errors
    ///
    /// Returns [`FramingError::PayloadTooLarge`] if the payload exceeds
    /// [`MAX_PAYLOAD_SIZE`].
    pub fn with_fields(
        id: u32,
        context: u16,
        packet_type: u16,
        payload: impl Into<Bytes>,
    ) -> Result<Self, FramingError> {
        let remainder = FrameHeader::with_fields(0, id, context, packet_type).remainder();
        Self::new(remainder, payload)
    }

    /// Assemble a frame whose header was already validated by the decoder.
    pub(crate) fn from_parts(header: FrameHeader, payload: Bytes) -> Self {
        debug_assert_eq!(header.payload_size() as usize, payload.len());
        Self { header, payload }
    }

    /// The decoded header.
    #[must_use]
    pub const fn header(&self) -> &FrameHeader { &self.header }

    /// Declared payload length.
    #[must_use]
    pub const fn payload_size(&self) -> u32 { self.header.payload_size() }

    /// Application-defined header bytes following the length field.
    #[must_use]
    pub const fn header_remainder(&self) -> [u8; HEADER_REMAINDER_SIZE] {
        self.header.remainder()
    }

    /// Payload bytes.
    #[must_use]
    pub fn payload(&self) -> &Bytes { &self.payload }

    /// Consume the frame, returning its payload.
    #[must_use]
    pub fn into_payload(self) -> Bytes { self.payload }

    /// Length of the frame on the wire, header included.
    #[must_use]
    pub fn encoded_len(&self) -> usize { self.header.frame_len() }

    /// Append the wire form of this frame to `dst`.
    pub fn encode_into(&self, dst: &mut BytesMut) {
        dst.reserve(self.encoded_len());
        dst.put_slice(&self.header.to_bytes());
        dst.put_slice(&self.payload);
    }

    /// Wire form of this frame as a fresh buffer.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        let mut dst = BytesMut::with_capacity(self.encoded_len());
        self.encode_into(&mut dst);
        dst.freeze()
    }
}
