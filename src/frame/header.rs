//! Fixed 12-byte frame header.

use crate::byte_order::{read_le_u16, read_le_u32, write_le_u16, write_le_u32};

/// Width of the little-endian `payload_size` field.
pub const LENGTH_FIELD_SIZE: usize = 4;

/// Width of the application-defined bytes following the length field.
pub const HEADER_REMAINDER_SIZE: usize = 8;

/// Total header width. `payload_size` never includes these bytes.
pub const HEADER_SIZE: usize = LENGTH_FIELD_SIZE + HEADER_REMAINDER_SIZE;

/// Largest payload the wire format allows.
pub const MAX_PAYLOAD_SIZE: u32 = 65_535;

/// Header preceding every frame on the wire.
///
/// Layout, all integers little-endian:
///
/// | Offset | Size | Field |
/// |---|---|---|
/// | 0 | 4 | `payload_size` |
/// | 4 | 8 | header remainder (`id: u32`, `context: u16`, `packet_type: u16`) |
///
/// # Examples
///
/// ```
/// use streamframe::frame::FrameHeader;
///
/// let header = FrameHeader::with_fields(5, 7, 1, 3);
/// assert_eq!(header.payload_size(), 5);
/// assert_eq!(header.id(), 7);
/// assert_eq!(header.context(), 1);
/// assert_eq!(header.packet_type(), 3);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FrameHeader {
    payload_size: u32,
    remainder: [u8; HEADER_REMAINDER_SIZE],
}

impl FrameHeader {
    /// Create a header from a payload size and raw remainder bytes.
    #[must_use]
    pub const fn new(payload_size: u32, remainder: [u8; HEADER_REMAINDER_SIZE]) -> Self {
        Self {
            payload_size,
            remainder,
        }
    }

    /// Create a header from the conventional `id`/`context`/`packet_type` fields.
    #[must_use]
    pub fn with_fields(payload_size: u32, id: u32, context: u16, packet_type: u16) -> Self {
        let mut remainder = [0u8; HEADER_REMAINDER_SIZE];
        remainder[..4].copy_from_slice(&write_le_u32(id));
        remainder[4..6].copy_from_slice(&write_le_u16(context));
        remainder[6..].copy_from_slice(&write_le_u16(packet_type));
        Self::new(payload_size, remainder)
    }

    /// Number of payload bytes following the header.
    #[must_use]
    pub const fn payload_size(&self) -> u32 { self.payload_size }

    /// Raw application-defined header bytes.
    #[must_use]
    pub const fn remainder(&self) -> [u8; HEADER_REMAINDER_SIZE] { self.remainder }

    /// Message identifier stored in remainder bytes `0..4`.
    #[must_use]
    pub fn id(&self) -> u32 {
        read_le_u32([
            self.remainder[0],
            self.remainder[1],
            self.remainder[2],
            self.remainder[3],
        ])
    }

    /// Context value stored in remainder bytes `4..6`.
    #[must_use]
    pub fn context(&self) -> u16 { read_le_u16([self.remainder[4], self.remainder[5]]) }

    /// Packet type stored in remainder bytes `6..8`.
    #[must_use]
    pub fn packet_type(&self) -> u16 { read_le_u16([self.remainder[6], self.remainder[7]]) }

    /// Length of the whole frame on the wire, header included.
    #[must_use]
    pub fn frame_len(&self) -> usize { HEADER_SIZE + self.payload_size as usize }

    /// Serialise the header into its 12-byte wire form.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[..LENGTH_FIELD_SIZE].copy_from_slice(&write_le_u32(self.payload_size));
        out[LENGTH_FIELD_SIZE..].copy_from_slice(&self.remainder);
        out
    }
}
