//! Helpers for explicit little-endian conversions.
//!
//! Every integer in the frame header travels least significant byte first.
//! `clippy::little_endian_bytes` is enabled crate-wide, so these functions
//! are the only places allowed to call `to_le_bytes`/`from_le_bytes`.

/// Serialise a `u16` in wire byte order (little-endian).
///
/// # Examples
///
/// ```
/// use streamframe::byte_order::write_le_u16;
///
/// assert_eq!(write_le_u16(0x1234), [0x34, 0x12]);
/// ```
#[must_use]
pub fn write_le_u16(value: u16) -> [u8; 2] {
    #[expect(
        clippy::little_endian_bytes,
        reason = "Frame headers are little-endian on the wire."
    )]
    value.to_le_bytes()
}

/// Parse a wire-order `u16`.
///
/// # Examples
///
/// ```
/// use streamframe::byte_order::read_le_u16;
///
/// assert_eq!(read_le_u16([0x34, 0x12]), 0x1234);
/// ```
#[must_use]
pub fn read_le_u16(bytes: [u8; 2]) -> u16 {
    #[expect(
        clippy::little_endian_bytes,
        reason = "Frame headers are little-endian on the wire."
    )]
    u16::from_le_bytes(bytes)
}

/// Serialise a `u32` in wire byte order (little-endian).
///
/// # Examples
///
/// ```
/// use streamframe::byte_order::write_le_u32;
///
/// assert_eq!(write_le_u32(0x1234_5678), [0x78, 0x56, 0x34, 0x12]);
/// ```
#[must_use]
pub fn write_le_u32(value: u32) -> [u8; 4] {
    #[expect(
        clippy::little_endian_bytes,
        reason = "Frame headers are little-endian on the wire."
    )]
    value.to_le_bytes()
}

/// Parse a wire-order `u32`.
///
/// # Examples
///
/// ```
/// use streamframe::byte_order::read_le_u32;
///
/// assert_eq!(read_le_u32([0x78, 0x56, 0x34, 0x12]), 0x1234_5678);
/// ```
#[must_use]
pub fn read_le_u32(bytes: [u8; 4]) -> u32 {
    #[expect(
        clippy::little_endian_bytes,
        reason = "Frame headers are little-endian on the wire."
    )]
    u32::from_le_bytes(bytes)
}

/// Parse a wire-order `i32`.
///
/// The length field is a signed 32-bit integer; peers that write `-1`
/// produce `0xFFFF_FFFF` on the wire.
///
/// # Examples
///
/// ```
/// use streamframe::byte_order::read_le_i32;
///
/// assert_eq!(read_le_i32([0xFF, 0xFF, 0xFF, 0xFF]), -1);
/// assert_eq!(read_le_i32([0x05, 0x00, 0x00, 0x00]), 5);
/// ```
#[must_use]
pub fn read_le_i32(bytes: [u8; 4]) -> i32 {
    #[expect(
        clippy::little_endian_bytes,
        reason = "Frame headers are little-endian on the wire."
    )]
    i32::from_le_bytes(bytes)
}

/// Serialise an `i32` in wire byte order (little-endian).
///
/// # Examples
///
/// ```
/// use streamframe::byte_order::write_le_i32;
///
/// assert_eq!(write_le_i32(-1), [0xFF, 0xFF, 0xFF, 0xFF]);
/// ```
#[must_use]
pub fn write_le_i32(value: i32) -> [u8; 4] {
    #[expect(
        clippy::little_endian_bytes,
        reason = "Frame headers are little-endian on the wire."
    )]
    value.to_le_bytes()
}

#[cfg(test)]
mod tests {
    //! Round-trip tests for little-endian conversion helpers.

    use rstest::rstest;

    use super::{
        read_le_i32,
        read_le_u16,
        read_le_u32,
        write_le_i32,
        write_le_u16,
        write_le_u32,
    };

    /// Verify that each write/read pair round-trips and matches the wire layout.
    #[rstest]
    #[case::u16(
        0x1234i64,
        &write_le_u16(0x1234)[..],
        &[0x34, 0x12],
        i64::from(read_le_u16([0x34, 0x12]))
    )]
    #[case::u32(
        0x1234_5678i64,
        &write_le_u32(0x1234_5678)[..],
        &[0x78, 0x56, 0x34, 0x12],
        i64::from(read_le_u32([0x78, 0x56, 0x34, 0x12]))
    )]
    #[case::negative_i32(
        -70_000i64,
        &write_le_i32(-70_000)[..],
        &[0x90, 0xEE, 0xFE, 0xFF],
        i64::from(read_le_i32([0x90, 0xEE, 0xFE, 0xFF]))
    )]
    fn little_endian_round_trip(
        #[case] value: i64,
        #[case] written: &[u8],
        #[case] expected_bytes: &[u8],
        #[case] read_back: i64,
    ) {
        assert_eq!(written, expected_bytes);
        assert_eq!(read_back, value);
    }

    #[test]
    fn signed_and_unsigned_views_share_bits() {
        let bytes = write_le_i32(-1);
        assert_eq!(read_le_u32(bytes), u32::MAX);
    }
}
