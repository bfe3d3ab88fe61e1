//! Raw wire byte fixtures.
//!
//! These build bytes by hand rather than through `FrameEncoder`, so they
//! can describe headers the encoder would refuse.

use streamframe::{
    byte_order::{write_le_i32, write_le_u16, write_le_u32},
    frame::{HEADER_REMAINDER_SIZE, HEADER_SIZE},
};

/// Header remainder carrying `id` with zero context and packet type.
#[must_use]
pub fn remainder(id: u32) -> [u8; HEADER_REMAINDER_SIZE] {
    let mut out = [0; HEADER_REMAINDER_SIZE];
    out[..4].copy_from_slice(&write_le_u32(id));
    out[4..6].copy_from_slice(&write_le_u16(0));
    out[6..].copy_from_slice(&write_le_u16(0));
    out
}

/// A well-formed frame with header id `id`.
///
/// # Panics
///
/// Panics if `payload` is longer than `u32::MAX` bytes.
#[must_use]
pub fn frame_bytes(id: u32, payload: &[u8]) -> Vec<u8> {
    let size = u32::try_from(payload.len()).expect("payload length fits u32");
    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(&write_le_u32(size));
    out.extend_from_slice(&remainder(id));
    out.extend_from_slice(payload);
    out
}

/// A bare header whose length field holds `declared`.
#[must_use]
pub fn raw_header(declared: i32) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_SIZE);
    out.extend_from_slice(&write_le_i32(declared));
    out.extend_from_slice(&[0; HEADER_REMAINDER_SIZE]);
    out
}

/// Concatenate the wire form of several `(id, payload)` frames.
#[must_use]
pub fn stream_of(frames: &[(u32, &[u8])]) -> Vec<u8> {
    frames
        .iter()
        .flat_map(|(id, payload)| frame_bytes(*id, payload))
        .collect()
}

/// Split `bytes` into chunks of at most `size` bytes.
///
/// # Panics
///
/// Panics if `size` is zero.
#[must_use]
pub fn chunked(bytes: &[u8], size: usize) -> Vec<Vec<u8>> {
    bytes.chunks(size).map(<[u8]>::to_vec).collect()
}
