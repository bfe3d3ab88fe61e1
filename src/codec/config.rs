//! Decoder configuration.

use crate::{buffer::DEFAULT_BUFFER_CAPACITY, frame::MAX_PAYLOAD_SIZE};

/// How the decoder treats a header declaring `payload_size == 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZeroLengthPolicy {
    /// Deliver a frame with an empty payload.
    #[default]
    Accept,
    /// Treat the header as corrupt and close the connection.
    Reject,
}

/// Settings for [`StreamDecoder`](super::StreamDecoder).
///
/// # Examples
///
/// ```
/// use streamframe::codec::{DecoderConfig, ZeroLengthPolicy};
///
/// let config = DecoderConfig::default()
///     .max_payload_size(1024)
///     .zero_length(ZeroLengthPolicy::Reject);
/// assert_eq!(config.max_payload_size_value(), 1024);
/// assert_eq!(config.zero_length_policy(), ZeroLengthPolicy::Reject);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    max_payload_size: u32,
    zero_length: ZeroLengthPolicy,
    initial_capacity: usize,
}

impl DecoderConfig {
    /// Set the largest payload accepted.
    ///
    /// Values are clamped to `1..=`[`MAX_PAYLOAD_SIZE`].
    #[must_use]
    pub fn max_payload_size(mut self, max: u32) -> Self {
        self.max_payload_size = max.clamp(1, MAX_PAYLOAD_SIZE);
        self
    }

    /// Choose how zero-length payloads are handled.
    #[must_use]
    pub fn zero_length(mut self, policy: ZeroLengthPolicy) -> Self {
        self.zero_length = policy;
        self
    }

    /// Reserve `capacity` bytes for the accumulation buffer up front.
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Largest payload accepted.
    #[must_use]
    pub const fn max_payload_size_value(&self) -> u32 { self.max_payload_size }

    /// Configured zero-length policy.
    #[must_use]
    pub const fn zero_length_policy(&self) -> ZeroLengthPolicy { self.zero_length }

    /// Initial accumulation buffer capacity.
    #[must_use]
    pub const fn initial_capacity_value(&self) -> usize { self.initial_capacity }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_payload_size: MAX_PAYLOAD_SIZE,
            zero_length: ZeroLengthPolicy::Accept,
            initial_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}
