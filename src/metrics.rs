//! Metric helpers for `streamframe`.
//!
//! This module defines metric names and thin helpers wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. With the `metrics` feature
//! disabled every helper compiles to a no-op.

#[cfg(feature = "metrics")]
use metrics::{counter, gauge};

/// Name of the gauge tracking open connections.
pub const CONNECTIONS_ACTIVE: &str = "streamframe_connections_active";
/// Name of the counter tracking frames extracted by the decoder.
pub const FRAMES_DECODED: &str = "streamframe_frames_decoded_total";
/// Name of the counter tracking frames discarded by a full delivery queue.
pub const FRAMES_DROPPED: &str = "streamframe_frames_dropped_total";
/// Name of the counter tracking headers rejected as corrupt.
pub const CORRUPT_FRAMES: &str = "streamframe_corrupt_frames_total";

/// Increment the open connections gauge.
pub fn inc_connections() {
    #[cfg(feature = "metrics")]
    gauge!(CONNECTIONS_ACTIVE).increment(1.0);
}

/// Decrement the open connections gauge.
pub fn dec_connections() {
    #[cfg(feature = "metrics")]
    gauge!(CONNECTIONS_ACTIVE).decrement(1.0);
}

/// Holds [`CONNECTIONS_ACTIVE`] up for as long as a reader task runs.
///
/// Dropping the guard, including when the task is aborted with its
/// runtime, takes the gauge back down.
pub(crate) struct ActiveConnection(());

impl ActiveConnection {
    pub(crate) fn open() -> Self {
        inc_connections();
        Self(())
    }
}

impl Drop for ActiveConnection {
    fn drop(&mut self) { dec_connections(); }
}

/// Record `count` decoded frames.
pub fn inc_frames_decoded(count: u64) {
    #[cfg(feature = "metrics")]
    counter!(FRAMES_DECODED).increment(count);
    #[cfg(not(feature = "metrics"))]
    let _ = count;
}

/// Record a frame discarded by a drop policy.
pub fn inc_frames_dropped() {
    #[cfg(feature = "metrics")]
    counter!(FRAMES_DROPPED).increment(1);
}

/// Record a rejected frame header.
pub fn inc_corrupt_frames() {
    #[cfg(feature = "metrics")]
    counter!(CORRUPT_FRAMES).increment(1);
}
