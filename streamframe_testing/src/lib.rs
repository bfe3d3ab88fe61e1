//! Test helpers for `streamframe`.
//!
//! - [`wire`] builds raw frame bytes, including malformed headers the encoder refuses to produce.
//! - [`server`] runs a scripted TCP peer that writes chosen bytes and then closes.
//! - [`logging`] serialises access to a global log capture.
//! - [`metrics`] reads counters out of a `DebuggingRecorder` snapshot.
//!
//! ```rust
//! use streamframe::{StreamDecoder, DecoderConfig};
//! use streamframe_testing::wire::{chunked, frame_bytes};
//!
//! let bytes = frame_bytes(7, b"hello");
//! let mut decoder = StreamDecoder::new(DecoderConfig::default());
//! let mut out = Vec::new();
//! for chunk in chunked(&bytes, 3) {
//!     decoder.feed(&chunk, &mut out).expect("valid frame");
//! }
//! assert_eq!(out.len(), 1);
//! ```

pub mod logging;
pub mod metrics;
pub mod server;
pub mod wire;

pub use logging::{LoggerHandle, logger};
pub use server::ScriptedServer;

/// Result type for fallible tests.
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
