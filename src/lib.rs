#![doc(html_root_url = "https://docs.rs/streamframe/latest")]
//! Public API for the `streamframe` library.
//!
//! This crate turns the byte stream of a client TCP connection into
//! discrete frames and hands them to application code running on its own
//! schedule. Every frame carries a 12-byte header: a 4-byte little-endian
//! payload length, 8 opaque bytes, then the payload itself.
//!
//! The pieces compose bottom-up:
//!
//! - [`buffer::AccumulationBuffer`] holds received bytes with a read cursor and a rewindable mark.
//! - [`codec::StreamDecoder`] extracts complete frames and rejects malformed headers.
//! - [`queue`] carries frames from the network task to the consumer.
//! - [`consumer::ConsumerLoop`] drains the queue on a fixed interval.
//! - [`connection::Connection`] owns the socket and ties everything together.

pub mod buffer;
pub mod byte_order;
pub mod codec;
pub mod connection;
pub mod consumer;
pub mod frame;
pub mod metrics;
pub mod queue;

pub use codec::{CodecError, DecoderConfig, EofError, FramingError, StreamDecoder, ZeroLengthPolicy};
pub use connection::{CloseReason, Connection, ConnectionBuilder, ConnectionConfig, ConnectionError};
pub use consumer::{ConsumerConfig, ConsumerLoop, FrameHandler};
pub use frame::{Frame, FrameEncoder, FrameHeader, HEADER_SIZE, MAX_PAYLOAD_SIZE};
pub use queue::{DeliveryQueue, FrameReceiver, FrameSender, FullQueuePolicy, QueueError};
