//! Connection configuration.

use super::SocketOptions;
use crate::{
    codec::DecoderConfig,
    consumer::ConsumerConfig,
    queue::{DEFAULT_QUEUE_CAPACITY, FullQueuePolicy},
};

/// Default size of a single transport read.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 8 * 1024;

/// Everything a [`Connection`](super::Connection) needs besides the
/// transport itself.
///
/// Defaults enable `TCP_NODELAY`, accept payloads up to the wire maximum,
/// and buffer [`DEFAULT_QUEUE_CAPACITY`] frames with backpressure.
///
/// # Examples
///
/// ```
/// use streamframe::{
///     codec::{DecoderConfig, ZeroLengthPolicy},
///     connection::ConnectionConfig,
///     queue::FullQueuePolicy,
/// };
///
/// let config = ConnectionConfig::default()
///     .decoder(DecoderConfig::default().zero_length(ZeroLengthPolicy::Reject))
///     .queue_capacity(64)
///     .full_queue_policy(FullQueuePolicy::WarnAndDropIfFull);
/// assert_eq!(config.queue_capacity_value(), 64);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectionConfig {
    decoder: DecoderConfig,
    queue_capacity: usize,
    full_queue_policy: FullQueuePolicy,
    consumer: ConsumerConfig,
    socket: SocketOptions,
    read_chunk_size: usize,
}

impl ConnectionConfig {
    /// Set the decoder configuration.
    #[must_use]
    pub fn decoder(mut self, decoder: DecoderConfig) -> Self {
        self.decoder = decoder;
        self
    }

    /// Set the delivery queue capacity.
    #[must_use]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the delivery queue's full-queue policy.
    #[must_use]
    pub fn full_queue_policy(mut self, policy: FullQueuePolicy) -> Self {
        self.full_queue_policy = policy;
        self
    }

    /// Set the configuration used by [`Connection::consumer`](super::Connection::consumer).
    #[must_use]
    pub fn consumer(mut self, consumer: ConsumerConfig) -> Self {
        self.consumer = consumer;
        self
    }

    /// Set the socket options applied by [`connect`](super::ConnectionBuilder::connect).
    #[must_use]
    pub fn socket_options(mut self, options: SocketOptions) -> Self {
        self.socket = options;
        self
    }

    /// Set the largest single transport read. Clamped to at least one byte.
    #[must_use]
    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.read_chunk_size = size.max(1);
        self
    }

    /// Decoder configuration.
    #[must_use]
    pub const fn decoder_config(&self) -> &DecoderConfig { &self.decoder }

    /// Delivery queue capacity.
    #[must_use]
    pub const fn queue_capacity_value(&self) -> usize { self.queue_capacity }

    /// Full-queue policy.
    #[must_use]
    pub const fn full_queue_policy_value(&self) -> FullQueuePolicy { self.full_queue_policy }

    /// Consumer loop configuration.
    #[must_use]
    pub const fn consumer_config(&self) -> &ConsumerConfig { &self.consumer }

    /// Socket options.
    #[must_use]
    pub const fn socket_options_value(&self) -> &SocketOptions { &self.socket }

    /// Largest single transport read.
    #[must_use]
    pub const fn read_chunk_size_value(&self) -> usize { self.read_chunk_size }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            decoder: DecoderConfig::default(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            full_queue_policy: FullQueuePolicy::default(),
            consumer: ConsumerConfig::default(),
            socket: SocketOptions::default().nodelay(true),
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}
