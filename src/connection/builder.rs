//! Builder establishing a [`Connection`].

use std::{net::SocketAddr, sync::Arc};

use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::{TcpSocket, TcpStream},
    sync::{Mutex, watch},
};
use tokio_util::{codec::FramedWrite, sync::CancellationToken};
use tracing::info;

use super::{
    CloseReason,
    Connection,
    ConnectionConfig,
    ConnectionError,
    ServerAddress,
    SocketOptions,
    hooks::LifecycleHooks,
    reader::Reader,
};
use crate::{
    codec::{DecoderConfig, StreamDecoder},
    frame::FrameEncoder,
    queue::{DeliveryQueue, FrameReceiver, FullQueuePolicy},
};

/// Builder for a [`Connection`].
///
/// # Examples
///
/// ```no_run
/// use std::net::SocketAddr;
///
/// use streamframe::{
///     connection::{Connection, ConnectionError},
///     frame::Frame,
///     queue::FullQueuePolicy,
/// };
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), ConnectionError> {
/// let addr: SocketAddr = "127.0.0.1:7000".parse().expect("valid address");
/// let (connection, receiver) = Connection::builder()
///     .queue_capacity(256)
///     .full_queue_policy(FullQueuePolicy::WarnAndDropIfFull)
///     .on_disconnect(|reason| tracing::info!(%reason, "channel inactive"))
///     .connect(addr)
///     .await?;
/// let consumer = connection.consumer(receiver, |frame: Frame| {
///     tracing::info!(size = frame.payload_size(), "frame");
/// });
/// consumer.run().await;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ConnectionBuilder {
    config: ConnectionConfig,
    hooks: LifecycleHooks,
}

impl ConnectionBuilder {
    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: ConnectionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the decoder configuration.
    #[must_use]
    pub fn decoder(mut self, decoder: DecoderConfig) -> Self {
        self.config = self.config.decoder(decoder);
        self
    }

    /// Set the delivery queue capacity.
    #[must_use]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config = self.config.queue_capacity(capacity);
        self
    }

    /// Set the delivery queue's full-queue policy.
    #[must_use]
    pub fn full_queue_policy(mut self, policy: FullQueuePolicy) -> Self {
        self.config = self.config.full_queue_policy(policy);
        self
    }

    /// Set the socket options applied before connecting.
    #[must_use]
    pub fn socket_options(mut self, options: SocketOptions) -> Self {
        self.config = self.config.socket_options(options);
        self
    }

    /// Set the largest single transport read.
    #[must_use]
    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.config = self.config.read_chunk_size(size);
        self
    }

    /// Register a callback fired once the transport is attached.
    #[must_use]
    pub fn on_connect<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<SocketAddr>) + Send + Sync + 'static,
    {
        self.hooks.on_connect = Some(Arc::new(f));
        self
    }

    /// Register a callback fired once when the reader stops.
    #[must_use]
    pub fn on_disconnect<F>(mut self, f: F) -> Self
    where
        F: Fn(&CloseReason) + Send + Sync + 'static,
    {
        self.hooks.on_disconnect = Some(Arc::new(f));
        self
    }

    /// Resolve `address`, open a TCP connection and start reading.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] if resolution, socket configuration or
    /// the connect call fails, or if the queue configuration is invalid.
    pub async fn connect(
        self,
        address: impl Into<ServerAddress>,
    ) -> Result<(Connection<TcpStream>, FrameReceiver), ConnectionError> {
        let address = address.into();
        let addr = address.resolve().await?;
        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()?
        } else {
            TcpSocket::new_v6()?
        };
        self.config.socket_options_value().apply(&socket)?;
        let stream = socket.connect(addr).await?;
        info!(%address, peer = %addr, "connected");
        self.start(stream, Some(addr))
    }

    /// Start reading from an already established transport.
    ///
    /// Any `AsyncRead + AsyncWrite` stream works, which keeps tests free of
    /// real sockets.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Queue`] if the queue configuration is
    /// invalid.
    pub fn attach<T>(self, stream: T) -> Result<(Connection<T>, FrameReceiver), ConnectionError>
    where
        T: AsyncRead + AsyncWrite + Send + 'static,
    {
        self.start(stream, None)
    }

    fn start<T>(
        self,
        stream: T,
        peer: Option<SocketAddr>,
    ) -> Result<(Connection<T>, FrameReceiver), ConnectionError>
    where
        T: AsyncRead + AsyncWrite + Send + 'static,
    {
        let config = self.config;
        let (sender, receiver) = DeliveryQueue::builder()
            .capacity(config.queue_capacity_value())
            .policy(config.full_queue_policy_value())
            .build()?;

        let (read_half, write_half) = tokio::io::split(stream);
        let encoder = FrameEncoder::new(config.decoder_config().max_payload_size_value());
        let writer = Arc::new(Mutex::new(FramedWrite::new(write_half, encoder)));
        let shutdown = CancellationToken::new();
        let (close_tx, close_rx) = watch::channel(None);

        if let Some(hook) = &self.hooks.on_connect {
            hook(peer);
        }

        let reader = Reader {
            read_half,
            decoder: StreamDecoder::new(*config.decoder_config()),
            sender,
            shutdown: shutdown.clone(),
            writer: Arc::clone(&writer),
            read_chunk_size: config.read_chunk_size_value(),
            on_disconnect: self.hooks.on_disconnect,
            close_tx,
            peer,
        };
        tokio::spawn(reader.run());

        let connection = Connection {
            writer,
            shutdown,
            close_rx,
            peer_addr: peer,
            config,
        };
        Ok((connection, receiver))
    }
}
