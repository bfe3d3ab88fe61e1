//! Client connection: transport ownership, reader task and outbound path.
//!
//! [`Connection::builder`] produces an explicitly constructed connection.
//! Starting it (`connect` or `attach`) spawns a reader task that owns the
//! read half of the transport, feeds every arrival to a
//! [`StreamDecoder`](crate::codec::StreamDecoder), and publishes decoded
//! frames to the delivery queue whose receiver is handed back to the
//! caller. Stopping it is [`Connection::shutdown`] or dropping the
//! connection. A malformed header, a full queue under `ReturnErrorIfFull`,
//! or a vanished consumer closes the connection; the outcome is published
//! as a [`CloseReason`].

mod address;
mod builder;
mod close;
mod config;
mod error;
mod hooks;
mod reader;
mod socket;

use std::net::SocketAddr;

pub use address::{AddressParseError, ServerAddress};
use bytes::Bytes;
pub use builder::ConnectionBuilder;
pub use close::CloseReason;
pub use config::{ConnectionConfig, DEFAULT_READ_CHUNK_SIZE};
pub use error::ConnectionError;
use futures::SinkExt;
pub use hooks::{ConnectHandler, DisconnectHandler};
use reader::SharedWriter;
pub use socket::SocketOptions;
use tokio::{
    io::{AsyncRead, AsyncWrite, AsyncWriteExt},
    net::TcpStream,
    sync::watch,
};
use tokio_util::sync::CancellationToken;

use crate::{
    codec::{CodecError, FramingError},
    consumer::{ConsumerLoop, FrameHandler},
    frame::Frame,
    queue::FrameReceiver,
};

/// A live client connection.
///
/// Dropping the connection stops the reader task; frames already queued
/// remain available from the receiver.
pub struct Connection<T = TcpStream> {
    writer: SharedWriter<T>,
    shutdown: CancellationToken,
    close_rx: watch::Receiver<Option<CloseReason>>,
    peer_addr: Option<SocketAddr>,
    config: ConnectionConfig,
}

impl Connection<TcpStream> {
    /// Start building a connection.
    #[must_use]
    pub fn builder() -> ConnectionBuilder { ConnectionBuilder::default() }
}

impl<T> Connection<T>
where
    T: AsyncRead + AsyncWrite + Send + 'static,
{
    /// Encode `frame` with its 12-byte header and write it to the peer.
    ///
    /// A send still in flight when the connection closes is abandoned and
    /// reports [`ConnectionError::Disconnected`].
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Disconnected`] if the connection is no
    /// longer active, [`ConnectionError::Codec`] if the payload exceeds the
    /// configured maximum, and [`ConnectionError::Io`] if the write fails.
    pub async fn send_frame(&self, frame: &Frame) -> Result<(), ConnectionError> {
        self.ensure_active()?;
        let max = self.config.decoder_config().max_payload_size_value();
        if frame.payload_size() > max {
            return Err(CodecError::Framing(FramingError::PayloadTooLarge {
                size: frame.payload_size() as usize,
                max: max as usize,
            })
            .into());
        }
        let mut writer = self.writer.lock().await;
        self.ensure_active()?;
        tokio::select! {
            biased;

            () = self.shutdown.cancelled() => Err(ConnectionError::Disconnected),
            res = writer.send(frame.clone()) => res.map_err(ConnectionError::from),
        }
    }

    /// Write pre-encoded bytes to the peer unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError::Disconnected`] if the connection is no
    /// longer active or closes mid-write, and [`ConnectionError::Io`] if the
    /// write fails.
    pub async fn send_raw(&self, bytes: Bytes) -> Result<(), ConnectionError> {
        self.ensure_active()?;
        let mut writer = self.writer.lock().await;
        self.ensure_active()?;
        let write = async {
            // Anything the encoder buffered goes out first.
            SinkExt::<Frame>::flush(&mut *writer).await?;
            let stream = writer.get_mut();
            stream.write_all(&bytes).await?;
            stream.flush().await
        };
        tokio::select! {
            biased;

            () = self.shutdown.cancelled() => Err(ConnectionError::Disconnected),
            res = write => res.map_err(ConnectionError::from),
        }
    }

    /// Build a consumer loop over `receiver` using this connection's
    /// consumer configuration.
    #[must_use]
    pub fn consumer<H: FrameHandler>(&self, receiver: FrameReceiver, handler: H) -> ConsumerLoop<H> {
        ConsumerLoop::new(receiver, handler, *self.config.consumer_config())
    }

    /// Returns `true` until the reader stops or shutdown is requested.
    #[must_use]
    pub fn is_active(&self) -> bool { !self.shutdown.is_cancelled() }

    /// Peer address when connected over TCP.
    #[must_use]
    pub const fn peer_addr(&self) -> Option<SocketAddr> { self.peer_addr }

    /// Configuration the connection was started with.
    #[must_use]
    pub const fn config(&self) -> &ConnectionConfig { &self.config }

    /// Why the connection closed, if it has.
    #[must_use]
    pub fn close_reason(&self) -> Option<CloseReason> { self.close_rx.borrow().clone() }

    /// Wait until the reader stops and return why.
    pub async fn closed(&self) -> CloseReason {
        let mut rx = self.close_rx.clone();
        match rx.wait_for(Option::is_some).await {
            Ok(reason) => reason.clone().unwrap_or(CloseReason::Shutdown),
            // The reader task was torn down with the runtime.
            Err(_) => CloseReason::Shutdown,
        }
    }

    /// Stop reading and wait for the reader task to finish.
    pub async fn shutdown(&self) -> CloseReason {
        self.shutdown.cancel();
        self.closed().await
    }

    fn ensure_active(&self) -> Result<(), ConnectionError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(ConnectionError::Disconnected)
        }
    }
}

impl<T> Drop for Connection<T> {
    fn drop(&mut self) { self.shutdown.cancel(); }
}
