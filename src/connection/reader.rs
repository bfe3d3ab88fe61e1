//! Network-context task: socket reads, decoding and frame publication.

use std::{net::SocketAddr, sync::Arc};

use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf},
    sync::{Mutex, watch},
};
use tokio_util::{codec::FramedWrite, sync::CancellationToken};
use tracing::{debug, info, warn};

use super::{CloseReason, hooks::DisconnectHandler};
use crate::{
    codec::{CodecError, StreamDecoder},
    frame::{Frame, FrameEncoder},
    metrics::ActiveConnection,
    queue::{FrameSender, QueueError},
};

pub(super) type SharedWriter<T> = Arc<Mutex<FramedWrite<WriteHalf<T>, FrameEncoder>>>;

pub(super) struct Reader<T> {
    pub(super) read_half: ReadHalf<T>,
    pub(super) decoder: StreamDecoder,
    pub(super) sender: FrameSender,
    pub(super) shutdown: CancellationToken,
    pub(super) writer: SharedWriter<T>,
    pub(super) read_chunk_size: usize,
    pub(super) on_disconnect: Option<DisconnectHandler>,
    pub(super) close_tx: watch::Sender<Option<CloseReason>>,
    pub(super) peer: Option<SocketAddr>,
}

impl<T> Reader<T>
where
    T: AsyncRead + AsyncWrite + Send + 'static,
{
    pub(super) async fn run(mut self) {
        let active = ActiveConnection::open();
        let reason = self.read_loop().await;

        if reason.is_clean() {
            info!(peer = ?self.peer, %reason, "connection closed");
        } else {
            warn!(peer = ?self.peer, %reason, "connection closed");
        }
        debug!(
            frames = self.decoder.frames_decoded(),
            bytes = self.decoder.bytes_received(),
            dropped = self.sender.dropped_frames(),
            "reader stopped"
        );

        // Cancelling first aborts any in-flight send, which releases the lock.
        self.shutdown.cancel();
        let mut writer = self.writer.lock().await;
        if let Err(err) = writer.get_mut().shutdown().await {
            debug!(error = %err, "write half shutdown failed");
        }
        drop(writer);
        drop(active);
        if let Some(hook) = &self.on_disconnect {
            hook(&reason);
        }
        self.close_tx.send_replace(Some(reason));
    }

    async fn read_loop(&mut self) -> CloseReason {
        let mut chunk = vec![0u8; self.read_chunk_size];
        let mut frames = Vec::new();
        loop {
            let read = tokio::select! {
                biased;

                () = self.shutdown.cancelled() => return CloseReason::Shutdown,
                res = self.read_half.read(&mut chunk) => res,
            };
            let n = match read {
                Ok(0) => {
                    return match self.decoder.decode_eof() {
                        Ok(()) => CloseReason::PeerClosed,
                        Err(err) => close_reason_for(err),
                    };
                }
                Ok(n) => n,
                Err(err) => return CloseReason::Io(err.kind()),
            };

            let decoded = self.decoder.feed(&chunk[..n], &mut frames);
            if let Some(reason) = publish(&self.sender, &self.shutdown, &mut frames).await {
                return reason;
            }
            if let Err(err) = decoded {
                return close_reason_for(err);
            }
        }
    }
}

/// Hand decoded frames to the delivery queue in order.
///
/// Must not borrow the reader itself: `&Reader<T>` is only `Send` when the
/// transport is `Sync`.
async fn publish(
    sender: &FrameSender,
    shutdown: &CancellationToken,
    frames: &mut Vec<Frame>,
) -> Option<CloseReason> {
    for frame in frames.drain(..) {
        let outcome = tokio::select! {
            biased;

            () = shutdown.cancelled() => return Some(CloseReason::Shutdown),
            res = sender.deliver(frame) => res,
        };
        match outcome {
            Ok(_) => {}
            Err(QueueError::Full) => return Some(CloseReason::QueueFull),
            Err(QueueError::Closed) => return Some(CloseReason::ConsumerGone),
        }
    }
    None
}

fn close_reason_for(err: CodecError) -> CloseReason {
    debug!(error_type = err.error_type(), "decoder failed");
    err.into()
}
