//! Delivery queue between the network context and the polling context.
//!
//! The reader task publishes decoded frames through a [`FrameSender`]; the
//! consumer loop drains them through the paired [`FrameReceiver`]. The
//! queue is a bounded FIFO: frames are delivered in the order they were
//! enqueued and are only discarded under an explicit drop policy.

use tokio::sync::mpsc;

mod builder;
mod errors;
mod sender;

pub use builder::DeliveryQueueBuilder;
pub use errors::{QueueConfigError, QueueError};
pub use sender::{Enqueued, FrameSender};

use crate::frame::Frame;

/// Default number of frames buffered between the two contexts.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Behaviour when a frame arrives at a full queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FullQueuePolicy {
    /// Wait for the consumer to make room. The reader stops pulling from the
    /// socket meanwhile, so TCP flow control slows the peer.
    #[default]
    Backpressure,
    /// Report [`QueueError::Full`]; the connection treats this as fatal.
    ReturnErrorIfFull,
    /// Silently drop the frame.
    DropIfFull,
    /// Drop the frame but emit a log warning.
    WarnAndDropIfFull,
}

/// Entry point for building a delivery queue.
#[derive(Debug)]
pub struct DeliveryQueue;

impl DeliveryQueue {
    /// Start building a new delivery queue.
    #[must_use]
    pub fn builder() -> DeliveryQueueBuilder { DeliveryQueueBuilder::default() }

    fn build_with(
        capacity: usize,
        policy: FullQueuePolicy,
    ) -> Result<(FrameSender, FrameReceiver), QueueConfigError> {
        if capacity == 0 {
            return Err(QueueConfigError::InvalidCapacity(capacity));
        }
        let (tx, rx) = mpsc::channel(capacity);
        Ok((FrameSender::new(tx, policy), FrameReceiver { rx }))
    }
}

/// Consumer end of the delivery queue, held by the polling context.
#[derive(Debug)]
pub struct FrameReceiver {
    rx: mpsc::Receiver<Frame>,
}

impl FrameReceiver {
    /// Take the oldest frame without waiting.
    ///
    /// Returns `None` if the queue is empty or closed and drained.
    pub fn dequeue(&mut self) -> Option<Frame> { self.rx.try_recv().ok() }

    /// Wait for the next frame.
    ///
    /// Returns `None` once every sender is gone and the queue is drained.
    pub async fn recv(&mut self) -> Option<Frame> { self.rx.recv().await }

    /// Frames currently queued.
    #[must_use]
    pub fn len(&self) -> usize { self.rx.len() }

    /// Returns `true` if no frames are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.rx.is_empty() }

    /// Returns `true` once every sender is gone or [`close`](Self::close)
    /// was called. Frames already queued can still be taken.
    #[must_use]
    pub fn is_closed(&self) -> bool { self.rx.is_closed() }

    /// Stop accepting new frames. Queued frames remain available.
    pub fn close(&mut self) { self.rx.close(); }
}
