//! Producer end of the delivery queue, held by the network context.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{FullQueuePolicy, QueueError};
use crate::frame::Frame;

/// Outcome of a successful enqueue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Enqueued {
    /// The frame is in the queue.
    Queued,
    /// The queue was full and the policy discarded the frame.
    Dropped,
}

/// Cloneable handle used by the network context to publish frames.
#[derive(Clone, Debug)]
pub struct FrameSender {
    tx: mpsc::Sender<Frame>,
    policy: FullQueuePolicy,
    dropped: Arc<AtomicUsize>,
}

impl FrameSender {
    pub(super) fn new(tx: mpsc::Sender<Frame>, policy: FullQueuePolicy) -> Self {
        Self {
            tx,
            policy,
            dropped: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Attempt to enqueue a frame without waiting.
    ///
    /// When the queue is full the configured [`FullQueuePolicy`] decides
    /// the outcome. [`FullQueuePolicy::Backpressure`] cannot wait here, so it
    /// reports [`QueueError::Full`] just as `ReturnErrorIfFull` does; use
    /// [`deliver`](Self::deliver) to honour it.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Full`] if the queue is full and the policy does
    /// not drop, and [`QueueError::Closed`] if the receiver is gone.
    ///
    /// # Examples
    ///
    /// ```
    /// use streamframe::{
    ///     frame::Frame,
    ///     queue::{DeliveryQueue, Enqueued, FullQueuePolicy},
    /// };
    ///
    /// let (sender, mut receiver) = DeliveryQueue::builder()
    ///     .capacity(1)
    ///     .policy(FullQueuePolicy::DropIfFull)
    ///     .build()
    ///     .expect("failed to build delivery queue");
    /// let frame = Frame::new([0; 8], &b"x"[..]).expect("payload fits");
    ///
    /// assert_eq!(sender.enqueue(frame.clone()), Ok(Enqueued::Queued));
    /// assert_eq!(sender.enqueue(frame), Ok(Enqueued::Dropped));
    /// assert_eq!(sender.dropped_frames(), 1);
    /// assert!(receiver.dequeue().is_some());
    /// ```
    pub fn enqueue(&self, frame: Frame) -> Result<Enqueued, QueueError> {
        match self.tx.try_send(frame) {
            Ok(()) => Ok(Enqueued::Queued),
            Err(mpsc::error::TrySendError::Full(frame)) => match self.policy {
                FullQueuePolicy::Backpressure | FullQueuePolicy::ReturnErrorIfFull => {
                    Err(QueueError::Full)
                }
                FullQueuePolicy::DropIfFull | FullQueuePolicy::WarnAndDropIfFull => {
                    self.record_drop(&frame);
                    Ok(Enqueued::Dropped)
                }
            },
            Err(mpsc::error::TrySendError::Closed(_)) => Err(QueueError::Closed),
        }
    }

    /// Enqueue a frame, waiting for capacity if the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] if the receiver is gone.
    pub async fn enqueue_wait(&self, frame: Frame) -> Result<Enqueued, QueueError> {
        self.tx
            .send(frame)
            .await
            .map_err(|_| QueueError::Closed)?;
        Ok(Enqueued::Queued)
    }

    /// Enqueue a frame according to the configured policy.
    ///
    /// Waits for capacity under [`FullQueuePolicy::Backpressure`] and
    /// behaves like [`enqueue`](Self::enqueue) otherwise.
    ///
    /// # Errors
    ///
    /// See [`enqueue`](Self::enqueue) and [`enqueue_wait`](Self::enqueue_wait).
    pub async fn deliver(&self, frame: Frame) -> Result<Enqueued, QueueError> {
        match self.policy {
            FullQueuePolicy::Backpressure => self.enqueue_wait(frame).await,
            _ => self.enqueue(frame),
        }
    }

    /// Frames discarded by a drop policy since the queue was built.
    #[must_use]
    pub fn dropped_frames(&self) -> usize { self.dropped.load(Ordering::Relaxed) }

    /// Configured full-queue policy.
    #[must_use]
    pub const fn policy(&self) -> FullQueuePolicy { self.policy }

    /// Returns `true` once the receiver has been dropped or closed.
    #[must_use]
    pub fn is_closed(&self) -> bool { self.tx.is_closed() }

    fn record_drop(&self, frame: &Frame) {
        let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
        crate::metrics::inc_frames_dropped();
        if self.policy == FullQueuePolicy::WarnAndDropIfFull {
            warn!(
                payload_size = frame.payload_size(),
                dropped,
                policy = ?self.policy,
                "delivery queue full; frame dropped"
            );
        } else {
            debug!(payload_size = frame.payload_size(), dropped, "frame dropped");
        }
    }
}
