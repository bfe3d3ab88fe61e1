//! Builder for configuring the delivery queue.

use super::{
    DEFAULT_QUEUE_CAPACITY,
    DeliveryQueue,
    FrameReceiver,
    FrameSender,
    FullQueuePolicy,
    QueueConfigError,
};

/// Builder for a [`DeliveryQueue`].
///
/// Defaults to [`DEFAULT_QUEUE_CAPACITY`] slots and
/// [`FullQueuePolicy::Backpressure`]. Construct via
/// [`DeliveryQueue::builder`] or [`Default::default`].
///
/// # Examples
///
/// ```
/// use streamframe::queue::{DeliveryQueue, FullQueuePolicy};
///
/// let (sender, receiver) = DeliveryQueue::builder()
///     .capacity(16)
///     .policy(FullQueuePolicy::WarnAndDropIfFull)
///     .build()
///     .expect("failed to build delivery queue");
/// assert_eq!(sender.policy(), FullQueuePolicy::WarnAndDropIfFull);
/// assert!(receiver.is_empty());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DeliveryQueueBuilder {
    capacity: usize,
    policy: FullQueuePolicy,
}

impl Default for DeliveryQueueBuilder {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_QUEUE_CAPACITY,
            policy: FullQueuePolicy::default(),
        }
    }
}

impl DeliveryQueueBuilder {
    /// Set the number of frames the queue holds before the policy applies.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Choose what happens when a frame arrives at a full queue.
    #[must_use]
    pub fn policy(mut self, policy: FullQueuePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the queue, returning its producer and consumer ends.
    ///
    /// # Errors
    ///
    /// Returns [`QueueConfigError::InvalidCapacity`] if the capacity is zero.
    pub fn build(self) -> Result<(FrameSender, FrameReceiver), QueueConfigError> {
        DeliveryQueue::build_with(self.capacity, self.policy)
    }
}
