//! Polling loop draining the delivery queue into an application handler.
//!
//! The loop runs on a fixed-period [`tokio::time::interval`]. Each tick it
//! snapshots how many frames are queued and dispatches at most that many,
//! so frames arriving mid-pass wait for the next tick rather than starving
//! the rest of the polling context. A [`CancellationToken`] stops the loop
//! between ticks; frames still queued at that point stay in the receiver,
//! which [`ConsumerLoop::run`] hands back.

mod config;
mod handler;

pub use config::{ConsumerConfig, DEFAULT_POLL_INTERVAL};
pub use handler::FrameHandler;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::queue::FrameReceiver;

/// Why [`ConsumerLoop::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The shutdown token was cancelled.
    Cancelled,
    /// Every sender is gone and the queue has been drained.
    QueueClosed,
}

/// State handed back when the loop stops.
#[derive(Debug)]
pub struct ConsumerExit<H> {
    /// Receiver holding any frames not yet dispatched.
    pub receiver: FrameReceiver,
    /// The handler, returned so callers can inspect or reuse it.
    pub handler: H,
    /// Frames dispatched over the loop's lifetime.
    pub dispatched: u64,
    /// Why the loop stopped.
    pub reason: StopReason,
}

/// Cancellable, interval-driven consumer of decoded frames.
///
/// # Examples
///
/// ```
/// use streamframe::{
///     consumer::{ConsumerConfig, ConsumerLoop, StopReason},
///     frame::Frame,
///     queue::DeliveryQueue,
/// };
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let (sender, receiver) = DeliveryQueue::builder()
///     .build()
///     .expect("failed to build delivery queue");
/// sender
///     .enqueue(Frame::new([0; 8], &b"hi"[..]).expect("payload fits"))
///     .expect("queue has room");
/// drop(sender);
///
/// let mut seen = Vec::new();
/// let exit = ConsumerLoop::new(receiver, |frame: Frame| seen.push(frame), ConsumerConfig::default())
///     .run()
///     .await;
/// assert_eq!(exit.reason, StopReason::QueueClosed);
/// assert_eq!(exit.dispatched, 1);
/// # }
/// ```
#[derive(Debug)]
pub struct ConsumerLoop<H> {
    receiver: FrameReceiver,
    handler: H,
    config: ConsumerConfig,
    shutdown: CancellationToken,
    dispatched: u64,
}

impl<H: FrameHandler> ConsumerLoop<H> {
    /// Create a loop draining `receiver` into `handler`.
    #[must_use]
    pub fn new(receiver: FrameReceiver, handler: H, config: ConsumerConfig) -> Self {
        Self {
            receiver,
            handler,
            config,
            shutdown: CancellationToken::new(),
            dispatched: 0,
        }
    }

    /// Use an externally owned shutdown token.
    #[must_use]
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Token that stops the loop when cancelled.
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken { self.shutdown.clone() }

    /// Frames dispatched so far.
    #[must_use]
    pub const fn dispatched(&self) -> u64 { self.dispatched }

    /// Run one drain pass immediately, returning the frames dispatched.
    ///
    /// Dispatches the frames queued when the pass starts, capped by
    /// [`ConsumerConfig::max_frames_per_tick`].
    pub fn tick(&mut self) -> usize {
        let queued = self.receiver.len();
        let budget = self
            .config
            .max_frames_per_tick_value()
            .map_or(queued, |max| queued.min(max.get()));

        let mut handled = 0;
        while handled < budget {
            let Some(frame) = self.receiver.dequeue() else {
                break;
            };
            self.handler.handle(frame);
            handled += 1;
        }
        if handled > 0 {
            self.dispatched += handled as u64;
            trace!(handled, remaining = self.receiver.len(), "consumer tick");
        }
        handled
    }

    /// Drive the loop until cancelled or the queue is closed and drained.
    ///
    /// No `Send` bound is placed on the handler, so the loop can run on a
    /// current-thread runtime or a `LocalSet`.
    pub async fn run(mut self) -> ConsumerExit<H> {
        let mut interval = tokio::time::interval(self.config.poll_interval_value());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let shutdown = self.shutdown.clone();

        let reason = loop {
            tokio::select! {
                biased;

                () = shutdown.cancelled() => break StopReason::Cancelled,
                _ = interval.tick() => {
                    self.tick();
                    if self.receiver.is_closed() && self.receiver.is_empty() {
                        break StopReason::QueueClosed;
                    }
                }
            }
        };

        debug!(
            ?reason,
            dispatched = self.dispatched,
            pending = self.receiver.len(),
            "consumer loop stopped"
        );
        ConsumerExit {
            receiver: self.receiver,
            handler: self.handler,
            dispatched: self.dispatched,
            reason,
        }
    }
}

impl<H> ConsumerLoop<H>
where
    H: FrameHandler + Send + 'static,
{
    /// Run the loop on its own Tokio task.
    #[must_use]
    pub fn spawn(self) -> JoinHandle<ConsumerExit<H>> { tokio::spawn(self.run()) }
}

#[cfg(test)]
mod tests;
