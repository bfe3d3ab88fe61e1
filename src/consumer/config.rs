//! Consumer loop configuration.

use std::{num::NonZeroUsize, time::Duration};

/// Default period between drain passes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Shortest accepted poll interval. `tokio::time::interval` rejects zero.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Settings for [`ConsumerLoop`](super::ConsumerLoop).
///
/// # Examples
///
/// ```
/// use std::{num::NonZeroUsize, time::Duration};
///
/// use streamframe::consumer::ConsumerConfig;
///
/// let config = ConsumerConfig::default()
///     .poll_interval(Duration::from_millis(20))
///     .max_frames_per_tick(NonZeroUsize::new(1));
/// assert_eq!(config.poll_interval_value(), Duration::from_millis(20));
/// assert_eq!(config.max_frames_per_tick_value().map(NonZeroUsize::get), Some(1));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConsumerConfig {
    poll_interval: Duration,
    max_frames_per_tick: Option<NonZeroUsize>,
}

impl ConsumerConfig {
    /// Set the period between drain passes. Clamped to at least 1 ms.
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Cap the frames dispatched per pass. `None` drains everything that
    /// was queued when the pass started.
    #[must_use]
    pub fn max_frames_per_tick(mut self, max: Option<NonZeroUsize>) -> Self {
        self.max_frames_per_tick = max;
        self
    }

    /// Period between drain passes.
    #[must_use]
    pub const fn poll_interval_value(&self) -> Duration { self.poll_interval }

    /// Per-pass dispatch cap.
    #[must_use]
    pub const fn max_frames_per_tick_value(&self) -> Option<NonZeroUsize> {
        self.max_frames_per_tick
    }
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_frames_per_tick: None,
        }
    }
}
