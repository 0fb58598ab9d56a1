//! Request pacing for the TMDB API.

use std::time::{Duration, Instant};

/// Default spacing between requests (~40 req/s, TMDB's documented ceiling).
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(25);

/// Single-tier request pacer.
///
/// Hands out request slots at least `min_interval` apart. The discover
/// pipeline issues one detail request per candidate, so a page of 20
/// candidates would otherwise burst 21 requests at once.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbRateLimiter {
    /// Minimum spacing between request slots.
    min_interval: Duration,
    /// Earliest instant the next slot may start.
    next_slot: Option<Instant>,
}

impl TmdbRateLimiter {
    /// Creates a pacer with the given spacing.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            next_slot: None,
        }
    }

    /// Creates a pacer with the default spacing (25ms).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Returns how long a request starting at `now` has to wait.
    fn delay_at(&self, now: Instant) -> Duration {
        self.next_slot
            .map_or(Duration::ZERO, |slot| slot.saturating_duration_since(now))
    }

    /// Waits for the next slot and reserves the one after it.
    pub async fn wait(&mut self) {
        let delay = self.delay_at(Instant::now());
        if !delay.is_zero() {
            tracing::trace!(delay_ms = delay.as_millis(), "pacing TMDB request");
            tokio::time::sleep(delay).await;
        }
        self.next_slot = Instant::now().checked_add(self.min_interval);
    }
}
