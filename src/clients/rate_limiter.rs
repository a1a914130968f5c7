//! Sliding-window client-side rate limiting.
//!
//! The limiter keeps the timestamps of recent requests and answers three
//! questions before each outbound call: how many requests are in the
//! window, whether the caller should slow down (throttling), and whether
//! the hard limit has been reached. [`RateLimiter::wait_if_needed`] turns
//! the answer into a sleep.
//!
//! Timestamps use [`tokio::time::Instant`] so the limiter follows the
//! paused clock in tests.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use crate::config::RateLimitConfig;

/// Point-in-time view of a [`RateLimiter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Whether client-side limiting is active.
    pub enabled: bool,
    /// Requests recorded inside the current window.
    pub current_count: usize,
    /// Maximum requests per window.
    pub max_requests: u32,
    /// Requests left before the hard limit.
    pub remaining: usize,
    /// Window length.
    pub window: Duration,
    /// Whether requests are currently being slowed down.
    pub is_throttling: bool,
    /// Whether the hard limit has been reached.
    pub is_limited: bool,
}

/// Tracks recent requests against a [`RateLimitConfig`].
///
/// A request counts toward the limit while its age is below the window
/// length. Expired entries are dropped lazily whenever the log is read.
/// All methods take `&self`; the log is guarded by a mutex that is never
/// held across an await point.
///
/// # Example
///
/// ```rust
/// use jsonapi_client::clients::RateLimiter;
/// use jsonapi_client::RateLimitConfig;
///
/// # tokio_test::block_on(async {
/// let limiter = RateLimiter::new(RateLimitConfig::builder().max_requests(10).build().unwrap());
///
/// for _ in 0..8 {
///     limiter.record_request();
/// }
///
/// let status = limiter.status();
/// assert_eq!(status.current_count, 8);
/// assert_eq!(status.remaining, 2);
/// assert!(status.is_throttling);
/// assert!(!status.is_limited);
/// # });
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    log: Mutex<VecDeque<Instant>>,
}

// Verify RateLimiter is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RateLimiter>();
};

impl RateLimiter {
    /// Creates a limiter with an empty log.
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            log: Mutex::new(VecDeque::new()),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Records an outbound request at the current instant.
    ///
    /// Does nothing when limiting is disabled.
    pub fn record_request(&self) {
        if !self.config.enabled() {
            return;
        }
        let now = Instant::now();
        let mut log = self.lock();
        self.prune(&mut log, now);
        log.push_back(now);
    }

    /// Returns the number of requests inside the window.
    #[must_use]
    pub fn current_count(&self) -> usize {
        let mut log = self.lock();
        self.prune(&mut log, Instant::now());
        log.len()
    }

    /// Returns how many requests may still be sent in this window.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.max_requests().saturating_sub(self.current_count())
    }

    /// Returns `true` once the in-window count reaches the throttle point.
    #[must_use]
    pub fn is_throttling(&self) -> bool {
        self.config.enabled() && self.current_count() >= self.throttle_count()
    }

    /// Returns `true` once the in-window count reaches the hard limit.
    #[must_use]
    pub fn is_limited(&self) -> bool {
        self.config.enabled() && self.current_count() >= self.max_requests()
    }

    /// Returns how long the next request should wait.
    ///
    /// - below the throttle point: zero
    /// - between the throttle point and the limit: ramps linearly from zero
    ///   to `retry_after`
    /// - at the limit: until the oldest request leaves the window
    #[must_use]
    pub fn delay(&self) -> Duration {
        if !self.config.enabled() {
            return Duration::ZERO;
        }
        let now = Instant::now();
        let mut log = self.lock();
        self.prune(&mut log, now);
        self.delay_for(log.len(), log.front().copied(), now)
    }

    /// Sleeps for [`delay`](Self::delay). Returns immediately when no wait
    /// is needed.
    pub async fn wait_if_needed(&self) {
        let delay = self.delay();
        if delay.is_zero() {
            return;
        }

        if self.is_limited() {
            tracing::warn!(
                delay_ms = delay.as_millis(),
                max_requests = self.config.max_requests(),
                "Rate limit reached, waiting for the window to free up"
            );
        } else {
            tracing::debug!(
                delay_ms = delay.as_millis(),
                current_count = self.current_count(),
                "Throttling request"
            );
        }

        tokio::time::sleep(delay).await;
    }

    /// Clears the request log.
    pub fn reset(&self) {
        self.lock().clear();
    }

    /// Returns a snapshot of the limiter state.
    #[must_use]
    pub fn status(&self) -> RateLimitStatus {
        let current_count = self.current_count();
        let enabled = self.config.enabled();
        RateLimitStatus {
            enabled,
            current_count,
            max_requests: self.config.max_requests(),
            remaining: self.max_requests().saturating_sub(current_count),
            window: self.config.window(),
            is_throttling: enabled && current_count >= self.throttle_count(),
            is_limited: enabled && current_count >= self.max_requests(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Instant>> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn prune(&self, log: &mut VecDeque<Instant>, now: Instant) {
        let window = self.config.window();
        while log
            .front()
            .is_some_and(|&oldest| now.saturating_duration_since(oldest) >= window)
        {
            log.pop_front();
        }
    }

    fn max_requests(&self) -> usize {
        self.config.max_requests() as usize
    }

    /// Smallest in-window count considered throttling.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn throttle_count(&self) -> usize {
        let exact = f64::from(self.config.max_requests()) * self.config.throttle_threshold();
        // 100 * 0.8 is slightly above 80 in binary floating point
        (exact - 1e-9).ceil().max(0.0) as usize
    }

    #[allow(clippy::cast_precision_loss)]
    fn delay_for(&self, count: usize, oldest: Option<Instant>, now: Instant) -> Duration {
        let max = self.max_requests();
        if count >= max {
            let window = self.config.window();
            return oldest.map_or(Duration::ZERO, |oldest| {
                window.saturating_sub(now.saturating_duration_since(oldest))
            });
        }

        let threshold = self.throttle_count();
        if count < threshold {
            return Duration::ZERO;
        }

        let progress = (count - threshold) as f64 / (max - threshold) as f64;
        self.config.retry_after().mul_f64(progress)
    }
}
