//! Rate limit configuration.

use std::time::Duration;

use crate::error::ConfigError;

/// Client-side view of the service's request quota.
///
/// The limiter keeps at most `max_requests` requests inside any sliding
/// `window`. Once the in-window count reaches
/// `max_requests * throttle_threshold`, requests are delayed progressively;
/// at `max_requests` they wait until the oldest request leaves the window.
/// `retry_after` and `max_retries` shape the backoff applied to
/// rate-limited and server-error responses.
///
/// # Defaults
///
/// - `enabled`: `true`
/// - `max_requests`: 100
/// - `window`: 10 seconds
/// - `throttle_threshold`: 0.8
/// - `retry_after`: 1 second
/// - `max_retries`: 3
///
/// # Example
///
/// ```rust
/// use jsonapi_client::RateLimitConfig;
/// use std::time::Duration;
///
/// let config = RateLimitConfig::builder()
///     .max_requests(50)
///     .window(Duration::from_secs(5))
///     .throttle_threshold(0.9)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.max_requests(), 50);
/// assert!(RateLimitConfig::builder().throttle_threshold(0.0).build().is_err());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RateLimitConfig {
    enabled: bool,
    max_requests: u32,
    window: Duration,
    throttle_threshold: f64,
    retry_after: Duration,
    max_retries: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 100,
            window: Duration::from_secs(10),
            throttle_threshold: 0.8,
            retry_after: Duration::from_secs(1),
            max_retries: 3,
        }
    }
}

impl RateLimitConfig {
    /// Creates a builder starting from the defaults.
    #[must_use]
    pub fn builder() -> RateLimitConfigBuilder {
        RateLimitConfigBuilder::new()
    }

    /// Default configuration with client-side throttling switched off.
    ///
    /// Retries on rate-limited responses still apply.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Returns whether client-side throttling is active.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the maximum number of requests per window.
    #[must_use]
    pub const fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Returns the sliding window length.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Returns the fraction of `max_requests` at which throttling starts.
    #[must_use]
    pub const fn throttle_threshold(&self) -> f64 {
        self.throttle_threshold
    }

    /// Returns the base delay used by throttling and retry backoff.
    #[must_use]
    pub const fn retry_after(&self) -> Duration {
        self.retry_after
    }

    /// Returns how many times a retryable failure is retried.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }
}

/// Builder for [`RateLimitConfig`].
#[derive(Debug, Default)]
pub struct RateLimitConfigBuilder {
    enabled: Option<bool>,
    max_requests: Option<u32>,
    window: Option<Duration>,
    throttle_threshold: Option<f64>,
    retry_after: Option<Duration>,
    max_retries: Option<u32>,
}

impl RateLimitConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables client-side throttling.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Sets the maximum number of requests per window.
    #[must_use]
    pub const fn max_requests(mut self, max_requests: u32) -> Self {
        self.max_requests = Some(max_requests);
        self
    }

    /// Sets the sliding window length.
    #[must_use]
    pub const fn window(mut self, window: Duration) -> Self {
        self.window = Some(window);
        self
    }

    /// Sets the throttle threshold, a fraction in `(0, 1]`.
    #[must_use]
    pub const fn throttle_threshold(mut self, threshold: f64) -> Self {
        self.throttle_threshold = Some(threshold);
        self
    }

    /// Sets the base retry delay.
    #[must_use]
    pub const fn retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }

    /// Sets the maximum number of retries.
    #[must_use]
    pub const fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Builds the [`RateLimitConfig`].
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidThrottleThreshold`] if the threshold is not
    ///   in `(0, 1]`
    /// - [`ConfigError::InvalidMaxRequests`] if `max_requests` is zero
    /// - [`ConfigError::ZeroDuration`] if `window` is zero
    pub fn build(self) -> Result<RateLimitConfig, ConfigError> {
        let defaults = RateLimitConfig::default();

        let throttle_threshold = self
            .throttle_threshold
            .unwrap_or(defaults.throttle_threshold);
        if !(throttle_threshold > 0.0 && throttle_threshold <= 1.0) {
            return Err(ConfigError::InvalidThrottleThreshold {
                threshold: throttle_threshold,
            });
        }

        let max_requests = self.max_requests.unwrap_or(defaults.max_requests);
        if max_requests == 0 {
            return Err(ConfigError::InvalidMaxRequests { max_requests });
        }

        let window = self.window.unwrap_or(defaults.window);
        if window.is_zero() {
            return Err(ConfigError::ZeroDuration { field: "window" });
        }

        Ok(RateLimitConfig {
            enabled: self.enabled.unwrap_or(defaults.enabled),
            max_requests,
            window,
            throttle_threshold,
            retry_after: self.retry_after.unwrap_or(defaults.retry_after),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
        })
    }
}
