//! Bounded retry with exponential backoff and jitter.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::config::RateLimitConfig;

/// Upper bound for a single backoff sleep unless `retry_after` is larger.
pub const DEFAULT_MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// How often and how long to back off between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each further retry.
    pub base_delay: Duration,
    /// Ceiling for any single delay, jitter included.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy.
    #[must_use]
    pub const fn new(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay,
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO)
    }

    /// Derives the policy from rate limit settings: `retry_after` is the base
    /// delay and the ceiling is [`DEFAULT_MAX_RETRY_DELAY`] or `retry_after`,
    /// whichever is larger.
    #[must_use]
    pub fn from_rate_limit(config: &RateLimitConfig) -> Self {
        Self::new(
            config.max_retries(),
            config.retry_after(),
            DEFAULT_MAX_RETRY_DELAY.max(config.retry_after()),
        )
    }

    /// Backoff for the retry with the given zero-based index, before jitter.
    #[must_use]
    pub fn backoff(&self, retry_index: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry_index);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Backoff plus up to 10% random jitter, never above `max_delay`.
    #[must_use]
    pub fn delay_with_jitter(&self, retry_index: u32) -> Duration {
        let backoff = self.backoff(retry_index);
        let jitter_ceiling = backoff / 10;
        let jitter = if jitter_ceiling.is_zero() {
            Duration::ZERO
        } else {
            rand::thread_rng().gen_range(Duration::ZERO..=jitter_ceiling)
        };
        backoff.saturating_add(jitter).min(self.max_delay)
    }
}

/// Runs `attempt` until it succeeds, fails with an error `should_retry`
/// rejects, or `policy.max_retries` retries are used up.
///
/// The last error is returned unchanged. Success never sleeps. There is no
/// overall timeout; wrap individual attempts if one is needed.
///
/// # Errors
///
/// Returns the error of the final attempt.
///
/// # Example
///
/// ```rust
/// use jsonapi_client::clients::{retry_with_backoff, RetryPolicy};
/// use std::cell::Cell;
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let calls = Cell::new(0);
/// let policy = RetryPolicy::new(3, Duration::from_millis(1), Duration::from_millis(5));
///
/// let result = retry_with_backoff(
///     || {
///         calls.set(calls.get() + 1);
///         let n = calls.get();
///         async move { if n < 3 { Err("busy") } else { Ok(n) } }
///     },
///     &policy,
///     |error: &&str| *error == "busy",
/// )
/// .await;
///
/// assert_eq!(result, Ok(3));
/// # });
/// ```
pub async fn retry_with_backoff<T, E, F, Fut, P>(
    attempt: F,
    policy: &RetryPolicy,
    should_retry: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: Display,
{
    retry_with_backoff_hinted(attempt, policy, should_retry, |_| None).await
}

/// Like [`retry_with_backoff`], but waits at least as long as `hint`
/// suggests for an error (e.g. a `Retry-After` header), capped at
/// `policy.max_delay`.
///
/// # Errors
///
/// Returns the error of the final attempt.
pub async fn retry_with_backoff_hinted<T, E, F, Fut, P, H>(
    mut attempt: F,
    policy: &RetryPolicy,
    should_retry: P,
    hint: H,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    H: Fn(&E) -> Option<Duration>,
    E: Display,
{
    let mut retries = 0;
    loop {
        let error = match attempt().await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        if retries >= policy.max_retries || !should_retry(&error) {
            return Err(error);
        }

        let mut delay = policy.delay_with_jitter(retries);
        if let Some(suggested) = hint(&error) {
            delay = delay.max(suggested.min(policy.max_delay));
        }

        retries += 1;
        tracing::warn!(
            retry = retries,
            max_retries = policy.max_retries,
            delay_ms = delay.as_millis(),
            error = %error,
            "Retrying failed request"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tokio::time::Instant;

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries, Duration::from_secs(1), Duration::from_secs(30))
    }

    #[test]
    fn test_from_rate_limit_defaults() {
        let policy = RetryPolicy::from_rate_limit(&RateLimitConfig::default());
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.base_delay, Duration::from_secs(1));
        assert_eq!(policy.max_delay, DEFAULT_MAX_RETRY_DELAY);
    }

    #[test]
    fn test_from_rate_limit_raises_ceiling_for_long_retry_after() {
        let config = RateLimitConfig::builder()
            .retry_after(Duration::from_secs(60))
            .build()
            .unwrap();
        let policy = RetryPolicy::from_rate_limit(&config);
        assert_eq!(policy.max_delay, Duration::from_secs(60));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::new(10, Duration::from_secs(1), Duration::from_secs(5));
        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.backoff(3), Duration::from_secs(5));
        assert_eq!(policy.backoff(40), Duration::from_secs(5));
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let policy = RetryPolicy::new(10, Duration::from_secs(1), Duration::from_secs(5));
        for index in 0..6 {
            for _ in 0..50 {
                let delay = policy.delay_with_jitter(index);
                assert!(delay >= policy.backoff(index));
                assert!(delay <= policy.max_delay);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_returns_without_delay() {
        let start = Instant::now();
        let result: Result<u32, String> =
            retry_with_backoff(|| async { Ok(7) }, &policy(3), |_| true).await;

        assert_eq!(result, Ok(7));
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success() {
        let attempts = Cell::new(0);
        let result = retry_with_backoff(
            || {
                attempts.set(attempts.get() + 1);
                let n = attempts.get();
                async move {
                    if n <= 2 {
                        Err(format!("failure {n}"))
                    } else {
                        Ok(n)
                    }
                }
            },
            &policy(3),
            |_| true,
        )
        .await;

        assert_eq!(result, Ok(3));
        assert_eq!(attempts.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_returns_immediately() {
        let attempts = Cell::new(0);
        let start = Instant::now();
        let result: Result<(), &str> = retry_with_backoff(
            || {
                attempts.set(attempts.get() + 1);
                async { Err("invalid") }
            },
            &policy(3),
            |error: &&str| *error != "invalid",
        )
        .await;

        assert_eq!(result, Err("invalid"));
        assert_eq!(attempts.get(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_return_last_error() {
        let attempts = Cell::new(0);
        let start = Instant::now();
        let result: Result<(), String> = retry_with_backoff(
            || {
                attempts.set(attempts.get() + 1);
                let n = attempts.get();
                async move { Err(format!("failure {n}")) }
            },
            &policy(2),
            |_| true,
        )
        .await;

        assert_eq!(result, Err("failure 3".to_string()));
        assert_eq!(attempts.get(), 3);
        // 1s + 2s of backoff plus at most 10% jitter each
        assert!(start.elapsed() >= Duration::from_secs(3));
        assert!(start.elapsed() <= Duration::from_millis(3300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hint_extends_delay() {
        let attempts = Cell::new(0);
        let start = Instant::now();
        let result = retry_with_backoff_hinted(
            || {
                attempts.set(attempts.get() + 1);
                let n = attempts.get();
                async move {
                    if n == 1 {
                        Err("slow down")
                    } else {
                        Ok(n)
                    }
                }
            },
            &policy(1),
            |_| true,
            |_| Some(Duration::from_secs(5)),
        )
        .await;

        assert_eq!(result, Ok(2));
        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_means_single_attempt() {
        let attempts = Cell::new(0);
        let result: Result<(), &str> = retry_with_backoff(
            || {
                attempts.set(attempts.get() + 1);
                async { Err("down") }
            },
            &RetryPolicy::none(),
            |_| true,
        )
        .await;

        assert_eq!(result, Err("down"));
        assert_eq!(attempts.get(), 1);
    }
}
