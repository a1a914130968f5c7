//! Client configuration.
//!
//! # Overview
//!
//! - [`ClientConfig`]: immutable settings shared by every request
//! - [`ClientConfigBuilder`]: fluent builder validating required fields
//! - [`RateLimitConfig`]: quota, throttling and retry settings
//! - [`ApiKey`]: bearer token with masked debug output
//! - [`BaseUrl`]: validated service root URL
//!
//! Defaults are plain constants; there is no global or environment-derived
//! state. Two clients built from different configs never affect each other.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_client::{ApiKey, BaseUrl, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .base_url(BaseUrl::new("https://api.example.com/api/v2").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.page_size(), 50);
//! ```

mod newtypes;
mod rate_limit;

pub use newtypes::{ApiKey, BaseUrl};
pub use rate_limit::{RateLimitConfig, RateLimitConfigBuilder};

use std::time::Duration;

use crate::error::ConfigError;
use crate::pagination::{PaginationOptions, DEFAULT_PAGE_SIZE};

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a client instance.
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
///
/// # Example
///
/// ```rust
/// use jsonapi_client::{ApiKey, BaseUrl, ClientConfig, RateLimitConfig};
/// use std::time::Duration;
///
/// let config = ClientConfig::builder()
///     .api_key(ApiKey::new("key").unwrap())
///     .base_url(BaseUrl::new("https://api.example.com").unwrap())
///     .timeout(Duration::from_secs(10))
///     .rate_limit(RateLimitConfig::disabled())
///     .page_size(200)
///     .user_agent_prefix("MyApp/1.0")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.timeout(), Duration::from_secs(10));
/// assert!(!config.rate_limit().enabled());
/// ```
#[derive(Clone, Debug)]
pub struct ClientConfig {
    api_key: ApiKey,
    base_url: BaseUrl,
    timeout: Duration,
    rate_limit: RateLimitConfig,
    page_size: u32,
    user_agent_prefix: Option<String>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the per-attempt request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the rate limit settings.
    #[must_use]
    pub const fn rate_limit(&self) -> &RateLimitConfig {
        &self.rate_limit
    }

    /// Returns the default page size for list iteration.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Pagination options seeded with the configured page size.
    #[must_use]
    pub fn pagination_options(&self) -> PaginationOptions {
        PaginationOptions::new().page_size(self.page_size)
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for [`ClientConfig`].
///
/// `api_key` and `base_url` are required.
///
/// # Defaults
///
/// - `timeout`: [`DEFAULT_TIMEOUT`] (30 seconds)
/// - `rate_limit`: [`RateLimitConfig::default()`]
/// - `page_size`: [`DEFAULT_PAGE_SIZE`] (50), clamped to `1..=1000`
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    api_key: Option<ApiKey>,
    base_url: Option<BaseUrl>,
    timeout: Option<Duration>,
    rate_limit: Option<RateLimitConfig>,
    page_size: Option<u32>,
    user_agent_prefix: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Sets the base URL (required).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the per-attempt request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the rate limit configuration.
    #[must_use]
    pub fn rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    /// Sets the default page size for list iteration.
    #[must_use]
    pub const fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingRequiredField`] if `api_key` or `base_url`
    ///   are not set
    /// - [`ConfigError::ZeroDuration`] if `timeout` is zero
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ConfigError::ZeroDuration { field: "timeout" });
        }

        let page_size = PaginationOptions::new()
            .page_size(self.page_size.unwrap_or(DEFAULT_PAGE_SIZE))
            .get_page_size();

        Ok(ClientConfig {
            api_key,
            base_url,
            timeout,
            rate_limit: self.rate_limit.unwrap_or_default(),
            page_size,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
