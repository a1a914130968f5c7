//! The top-level API client.

use crate::clients::{ApiError, RateLimitStatus, ReqwestTransport, RequestExecutor, Transport};
use crate::config::ClientConfig;
use crate::rest::descriptor::ResourceDescriptor;
use crate::rest::endpoint::ResourceEndpoint;

/// Client for a JSON:API service.
///
/// Owns one [`RequestExecutor`], so every resource reached through
/// [`resource`](Self::resource) shares a single rate limiter.
///
/// # Thread Safety
///
/// `ApiClient` is `Send + Sync`. Wrap it in an `Arc` to share it across
/// tasks.
///
/// # Example
///
/// ```rust,ignore
/// use jsonapi_client::{ApiClient, ApiKey, BaseUrl, ClientConfig};
/// use jsonapi_client::jsonapi::ListParams;
/// use jsonapi_client::rest::{Capabilities, ResourceDescriptor};
///
/// const PEOPLE: ResourceDescriptor =
///     ResourceDescriptor::new("Person", "people", "people", Capabilities::ALL);
///
/// let config = ClientConfig::builder()
///     .api_key(ApiKey::new("secret")?)
///     .base_url(BaseUrl::new("https://api.example.com/api/v2")?)
///     .build()?;
/// let client = ApiClient::new(config)?;
///
/// let person = client.resource(&PEOPLE).find("42", &ListParams::new()).await?;
/// println!("{:?}", person.data.get("firstName"));
/// ```
#[derive(Debug)]
pub struct ApiClient<T = ReqwestTransport> {
    executor: RequestExecutor<T>,
}

// Verify ApiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiClient>();
};

impl ApiClient<ReqwestTransport> {
    /// Creates a client with the default `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns a `Network` [`ApiError`] if the HTTP client cannot be
    /// initialized.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        tracing::debug!(base_url = %config.base_url(), "Creating API client");
        Ok(Self {
            executor: RequestExecutor::new(config)?,
        })
    }
}

impl<T: Transport> ApiClient<T> {
    /// Creates a client with a custom transport.
    #[must_use]
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            executor: RequestExecutor::with_transport(config, transport),
        }
    }

    /// Returns the endpoint for one resource.
    #[must_use]
    pub const fn resource<'a>(&'a self, descriptor: &'a ResourceDescriptor) -> ResourceEndpoint<'a, T> {
        ResourceEndpoint::new(&self.executor, descriptor)
    }

    /// Returns the underlying executor for requests outside any descriptor.
    #[must_use]
    pub const fn executor(&self) -> &RequestExecutor<T> {
        &self.executor
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        self.executor.config()
    }

    /// Returns a snapshot of the shared rate limiter.
    #[must_use]
    pub fn rate_limit_status(&self) -> RateLimitStatus {
        self.executor.rate_limit_status()
    }
}
