//! Request execution: rate limiting, retries, timeouts and classification.

use serde_json::{Map, Value};

use crate::clients::errors::{ApiError, TransportError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::clients::rate_limiter::{RateLimitStatus, RateLimiter};
use crate::clients::retry::{retry_with_backoff_hinted, RetryPolicy};
use crate::clients::transport::{ReqwestTransport, Transport};
use crate::config::ClientConfig;
use crate::jsonapi::{
    decode_response, encode_request, Data, Document, ListParams, Page, PaginationMeta, Resource,
};

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Media type for JSON:API request and response bodies.
pub const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Performs logical operations against the service.
///
/// Each operation runs as a sequence of attempts. Every attempt:
///
/// 1. waits on the [`RateLimiter`] if the window is filling up
/// 2. records itself in the limiter
/// 3. sends through the [`Transport`] under the configured timeout
/// 4. classifies the response
///
/// Rate-limited (429) and server (5xx) failures are retried with backoff;
/// everything else, including timeouts, is returned on first occurrence.
///
/// # Thread Safety
///
/// `RequestExecutor` is `Send + Sync` when its transport is, and is meant
/// to be shared (e.g. behind an `Arc`) so that all requests count against
/// one rate limiter.
///
/// # Example
///
/// ```rust,ignore
/// use jsonapi_client::clients::RequestExecutor;
/// use jsonapi_client::jsonapi::ListParams;
///
/// let executor = RequestExecutor::new(config)?;
/// let page = executor.list("projects", &ListParams::new()).await?;
/// for project in page.data {
///     println!("{}: {:?}", project.id, project.get("name"));
/// }
/// ```
#[derive(Debug)]
pub struct RequestExecutor<T = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
    rate_limiter: RateLimiter,
    retry_policy: RetryPolicy,
    default_headers: Vec<(String, String)>,
}

// Verify RequestExecutor is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RequestExecutor>();
};

impl RequestExecutor<ReqwestTransport> {
    /// Creates an executor with the default `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns a `Network` [`ApiError`] if the HTTP client cannot be
    /// initialized.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new().map_err(ApiError::network)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> RequestExecutor<T> {
    /// Creates an executor with a custom transport.
    #[must_use]
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}JSON:API Client Library v{SDK_VERSION} | Rust");

        let default_headers = vec![
            ("Accept".to_string(), JSONAPI_MEDIA_TYPE.to_string()),
            ("Content-Type".to_string(), JSONAPI_MEDIA_TYPE.to_string()),
            (
                "Authorization".to_string(),
                format!("Bearer {}", config.api_key().as_ref()),
            ),
            ("User-Agent".to_string(), user_agent),
        ];

        Self {
            rate_limiter: RateLimiter::new(config.rate_limit().clone()),
            retry_policy: RetryPolicy::from_rate_limit(config.rate_limit()),
            config,
            transport,
            default_headers,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the shared rate limiter.
    #[must_use]
    pub const fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Returns the retry policy derived from the rate limit settings.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the headers sent with every request.
    #[must_use]
    pub fn default_headers(&self) -> &[(String, String)] {
        &self.default_headers
    }

    /// Returns a snapshot of the rate limiter.
    #[must_use]
    pub fn rate_limit_status(&self) -> RateLimitStatus {
        self.rate_limiter.status()
    }

    /// Fetches a single resource.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for non-2xx responses, transport failures, and
    /// payloads that do not hold exactly one resource (`Generic`).
    pub async fn get(&self, path: &str, params: &ListParams) -> Result<Document<Resource>, ApiError> {
        let request = self.build_request(HttpMethod::Get, path, params.to_query(), None);
        let (status, document) = self.fetch_document(&request).await?;
        let document = document.ok_or_else(|| {
            ApiError::decode(status, &EmptyBody, None, &request)
        })?;
        document
            .into_single()
            .map_err(|error| ApiError::decode(status, &error, None, &request))
    }

    /// Fetches one page of a collection.
    ///
    /// Missing pagination metadata is filled with defaults, so a response
    /// without `meta` is treated as the only page.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for non-2xx responses, transport failures, and
    /// undecodable payloads.
    pub async fn list(&self, path: &str, params: &ListParams) -> Result<Page<Resource>, ApiError> {
        let request = self.build_request(HttpMethod::Get, path, params.to_query(), None);
        let (_, document) = self.fetch_document(&request).await?;
        Ok(document.map_or_else(
            || Page::new(Vec::new(), PaginationMeta::default()),
            Document::into_page,
        ))
    }

    /// Creates a resource from internal-form attributes.
    ///
    /// Returns `None` when the service answers 204 No Content.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`]; a 422 response yields a `Validation` error.
    pub async fn create(
        &self,
        path: &str,
        resource_type: &str,
        data: &Map<String, Value>,
    ) -> Result<Option<Document<Resource>>, ApiError> {
        let body = encode_request(resource_type, data, None);
        let request = self.build_request(HttpMethod::Post, path, Vec::new(), Some(body));
        self.write(&request).await
    }

    /// Updates a resource with internal-form attributes.
    ///
    /// Returns `None` when the service answers 204 No Content.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`]; a 422 response yields a `Validation` error.
    pub async fn update(
        &self,
        path: &str,
        resource_type: &str,
        id: &str,
        data: &Map<String, Value>,
    ) -> Result<Option<Document<Resource>>, ApiError> {
        let body = encode_request(resource_type, data, Some(id));
        let request = self.build_request(HttpMethod::Patch, path, Vec::new(), Some(body));
        self.write(&request).await
    }

    /// Deletes a resource. Any response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for non-2xx responses and transport failures.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.build_request(HttpMethod::Delete, path, Vec::new(), None);
        self.execute(&request).await.map(|_| ())
    }

    /// Sends a prepared request with rate limiting and retries, returning
    /// the raw 2xx response.
    ///
    /// # Errors
    ///
    /// Returns the classified [`ApiError`] of the last attempt.
    pub async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        retry_with_backoff_hinted(
            || self.attempt(request),
            &self.retry_policy,
            ApiError::is_retryable,
            ApiError::retry_after,
        )
        .await
    }

    /// Builds a request for `path` relative to the base URL with the
    /// default headers applied.
    #[must_use]
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<Value>,
    ) -> HttpRequest {
        let mut builder = HttpRequest::builder(method, self.config.base_url().join(path)).query(query);
        for (name, value) in &self.default_headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }
        builder.build()
    }

    async fn attempt(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.rate_limiter.wait_if_needed().await;
        self.rate_limiter.record_request();

        tracing::debug!(
            method = %request.method,
            url = %request.url,
            "Sending request"
        );

        let timeout = self.config.timeout();
        let response = match tokio::time::timeout(timeout, self.transport.send(request.clone())).await {
            Err(_) | Ok(Err(TransportError::Timeout)) => {
                tracing::warn!(
                    method = %request.method,
                    url = %request.url,
                    timeout_ms = timeout.as_millis(),
                    "Request timed out"
                );
                return Err(ApiError::timeout(timeout, request));
            }
            Ok(Err(error)) => return Err(ApiError::network(error).with_request(request)),
            Ok(Ok(response)) => response,
        };

        tracing::debug!(status = response.status, url = %request.url, "Received response");

        if response.is_ok() {
            Ok(response)
        } else {
            Err(ApiError::from_response(&response, request))
        }
    }

    async fn write(&self, request: &HttpRequest) -> Result<Option<Document<Resource>>, ApiError> {
        let (status, document) = self.fetch_document(request).await?;
        document
            .map(|document| {
                document
                    .into_single()
                    .map_err(|error| ApiError::decode(status, &error, None, request))
            })
            .transpose()
    }

    async fn fetch_document(
        &self,
        request: &HttpRequest,
    ) -> Result<(u16, Option<Document<Data>>), ApiError> {
        let response = self.execute(request).await?;
        if response.has_no_content() {
            return Ok((response.status, None));
        }

        let status = response.status;
        let value: Value = serde_json::from_str(&response.body)
            .map_err(|error| ApiError::decode(status, &error, None, request))?;
        let document = decode_response(value.clone())
            .map_err(|error| ApiError::decode(status, &error, Some(value), request))?;
        Ok((status, Some(document)))
    }
}

#[derive(Debug)]
struct EmptyBody;

impl std::fmt::Display for EmptyBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("response has no body")
    }
}

impl std::error::Error for EmptyBody {}
