//! HTTP layer: transport, rate limiting, retries and request execution.
//!
//! # Overview
//!
//! - [`RequestExecutor`]: performs get/list/create/update/delete against the
//!   service and returns decoded documents or a classified [`ApiError`]
//! - [`RateLimiter`]: sliding-window request accounting consulted before
//!   every attempt
//! - [`retry_with_backoff`]: bounded exponential backoff with jitter
//! - [`Transport`]: the seam to the network, with [`ReqwestTransport`] as
//!   the default
//! - [`HttpRequest`] / [`HttpResponse`]: transport-agnostic messages
//!
//! # Retry Behavior
//!
//! - **429 (Rate Limited)**: retried; waits at least `Retry-After` when the
//!   header is present
//! - **5xx (Server Error)**: retried with exponential backoff
//! - **Timeouts, network and 4xx errors**: returned immediately
//!
//! The number of retries and the base delay come from
//! [`RateLimitConfig`](crate::RateLimitConfig).

mod errors;
mod executor;
mod http_request;
mod http_response;
mod rate_limiter;
mod retry;
mod transport;

pub use errors::{ApiError, ApiErrorKind, ErrorObject, ErrorSource, TransportError};
pub use executor::{RequestExecutor, JSONAPI_MEDIA_TYPE, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::HttpResponse;
pub use rate_limiter::{RateLimitStatus, RateLimiter};
pub use retry::{retry_with_backoff, retry_with_backoff_hinted, RetryPolicy, DEFAULT_MAX_RETRY_DELAY};
pub use transport::{ReqwestTransport, Transport};
