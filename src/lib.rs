//! # JSON:API Client
//!
//! An async Rust client core for REST services that speak
//! [JSON:API](https://jsonapi.org). It translates between flat, camelCase
//! application objects and the nested kebab-case wire envelope, respects the
//! service's rate limits, retries transient failures, and turns page-numbered
//! collections into lazy sequences.
//!
//! ## Overview
//!
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Envelope and case transcoding in [`jsonapi`]
//! - Filter, sort, include and page query construction via
//!   [`jsonapi::ListParams`]
//! - Sliding-window rate limiting and bounded exponential backoff in
//!   [`clients`]
//! - Lazy item and page iteration in [`pagination`]
//! - One generic resource façade driven by capability descriptors in
//!   [`rest`]
//!
//! ## Quick Start
//!
//! ```rust
//! use jsonapi_client::{ApiKey, BaseUrl, ClientConfig, RateLimitConfig};
//! use std::time::Duration;
//!
//! let config = ClientConfig::builder()
//!     .api_key(ApiKey::new("your-api-key").unwrap())
//!     .base_url(BaseUrl::new("https://api.example.com/api/v2").unwrap())
//!     .timeout(Duration::from_secs(15))
//!     .rate_limit(
//!         RateLimitConfig::builder()
//!             .max_requests(60)
//!             .window(Duration::from_secs(60))
//!             .build()
//!             .unwrap(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.rate_limit().max_requests(), 60);
//! ```
//!
//! ## Working With Resources
//!
//! ```rust,ignore
//! use jsonapi_client::{ApiClient, ApiErrorKind};
//! use jsonapi_client::jsonapi::ListParams;
//! use jsonapi_client::pagination::PaginationOptions;
//! use jsonapi_client::rest::{Capabilities, ResourceDescriptor, ResourceError};
//!
//! const COMPANIES: ResourceDescriptor =
//!     ResourceDescriptor::new("Company", "companies", "companies", Capabilities::ALL);
//!
//! let client = ApiClient::new(config)?;
//! let companies = client.resource(&COMPANIES);
//!
//! // Lazily walk every company updated this year
//! let params = ListParams::new()
//!     .filter_op("updatedAt", "gte", "2024-01-01")
//!     .sort("name");
//! let mut items = companies.iter(params, PaginationOptions::new().page_size(100))?;
//! while let Some(company) = items.next().await {
//!     let company = company?;
//!     println!("{} {:?}", company.id, company.get("name"));
//! }
//!
//! // Errors are matched by kind
//! match companies.find("missing", &ListParams::new()).await {
//!     Err(ResourceError::Api(e)) if e.kind == ApiErrorKind::NotFound => {}
//!     other => println!("{other:?}"),
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration and rate limit state live in the
//!   client instance
//! - **Fail-fast validation**: configuration newtypes validate on
//!   construction
//! - **Thread-safe**: clients are `Send + Sync` and share one rate limiter
//! - **Async-first**: built on the Tokio runtime

pub mod clients;
pub mod config;
pub mod error;
pub mod jsonapi;
pub mod pagination;
pub mod rest;

// Re-export public types at crate root for convenience
pub use config::{
    ApiKey, BaseUrl, ClientConfig, ClientConfigBuilder, RateLimitConfig, RateLimitConfigBuilder,
    DEFAULT_TIMEOUT,
};
pub use error::ConfigError;

pub use clients::{ApiError, ApiErrorKind, RateLimitStatus, RequestExecutor, Transport};
pub use rest::{ApiClient, Capabilities, ResourceDescriptor, ResourceError, ResourceOperation};
