//! Pluggable HTTP transport.
//!
//! The executor never talks to the network directly. It hands a fully built
//! [`HttpRequest`] to a [`Transport`] and classifies whatever comes back.
//! [`ReqwestTransport`] is the default implementation; tests and callers
//! with special networking needs can supply their own.

use std::collections::HashMap;
use std::future::Future;

use crate::clients::errors::TransportError;
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;

/// Sends one HTTP request and returns the raw response.
///
/// Implementations report only transport-level failures through
/// [`TransportError`]; any HTTP status, including 4xx and 5xx, is a
/// successful send. Timeouts are enforced by the caller, so an
/// implementation may rely on its future being dropped mid-flight.
///
/// # Example
///
/// ```rust
/// use jsonapi_client::clients::{HttpRequest, HttpResponse, Transport, TransportError};
/// use std::collections::HashMap;
/// use std::future::Future;
///
/// struct AlwaysEmpty;
///
/// impl Transport for AlwaysEmpty {
///     fn send(
///         &self,
///         _request: HttpRequest,
///     ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
///         async { Ok(HttpResponse::new(204, HashMap::new(), String::new())) }
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Sends the request.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// [`Transport`] backed by a shared `reqwest` client with rustls.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

// Verify ReqwestTransport is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ReqwestTransport>();
};

impl ReqwestTransport {
    /// Creates a transport with a fresh connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Network`] if the TLS backend cannot be
    /// initialized.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().use_rustls_tls().build()?;
        Ok(Self { client })
    }

    /// Wraps an existing `reqwest` client, e.g. one with a proxy configured.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        let client = self.client.clone();
        async move {
            let method = match request.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
                HttpMethod::Patch => reqwest::Method::PATCH,
                HttpMethod::Delete => reqwest::Method::DELETE,
            };

            let mut builder = client.request(method, &request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            if let Some(body) = &request.body {
                builder = builder.body(body.to_string());
            }

            let res = builder.send().await?;
            let status = res.status().as_u16();
            let headers = Self::parse_response_headers(res.headers());
            let body = res.text().await?;

            Ok(HttpResponse::new(status, headers, body))
        }
    }
}
