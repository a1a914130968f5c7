//! Error types for request execution.
//!
//! Every failed operation surfaces as one [`ApiError`]. Its [`ApiErrorKind`]
//! says what went wrong, and the remaining fields carry the request and
//! response context:
//!
//! | Condition                     | Kind             |
//! |-------------------------------|------------------|
//! | 401, 403                      | `Authentication` |
//! | 404                           | `NotFound`       |
//! | 422                           | `Validation`     |
//! | 429                           | `RateLimit`      |
//! | 5xx                           | `Server`         |
//! | other non-2xx, bad payloads   | `Generic`        |
//! | transport timeout             | `Timeout`        |
//! | connection failure            | `Network`        |
//!
//! # Example
//!
//! ```rust,ignore
//! use jsonapi_client::clients::ApiErrorKind;
//!
//! match executor.get("projects/1", &ListParams::new()).await {
//!     Ok(document) => println!("{}", document.data.id),
//!     Err(e) if matches!(e.kind, ApiErrorKind::NotFound) => println!("gone"),
//!     Err(e) if matches!(e.kind, ApiErrorKind::Validation { .. }) => {
//!         println!("{}", e.format_validation_errors());
//!     }
//!     Err(e) => println!("{e}"),
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::jsonapi::wire_key_to_internal;

/// Failure reported by a [`Transport`](crate::clients::Transport) before any
/// HTTP status was received.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport gave up waiting for the service.
    #[error("Request timed out")]
    Timeout,

    /// Connection, TLS or protocol failure.
    #[error("Network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(Box::new(error))
        }
    }
}

/// Location of the offending input in a JSON:API error object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSource {
    /// JSON pointer into the request document, e.g. `/data/attributes/name`.
    #[serde(default)]
    pub pointer: Option<String>,
    /// Name of the offending query parameter.
    #[serde(default)]
    pub parameter: Option<String>,
}

/// One entry of a JSON:API `errors` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// HTTP status as reported in the error object.
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    /// Application-specific error code.
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
    /// Short summary.
    #[serde(default)]
    pub title: Option<String>,
    /// Human-readable explanation.
    #[serde(default)]
    pub detail: Option<String>,
    /// Where the problem originated.
    #[serde(default)]
    pub source: Option<ErrorSource>,
    /// Free-form metadata.
    #[serde(default)]
    pub meta: Option<Value>,
}

impl ErrorObject {
    /// Returns the attribute or parameter the error refers to, in internal
    /// naming, if the service reported one.
    ///
    /// `/data/attributes/first-name` yields `firstName`.
    #[must_use]
    pub fn field(&self) -> Option<String> {
        let source = self.source.as_ref()?;
        source
            .pointer
            .as_deref()
            .and_then(|pointer| pointer.rsplit('/').next())
            .filter(|segment| !segment.is_empty())
            .or(source.parameter.as_deref())
            .map(wire_key_to_internal)
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    })
}

/// Classification of an [`ApiError`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiErrorKind {
    /// Credentials missing, invalid or insufficient (401, 403).
    Authentication,
    /// The resource does not exist (404).
    NotFound,
    /// The service rejected the submitted data (422).
    Validation {
        /// Field-level errors reported by the service.
        errors: Vec<ErrorObject>,
    },
    /// Too many requests (429).
    RateLimit {
        /// Suggested wait from the `Retry-After` header.
        retry_after: Option<Duration>,
    },
    /// The service failed (5xx).
    Server {
        /// The HTTP status code.
        status: u16,
    },
    /// The request never produced a response.
    Network,
    /// The request did not complete within the configured timeout.
    Timeout {
        /// The timeout that elapsed.
        timeout: Duration,
    },
    /// Any other non-2xx status, or an unreadable response payload.
    Generic {
        /// The HTTP status code.
        status: u16,
    },
}

/// Error returned by every request operation.
///
/// The `Display` output is the service-provided message when there is one.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    /// What went wrong.
    pub kind: ApiErrorKind,
    /// Human-readable message.
    pub message: String,
    /// HTTP status code, when a response was received.
    pub status_code: Option<u16>,
    /// Parsed response body, when it was valid JSON.
    pub raw_response: Option<Value>,
    /// Full request URL including the query string.
    pub request_url: Option<String>,
    /// Request method.
    pub request_method: Option<HttpMethod>,
    /// Underlying transport failure.
    #[source]
    pub source: Option<TransportError>,
}

// Verify ApiError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiError>();
};

impl ApiError {
    /// Creates an error without request context.
    #[must_use]
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
            raw_response: None,
            request_url: None,
            request_method: None,
            source: None,
        }
    }

    /// Attaches the request method and full URL.
    #[must_use]
    pub fn with_request(mut self, request: &HttpRequest) -> Self {
        self.request_url = Some(request.full_url());
        self.request_method = Some(request.method);
        self
    }

    /// Classifies a non-2xx response.
    #[must_use]
    pub fn from_response(response: &HttpResponse, request: &HttpRequest) -> Self {
        let status = response.status;
        let raw_response = serde_json::from_str::<Value>(&response.body).ok();
        let errors = raw_response
            .as_ref()
            .and_then(|body| body.get("errors"))
            .and_then(|errors| Vec::<ErrorObject>::deserialize(errors).ok())
            .unwrap_or_default();

        let message = errors
            .first()
            .and_then(|first| first.detail.clone().or_else(|| first.title.clone()))
            .unwrap_or_else(|| format!("Request failed with status {status}"));

        let kind = match status {
            401 | 403 => ApiErrorKind::Authentication,
            404 => ApiErrorKind::NotFound,
            422 => ApiErrorKind::Validation { errors },
            429 => ApiErrorKind::RateLimit {
                retry_after: response.retry_after(),
            },
            500..=599 => ApiErrorKind::Server { status },
            _ => ApiErrorKind::Generic { status },
        };

        Self {
            status_code: Some(status),
            raw_response,
            ..Self::new(kind, message)
        }
        .with_request(request)
    }

    /// A request that exceeded `timeout`.
    #[must_use]
    pub fn timeout(timeout: Duration, request: &HttpRequest) -> Self {
        Self::new(
            ApiErrorKind::Timeout { timeout },
            format!("Request timed out after {}ms", timeout.as_millis()),
        )
        .with_request(request)
    }

    /// A transport failure without a response.
    #[must_use]
    pub fn network(source: TransportError) -> Self {
        Self {
            source: Some(source),
            ..Self::new(ApiErrorKind::Network, "Network error")
        }
    }

    /// A 2xx response whose payload could not be decoded.
    #[must_use]
    pub fn decode(
        status: u16,
        error: &dyn std::error::Error,
        raw_response: Option<Value>,
        request: &HttpRequest,
    ) -> Self {
        Self {
            status_code: Some(status),
            raw_response,
            ..Self::new(
                ApiErrorKind::Generic { status },
                format!("Invalid response payload: {error}"),
            )
        }
        .with_request(request)
    }

    /// Returns `true` for failures worth retrying: rate limiting and server
    /// errors. Timeouts and client errors are not retried.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            ApiErrorKind::RateLimit { .. } | ApiErrorKind::Server { .. }
        )
    }

    /// Returns the server-suggested wait for rate-limited responses.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        match self.kind {
            ApiErrorKind::RateLimit { retry_after } => retry_after,
            _ => None,
        }
    }

    /// Returns the field-level errors of a validation failure.
    #[must_use]
    pub fn validation_errors(&self) -> &[ErrorObject] {
        match &self.kind {
            ApiErrorKind::Validation { errors } => errors,
            _ => &[],
        }
    }

    /// Renders validation errors as `field: detail` lines.
    ///
    /// Falls back to the error message when there are no field errors.
    #[must_use]
    pub fn format_validation_errors(&self) -> String {
        let lines: Vec<String> = self
            .validation_errors()
            .iter()
            .map(|error| {
                let text = error
                    .detail
                    .as_deref()
                    .or(error.title.as_deref())
                    .unwrap_or("is invalid");
                match error.field() {
                    Some(field) => format!("{field}: {text}"),
                    None => text.to_string(),
                }
            })
            .collect();

        if lines.is_empty() {
            self.message.clone()
        } else {
            lines.join("\n")
        }
    }
}
