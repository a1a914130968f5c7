//! Inbound HTTP response.

use std::collections::HashMap;
use std::time::Duration;

/// A response as received from the transport.
///
/// The body is kept as raw text; decoding happens in the executor so that
/// non-JSON error pages can still be classified.
///
/// # Example
///
/// ```rust
/// use jsonapi_client::clients::HttpResponse;
/// use std::collections::HashMap;
/// use std::time::Duration;
///
/// let mut headers = HashMap::new();
/// headers.insert("retry-after".to_string(), vec!["3".to_string()]);
/// let response = HttpResponse::new(429, headers, String::new());
///
/// assert!(!response.is_ok());
/// assert_eq!(response.retry_after(), Some(Duration::from_secs(3)));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers with lowercased names.
    pub headers: HashMap<String, Vec<String>>,
    /// Raw body text.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response. Header names are lowercased.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, Vec<String>>, body: String) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, values)| (name.to_ascii_lowercase(), values))
            .collect();
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }

    /// Returns `true` when there is no payload to decode.
    #[must_use]
    pub fn has_no_content(&self) -> bool {
        self.status == 204 || self.body.trim().is_empty()
    }

    /// Returns the first value of a header, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Parses the `Retry-After` header given in (possibly fractional)
    /// seconds. HTTP-date values and values that do not fit a
    /// [`Duration`] (negative, NaN, overflowing) are ignored.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        let seconds: f64 = self.header("retry-after")?.trim().parse().ok()?;
        Duration::try_from_secs_f64(seconds).ok()
    }
}
