//! Outbound HTTP request description.
//!
//! An [`HttpRequest`] is transport-agnostic: it names the method, the
//! absolute URL, query pairs, headers and an optional JSON body. The
//! executor builds it and a [`Transport`](crate::clients::Transport)
//! sends it.

use std::fmt;

use serde_json::Value;

/// HTTP methods used by the JSON:API protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// Read a resource or collection.
    Get,
    /// Create a resource.
    Post,
    /// Partially update a resource.
    Patch,
    /// Remove a resource.
    Delete,
}

impl HttpMethod {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request ready to be sent.
///
/// # Example
///
/// ```rust
/// use jsonapi_client::clients::{HttpMethod, HttpRequest};
/// use serde_json::json;
///
/// let request = HttpRequest::builder(HttpMethod::Patch, "https://api.example.com/tasks/1")
///     .header("Accept", "application/vnd.api+json")
///     .body(json!({"data": {"id": "1", "type": "tasks", "attributes": {}}}))
///     .build();
///
/// assert_eq!(request.header("accept"), Some("application/vnd.api+json"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// Absolute URL without the query string.
    pub url: String,
    /// Ordered query pairs, unencoded.
    pub query: Vec<(String, String)>,
    /// Request headers.
    pub headers: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Creates a new builder for the given method and absolute URL.
    #[must_use]
    pub fn builder(method: HttpMethod, url: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, url)
    }

    /// Returns the first header value with the given name, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Renders the URL with a percent-encoded query string.
    #[must_use]
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{query}", self.url)
    }
}

/// Builder for [`HttpRequest`].
#[derive(Debug)]
pub struct HttpRequestBuilder {
    method: HttpMethod,
    url: String,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<Value>,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Appends query pairs.
    #[must_use]
    pub fn query(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Appends a single query pair.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets a header, replacing any existing value with the same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Builds the [`HttpRequest`].
    #[must_use]
    pub fn build(self) -> HttpRequest {
        HttpRequest {
            method: self.method,
            url: self.url,
            query: self.query,
            headers: self.headers,
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_builder_creates_get_request() {
        let request = HttpRequest::builder(HttpMethod::Get, "https://api.example.com/tasks").build();

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, "https://api.example.com/tasks");
        assert!(request.body.is_none());
        assert!(request.query.is_empty());
    }

    #[test]
    fn test_builder_with_body() {
        let request = HttpRequest::builder(HttpMethod::Post, "https://api.example.com/tasks")
            .body(json!({"data": {"type": "tasks", "attributes": {}}}))
            .build();

        assert_eq!(request.body.unwrap()["data"]["type"], "tasks");
    }

    #[test]
    fn test_header_replaces_case_insensitively() {
        let request = HttpRequest::builder(HttpMethod::Get, "https://api.example.com")
            .header("Accept", "application/json")
            .header("accept", "application/vnd.api+json")
            .build();

        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header("ACCEPT"), Some("application/vnd.api+json"));
    }

    #[test]
    fn test_full_url_encodes_query() {
        let request = HttpRequest::builder(HttpMethod::Get, "https://api.example.com/tasks")
            .query_param("filter[project-id]", "1,2")
            .query_param("page[number]", "2")
            .build();

        assert_eq!(
            request.full_url(),
            "https://api.example.com/tasks?filter%5Bproject-id%5D=1%2C2&page%5Bnumber%5D=2"
        );
    }

    #[test]
    fn test_full_url_without_query() {
        let request = HttpRequest::builder(HttpMethod::Delete, "https://api.example.com/tasks/1").build();
        assert_eq!(request.full_url(), "https://api.example.com/tasks/1");
    }
}
