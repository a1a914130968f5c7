//! Configuration error types.
//!
//! All configuration constructors return `Result<T, ConfigError>` so invalid
//! values are rejected when the client is built, never mid-request.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_client::{ApiKey, ConfigError};
//!
//! let result = ApiKey::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyApiKey)));
//! ```

use thiserror::Error;

/// Errors that can occur while building client configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// API key cannot be empty.
    #[error("API key cannot be empty. Please provide a valid API key.")]
    EmptyApiKey,

    /// Base URL is invalid.
    #[error("Invalid base URL '{url}'. Expected an http or https URL with a host (e.g., 'https://api.example.com/api/v2').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },

    /// Throttle threshold outside `(0, 1]`.
    #[error("Invalid throttle threshold {threshold}. Expected a value greater than 0 and at most 1.")]
    InvalidThrottleThreshold {
        /// The rejected threshold.
        threshold: f64,
    },

    /// The rate limit must allow at least one request per window.
    #[error("Invalid max requests {max_requests}. The rate limit must allow at least one request per window.")]
    InvalidMaxRequests {
        /// The rejected request count.
        max_requests: u32,
    },

    /// A duration that must be positive was zero.
    #[error("Invalid {field}: duration must be greater than zero.")]
    ZeroDuration {
        /// The name of the offending field.
        field: &'static str,
    },
}
