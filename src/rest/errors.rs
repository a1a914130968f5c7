//! Resource-level error types.
//!
//! # Example
//!
//! ```rust,ignore
//! use jsonapi_client::rest::ResourceError;
//!
//! match client.resource(&ACTIVITIES).create(&data).await {
//!     Err(ResourceError::Unsupported { resource, operation }) => {
//!         println!("{resource} does not support {operation}");
//!     }
//!     Err(ResourceError::Api(e)) => println!("request failed: {e}"),
//!     Err(e) => println!("{e}"),
//!     Ok(_) => {}
//! }
//! ```

use thiserror::Error;

use crate::clients::{ApiError, ApiErrorKind};
use crate::rest::descriptor::ResourceOperation;

/// Error type for resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The resource does not support the operation. No request was sent.
    #[error("{resource} does not support {operation}")]
    Unsupported {
        /// The resource name.
        resource: &'static str,
        /// The rejected operation.
        operation: ResourceOperation,
    },

    /// Converting between a typed value and a resource failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl ResourceError {
    /// Returns the underlying [`ApiError`], if the request was sent.
    #[must_use]
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }

    /// Returns `true` if the service answered 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.api_error()
            .is_some_and(|error| error.kind == ApiErrorKind::NotFound)
    }
}

// Verify ResourceError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};
