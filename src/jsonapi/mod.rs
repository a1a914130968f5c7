//! JSON:API transcoding.
//!
//! This module converts between the service's wire format and the flat,
//! camelCase representation the rest of the crate works with. Everything
//! here is pure: no I/O, no error classification.
//!
//! # Overview
//!
//! - [`wire_key_to_internal`] / [`internal_key_to_wire`]: key case conversion
//! - [`decode_response`]: envelope to [`Document`] of [`Resource`] values
//! - [`encode_request`]: internal data to a create or update envelope
//! - [`ListParams`], [`build_filter_params`], [`build_query_params`]:
//!   query string construction
//!
//! # Example
//!
//! ```rust
//! use jsonapi_client::jsonapi::{decode_response, encode_request};
//! use serde_json::json;
//!
//! let page = decode_response(json!({
//!     "data": [{"id": "1", "type": "people", "attributes": {"first-name": "Ada"}}],
//!     "meta": {"current-page": 1, "next-page": null, "total-pages": 1, "total-count": 1}
//! }))
//! .unwrap()
//! .into_page();
//!
//! assert_eq!(page.data[0].get("firstName"), Some(&json!("Ada")));
//! assert!(!page.meta.has_next_page());
//!
//! let body = encode_request("people", json!({"lastName": "Lovelace"}).as_object().unwrap(), Some("1"));
//! assert_eq!(body["data"]["attributes"]["last-name"], "Lovelace");
//! ```

mod case;
mod document;
mod query;

pub use case::{decode_value, encode_value, internal_key_to_wire, wire_key_to_internal};
pub use document::{
    decode_resource, decode_response, encode_attributes, encode_request, Data, DecodeError,
    Document, LinkRef, Page, PaginationMeta, Resource, WireResource,
};
pub use query::{build_filter_params, build_query_params, ListParams, FILTER_OPERATORS};
