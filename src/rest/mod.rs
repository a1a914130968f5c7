//! Resource façade.
//!
//! Resources are not modeled as one type each. Instead, a
//! [`ResourceDescriptor`] names the resource, its JSON:API type, its path and
//! its [`Capabilities`], and one generic [`ResourceEndpoint`] serves all of
//! them:
//!
//! - operations outside the descriptor's capabilities fail with
//!   [`ResourceError::Unsupported`] before any request is sent
//! - list operations come in three flavors: a single page
//!   ([`ResourceEndpoint::list`]), lazy iteration ([`ResourceEndpoint::iter`],
//!   [`ResourceEndpoint::pages`]) and draining helpers
//!   ([`ResourceEndpoint::collect_all`], [`ResourceEndpoint::take`]);
//!   `None` pagination options use the client's configured page size
//! - reads can be converted into caller-defined types with
//!   [`ResourceEndpoint::find_as`], writes built from them with
//!   [`ResourceEndpoint::create_from`] and [`ResourceEndpoint::update_from`]
//!
//! # Example
//!
//! ```rust,ignore
//! use jsonapi_client::jsonapi::ListParams;
//! use jsonapi_client::rest::{ApiClient, Capabilities, ResourceDescriptor};
//!
//! const PROJECTS: ResourceDescriptor =
//!     ResourceDescriptor::new("Project", "projects", "projects", Capabilities::ALL);
//! const ACTIVITIES: ResourceDescriptor =
//!     ResourceDescriptor::new("Activity", "activities", "activities", Capabilities::READ_ONLY);
//!
//! let client = ApiClient::new(config)?;
//!
//! let recent = client
//!     .resource(&ACTIVITIES)
//!     .take(ListParams::new().sort("-created-at"), 10, None)
//!     .await?;
//!
//! let mut data = serde_json::Map::new();
//! data.insert("name".into(), "Website relaunch".into());
//! client.resource(&PROJECTS).create(&data).await?;
//! ```

mod client;
mod descriptor;
mod endpoint;
mod errors;

pub use client::ApiClient;
pub use descriptor::{Capabilities, ResourceDescriptor, ResourceOperation};
pub use endpoint::{PageFuture, ResourceEndpoint};
pub use errors::ResourceError;
