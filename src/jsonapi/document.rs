//! JSON:API envelope decoding and encoding.
//!
//! Incoming payloads arrive as nested resource objects:
//!
//! ```json
//! {
//!   "data": {
//!     "id": "1",
//!     "type": "companies",
//!     "attributes": {"organization-type-name": "Customer"},
//!     "relationships": {"owner": {"data": {"id": "7", "type": "people"}}}
//!   },
//!   "meta": {"current-page": 1, "next-page": 2, "total-pages": 4, "total-count": 180}
//! }
//! ```
//!
//! and are flattened into [`Resource`] values whose attribute keys use the
//! internal camelCase convention. Outgoing writes go the other way through
//! [`encode_request`].
//!
//! Missing `attributes`, `relationships`, `meta` and `included` members are
//! treated as empty rather than rejected.

use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::jsonapi::case::{
    decode_value, encode_value, internal_key_to_wire, wire_key_to_internal,
};

/// Error returned when a payload violates the JSON:API envelope contract.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The top-level `data` member is neither an object nor an array.
    #[error("Expected `data` to be an object or an array, found {found}")]
    InvalidData {
        /// The JSON type that was found instead.
        found: &'static str,
    },

    /// A single resource was expected but the payload held a collection.
    #[error("Expected a single resource but received a collection of {count}")]
    ExpectedSingle {
        /// Number of resources in the collection.
        count: usize,
    },

    /// A resource object could not be read (e.g. missing `id` or `type`).
    #[error("Malformed JSON:API payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A typed reference to another resource. Never dereferenced by the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkRef {
    /// The referenced resource ID.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// The referenced resource type.
    #[serde(rename = "type")]
    pub resource_type: String,
}

impl LinkRef {
    /// Creates a new reference.
    #[must_use]
    pub fn new(id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
        }
    }
}

/// A resource object exactly as it appears on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct WireResource {
    /// Resource ID.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Resource type.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Attributes keyed by wire names.
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Map<String, Value>,
    /// Relationships keyed by wire names.
    #[serde(default, deserialize_with = "null_as_default")]
    pub relationships: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct WireRelationship {
    #[serde(default)]
    data: Option<RelationshipData>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelationshipData {
    Many(Vec<LinkRef>),
    One(LinkRef),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct WireMeta {
    current_page: Option<u32>,
    next_page: Option<u32>,
    prev_page: Option<u32>,
    total_pages: Option<u32>,
    total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct WireDocument {
    #[serde(default)]
    data: Value,
    #[serde(default)]
    meta: Option<WireMeta>,
    #[serde(default, deserialize_with = "null_as_default")]
    included: Vec<WireResource>,
}

/// Pagination metadata attached to collection responses.
///
/// `next_page == None` is the only signal that a collection is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// The page that was returned.
    pub current_page: u32,
    /// The next page number, if any.
    pub next_page: Option<u32>,
    /// The previous page number, if any.
    pub prev_page: Option<u32>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of records across all pages.
    pub total_count: u64,
}

impl Default for PaginationMeta {
    fn default() -> Self {
        Self {
            current_page: 1,
            next_page: None,
            prev_page: None,
            total_pages: 1,
            total_count: 0,
        }
    }
}

impl PaginationMeta {
    /// Returns `true` if the service reported a following page.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }

    fn from_wire(meta: WireMeta) -> Self {
        let defaults = Self::default();
        Self {
            current_page: meta.current_page.unwrap_or(defaults.current_page),
            next_page: meta.next_page,
            prev_page: meta.prev_page,
            total_pages: meta.total_pages.unwrap_or(defaults.total_pages),
            total_count: meta.total_count.unwrap_or(defaults.total_count),
        }
    }
}

/// A decoded, flattened resource.
///
/// Serializes as a flat object: `id`, `type`, every attribute at the top
/// level, and `relationships` when present.
///
/// # Example
///
/// ```rust
/// use jsonapi_client::jsonapi::{decode_response, Data};
/// use serde_json::json;
///
/// let document = decode_response(json!({
///     "data": {"id": "1", "type": "companies", "attributes": {"created-at": "2024-01-15"}}
/// }))
/// .unwrap();
///
/// let Data::One(company) = document.data else { panic!("expected one resource") };
/// assert_eq!(company.get("createdAt"), Some(&json!("2024-01-15")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Resource ID.
    pub id: String,
    /// Resource type.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Relationship name to ordered references.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Vec<LinkRef>>,
    /// Decoded attributes keyed by internal names.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Resource {
    /// Returns an attribute by its internal name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Returns the references of a relationship, or an empty slice.
    #[must_use]
    pub fn relationship(&self, name: &str) -> &[LinkRef] {
        self.relationships
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Converts the flat resource into a caller-defined type.
    ///
    /// Fields map by internal (camelCase) name, so the target usually
    /// carries `#[serde(rename_all = "camelCase")]`.
    ///
    /// # Errors
    ///
    /// Returns a serde error if the resource does not fit `T`.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(self)?)
    }
}

/// Primary data of a decoded document.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    /// A single resource object.
    One(Resource),
    /// A resource collection.
    Many(Vec<Resource>),
}

/// A decoded top-level document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<D> {
    /// Primary data.
    pub data: D,
    /// Pagination metadata, when the service sent any.
    pub meta: Option<PaginationMeta>,
    /// Side-loaded resources.
    pub included: Vec<Resource>,
}

impl Document<Data> {
    /// Narrows the document to a single resource.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ExpectedSingle`] if the data is a collection.
    pub fn into_single(self) -> Result<Document<Resource>, DecodeError> {
        match self.data {
            Data::One(resource) => Ok(Document {
                data: resource,
                meta: self.meta,
                included: self.included,
            }),
            Data::Many(items) => Err(DecodeError::ExpectedSingle { count: items.len() }),
        }
    }

    /// Converts the document into a page, defaulting missing metadata.
    ///
    /// A single resource is treated as a one-element collection.
    #[must_use]
    pub fn into_page(self) -> Page<Resource> {
        let data = match self.data {
            Data::One(resource) => vec![resource],
            Data::Many(items) => items,
        };
        Page {
            data,
            meta: self.meta.unwrap_or_default(),
            included: self.included,
        }
    }
}

/// One page of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// Pagination metadata (defaulted if the service omitted it).
    pub meta: PaginationMeta,
    /// Side-loaded resources.
    pub included: Vec<Resource>,
}

impl<T> Page<T> {
    /// Creates a page without side-loaded resources.
    #[must_use]
    pub const fn new(data: Vec<T>, meta: PaginationMeta) -> Self {
        Self {
            data,
            meta,
            included: Vec::new(),
        }
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Flattens a wire resource into a [`Resource`].
#[must_use]
pub fn decode_resource(wire: WireResource) -> Resource {
    let attributes = wire
        .attributes
        .into_iter()
        .map(|(key, value)| (wire_key_to_internal(&key), decode_value(value)))
        .collect();

    let relationships = wire
        .relationships
        .into_iter()
        .map(|(name, value)| {
            let refs = match serde_json::from_value::<WireRelationship>(value)
                .unwrap_or_default()
                .data
            {
                Some(RelationshipData::Many(refs)) => refs,
                Some(RelationshipData::One(link)) => vec![link],
                None => Vec::new(),
            };
            (wire_key_to_internal(&name), refs)
        })
        .collect();

    Resource {
        id: wire.id,
        resource_type: wire.resource_type,
        relationships,
        attributes,
    }
}

/// Decodes a full response envelope.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidData`] if `data` is neither an object nor an
/// array, and [`DecodeError::Malformed`] if a resource object is unusable.
pub fn decode_response(envelope: Value) -> Result<Document<Data>, DecodeError> {
    let WireDocument {
        data,
        meta,
        included,
    } = serde_json::from_value(envelope)?;

    let data = match data {
        Value::Array(items) => Data::Many(
            items
                .into_iter()
                .map(|item| Ok(decode_resource(serde_json::from_value(item)?)))
                .collect::<Result<_, DecodeError>>()?,
        ),
        item @ Value::Object(_) => Data::One(decode_resource(serde_json::from_value(item)?)),
        other => {
            return Err(DecodeError::InvalidData {
                found: json_type_name(&other),
            })
        }
    };

    Ok(Document {
        data,
        meta: meta.map(PaginationMeta::from_wire),
        included: included.into_iter().map(decode_resource).collect(),
    })
}

/// Converts internal data into wire attributes.
///
/// `id` and `type` keys are dropped; every other key is converted to wire
/// naming, recursively.
#[must_use]
pub fn encode_attributes(data: &Map<String, Value>) -> Map<String, Value> {
    data.iter()
        .filter(|(key, _)| key.as_str() != "id" && key.as_str() != "type")
        .map(|(key, value)| (internal_key_to_wire(key), encode_value(value.clone())))
        .collect()
}

/// Builds a write envelope.
///
/// The `id` member is only emitted when one is supplied, which is what
/// distinguishes an update payload from a create payload.
///
/// # Example
///
/// ```rust
/// use jsonapi_client::jsonapi::encode_request;
/// use serde_json::json;
///
/// let data = json!({"firstName": "Ada", "id": "ignored"});
/// let body = encode_request("people", data.as_object().unwrap(), None);
///
/// assert_eq!(body, json!({"data": {"type": "people", "attributes": {"first-name": "Ada"}}}));
/// ```
#[must_use]
pub fn encode_request(resource_type: &str, data: &Map<String, Value>, id: Option<&str>) -> Value {
    let mut resource = Map::new();
    if let Some(id) = id {
        resource.insert("id".to_string(), Value::String(id.to_string()));
    }
    resource.insert(
        "type".to_string(),
        Value::String(resource_type.to_string()),
    );
    resource.insert(
        "attributes".to_string(),
        Value::Object(encode_attributes(data)),
    );

    let mut envelope = Map::new();
    envelope.insert("data".to_string(), Value::Object(resource));
    Value::Object(envelope)
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or numeric id, found {}",
            json_type_name(&other)
        ))),
    }
}
