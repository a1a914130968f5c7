//! Query string construction for JSON:API list and find requests.
//!
//! The service expects bracket-nested keys in wire naming:
//!
//! - `filter[<field>]=<value>`
//! - `filter[<field>][gt|gte|lt|lte]=<value>`
//! - `page[number]=<n>` and `page[size]=<n>`
//! - array values joined with commas
//!
//! Callers describe requests with internal (camelCase) names; conversion to
//! wire naming happens once, when the parameter tree is serialized.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_client::jsonapi::ListParams;
//! use jsonapi_client::pagination::PageRequest;
//! use serde_json::json;
//!
//! let query = ListParams::new()
//!     .filter("projectId", json!(["1", "2"]))
//!     .filter_op("createdAt", "gte", json!("2024-01-01"))
//!     .page(PageRequest::new(2, 25))
//!     .sort("-created-at")
//!     .to_query();
//!
//! assert!(query.contains(&("filter[project-id]".to_string(), "1,2".to_string())));
//! assert!(query.contains(&("filter[created-at][gte]".to_string(), "2024-01-01".to_string())));
//! assert!(query.contains(&("page[number]".to_string(), "2".to_string())));
//! assert!(query.contains(&("sort".to_string(), "-created-at".to_string())));
//! ```

use serde_json::{Map, Value};

use crate::jsonapi::case::internal_key_to_wire;
use crate::pagination::PageRequest;

/// Comparison operators understood by the filter syntax.
pub const FILTER_OPERATORS: [&str; 4] = ["gt", "gte", "lt", "lte"];

/// Expands comparison-operator objects into bracketed filter keys.
///
/// `{"createdAt": {"gt": "2024-01-01"}}` becomes
/// `{"createdAt[gt]": "2024-01-01"}`. Non-operator values pass through.
/// Field names are left in internal naming.
#[must_use]
pub fn build_filter_params(filter: Option<&Map<String, Value>>) -> Map<String, Value> {
    let mut result = Map::new();
    let Some(filter) = filter else {
        return result;
    };

    for (field, value) in filter {
        match value {
            Value::Object(ops) if FILTER_OPERATORS.iter().any(|op| ops.contains_key(*op)) => {
                for op in FILTER_OPERATORS {
                    if let Some(operand) = ops.get(op) {
                        result.insert(format!("{field}[{op}]"), operand.clone());
                    }
                }
            }
            _ => {
                result.insert(field.clone(), value.clone());
            }
        }
    }

    result
}

/// Serializes a parameter tree into ordered query pairs.
///
/// Nested maps produce `prefix[key]` names, lists are comma-joined, scalars
/// are stringified and `null` entries are skipped at every level. Every key
/// segment is converted to wire naming.
#[must_use]
pub fn build_query_params(params: &Map<String, Value>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in params {
        append_pairs(&mut pairs, internal_key_to_wire(key), value);
    }
    pairs
}

fn append_pairs(pairs: &mut Vec<(String, String)>, name: String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, nested) in map {
                append_pairs(pairs, nested_key(&name, key), nested);
            }
        }
        Value::Array(items) => {
            let joined = items
                .iter()
                .filter(|item| !item.is_null())
                .map(scalar_to_string)
                .collect::<Vec<_>>()
                .join(",");
            pairs.push((name, joined));
        }
        scalar => pairs.push((name, scalar_to_string(scalar))),
    }
}

/// `filter` + `createdAt[gt]` becomes `filter[created-at][gt]`.
fn nested_key(prefix: &str, key: &str) -> String {
    match key.split_once('[') {
        Some((field, suffix)) => format!("{prefix}[{}][{suffix}", internal_key_to_wire(field)),
        None => format!("{prefix}[{}]", internal_key_to_wire(key)),
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Structured description of a list or find request.
///
/// Builds the parameter tree `{filter, page, sort, include, ...}` and
/// serializes it with [`build_query_params`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    filter: Map<String, Value>,
    page: Option<PageRequest>,
    sort: Option<String>,
    include: Vec<String>,
    extra: Map<String, Value>,
}

impl ListParams {
    /// Creates empty parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality filter. Arrays are sent comma-joined.
    #[must_use]
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.insert(field.into(), value.into());
        self
    }

    /// Adds a comparison filter (`gt`, `gte`, `lt` or `lte`).
    ///
    /// Repeated calls for the same field accumulate operators.
    #[must_use]
    pub fn filter_op(
        mut self,
        field: impl Into<String>,
        op: &str,
        value: impl Into<Value>,
    ) -> Self {
        let entry = self
            .filter
            .entry(field.into())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(ops) = entry {
            ops.insert(op.to_string(), value.into());
        }
        self
    }

    /// Sets the page descriptor.
    #[must_use]
    pub const fn page(mut self, page: PageRequest) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the sort expression.
    ///
    /// The value is sent as-is, so it must already use wire naming
    /// (`-created-at`, not `-createdAt`).
    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Adds a relationship path to side-load.
    ///
    /// Like [`sort`](Self::sort), the path is sent as-is in wire naming
    /// (`primary-contact`).
    #[must_use]
    pub fn include(mut self, relationship: impl Into<String>) -> Self {
        self.include.push(relationship.into());
        self
    }

    /// Adds an arbitrary top-level parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Returns the page descriptor, if set.
    #[must_use]
    pub const fn page_request(&self) -> Option<PageRequest> {
        self.page
    }

    /// Builds the parameter tree before wire serialization.
    #[must_use]
    pub fn to_tree(&self) -> Map<String, Value> {
        let mut tree = self.extra.clone();

        let filter = build_filter_params(Some(&self.filter));
        if !filter.is_empty() {
            tree.insert("filter".to_string(), Value::Object(filter));
        }
        if let Some(page) = self.page {
            let mut page_map = Map::new();
            page_map.insert("number".to_string(), Value::from(page.number));
            page_map.insert("size".to_string(), Value::from(page.size));
            tree.insert("page".to_string(), Value::Object(page_map));
        }
        if let Some(sort) = &self.sort {
            tree.insert("sort".to_string(), Value::String(sort.clone()));
        }
        if !self.include.is_empty() {
            let include = self.include.iter().cloned().map(Value::String).collect();
            tree.insert("include".to_string(), Value::Array(include));
        }

        tree
    }

    /// Serializes to ordered query pairs.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        build_query_params(&self.to_tree())
    }
}
