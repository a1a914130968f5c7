//! Key case conversion between the wire and internal naming conventions.
//!
//! The remote service uses hyphen-delimited lowercase keys
//! (`organization-type-name`), while the library exposes camelCase keys
//! (`organizationTypeName`).
//!
//! # Supported Key Convention
//!
//! Internal keys must use one capital per word. The service's
//! `some-url-value` decodes to `someUrlValue`, and only that spelling encodes
//! back to the service's key: an acronym run such as `someURLValue` encodes
//! to `some-u-r-l-value`, which the service does not know.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_client::jsonapi::{internal_key_to_wire, wire_key_to_internal};
//!
//! assert_eq!(wire_key_to_internal("organization-type-name"), "organizationTypeName");
//! assert_eq!(internal_key_to_wire("organizationTypeName"), "organization-type-name");
//! ```

use serde_json::{Map, Value};

/// Converts a wire key (`created-at`) to an internal key (`createdAt`).
///
/// A hyphen followed by an ASCII lowercase letter is removed and the letter
/// upper-cased. Any other hyphen is kept as-is.
#[must_use]
pub fn wire_key_to_internal(key: &str) -> String {
    let mut result = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '-' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_lowercase() {
                    result.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        result.push(c);
    }

    result
}

/// Converts an internal key (`createdAt`) to a wire key (`created-at`).
///
/// Inserts a hyphen before every ASCII uppercase letter that is not the first
/// character, then lowercases the whole key.
#[must_use]
pub fn internal_key_to_wire(key: &str) -> String {
    let mut result = String::with_capacity(key.len() + 4);

    for (i, c) in key.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                result.push('-');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

/// Recursively converts every map key in a wire value to internal naming.
#[must_use]
pub fn decode_value(value: Value) -> Value {
    transform_keys(value, wire_key_to_internal)
}

/// Recursively converts every map key in an internal value to wire naming.
#[must_use]
pub fn encode_value(value: Value) -> Value {
    transform_keys(value, internal_key_to_wire)
}

fn transform_keys(value: Value, convert: fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(transform_map(map, convert)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| transform_keys(item, convert))
                .collect(),
        ),
        scalar => scalar,
    }
}

pub(crate) fn transform_map(
    map: Map<String, Value>,
    convert: fn(&str) -> String,
) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| (convert(&key), transform_keys(value, convert)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_key_to_internal_converts_hyphenated_keys() {
        assert_eq!(
            wire_key_to_internal("organization-type-name"),
            "organizationTypeName"
        );
        assert_eq!(wire_key_to_internal("created-at"), "createdAt");
        assert_eq!(wire_key_to_internal("name"), "name");
    }

    #[test]
    fn test_wire_key_to_internal_empty_string() {
        assert_eq!(wire_key_to_internal(""), "");
    }

    #[test]
    fn test_wire_key_to_internal_keeps_hyphens_without_letter() {
        assert_eq!(wire_key_to_internal("item-2"), "item-2");
        assert_eq!(wire_key_to_internal("trailing-"), "trailing-");
        assert_eq!(wire_key_to_internal("-leading"), "Leading");
    }

    #[test]
    fn test_internal_key_to_wire_converts_camel_case() {
        assert_eq!(
            internal_key_to_wire("organizationTypeName"),
            "organization-type-name"
        );
        assert_eq!(internal_key_to_wire("createdAt"), "created-at");
        assert_eq!(internal_key_to_wire("id"), "id");
        assert_eq!(internal_key_to_wire(""), "");
    }

    #[test]
    fn test_internal_key_to_wire_leading_capital_has_no_hyphen() {
        assert_eq!(internal_key_to_wire("Name"), "name");
    }

    #[test]
    fn test_acronym_runs_do_not_match_service_keys() {
        assert_eq!(wire_key_to_internal("some-url-value"), "someUrlValue");
        assert_eq!(internal_key_to_wire("someUrlValue"), "some-url-value");
        assert_eq!(internal_key_to_wire("someURLValue"), "some-u-r-l-value");
        assert_ne!(internal_key_to_wire("someURLValue"), "some-url-value");
    }

    #[test]
    fn test_round_trip_for_camel_case_keys() {
        for key in [
            "organizationTypeName",
            "createdAt",
            "id",
            "budgetTotalAmount",
            "x",
        ] {
            assert_eq!(wire_key_to_internal(&internal_key_to_wire(key)), key);
        }
    }

    #[test]
    fn test_decode_value_recurses_into_maps_and_lists() {
        let wire = json!({
            "first-name": "Ada",
            "custom-fields": {"field-one": 1, "nested-list": [{"inner-key": true}]},
            "tags": ["keep-me", "as-is"],
            "deleted-at": null
        });

        let decoded = decode_value(wire);

        assert_eq!(
            decoded,
            json!({
                "firstName": "Ada",
                "customFields": {"fieldOne": 1, "nestedList": [{"innerKey": true}]},
                "tags": ["keep-me", "as-is"],
                "deletedAt": null
            })
        );
    }

    #[test]
    fn test_encode_value_mirrors_decode() {
        let internal = json!({"customFields": {"fieldOne": [1, 2]}, "note": "Hi There"});

        assert_eq!(
            encode_value(internal),
            json!({"custom-fields": {"field-one": [1, 2]}, "note": "Hi There"})
        );
    }

    #[test]
    fn test_scalars_pass_through() {
        assert_eq!(decode_value(json!(42)), json!(42));
        assert_eq!(decode_value(Value::Null), Value::Null);
        assert_eq!(encode_value(json!("created-at")), json!("created-at"));
    }
}
