//! Structured error context (`ctx`).
//!
//! Each variant is one context shape. Serialization is untagged, so a
//! variant becomes a flat JSON object whose keys are the field names.

use serde::Serialize;
use serde_json::Value;

/// The `ctx` of a [`ValidationError`](super::ValidationError).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorContext {
    /// `minLength`, or `minItems` on arrays.
    MinLength {
        min_length: usize,
        actual_length: usize,
    },
    /// `maxLength`, or `maxItems` on arrays.
    MaxLength {
        max_length: usize,
        actual_length: usize,
    },
    Pattern {
        pattern: String,
        value: String,
    },
    /// A string failed a structural format (email, hostname, ...).
    Format {
        format: &'static str,
        value: String,
    },
    GreaterThan {
        gt: Value,
        value: Value,
    },
    GreaterThanEqual {
        ge: Value,
        value: Value,
    },
    LessThan {
        lt: Value,
        value: Value,
    },
    LessThanEqual {
        le: Value,
        value: Value,
    },
    MultipleOf {
        multiple_of: Value,
        value: Value,
    },
    /// `enum`: the allowed values rendered as `'a', 'b' or 'c'`.
    Expected {
        expected: String,
    },
    TypeMismatch {
        expected_type: &'static str,
        actual_type: &'static str,
    },
    /// Parse failure with the parser's reason.
    Parse {
        error: String,
    },
    UniqueItems {
        duplicate_index: usize,
        first_index: usize,
    },
    AdditionalProperties {
        additional_properties: bool,
        unexpected_field: String,
    },
    MinProperties {
        min_properties: usize,
        actual_properties: usize,
    },
    MaxProperties {
        max_properties: usize,
        actual_properties: usize,
    },
    MatchedSchemas {
        matched_schemas: usize,
    },
    Prohibited {
        prohibited_value: Value,
    },
    Const {
        #[serde(rename = "const")]
        expected: Value,
        value: Value,
    },
    Dependency {
        dependency: String,
        required_fields: Vec<String>,
    },
    ContentType {
        allowed_types: Vec<String>,
        provided_type: String,
    },
    MaxSize {
        max_size: u64,
        file_size: u64,
    },
    MinSize {
        min_size: u64,
        file_size: u64,
    },
    EmptyFile {
        filename: Option<String>,
        file_size: u64,
    },
    MagicMismatch {
        declared_mime: String,
        detected_type: String,
        magic_bytes: String,
    },
}

impl ErrorContext {
    /// The context as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Looks up one context key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        match self.to_json() {
            Value::Object(mut map) => map.remove(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_flat() {
        let ctx = ErrorContext::MultipleOf {
            multiple_of: json!(5),
            value: json!(17),
        };
        assert_eq!(ctx.to_json(), json!({"multiple_of": 5, "value": 17}));
    }

    #[test]
    fn const_key_is_renamed() {
        let ctx = ErrorContext::Const {
            expected: json!("1.0"),
            value: json!("2.0"),
        };
        assert_eq!(ctx.get("const"), Some(json!("1.0")));
        assert_eq!(ctx.get("expected"), None);
    }

    #[test]
    fn optional_fields_serialize_as_null() {
        let ctx = ErrorContext::EmptyFile {
            filename: None,
            file_size: 0,
        };
        assert_eq!(ctx.to_json(), json!({"filename": null, "file_size": 0}));
    }
}
