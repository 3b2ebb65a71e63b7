//! Coerced output: [`TypedValue`], [`UploadedFile`] and the per-request
//! [`TypedParams`].

use std::net::{Ipv4Addr, Ipv6Addr};

use bytes::Bytes;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use gatehouse_schema::Source;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use url::Url;
use uuid::Uuid;

use crate::coerce::IsoDuration;

// ============================================================================
// TYPED VALUE
// ============================================================================

/// A value after coercion to its declared type and format.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Decimal(Decimal),
    String(String),
    Uuid(Uuid),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    Time(NaiveTime),
    Duration(IsoDuration),
    Email(String),
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    Uri(Url),
    Hostname(String),
    Binary(Bytes),
    Array(Vec<TypedValue>),
    Object(IndexMap<String, TypedValue>),
    File(UploadedFile),
    /// Accepted under a schema that declares no type.
    Json(Value),
}

impl TypedValue {
    /// Structural conversion of an arbitrary JSON value.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Number))
                .unwrap_or(Self::Null),
            Value::String(s) => Self::String(s.clone()),
            Value::Array(items) => Self::Array(items.iter().map(Self::from_json).collect()),
            Value::Object(map) => Self::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), Self::from_json(value)))
                    .collect(),
            ),
        }
    }

    /// The value as JSON for handler dispatch. Formatted strings render in
    /// their canonical text form.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Integer(i) => Value::from(*i),
            Self::Number(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Decimal(d) => Value::String(d.to_string()),
            Self::String(s) | Self::Email(s) | Self::Hostname(s) => Value::String(s.clone()),
            Self::Uuid(u) => Value::String(u.hyphenated().to_string()),
            Self::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            Self::DateTime(dt) => Value::String(dt.to_rfc3339()),
            Self::Time(t) => Value::String(t.format("%H:%M:%S%.f").to_string()),
            Self::Duration(d) => Value::String(d.to_string()),
            Self::Ipv4(ip) => Value::String(ip.to_string()),
            Self::Ipv6(ip) => Value::String(ip.to_string()),
            Self::Uri(url) => Value::String(url.as_str().to_owned()),
            Self::Binary(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
            Self::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(map) => Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect::<Map<_, _>>(),
            ),
            Self::File(file) => file.to_json(),
            Self::Json(value) => value.clone(),
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Number(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The text of string-like values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Email(s) | Self::Hostname(s) => Some(s),
            Self::Uri(url) => Some(url.as_str()),
            Self::Json(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[TypedValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a key of an object value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TypedValue> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }
}

// ============================================================================
// UPLOADED FILE
// ============================================================================

/// A multipart file part that passed its file checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
    /// Size as reported by the part, which may exceed `data.len()` when
    /// buffering stopped at the limit.
    pub size: u64,
    /// Type inferred from magic numbers, when a known signature matched.
    pub detected_type: Option<&'static str>,
}

impl UploadedFile {
    /// File metadata as JSON. Content bytes are not inlined.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "filename": self.filename,
            "content_type": self.content_type,
            "size": self.size,
        })
    }
}

// ============================================================================
// TYPED PARAMS
// ============================================================================

/// The fully typed result of a successful validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedParams {
    params: Vec<(Source, String, TypedValue)>,
    body: Option<TypedValue>,
    files: IndexMap<String, UploadedFile>,
}

impl TypedParams {
    pub(crate) fn insert_param(&mut self, source: Source, name: &str, value: TypedValue) {
        self.params.push((source, name.to_owned(), value));
    }

    pub(crate) fn set_body(&mut self, body: TypedValue) {
        self.body = Some(body);
    }

    pub(crate) fn insert_file(&mut self, name: &str, file: UploadedFile) {
        self.files.insert(name.to_owned(), file);
    }

    /// First parameter with this name, searching sources in declaration
    /// order.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.params
            .iter()
            .find(|(_, n, _)| n == name)
            .map(|(_, _, value)| value)
    }

    /// The parameter with this name from one source.
    #[must_use]
    pub fn get_from(&self, source: Source, name: &str) -> Option<&TypedValue> {
        self.params
            .iter()
            .find(|(s, n, _)| *s == source && n == name)
            .map(|(_, _, value)| value)
    }

    /// Parameters in declaration order.
    pub fn params(&self) -> impl Iterator<Item = (Source, &str, &TypedValue)> {
        self.params
            .iter()
            .map(|(source, name, value)| (*source, name.as_str(), value))
    }

    #[must_use]
    pub fn body(&self) -> Option<&TypedValue> {
        self.body.as_ref()
    }

    #[must_use]
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    pub fn files(&self) -> impl Iterator<Item = (&str, &UploadedFile)> {
        self.files.iter().map(|(name, file)| (name.as_str(), file))
    }

    /// Flat JSON object for handler dispatch: parameters by name, then
    /// `body`, then file metadata by field name.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        for (_, name, value) in &self.params {
            out.entry(name.clone()).or_insert_with(|| value.to_json());
        }
        if let Some(body) = &self.body {
            out.insert("body".to_owned(), body.to_json());
        }
        for (name, file) in &self.files {
            out.insert(name.clone(), file.to_json());
        }
        Value::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formatted_values_render_canonically() {
        let id = Uuid::parse_str("A0EEBC99-9C0B-4EF8-BB6D-6BB9BD380A11").unwrap();
        assert_eq!(
            TypedValue::Uuid(id).to_json(),
            json!("a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11")
        );
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(TypedValue::Date(date).to_json(), json!("2024-02-29"));
        assert_eq!(
            TypedValue::Decimal(Decimal::new(1999, 2)).to_json(),
            json!("19.99")
        );
    }

    #[test]
    fn from_json_keeps_integers() {
        assert_eq!(TypedValue::from_json(&json!(3)), TypedValue::Integer(3));
        assert_eq!(TypedValue::from_json(&json!(3.5)), TypedValue::Number(3.5));
        let object = TypedValue::from_json(&json!({"a": [true]}));
        assert_eq!(
            object.get("a").and_then(TypedValue::as_array),
            Some(&[TypedValue::Bool(true)][..])
        );
    }

    #[test]
    fn params_flatten_for_dispatch() {
        let mut params = TypedParams::default();
        params.insert_param(Source::Path, "item_id", TypedValue::Integer(7));
        params.insert_param(Source::Query, "q", TypedValue::String("x".into()));
        params.set_body(TypedValue::from_json(&json!({"name": "n"})));
        assert_eq!(
            params.to_json(),
            json!({"item_id": 7, "q": "x", "body": {"name": "n"}})
        );
        assert_eq!(params.get_from(Source::Path, "item_id"), Some(&TypedValue::Integer(7)));
        assert_eq!(params.get_from(Source::Query, "item_id"), None);
    }
}
