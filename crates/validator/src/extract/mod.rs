//! Pulls raw values out of a [`RawView`] for each declared field.
//!
//! Extraction never fails per field: a value is [`Extracted::Found`],
//! [`Extracted::Missing`], or replaced by the declared default. The only
//! failure is a JSON body that does not parse, reported once as
//! [`MalformedBody`] before any field is looked at.

mod query;
mod tree;

use std::borrow::Cow;
use std::cell::OnceCell;

use gatehouse_schema::{FieldSpec, SchemaModel, Separator, Source};
use serde_json::{Map, Value};

use crate::raw::{Part, RawBody, RawView};
use crate::report::MalformedBody;

use query::FormPairs;

/// Result of looking up one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted<'a> {
    Found(Cow<'a, Value>),
    Missing,
    /// Absent, and the field declares this default.
    UsesDefault(&'a Value),
}

/// Per-request extractor over one [`RawView`].
#[derive(Debug)]
pub struct ValueExtractor<'r> {
    raw: &'r RawView,
    query: FormPairs,
    query_tree: OnceCell<Map<String, Value>>,
    body: Option<Value>,
    body_is_json: bool,
}

impl<'r> ValueExtractor<'r> {
    /// Prepares extraction. The body is parsed only when the model declares
    /// one.
    pub fn new(model: &SchemaModel, raw: &'r RawView) -> Result<Self, MalformedBody> {
        let (body, body_is_json) = if model.body().is_some() {
            let declared_files: Vec<&str> = model.files().map(|f| f.name.as_str()).collect();
            parse_body(raw.body(), &declared_files)?
        } else {
            (None, false)
        };
        Ok(Self {
            raw,
            query: FormPairs::parse(raw.query().as_bytes()),
            query_tree: OnceCell::new(),
            body,
            body_is_json,
        })
    }

    /// Looks up the raw value of a declared field.
    #[must_use]
    pub fn extract<'a>(&'a self, field: &'a FieldSpec) -> Extracted<'a> {
        let found = match field.source {
            Source::Path => self
                .raw
                .path_param(&field.name)
                .map(|value| decode_path_capture(value, field.path_remainder))
                .map(|value| Cow::Owned(Value::String(value))),
            Source::Query => self.query_value(field),
            Source::Header => self.header_value(field),
            Source::Cookie => self
                .raw
                .cookie(&field.name)
                .map(|value| Cow::Owned(Value::String(value.to_owned()))),
            Source::Body => self.body.as_ref().map(Cow::Borrowed),
            Source::Files => None,
        };
        match (found, &field.default) {
            (Some(value), _) => Extracted::Found(value),
            (None, Some(default)) => Extracted::UsesDefault(default),
            (None, None) => Extracted::Missing,
        }
    }

    /// The multipart part for a file field.
    #[must_use]
    pub fn part(&self, name: &str) -> Option<&'r Part> {
        self.raw.part(name)
    }

    /// Whether the body was JSON, and so is already typed.
    #[must_use]
    pub fn body_is_json(&self) -> bool {
        self.body_is_json
    }

    fn query_value(&self, field: &FieldSpec) -> Option<Cow<'_, Value>> {
        let node = field.schema()?;
        if node.is_object() {
            let tree = self.query_tree.get_or_init(|| self.query.tree());
            return tree.get(&field.name).map(Cow::Borrowed);
        }
        if node.is_array() {
            let values: Vec<&str> = self.query.values(&field.name).collect();
            return split_values(&values, field.separator).map(Cow::Owned);
        }
        self.query
            .first(&field.name)
            .map(|value| Cow::Owned(Value::String(value.to_owned())))
    }

    fn header_value(&self, field: &FieldSpec) -> Option<Cow<'_, Value>> {
        let dashed = field.name.replace('_', "-");
        let mut values = self
            .raw
            .headers()
            .iter()
            .filter(|(name, _)| {
                name.eq_ignore_ascii_case(&field.name) || name.eq_ignore_ascii_case(&dashed)
            })
            .map(|(_, value)| value.as_str());
        if field.schema().is_some_and(|node| node.is_array()) {
            let values: Vec<&str> = values.collect();
            split_values(&values, field.separator).map(Cow::Owned)
        } else {
            values
                .next()
                .map(|value| Cow::Owned(Value::String(value.to_owned())))
        }
    }
}

fn parse_body(
    body: &RawBody,
    declared_files: &[&str],
) -> Result<(Option<Value>, bool), MalformedBody> {
    Ok(match body {
        RawBody::None => (None, false),
        RawBody::Json(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => (None, true),
        RawBody::Json(bytes) => {
            let value = serde_json::from_slice(bytes).map_err(|e| MalformedBody::new(e.to_string()))?;
            (Some(value), true)
        }
        RawBody::Form(bytes) if bytes.is_empty() => (None, false),
        RawBody::Form(bytes) => (Some(Value::Object(FormPairs::parse(bytes).tree())), false),
        RawBody::Multipart(parts) => {
            let fields = parts
                .iter()
                .filter(|part| !part.is_file() && !declared_files.contains(&part.name.as_str()))
                .map(|part| (part.name.as_str(), Value::String(part.text_value())));
            (Some(Value::Object(tree::build(fields))), false)
        }
    })
}

/// One array value from repeated occurrences, each split by the separator
/// when one is declared.
fn split_values(values: &[&str], separator: Option<Separator>) -> Option<Value> {
    if values.is_empty() {
        return None;
    }
    let items = match separator {
        Some(separator) => values
            .iter()
            .flat_map(|value| separator.split(value))
            .map(|item| Value::String(item.to_owned()))
            .collect(),
        None => values
            .iter()
            .map(|value| Value::String((*value).to_owned()))
            .collect(),
    };
    Some(Value::Array(items))
}

/// A remainder capture spans segments and decodes fully. A single segment
/// keeps an encoded `/` as `%2F` so it cannot pass for a separator.
fn decode_path_capture(value: &str, remainder: bool) -> String {
    if remainder {
        return percent_decode(value);
    }
    let mut decoded = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(at) = encoded_slash(rest) {
        decoded.push_str(&percent_decode(&rest[..at]));
        decoded.push_str(&rest[at..at + 3]);
        rest = &rest[at + 3..];
    }
    decoded.push_str(&percent_decode(rest));
    decoded
}

fn encoded_slash(value: &str) -> Option<usize> {
    value
        .as_bytes()
        .windows(3)
        .position(|w| w[0] == b'%' && w[1] == b'2' && w[2].eq_ignore_ascii_case(&b'f'))
}

fn percent_decode(value: &str) -> String {
    urlencoding::decode(value).map_or_else(
        |_| String::from_utf8_lossy(&urlencoding::decode_binary(value.as_bytes())).into_owned(),
        Cow::into_owned,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_schema::compile;
    use serde_json::json;

    fn model(declaration: Value) -> SchemaModel {
        compile(&declaration).unwrap()
    }

    fn found(extracted: Extracted<'_>) -> Value {
        match extracted {
            Extracted::Found(value) => value.into_owned(),
            other => panic!("expected a value, got {other:?}"),
        }
    }

    #[test]
    fn path_captures_are_decoded() {
        let model = model(json!({"parameters": {"properties": {
            "file_path": {"type": "string", "source": "path", "path_remainder": true}
        }}}));
        let raw = RawView::new().with_path_param("file_path", "docs/a%20b.txt");
        let extractor = ValueExtractor::new(&model, &raw).unwrap();
        let field = &model.fields()[0];
        assert_eq!(found(extractor.extract(field)), json!("docs/a b.txt"));
    }

    #[test]
    fn encoded_slash_depends_on_remainder() {
        let model = model(json!({"parameters": {"properties": {
            "rest": {"type": "string", "source": "path", "path_remainder": true},
            "name": {"type": "string", "source": "path"}
        }}}));
        let raw = RawView::new()
            .with_path_param("rest", "a%2Fb%20c")
            .with_path_param("name", "a%2fb%20c");
        let extractor = ValueExtractor::new(&model, &raw).unwrap();
        assert_eq!(found(extractor.extract(&model.fields()[0])), json!("a/b c"));
        assert_eq!(found(extractor.extract(&model.fields()[1])), json!("a%2fb c"));
    }

    #[test]
    fn segment_decoding_keeps_every_encoded_slash() {
        assert_eq!(decode_path_capture("%2F%C3%A9%2Fx", false), "%2Fé%2Fx");
        assert_eq!(decode_path_capture("plain", false), "plain");
        assert_eq!(decode_path_capture("%2F%C3%A9%2Fx", true), "/é/x");
    }

    #[test]
    fn query_arrays_from_repeats_brackets_and_separators() {
        let model = model(json!({"parameters": {"properties": {
            "a": {"type": "array", "items": {"type": "integer"}},
            "b": {"type": "array", "separator": "|"},
            "c": {"type": "string"}
        }}}));
        let raw = RawView::new().with_query("a=1&a[]=2&b=x|y&c=first&c=second");
        let extractor = ValueExtractor::new(&model, &raw).unwrap();
        let [a, b, c] = model.fields() else {
            panic!("three fields");
        };
        assert_eq!(found(extractor.extract(a)), json!(["1", "2"]));
        assert_eq!(found(extractor.extract(b)), json!(["x", "y"]));
        assert_eq!(found(extractor.extract(c)), json!("first"));
    }

    #[test]
    fn headers_match_case_insensitively_with_dashes() {
        let model = model(json!({"parameters": {"properties": {
            "x_token": {"type": "string", "source": "header"},
            "x_tag": {"type": "array", "source": "header"}
        }}}));
        let raw = RawView::new()
            .with_header("X-Token", "one")
            .with_header("x-token", "two")
            .with_header("X-Tag", "a")
            .with_header("X-TAG", "b");
        let extractor = ValueExtractor::new(&model, &raw).unwrap();
        assert_eq!(found(extractor.extract(&model.fields()[0])), json!("one"));
        assert_eq!(found(extractor.extract(&model.fields()[1])), json!(["a", "b"]));
    }

    #[test]
    fn defaults_and_missing() {
        let model = model(json!({"parameters": {"properties": {
            "limit": {"type": "integer", "default": 10},
            "q": {"type": "string"}
        }}}));
        let raw = RawView::new();
        let extractor = ValueExtractor::new(&model, &raw).unwrap();
        assert_eq!(extractor.extract(&model.fields()[0]), Extracted::UsesDefault(&json!(10)));
        assert_eq!(extractor.extract(&model.fields()[1]), Extracted::Missing);
    }

    #[test]
    fn malformed_json_is_rejected_once() {
        let with_body = model(json!({"body": {"type": "object"}}));
        let raw = RawView::new().with_json_body(&b"{\"a\": "[..]);
        assert!(ValueExtractor::new(&with_body, &raw).is_err());

        let no_body = model(json!({}));
        assert!(ValueExtractor::new(&no_body, &raw).is_ok());
    }

    #[test]
    fn multipart_text_parts_form_the_body() {
        let model = model(json!({
            "body": {"type": "object"},
            "files": {"avatar": {}}
        }));
        let raw = RawView::new()
            .with_part(Part::text("user[name]", "ann"))
            .with_part(Part::file("avatar", "a.png", "image/png", &b"\x89PNG"[..]))
            .with_part(Part::file("stray", "s.txt", "text/plain", &b"x"[..]));
        let extractor = ValueExtractor::new(&model, &raw).unwrap();
        let body = model.body().unwrap();
        assert_eq!(found(extractor.extract(body)), json!({"user": {"name": "ann"}}));
        assert!(extractor.part("avatar").is_some());
        assert!(!extractor.body_is_json());
    }
}
