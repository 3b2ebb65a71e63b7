//! Extraction from each request source, as seen through the engine.

use gatehouse_validator::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn schema(declaration: Value) -> SchemaModel {
    compile(&declaration).unwrap()
}

#[test]
fn headers_cookies_and_path_remainder() {
    let schema = schema(json!({"parameters": {"properties": {
        "file_path": {"type": "string", "source": "path", "path_remainder": true},
        "user_agent": {"type": "string", "source": "header"},
        "session": {"type": "string", "source": "cookie", "minLength": 4}
    }}}));
    let raw = RawView::new()
        .with_path_param("file_path", "reports/2024/q1%20final.pdf")
        .with_header("User-Agent", "curl/8.0")
        .with_header("Cookie", "theme=dark; session=abcd1234");
    let params = validate(&schema, &raw).unwrap();
    assert_eq!(
        params.to_json(),
        json!({
            "file_path": "reports/2024/q1 final.pdf",
            "user_agent": "curl/8.0",
            "session": "abcd1234"
        })
    );
}

#[test]
fn query_arrays_coerce_each_element() {
    let schema = schema(json!({"parameters": {"properties": {
        "ids": {"type": "array", "items": {"type": "integer"}, "separator": ","},
        "tags": {"type": "array", "items": {"type": "string"}, "uniqueItems": true}
    }}}));
    let raw = RawView::new().with_query("ids=1,2&ids=x&tags=a&tags=a");
    let errors = validate(&schema, &raw).unwrap_err().errors().to_vec();
    let summary: Vec<(String, ErrorKind)> = errors
        .iter()
        .map(|e| (e.loc.to_string(), e.kind))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("query.ids.2".to_owned(), ErrorKind::IntParsing),
            ("query.tags".to_owned(), ErrorKind::ValidationError),
        ]
    );
}

#[test]
fn query_uniqueness_sees_coerced_integers() {
    let schema = schema(json!({"parameters": {"properties": {
        "ids": {"type": "array", "items": {"type": "integer"}, "uniqueItems": true}
    }}}));
    let errors = validate(&schema, &RawView::new().with_query("ids=1&ids=01"))
        .unwrap_err()
        .errors()
        .to_vec();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].loc, ["query", "ids"]);
    assert_eq!(errors[0].msg, "Array items must be unique");
}

#[test]
fn query_objects_from_bracket_keys() {
    let schema = schema(json!({"parameters": {"properties": {
        "filter": {"type": "object", "properties": {
            "min_price": {"type": "number"},
            "in_stock": {"type": "boolean"}
        }}
    }}}));
    let raw = RawView::new().with_query("filter[min_price]=9.5&filter[in_stock]=true");
    let params = validate(&schema, &raw).unwrap();
    assert_eq!(
        params.get("filter").map(TypedValue::to_json),
        Some(json!({"min_price": 9.5, "in_stock": true}))
    );
}

#[test]
fn form_body_values_are_coerced_from_text() {
    let schema = schema(json!({"body": {
        "type": "object",
        "properties": {
            "age": {"type": "integer", "minimum": 18},
            "newsletter": {"type": "boolean"}
        },
        "required": ["age"]
    }}));
    let raw = RawView::new().with_form_body(&b"age=17&newsletter=1"[..]);
    let errors = validate(&schema, &raw).unwrap_err().errors().to_vec();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].loc, ["body", "age"]);
    assert_eq!(errors[0].kind, ErrorKind::GreaterThanEqual);
    assert_eq!(errors[0].input, Some(json!("17")));
}

#[test]
fn multipart_fields_and_files_together() {
    let schema = schema(json!({
        "body": {"type": "object", "properties": {"title": {"type": "string"}}, "required": ["title"]},
        "files": {
            "attachment": {"content_type": ["application/pdf"], "validate_magic_numbers": true},
            "thumbnail": {"required": false}
        }
    }));
    let raw = RawView::new()
        .with_part(Part::text("title", "Quarterly report"))
        .with_part(Part::file("attachment", "q1.pdf", "application/pdf", &b"%PDF-1.7 ..."[..]));
    let params = validate(&schema, &raw).unwrap();
    assert_eq!(
        params.body().map(TypedValue::to_json),
        Some(json!({"title": "Quarterly report"}))
    );
    assert_eq!(
        params.file("attachment").and_then(|f| f.detected_type),
        Some("application/pdf")
    );
    assert!(params.file("thumbnail").is_none());
}

#[test]
fn missing_body_and_missing_file() {
    let schema = schema(json!({
        "body": {"type": "object"},
        "files": {"upload": {}}
    }));
    let errors = validate(&schema, &RawView::new()).unwrap_err().errors().to_vec();
    let locs: Vec<String> = errors.iter().map(|e| e.loc.to_string()).collect();
    assert_eq!(locs, vec!["body", "files.upload"]);
}

#[test]
fn optional_body_may_be_absent() {
    let schema = schema(json!({"body": {"type": "object"}, "body_required": false}));
    let params = validate(&schema, &RawView::new().with_json_body(&b"  "[..])).unwrap();
    assert!(params.body().is_none());
}

#[test]
fn nullable_and_defaults_in_body() {
    let schema = schema(json!({"body": {
        "type": "object",
        "properties": {
            "nickname": {"type": ["string", "null"]},
            "role": {"type": "string", "default": "member"},
            "limit": {"type": "integer", "default": 20}
        }
    }}));
    let params = validate(
        &schema,
        &RawView::new().with_json_body(&br#"{"nickname": null}"#[..]),
    )
    .unwrap();
    assert_eq!(
        params.to_json(),
        json!({"body": {"nickname": null, "role": "member", "limit": 20}})
    );
}
