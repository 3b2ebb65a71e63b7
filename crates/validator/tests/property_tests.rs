//! Property-based tests for gatehouse-validator.

use gatehouse_validator::prelude::*;
use proptest::prelude::*;
use serde_json::{Map, Value, json};

/// A route with `count` query fields `f0..fN`, each `minLength: 3`.
fn min_length_route(count: usize) -> SchemaModel {
    let properties: Map<String, Value> = (0..count)
        .map(|i| (format!("f{i}"), json!({"type": "string", "minLength": 3})))
        .collect();
    compile(&json!({"parameters": {"properties": properties}})).unwrap()
}

fn query_of(values: &[String]) -> String {
    values
        .iter()
        .enumerate()
        .map(|(i, value)| format!("f{i}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}

// ============================================================================
// IDEMPOTENCY: validate(x) == validate(x)
// ============================================================================

proptest! {
    #[test]
    fn query_integer_idempotent(s in "[-0-9a-z.]{0,12}") {
        let schema = compile(&json!({"parameters": {"properties": {
            "n": {"type": "integer", "minimum": 0, "multipleOf": 3}
        }}}))
        .unwrap();
        let raw = RawView::new().with_query(format!("n={s}"));
        let r1 = validate(&schema, &raw);
        let r2 = validate(&schema, &raw);
        prop_assert_eq!(r1, r2);
    }

    #[test]
    fn json_body_idempotent(n in any::<i64>(), s in "[a-z]{0,8}") {
        let schema = compile(&json!({"body": {
            "type": "object",
            "properties": {"n": {"type": "integer", "maximum": 100}, "s": {"type": "string", "maxLength": 4}}
        }}))
        .unwrap();
        let body = serde_json::to_vec(&json!({"n": n, "s": s})).unwrap();
        let raw = RawView::new().with_json_body(body);
        prop_assert_eq!(validate(&schema, &raw), validate(&schema, &raw));
    }
}

// ============================================================================
// COLLECT-ALL: one error per violated constraint
// ============================================================================

proptest! {
    #[test]
    fn error_count_matches_violations(values in prop::collection::vec("[a-z]{0,6}", 1..8)) {
        let schema = min_length_route(values.len());
        let raw = RawView::new().with_query(query_of(&values));
        let expected = values.iter().filter(|v| v.chars().count() < 3).count();
        let actual = match validate(&schema, &raw) {
            Ok(_) => 0,
            Err(rejection) => rejection.errors().len(),
        };
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn errors_follow_declaration_order(values in prop::collection::vec("[a-z]{0,2}", 1..8)) {
        let schema = min_length_route(values.len());
        let raw = RawView::new().with_query(query_of(&values));
        let rejection = validate(&schema, &raw).unwrap_err();
        let names: Vec<String> = rejection
            .errors()
            .iter()
            .map(|e| e.loc.to_strings()[1].clone())
            .collect();
        let declared: Vec<String> = (0..values.len()).map(|i| format!("f{i}")).collect();
        prop_assert_eq!(names, declared);
    }
}

// ============================================================================
// COERCION: wire integers survive the trip
// ============================================================================

proptest! {
    #[test]
    fn wire_integers_coerce_exactly(n in any::<i64>()) {
        let schema = compile(&json!({"parameters": {"properties": {
            "id": {"type": "integer", "source": "path"}
        }}}))
        .unwrap();
        let params = validate(&schema, &RawView::new().with_path_param("id", n.to_string())).unwrap();
        prop_assert_eq!(params.get("id").and_then(TypedValue::as_i64), Some(n));
    }
}
