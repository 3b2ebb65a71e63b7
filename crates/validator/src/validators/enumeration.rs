//! `enum` and `const` validators, plus JSON Schema value equality.

use serde_json::Value;

use crate::foundation::{ErrorContext, ErrorKind, Validate, ValidationError};

/// JSON Schema equality: numbers compare by value (`1 == 1.0`), arrays
/// element-wise, objects key-wise regardless of order.
#[must_use]
pub fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| json_eq(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(key, x)| y.get(key).is_some_and(|y| json_eq(x, y)))
        }
        _ => a == b,
    }
}

/// Renders a value the way error messages quote it: strings in single
/// quotes, everything else as JSON text.
#[must_use]
pub fn quote(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        other => other.to_string(),
    }
}

/// Joins quoted values as `'a', 'b' or 'c'`.
fn expected_list(values: &[Value]) -> String {
    let quoted: Vec<String> = values.iter().map(quote).collect();
    match quoted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {last}", rest.join(", ")),
    }
}

// ============================================================================
// ENUM
// ============================================================================

/// `enum`: the value must equal one of the listed values.
#[derive(Debug, Clone, Copy)]
pub struct AllowedValues<'a> {
    allowed: &'a [Value],
}

impl<'a> AllowedValues<'a> {
    #[must_use]
    pub fn new(allowed: &'a [Value]) -> Self {
        Self { allowed }
    }
}

impl Validate for AllowedValues<'_> {
    type Input = Value;

    fn validate(&self, input: &Value) -> Result<(), ValidationError> {
        if self.allowed.iter().any(|allowed| json_eq(allowed, input)) {
            return Ok(());
        }
        let expected = expected_list(self.allowed);
        Err(
            ValidationError::new(ErrorKind::Enum, format!("Input should be {expected}"))
                .with_ctx(ErrorContext::Expected { expected }),
        )
    }
}

// ============================================================================
// CONST
// ============================================================================

/// `const`: the value must equal exactly one value.
#[derive(Debug, Clone, Copy)]
pub struct ConstValue<'a> {
    expected: &'a Value,
}

impl<'a> ConstValue<'a> {
    #[must_use]
    pub fn new(expected: &'a Value) -> Self {
        Self { expected }
    }
}

impl Validate for ConstValue<'_> {
    type Input = Value;

    fn validate(&self, input: &Value) -> Result<(), ValidationError> {
        if json_eq(self.expected, input) {
            return Ok(());
        }
        Err(
            ValidationError::rule(format!("Value must be exactly {}", quote(self.expected)))
                .with_ctx(ErrorContext::Const {
                    expected: self.expected.clone(),
                    value: input.clone(),
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn equality_is_numeric_and_order_insensitive() {
        assert!(json_eq(&json!(1), &json!(1.0)));
        assert!(json_eq(&json!({"a": 1, "b": [2]}), &json!({"b": [2.0], "a": 1})));
        assert!(!json_eq(&json!("1"), &json!(1)));
    }

    #[test]
    fn enum_message_lists_values_in_order() {
        let allowed = [json!("alexnet"), json!("resnet"), json!("lenet")];
        let err = AllowedValues::new(&allowed).validate(&json!("vgg")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Enum);
        assert_eq!(err.msg, "Input should be 'alexnet', 'resnet' or 'lenet'");
        assert_eq!(
            err.ctx_value("expected"),
            Some(json!("'alexnet', 'resnet' or 'lenet'"))
        );
        assert!(AllowedValues::new(&allowed).validate(&json!("resnet")).is_ok());
    }

    #[test]
    fn single_value_enum() {
        let allowed = [json!(1)];
        let err = AllowedValues::new(&allowed).validate(&json!(2)).unwrap_err();
        assert_eq!(err.msg, "Input should be 1");
    }

    #[test]
    fn const_message() {
        let expected = json!("1.0");
        let err = ConstValue::new(&expected).validate(&json!("2.0")).unwrap_err();
        assert_eq!(err.msg, "Value must be exactly '1.0'");
        assert_eq!(err.ctx_value("const"), Some(json!("1.0")));
        assert_eq!(err.ctx_value("value"), Some(json!("2.0")));
    }
}
