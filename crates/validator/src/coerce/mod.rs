//! Wire-to-type coercion.
//!
//! Two modes:
//! - [`Mode::Wire`]: values arrived as text (path, query, header, cookie,
//!   form bodies, multipart text parts) and are parsed into their declared
//!   type.
//! - [`Mode::Json`]: values came from a JSON body and are typed already, so
//!   a wrong JSON type is an error. No string-to-number coercion happens.
//!
//! Coercion never truncates: `"42.5"` is not an integer.

mod duration;
mod formats;

pub use duration::{DurationError, IsoDuration};
pub use formats::parse_format;

use gatehouse_schema::Number;
use serde_json::Value;

use crate::foundation::{ErrorKind, ValidationError};

/// How raw values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Text values, parsed into their declared type.
    Wire {
        /// Whether an empty string coerces to `false` for booleans.
        empty_is_false: bool,
    },
    /// Typed JSON values.
    Json,
}

impl Mode {
    /// Wire mode with empty-string booleans rejected.
    pub const WIRE: Self = Self::Wire {
        empty_is_false: false,
    };

    #[must_use]
    pub const fn is_wire(self) -> bool {
        matches!(self, Self::Wire { .. })
    }
}

// ============================================================================
// SCALARS
// ============================================================================

const INT_FROM_STR: &str = "Input should be a valid integer, unable to parse string as an integer";
const FLOAT_FROM_STR: &str = "Input should be a valid number, unable to parse string as a number";
const BOOL_FROM_STR: &str = "Input should be a valid boolean, unable to interpret input";

/// Coerces to an integer.
///
/// JSON numbers with a zero fraction (`42.0`) are accepted; anything with a
/// fractional part is rejected.
pub fn integer(value: &Value, mode: Mode) -> Result<i64, ValidationError> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
                Some(f) if f.fract() != 0.0 => Err(ValidationError::new(
                    ErrorKind::IntParsing,
                    "Input should be a valid integer, got a number with a fractional part",
                )),
                _ => Err(ValidationError::new(
                    ErrorKind::IntParsing,
                    "Input should be a valid integer, number is out of range",
                )),
            }
        }
        Value::String(s) if mode.is_wire() => s
            .parse::<i64>()
            .map_err(|_| ValidationError::new(ErrorKind::IntParsing, INT_FROM_STR)),
        _ => Err(ValidationError::new(
            ErrorKind::IntParsing,
            "Input should be a valid integer",
        )),
    }
}

/// Coerces to a number. Integral inputs stay exact.
pub fn number(value: &Value, mode: Mode) -> Result<Number, ValidationError> {
    match value {
        Value::Number(n) => Number::from_json(n).ok_or_else(|| {
            ValidationError::new(ErrorKind::FloatParsing, "Input should be a valid number")
        }),
        Value::String(s) if mode.is_wire() => {
            if let Ok(i) = s.parse::<i64>() {
                return Ok(Number::Int(i));
            }
            match s.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Number::Float(f)),
                _ => Err(ValidationError::new(ErrorKind::FloatParsing, FLOAT_FROM_STR)),
            }
        }
        _ => Err(ValidationError::new(
            ErrorKind::FloatParsing,
            "Input should be a valid number",
        )),
    }
}

/// Coerces to a boolean: `true`/`1` and `false`/`0`, case-insensitive.
pub fn boolean(value: &Value, mode: Mode) -> Result<bool, ValidationError> {
    match (value, mode) {
        (Value::Bool(b), _) => Ok(*b),
        (Value::String(s), Mode::Wire { empty_is_false }) => {
            if s.is_empty() && empty_is_false {
                return Ok(false);
            }
            if s.eq_ignore_ascii_case("true") || s == "1" {
                Ok(true)
            } else if s.eq_ignore_ascii_case("false") || s == "0" {
                Ok(false)
            } else {
                Err(ValidationError::new(ErrorKind::BoolParsing, BOOL_FROM_STR))
            }
        }
        _ => Err(ValidationError::new(
            ErrorKind::BoolParsing,
            "Input should be a valid boolean",
        )),
    }
}

/// Borrows a string value.
pub fn string(value: &Value) -> Result<&str, ValidationError> {
    value
        .as_str()
        .ok_or_else(|| ValidationError::type_error("string", value))
}

/// Accepts `null`, and in wire mode the empty string and `"null"`.
pub fn null(value: &Value, mode: Mode) -> Result<(), ValidationError> {
    match value {
        Value::Null => Ok(()),
        Value::String(s) if mode.is_wire() && (s.is_empty() || s == "null") => Ok(()),
        _ => Err(ValidationError::type_error("null", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!("42"), Mode::WIRE, Some(42))]
    #[case(json!("-7"), Mode::WIRE, Some(-7))]
    #[case(json!("42.5"), Mode::WIRE, None)]
    #[case(json!("foobar"), Mode::WIRE, None)]
    #[case(json!(42.0), Mode::Json, Some(42))]
    #[case(json!(42.5), Mode::Json, None)]
    #[case(json!("42"), Mode::Json, None)]
    #[case(json!(true), Mode::Json, None)]
    fn integers(#[case] input: Value, #[case] mode: Mode, #[case] expected: Option<i64>) {
        match expected {
            Some(i) => assert_eq!(integer(&input, mode).unwrap(), i),
            None => assert_eq!(integer(&input, mode).unwrap_err().kind, ErrorKind::IntParsing),
        }
    }

    #[test]
    fn integer_from_fractional_string_never_truncates() {
        let error = integer(&json!("42.5"), Mode::WIRE).unwrap_err();
        assert_eq!(error.msg, INT_FROM_STR);
    }

    #[rstest]
    #[case("true", Some(true))]
    #[case("TRUE", Some(true))]
    #[case("1", Some(true))]
    #[case("False", Some(false))]
    #[case("0", Some(false))]
    #[case("yes", None)]
    #[case("", None)]
    fn wire_booleans(#[case] input: &str, #[case] expected: Option<bool>) {
        let result = boolean(&json!(input), Mode::WIRE);
        match expected {
            Some(b) => assert_eq!(result.unwrap(), b),
            None => assert_eq!(result.unwrap_err().kind, ErrorKind::BoolParsing),
        }
    }

    #[test]
    fn empty_boolean_only_when_enabled() {
        let mode = Mode::Wire {
            empty_is_false: true,
        };
        assert!(!boolean(&json!(""), mode).unwrap());
        assert!(boolean(&json!("true"), Mode::Json).is_err());
    }

    #[test]
    fn numbers_reject_non_finite() {
        assert_eq!(number(&json!("2.5"), Mode::WIRE).unwrap(), Number::Float(2.5));
        assert_eq!(number(&json!("17"), Mode::WIRE).unwrap(), Number::Int(17));
        assert_eq!(
            number(&json!("inf"), Mode::WIRE).unwrap_err().kind,
            ErrorKind::FloatParsing
        );
        assert_eq!(
            number(&json!("NaN"), Mode::WIRE).unwrap_err().msg,
            FLOAT_FROM_STR
        );
    }

    #[test]
    fn strings_are_never_coerced_from_json_numbers() {
        let error = string(&json!(5)).unwrap_err();
        assert_eq!(error.kind, ErrorKind::TypeError);
        assert_eq!(error.msg, "Input should be a valid string");
    }
}
