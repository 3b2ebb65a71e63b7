//! Error types for validation failures.
//!
//! A [`ValidationError`] is an immutable record: a location, a message, a
//! stable [`ErrorKind`], optional structured context and the offending
//! input. Messages use `Cow<'static, str>` so the common static ones never
//! allocate.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::{ErrorContext, Location};

// ============================================================================
// ERROR KIND
// ============================================================================

/// Stable machine-readable error type, serialized as `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Missing,
    IntParsing,
    FloatParsing,
    BoolParsing,
    UuidParsing,
    DatetimeParsing,
    DateParsing,
    TimeParsing,
    DurationParsing,
    DecimalParsing,
    StringTooShort,
    StringTooLong,
    StringPatternMismatch,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    TooShort,
    TooMany,
    Enum,
    TypeError,
    ValidationError,
}

impl ErrorKind {
    /// The wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::IntParsing => "int_parsing",
            Self::FloatParsing => "float_parsing",
            Self::BoolParsing => "bool_parsing",
            Self::UuidParsing => "uuid_parsing",
            Self::DatetimeParsing => "datetime_parsing",
            Self::DateParsing => "date_parsing",
            Self::TimeParsing => "time_parsing",
            Self::DurationParsing => "duration_parsing",
            Self::DecimalParsing => "decimal_parsing",
            Self::StringTooShort => "string_too_short",
            Self::StringTooLong => "string_too_long",
            Self::StringPatternMismatch => "string_pattern_mismatch",
            Self::GreaterThan => "greater_than",
            Self::GreaterThanEqual => "greater_than_equal",
            Self::LessThan => "less_than",
            Self::LessThanEqual => "less_than_equal",
            Self::TooShort => "too_short",
            Self::TooMany => "too_many",
            Self::Enum => "enum",
            Self::TypeError => "type_error",
            Self::ValidationError => "validation_error",
        }
    }

    /// Whether the kind reports a failed wire-to-type conversion.
    #[must_use]
    pub const fn is_parsing(self) -> bool {
        matches!(
            self,
            Self::IntParsing
                | Self::FloatParsing
                | Self::BoolParsing
                | Self::UuidParsing
                | Self::DatetimeParsing
                | Self::DateParsing
                | Self::TimeParsing
                | Self::DurationParsing
                | Self::DecimalParsing
                | Self::TypeError
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// One validation failure.
///
/// Leaf validators build errors without a location; the caller positions
/// them with [`at`](Self::at) once it knows where the value came from.
///
/// ```rust
/// use gatehouse_validator::foundation::{ErrorKind, Location, ValidationError};
/// use gatehouse_schema::Source;
///
/// let error = ValidationError::missing().at(Location::root(Source::Query).key("q"));
/// assert_eq!(error.kind, ErrorKind::Missing);
/// assert_eq!(error.to_string(), "[query.q] missing: Field required");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub loc: Location,
    pub msg: Cow<'static, str>,
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ctx: Option<ErrorContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

impl ValidationError {
    /// Creates an error with a kind and message.
    pub fn new(kind: ErrorKind, msg: impl Into<Cow<'static, str>>) -> Self {
        Self {
            loc: Location::new(),
            msg: msg.into(),
            kind,
            ctx: None,
            input: None,
        }
    }

    /// Positions the error.
    #[must_use = "builder methods must be chained or built"]
    pub fn at(mut self, loc: Location) -> Self {
        self.loc = loc;
        self
    }

    /// Attaches structured context.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_ctx(mut self, ctx: ErrorContext) -> Self {
        self.ctx = Some(ctx);
        self
    }

    /// Attaches the offending input, unless one is already set.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_input(mut self, input: Value) -> Self {
        if self.input.is_none() {
            self.input = Some(input);
        }
        self
    }

    /// Drops the offending input.
    #[must_use = "builder methods must be chained or built"]
    pub fn without_input(mut self) -> Self {
        self.input = None;
        self
    }

    /// Looks up one context key.
    #[must_use]
    pub fn ctx_value(&self, key: &str) -> Option<Value> {
        self.ctx.as_ref().and_then(|ctx| ctx.get(key))
    }

    /// The error as a JSON object, as it appears in the envelope.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.loc.is_empty() {
            write!(f, "{}: {}", self.kind, self.msg)
        } else {
            write!(f, "[{}] {}: {}", self.loc, self.kind, self.msg)
        }
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// CONVENIENCE CONSTRUCTORS
// ============================================================================

impl ValidationError {
    /// A required value is absent.
    pub fn missing() -> Self {
        Self::new(ErrorKind::Missing, "Field required")
    }

    /// A JSON value of the wrong JSON type.
    pub fn type_error(expected: &'static str, actual: &Value) -> Self {
        Self::new(
            ErrorKind::TypeError,
            format!("Input should be a valid {expected}"),
        )
        .with_ctx(ErrorContext::TypeMismatch {
            expected_type: expected,
            actual_type: json_type_name(actual),
        })
    }

    /// A string failed a structural format check.
    pub fn invalid_format(format: &'static str, value: &str) -> Self {
        Self::new(ErrorKind::ValidationError, format!("Invalid {format} format")).with_ctx(
            ErrorContext::Format {
                format,
                value: value.to_owned(),
            },
        )
    }

    /// A generic rule violation.
    pub fn rule(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ValidationError, msg)
    }
}

/// JSON type name of a value, as used in type mismatch context.
#[must_use]
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_schema::Source;
    use serde_json::json;

    #[test]
    fn kind_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_value(ErrorKind::DatetimeParsing).unwrap(),
            json!("datetime_parsing")
        );
        assert_eq!(serde_json::to_value(ErrorKind::Enum).unwrap(), json!("enum"));
        assert_eq!(ErrorKind::StringPatternMismatch.as_str(), "string_pattern_mismatch");
    }

    #[test]
    fn serializes_envelope_entry() {
        let error = ValidationError::new(ErrorKind::IntParsing, "bad")
            .at(Location::root(Source::Path).key("item_id"))
            .with_input(json!("foobar"));
        assert_eq!(
            error.to_json(),
            json!({"loc": ["path", "item_id"], "msg": "bad", "type": "int_parsing", "input": "foobar"})
        );
    }

    #[test]
    fn first_input_wins() {
        let error = ValidationError::missing()
            .with_input(json!(1))
            .with_input(json!(2));
        assert_eq!(error.input, Some(json!(1)));
        assert_eq!(error.without_input().input, None);
    }

    #[test]
    fn type_error_message() {
        let error = ValidationError::type_error("array", &json!("x"));
        assert_eq!(error.msg, "Input should be a valid array");
        assert_eq!(error.ctx_value("actual_type"), Some(json!("string")));
    }
}
