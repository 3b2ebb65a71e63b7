//! The compiled schema tree.
//!
//! A [`SchemaNode`] is the resolved, self-contained form of one JSON Schema
//! object: `$ref`s are already inlined, regexes already compiled and
//! composition keywords already collected in declaration order.

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::kind::{Format, ValueType};

// ============================================================================
// NUMBER
// ============================================================================

/// A numeric bound as declared in the schema.
///
/// Integers stay integers so that comparisons against integer inputs and
/// `multipleOf` on integer fields never go through floating point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Converts a JSON number. Values beyond `i64` fall back to `f64`.
    #[must_use]
    pub fn from_json(number: &serde_json::Number) -> Option<Self> {
        if let Some(int) = number.as_i64() {
            Some(Self::Int(int))
        } else {
            number.as_f64().filter(|f| f.is_finite()).map(Self::Float)
        }
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(int) => int as f64,
            Self::Float(float) => float,
        }
    }

    /// Whether the value is strictly positive.
    #[must_use]
    pub fn is_positive(self) -> bool {
        match self {
            Self::Int(int) => int > 0,
            Self::Float(float) => float > 0.0,
        }
    }

    /// Total order between two numbers; integer pairs compare exactly.
    #[must_use]
    pub fn compare(self, other: Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(&b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }

    /// JSON representation; integers serialize without a fraction.
    #[must_use]
    pub fn to_json(self) -> Value {
        match self {
            Self::Int(int) => Value::from(int),
            Self::Float(float) => serde_json::Number::from_f64(float)
                .map(Value::Number)
                .unwrap_or(Value::Null),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(int) => write!(f, "{int}"),
            Self::Float(float) => write!(f, "{float}"),
        }
    }
}

// ============================================================================
// PATTERN
// ============================================================================

/// A compiled `pattern` keyword. Keeps the declared source for error
/// messages.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub(crate) fn new(source: String, regex: Regex) -> Self {
        Self { source, regex }
    }

    /// The pattern as declared.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Unanchored search, as JSON Schema prescribes.
    #[must_use]
    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

// ============================================================================
// LEAF SPECS
// ============================================================================

/// Constraints of a `string` node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSpec {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Pattern>,
    pub format: Option<Format>,
}

/// Constraints of an `integer` or `number` node.
///
/// Exclusive bounds are always in the numeric (draft 6+) form; boolean
/// draft-4 flags are folded in at compile time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumericSpec {
    pub minimum: Option<Number>,
    pub maximum: Option<Number>,
    pub exclusive_minimum: Option<Number>,
    pub exclusive_maximum: Option<Number>,
    pub multiple_of: Option<Number>,
}

/// Constraints of an `array` node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArraySpec {
    pub items: Option<Box<SchemaNode>>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub unique_items: bool,
}

/// What happens to keys not named in `properties`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AdditionalProperties {
    #[default]
    Allowed,
    Forbidden,
    Schema(Box<SchemaNode>),
}

/// Constraints of an `object` node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSpec {
    /// Declared properties, in declaration order.
    pub properties: IndexMap<String, SchemaNode>,
    pub required: Vec<String>,
    pub additional: AdditionalProperties,
    pub min_properties: Option<usize>,
    pub max_properties: Option<usize>,
}

impl ObjectSpec {
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

// ============================================================================
// COMPOSITION
// ============================================================================

/// One entry of a `dependencies` keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum Dependency {
    /// Property form: these keys must be present too.
    Properties(Vec<String>),
    /// Schema form: the whole object must also satisfy this schema.
    Schema(Box<SchemaNode>),
}

/// A composition keyword, evaluated after the node's own checks.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositionNode {
    AllOf(Vec<SchemaNode>),
    AnyOf(Vec<SchemaNode>),
    OneOf(Vec<SchemaNode>),
    Not(Box<SchemaNode>),
    Const(Value),
    Dependencies(IndexMap<String, Dependency>),
}

impl CompositionNode {
    /// The JSON Schema keyword this node was compiled from.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::AllOf(_) => "allOf",
            Self::AnyOf(_) => "anyOf",
            Self::OneOf(_) => "oneOf",
            Self::Not(_) => "not",
            Self::Const(_) => "const",
            Self::Dependencies(_) => "dependencies",
        }
    }
}

// ============================================================================
// SCHEMA NODE
// ============================================================================

/// The type-specific part of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// No `type` and nothing to infer one from: any value passes.
    Any,
    Null,
    Boolean,
    Integer(NumericSpec),
    Number(NumericSpec),
    String(StringSpec),
    Array(ArraySpec),
    Object(ObjectSpec),
}

impl NodeKind {
    /// The declared JSON type, if any.
    #[must_use]
    pub const fn value_type(&self) -> Option<ValueType> {
        Some(match self {
            Self::Any => return None,
            Self::Null => ValueType::Null,
            Self::Boolean => ValueType::Boolean,
            Self::Integer(_) => ValueType::Integer,
            Self::Number(_) => ValueType::Number,
            Self::String(_) => ValueType::String,
            Self::Array(_) => ValueType::Array,
            Self::Object(_) => ValueType::Object,
        })
    }
}

/// A fully resolved schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: NodeKind,
    /// `type` listed `"null"` next to another type.
    pub nullable: bool,
    pub enumeration: Option<Vec<Value>>,
    pub default: Option<Value>,
    /// Composition keywords in declaration order.
    pub compositions: Vec<CompositionNode>,
}

impl SchemaNode {
    /// A node accepting anything.
    #[must_use]
    pub fn any() -> Self {
        Self::of(NodeKind::Any)
    }

    #[must_use]
    pub fn of(kind: NodeKind) -> Self {
        Self {
            kind,
            nullable: false,
            enumeration: None,
            default: None,
            compositions: Vec::new(),
        }
    }

    /// The string format, if this is a string node that declares one.
    #[must_use]
    pub fn format(&self) -> Option<Format> {
        match &self.kind {
            NodeKind::String(spec) => spec.format,
            _ => None,
        }
    }

    /// Whether the node is array-typed.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.kind, NodeKind::Array(_))
    }

    /// Whether the node is object-typed.
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self.kind, NodeKind::Object(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_bounds_compare_exactly() {
        let big = Number::Int(i64::MAX);
        let below = Number::Int(i64::MAX - 1);
        assert_eq!(below.compare(big), Some(Ordering::Less));
        assert_eq!(Number::Int(3).compare(Number::Float(2.5)), Some(Ordering::Greater));
    }

    #[test]
    fn number_display_and_json() {
        assert_eq!(Number::Int(5).to_string(), "5");
        assert_eq!(Number::Float(0.5).to_string(), "0.5");
        assert_eq!(Number::Int(5).to_json(), serde_json::json!(5));
        assert_eq!(Number::Float(1.5).to_json(), serde_json::json!(1.5));
    }

    #[test]
    fn number_from_json_keeps_integers() {
        let n: serde_json::Number = serde_json::from_str("42").unwrap();
        assert_eq!(Number::from_json(&n), Some(Number::Int(42)));
        let n: serde_json::Number = serde_json::from_str("0.1").unwrap();
        assert_eq!(Number::from_json(&n), Some(Number::Float(0.1)));
    }

    #[test]
    fn pattern_equality_uses_source() {
        let a = Pattern::new("^a".into(), Regex::new("^a").unwrap());
        let b = Pattern::new("^a".into(), Regex::new("^a").unwrap());
        assert_eq!(a, b);
        assert!(a.is_match("abc"));
        assert_eq!(format!("{a:?}"), "Pattern(\"^a\")");
    }
}
