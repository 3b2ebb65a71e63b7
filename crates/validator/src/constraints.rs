//! Schema-driven checks over one value tree.
//!
//! [`ConstraintValidator`] walks a [`SchemaNode`] and a raw value together,
//! coercing as it goes and collecting every violation. Per node the order
//! is fixed:
//!
//! 1. nullability, then type coercion (a failure here ends the node)
//! 2. the type's own keywords:
//!    - string: length, pattern, then format
//!    - number: minimum, maximum, exclusive bounds, then `multipleOf`
//!    - array: item counts, uniqueness, then each element
//!    - object: `required`, `additionalProperties`, property counts, then
//!      each property
//! 3. `enum`
//! 4. composition keywords, in declaration order

use std::borrow::Cow;

use gatehouse_schema::{
    AdditionalProperties, ArraySpec, NodeKind, Number, NumericSpec, ObjectSpec, SchemaNode,
    StringSpec,
};
use indexmap::IndexMap;
use serde_json::Value;

use crate::coerce::{self, Mode, parse_format};
use crate::combinators;
use crate::foundation::{ErrorContext, Location, Validate, ValidationError};
use crate::report::ErrorAggregator;
use crate::typed::TypedValue;
use crate::validators::{
    AllowedValues, exclusive_maximum, exclusive_minimum, matches, max_items, max_length,
    max_properties, maximum, min_items, min_length, min_properties, minimum, multiple_of,
    unique_items,
};

/// Validates values against schema nodes in one coercion [`Mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintValidator {
    mode: Mode,
    include_input: bool,
}

impl ConstraintValidator {
    #[must_use]
    pub const fn new(mode: Mode) -> Self {
        Self {
            mode,
            include_input: true,
        }
    }

    /// Whether errors carry the offending input.
    #[must_use = "builder methods must be chained or built"]
    pub const fn with_input(mut self, include_input: bool) -> Self {
        self.include_input = include_input;
        self
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Validates `value` against `node`, adding every violation to `sink`.
    ///
    /// Returns the coerced value unless the node's type coercion failed. A
    /// returned value does not mean the node passed: check `sink`.
    pub fn validate(
        &self,
        node: &SchemaNode,
        value: &Value,
        loc: &Location,
        sink: &mut ErrorAggregator,
    ) -> Option<TypedValue> {
        if value.is_null() && node.nullable {
            return Some(TypedValue::Null);
        }
        let typed = self.visit_kind(node, value, loc, sink)?;
        if let Some(allowed) = &node.enumeration {
            self.check_enum(allowed, value, &typed, loc, sink);
        }
        let chosen = combinators::evaluate(self, &node.compositions, value, Some(&typed), loc, sink);
        match chosen {
            Some(chosen) if matches!(node.kind, NodeKind::Any) => Some(chosen),
            _ => Some(typed),
        }
    }

    /// Coerces a declared default. Defaults are trusted: constraint
    /// violations are ignored, and a default that does not coerce is kept
    /// as plain JSON.
    #[must_use]
    pub fn default_value(node: &SchemaNode, default: &Value) -> TypedValue {
        for mode in [Mode::Json, Mode::WIRE] {
            let mut scratch = ErrorAggregator::new();
            let typed = Self::new(mode).with_input(false).visit_kind(
                node,
                default,
                &Location::new(),
                &mut scratch,
            );
            if let Some(typed) = typed.filter(|_| scratch.is_empty()) {
                return typed;
            }
        }
        TypedValue::from_json(default)
    }

    /// Positions an error and attaches the input when enabled.
    pub(crate) fn position(&self, error: ValidationError, loc: &Location, input: &Value) -> ValidationError {
        let error = error.at(loc.clone());
        if self.include_input {
            error.with_input(input.clone())
        } else {
            error.without_input()
        }
    }

    fn coerced<T>(
        &self,
        result: Result<T, ValidationError>,
        value: &Value,
        loc: &Location,
        sink: &mut ErrorAggregator,
    ) -> Option<T> {
        result
            .map_err(|error| sink.add(self.position(error, loc, value)))
            .ok()
    }

    fn visit_kind(
        &self,
        node: &SchemaNode,
        value: &Value,
        loc: &Location,
        sink: &mut ErrorAggregator,
    ) -> Option<TypedValue> {
        match &node.kind {
            NodeKind::Any => Some(TypedValue::Json(value.clone())),
            NodeKind::Null => self
                .coerced(coerce::null(value, self.mode), value, loc, sink)
                .map(|()| TypedValue::Null),
            NodeKind::Boolean => self
                .coerced(coerce::boolean(value, self.mode), value, loc, sink)
                .map(TypedValue::Bool),
            NodeKind::Integer(spec) => {
                let int = self.coerced(coerce::integer(value, self.mode), value, loc, sink)?;
                self.numeric(spec, Number::Int(int), value, loc, sink);
                Some(TypedValue::Integer(int))
            }
            NodeKind::Number(spec) => {
                let number = self.coerced(coerce::number(value, self.mode), value, loc, sink)?;
                self.numeric(spec, number, value, loc, sink);
                Some(TypedValue::Number(number.as_f64()))
            }
            NodeKind::String(spec) => {
                let text = self.coerced(coerce::string(value), value, loc, sink)?;
                self.string(spec, text, value, loc, sink)
            }
            NodeKind::Array(spec) => self.array(spec, value, loc, sink),
            NodeKind::Object(spec) => self.object(spec, value, loc, sink),
        }
    }

    // ========================================================================
    // SCALARS
    // ========================================================================

    fn string(
        &self,
        spec: &StringSpec,
        text: &str,
        raw: &Value,
        loc: &Location,
        sink: &mut ErrorAggregator,
    ) -> Option<TypedValue> {
        {
            let mut push = |error| sink.add(self.position(error, loc, raw));
            if let Some(min) = spec.min_length {
                min_length(min).check_into(text, &mut push);
            }
            if let Some(max) = spec.max_length {
                max_length(max).check_into(text, &mut push);
            }
            if let Some(pattern) = &spec.pattern {
                matches(pattern).check_into(text, &mut push);
            }
        }
        match spec.format {
            None => Some(TypedValue::String(text.to_owned())),
            Some(format) => self.coerced(parse_format(format, text), raw, loc, sink),
        }
    }

    fn numeric(
        &self,
        spec: &NumericSpec,
        number: Number,
        raw: &Value,
        loc: &Location,
        sink: &mut ErrorAggregator,
    ) {
        let mut push = |error| sink.add(self.position(error, loc, raw));
        if let Some(bound) = spec.minimum {
            minimum(bound).check_into(&number, &mut push);
        }
        if let Some(bound) = spec.maximum {
            maximum(bound).check_into(&number, &mut push);
        }
        if let Some(bound) = spec.exclusive_minimum {
            exclusive_minimum(bound).check_into(&number, &mut push);
        }
        if let Some(bound) = spec.exclusive_maximum {
            exclusive_maximum(bound).check_into(&number, &mut push);
        }
        if let Some(divisor) = spec.multiple_of {
            multiple_of(divisor).check_into(&number, &mut push);
        }
    }

    fn check_enum(
        &self,
        allowed: &[Value],
        raw: &Value,
        typed: &TypedValue,
        loc: &Location,
        sink: &mut ErrorAggregator,
    ) {
        let check = AllowedValues::new(allowed);
        if check.validate(&typed.to_json()).is_ok() {
            return;
        }
        if let Err(error) = check.validate(raw) {
            sink.add(self.position(error, loc, raw));
        }
    }

    // ========================================================================
    // CONTAINERS
    // ========================================================================

    fn array(
        &self,
        spec: &ArraySpec,
        value: &Value,
        loc: &Location,
        sink: &mut ErrorAggregator,
    ) -> Option<TypedValue> {
        let items: Cow<'_, [Value]> = match value {
            Value::Array(items) => Cow::Borrowed(items.as_slice()),
            // A lone wire value is a one-element list.
            Value::String(_) if self.mode.is_wire() => Cow::Owned(vec![value.clone()]),
            _ => {
                sink.add(self.position(ValidationError::type_error("array", value), loc, value));
                return None;
            }
        };
        let items: &[Value] = &items;

        // Elements are coerced before uniqueness is judged; their errors
        // follow the array's own.
        let mut element_errors = ErrorAggregator::new();
        let mut typed = Vec::with_capacity(items.len());
        let mut compared = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let element = match &spec.items {
                Some(node) => self.validate(node, item, &loc.index(index), &mut element_errors),
                None => Some(TypedValue::from_json(item)),
            };
            match element {
                Some(element) => {
                    compared.push(element.to_json());
                    typed.push(element);
                }
                None => compared.push(item.clone()),
            }
        }

        {
            let mut push = |error| sink.add(self.position(error, loc, value));
            if let Some(min) = spec.min_items {
                min_items(min).check_into(items, &mut push);
            }
            if let Some(max) = spec.max_items {
                max_items(max).check_into(items, &mut push);
            }
            if spec.unique_items {
                unique_items().check_into(compared.as_slice(), &mut push);
            }
        }
        sink.extend(element_errors.into_errors());
        Some(TypedValue::Array(typed))
    }

    fn object(
        &self,
        spec: &ObjectSpec,
        value: &Value,
        loc: &Location,
        sink: &mut ErrorAggregator,
    ) -> Option<TypedValue> {
        let Value::Object(map) = value else {
            sink.add(self.position(ValidationError::type_error("object", value), loc, value));
            return None;
        };

        for name in &spec.required {
            let has_default = spec
                .properties
                .get(name)
                .is_some_and(|property| property.default.is_some());
            if !map.contains_key(name) && !has_default {
                sink.add(ValidationError::missing().at(loc.key(name.clone())));
            }
        }

        let mut extras = IndexMap::new();
        for (key, extra) in map.iter().filter(|(key, _)| !spec.properties.contains_key(*key)) {
            match &spec.additional {
                AdditionalProperties::Allowed => {
                    extras.insert(key.clone(), TypedValue::from_json(extra));
                }
                AdditionalProperties::Forbidden => {
                    let error = ValidationError::rule("Additional properties are not allowed")
                        .with_ctx(ErrorContext::AdditionalProperties {
                            additional_properties: false,
                            unexpected_field: key.clone(),
                        });
                    sink.add(self.position(error, &loc.key(key.clone()), extra));
                }
                AdditionalProperties::Schema(node) => {
                    if let Some(typed) = self.validate(node, extra, &loc.key(key.clone()), sink) {
                        extras.insert(key.clone(), typed);
                    }
                }
            }
        }

        {
            let mut push = |error| sink.add(self.position(error, loc, value));
            if let Some(min) = spec.min_properties {
                min_properties(min).check_into(map, &mut push);
            }
            if let Some(max) = spec.max_properties {
                max_properties(max).check_into(map, &mut push);
            }
        }

        let mut typed = IndexMap::with_capacity(map.len());
        for (name, property) in &spec.properties {
            match map.get(name) {
                Some(child) => {
                    if let Some(element) = self.validate(property, child, &loc.key(name.clone()), sink)
                    {
                        typed.insert(name.clone(), element);
                    }
                }
                None => {
                    if let Some(default) = &property.default {
                        typed.insert(name.clone(), Self::default_value(property, default));
                    }
                }
            }
        }
        typed.extend(extras);
        Some(TypedValue::Object(typed))
    }
}
