//! Declaration → [`SchemaModel`] compilation.
//!
//! Runs once per route at registration. Everything that can be decided
//! without a request is decided here: regexes are compiled, `$ref`s are
//! inlined, draft-4 exclusive bounds are normalized and contradictory
//! constraints are rejected.

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::kind::{Format, Separator, Source, ValueType};
use crate::model::{FieldShape, FieldSpec, FileRules, SchemaModel};
use crate::node::{
    AdditionalProperties, ArraySpec, CompositionNode, Dependency, NodeKind, Number, NumericSpec,
    ObjectSpec, Pattern, SchemaNode, StringSpec,
};

type Result<T> = std::result::Result<T, SchemaError>;

/// Keywords that make a node a composition rather than plain type checks.
const COMPOSITION_KEYWORDS: [&str; 8] = [
    "allOf",
    "anyOf",
    "oneOf",
    "not",
    "const",
    "dependencies",
    "dependentRequired",
    "dependentSchemas",
];

const OBJECT_HINTS: [&str; 5] = [
    "properties",
    "required",
    "additionalProperties",
    "minProperties",
    "maxProperties",
];
const ARRAY_HINTS: [&str; 4] = ["items", "minItems", "maxItems", "uniqueItems"];
const STRING_HINTS: [&str; 4] = ["minLength", "maxLength", "pattern", "format"];
const NUMBER_HINTS: [&str; 5] = [
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "multipleOf",
];

/// Compiles a route declaration with no route label.
///
/// # Examples
///
/// ```
/// use serde_json::json;
///
/// let model = gatehouse_schema::compile(&json!({
///     "parameters": {
///         "type": "object",
///         "properties": { "item_id": { "type": "integer", "source": "path" } },
///         "required": ["item_id"]
///     }
/// }))
/// .unwrap();
/// assert_eq!(model.len(), 1);
/// ```
pub fn compile(declaration: &Value) -> Result<SchemaModel> {
    SchemaCompiler::new(declaration).compile()
}

// ============================================================================
// SCHEMA COMPILER
// ============================================================================

/// Builder-style entry point for compiling a route declaration.
#[derive(Debug, Clone)]
pub struct SchemaCompiler<'a> {
    declaration: &'a Value,
    route: Option<String>,
}

impl<'a> SchemaCompiler<'a> {
    #[must_use]
    pub fn new(declaration: &'a Value) -> Self {
        Self {
            declaration,
            route: None,
        }
    }

    /// Attaches a route label (e.g. `GET /items/{id}`) used in log spans.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Compiles the declaration.
    pub fn compile(self) -> Result<SchemaModel> {
        let root = self
            .declaration
            .as_object()
            .ok_or_else(|| SchemaError::NotAnObject {
                pointer: String::new(),
            })?;
        let mut resolver = Resolver::new(self.declaration);
        let mut fields = Vec::new();

        if let Some(parameters) = root.get("parameters") {
            compile_parameters(&mut resolver, parameters, &mut fields)?;
        }

        let has_body = if let Some(body) = root.get("body") {
            let node = resolver.node(body, "/body")?;
            let required = bool_keyword(root, "body_required", "")?.unwrap_or(true);
            fields.push(FieldSpec {
                name: Source::Body.as_str().to_owned(),
                source: Source::Body,
                required,
                default: node.default.clone(),
                separator: None,
                path_remainder: false,
                shape: FieldShape::Value(node),
            });
            true
        } else {
            false
        };

        if let Some(files) = root.get("files") {
            compile_files(files, &mut fields)?;
        }

        let model = SchemaModel::new(self.route, fields);
        tracing::debug!(
            route = model.route().unwrap_or(""),
            fields = model.len(),
            has_body,
            files = model.files().count(),
            "compiled route schema"
        );
        Ok(model)
    }
}

// ============================================================================
// ROUTE SECTIONS
// ============================================================================

fn compile_parameters(
    resolver: &mut Resolver<'_>,
    parameters: &Value,
    fields: &mut Vec<FieldSpec>,
) -> Result<()> {
    let pointer = "/parameters";
    let parameters = parameters
        .as_object()
        .ok_or_else(|| SchemaError::NotAnObject {
            pointer: pointer.to_owned(),
        })?;
    let required = string_list(parameters, "required", pointer)?;
    let Some(properties) = parameters.get("properties") else {
        return Ok(());
    };
    let properties = properties
        .as_object()
        .ok_or_else(|| invalid_keyword(pointer, "properties", "an object"))?;

    for (name, schema) in properties {
        let pointer = child(&child(pointer, "properties"), name);
        let listed = required.iter().any(|r| r == name);
        fields.push(compile_parameter(resolver, name, schema, &pointer, listed)?);
    }
    Ok(())
}

fn compile_parameter(
    resolver: &mut Resolver<'_>,
    name: &str,
    schema: &Value,
    pointer: &str,
    listed_required: bool,
) -> Result<FieldSpec> {
    let object = schema.as_object().ok_or_else(|| SchemaError::NotAnObject {
        pointer: pointer.to_owned(),
    })?;

    let source = match object.get("source") {
        None => Source::Query,
        Some(Value::String(value)) => Source::parse(value)
            .filter(|source| source.is_parameter())
            .ok_or_else(|| SchemaError::UnknownSource {
                pointer: child(pointer, "source"),
                value: value.clone(),
            })?,
        Some(_) => return Err(invalid_keyword(pointer, "source", "a string")),
    };

    let inline_required = matches!(object.get("required"), Some(Value::Bool(true)));
    let path_format = matches!(object.get("format"), Some(Value::String(f)) if f == "path");
    let path_remainder =
        bool_keyword(object, "path_remainder", pointer)?.unwrap_or(false) || path_format;
    if path_remainder && source != Source::Path {
        return Err(SchemaError::ConflictingConstraints {
            pointer: pointer.to_owned(),
            reason: format!("path remainder capture requires source `path`, found `{source}`"),
        });
    }

    let node = if path_format {
        let mut stripped = object.clone();
        stripped.remove("format");
        resolver.node(&Value::Object(stripped), pointer)?
    } else {
        resolver.node(schema, pointer)?
    };

    let separator = match object.get("separator") {
        None => None,
        Some(Value::String(value)) => {
            let separator =
                Separator::parse(value).ok_or_else(|| SchemaError::InvalidSeparator {
                    pointer: child(pointer, "separator"),
                    value: value.clone(),
                    reason: "expected one of `|`, `;`, space or `,`".to_owned(),
                })?;
            if !node.is_array() || !matches!(source, Source::Query | Source::Header) {
                return Err(SchemaError::InvalidSeparator {
                    pointer: child(pointer, "separator"),
                    value: value.clone(),
                    reason: "separators apply only to array-typed query or header parameters"
                        .to_owned(),
                });
            }
            Some(separator)
        }
        Some(_) => return Err(invalid_keyword(pointer, "separator", "a string")),
    };

    Ok(FieldSpec {
        name: name.to_owned(),
        source,
        required: listed_required || inline_required,
        default: node.default.clone(),
        separator,
        path_remainder,
        shape: FieldShape::Value(node),
    })
}

fn compile_files(files: &Value, fields: &mut Vec<FieldSpec>) -> Result<()> {
    let files = files.as_object().ok_or_else(|| SchemaError::NotAnObject {
        pointer: "/files".to_owned(),
    })?;

    for (name, declaration) in files {
        let pointer = child("/files", name);
        let object = declaration
            .as_object()
            .ok_or_else(|| SchemaError::NotAnObject {
                pointer: pointer.clone(),
            })?;

        let content_types = match object.get("content_type") {
            None => Vec::new(),
            Some(Value::String(single)) => vec![single.clone()],
            Some(Value::Array(_)) => string_list(object, "content_type", &pointer)?,
            Some(_) => {
                return Err(invalid_keyword(
                    &pointer,
                    "content_type",
                    "a string or an array of strings",
                ));
            }
        };
        let max_size = u64_keyword(object, "max_size", &pointer)?;
        let min_size = u64_keyword(object, "min_size", &pointer)?;
        if let (Some(min), Some(max)) = (min_size, max_size) {
            if min > max {
                return Err(SchemaError::ConflictingConstraints {
                    pointer,
                    reason: format!("min_size {min} exceeds max_size {max}"),
                });
            }
        }

        fields.push(FieldSpec {
            name: name.clone(),
            source: Source::Files,
            required: bool_keyword(object, "required", &pointer)?.unwrap_or(true),
            default: None,
            separator: None,
            path_remainder: false,
            shape: FieldShape::File(FileRules {
                content_types,
                validate_magic_numbers: bool_keyword(object, "validate_magic_numbers", &pointer)?
                    .unwrap_or(false),
                max_size,
                min_size,
            }),
        });
    }
    Ok(())
}

// ============================================================================
// NODE RESOLVER
// ============================================================================

/// Compiles sub-schemas, inlining `$ref`s against the declaration root.
struct Resolver<'a> {
    root: &'a Value,
    /// References currently being expanded, for cycle detection.
    in_progress: Vec<String>,
}

impl<'a> Resolver<'a> {
    fn new(root: &'a Value) -> Self {
        Self {
            root,
            in_progress: Vec::new(),
        }
    }

    fn node(&mut self, schema: &Value, pointer: &str) -> Result<SchemaNode> {
        let object = match schema {
            Value::Bool(true) => return Ok(SchemaNode::any()),
            Value::Bool(false) => {
                let mut never = SchemaNode::any();
                never
                    .compositions
                    .push(CompositionNode::Not(Box::new(SchemaNode::any())));
                return Ok(never);
            }
            Value::Object(object) => object,
            _ => {
                return Err(SchemaError::NotAnObject {
                    pointer: pointer.to_owned(),
                });
            }
        };

        if let Some(reference) = object.get("$ref") {
            let reference = reference
                .as_str()
                .ok_or_else(|| invalid_keyword(pointer, "$ref", "a string"))?;
            let mut node = self.follow(reference, pointer)?;
            if let Some(default) = object.get("default") {
                node.default = Some(default.clone());
            }
            return Ok(node);
        }

        let (types, nullable) = declared_types(object, pointer)?;
        let mut node = match types.as_slice() {
            [] if nullable => SchemaNode::of(NodeKind::Null),
            [] => SchemaNode::of(self.kind(infer_type(object), object, pointer)?),
            [single] => SchemaNode::of(self.kind(Some(*single), object, pointer)?),
            several => {
                // Multi-type declarations become an anyOf over single-type copies.
                let mut branches = Vec::with_capacity(several.len());
                for ty in several {
                    let mut branch = object.clone();
                    branch.insert("type".to_owned(), Value::String(ty.as_str().to_owned()));
                    for keyword in COMPOSITION_KEYWORDS.iter().chain(&["enum", "default"]) {
                        branch.remove(*keyword);
                    }
                    branches.push(self.node(&Value::Object(branch), pointer)?);
                }
                let mut node = SchemaNode::any();
                node.compositions.push(CompositionNode::AnyOf(branches));
                node
            }
        };
        node.nullable = nullable;

        if let Some(values) = object.get("enum") {
            let values = values
                .as_array()
                .ok_or_else(|| invalid_keyword(pointer, "enum", "an array"))?;
            node.enumeration = Some(values.clone());
        }

        if let Some(default) = object.get("default") {
            check_default(&node, default, pointer)?;
            node.default = Some(default.clone());
        }

        for (keyword, value) in object {
            if let Some(composition) = self.composition(keyword, value, pointer)? {
                node.compositions.push(composition);
            }
        }
        Ok(node)
    }

    fn follow(&mut self, reference: &str, pointer: &str) -> Result<SchemaNode> {
        let unresolved = || SchemaError::UnresolvedRef {
            pointer: pointer.to_owned(),
            reference: reference.to_owned(),
        };
        let fragment = reference.strip_prefix('#').ok_or_else(unresolved)?;
        let target = if fragment.is_empty() {
            self.root
        } else {
            self.root.pointer(fragment).ok_or_else(unresolved)?
        };

        if self.in_progress.iter().any(|r| r == reference) {
            return Err(SchemaError::CircularRef {
                pointer: pointer.to_owned(),
                reference: reference.to_owned(),
            });
        }
        self.in_progress.push(reference.to_owned());
        let node = self.node(target, fragment)?;
        self.in_progress.pop();
        Ok(node)
    }

    fn kind(
        &mut self,
        ty: Option<ValueType>,
        object: &Map<String, Value>,
        pointer: &str,
    ) -> Result<NodeKind> {
        Ok(match ty {
            None => NodeKind::Any,
            Some(ValueType::Null) => NodeKind::Null,
            Some(ValueType::Boolean) => NodeKind::Boolean,
            Some(ValueType::Integer) => NodeKind::Integer(numeric_spec(object, pointer)?),
            Some(ValueType::Number) => NodeKind::Number(numeric_spec(object, pointer)?),
            Some(ValueType::String) => NodeKind::String(string_spec(object, pointer)?),
            Some(ValueType::Array) => NodeKind::Array(self.array_spec(object, pointer)?),
            Some(ValueType::Object) => NodeKind::Object(self.object_spec(object, pointer)?),
        })
    }

    fn array_spec(&mut self, object: &Map<String, Value>, pointer: &str) -> Result<ArraySpec> {
        let items = match object.get("items") {
            None => None,
            Some(items @ (Value::Object(_) | Value::Bool(_))) => {
                Some(Box::new(self.node(items, &child(pointer, "items"))?))
            }
            Some(_) => return Err(invalid_keyword(pointer, "items", "a schema object")),
        };
        let min_items = usize_keyword(object, "minItems", pointer)?;
        let max_items = usize_keyword(object, "maxItems", pointer)?;
        check_range(pointer, "minItems", min_items, "maxItems", max_items)?;
        Ok(ArraySpec {
            items,
            min_items,
            max_items,
            unique_items: bool_keyword(object, "uniqueItems", pointer)?.unwrap_or(false),
        })
    }

    fn object_spec(&mut self, object: &Map<String, Value>, pointer: &str) -> Result<ObjectSpec> {
        let mut properties = IndexMap::new();
        if let Some(declared) = object.get("properties") {
            let declared = declared
                .as_object()
                .ok_or_else(|| invalid_keyword(pointer, "properties", "an object"))?;
            let base = child(pointer, "properties");
            for (name, schema) in declared {
                properties.insert(name.clone(), self.node(schema, &child(&base, name))?);
            }
        }

        let additional = match object.get("additionalProperties") {
            None | Some(Value::Bool(true)) => AdditionalProperties::Allowed,
            Some(Value::Bool(false)) => AdditionalProperties::Forbidden,
            Some(schema @ Value::Object(_)) => AdditionalProperties::Schema(Box::new(
                self.node(schema, &child(pointer, "additionalProperties"))?,
            )),
            Some(_) => {
                return Err(invalid_keyword(
                    pointer,
                    "additionalProperties",
                    "a boolean or a schema object",
                ));
            }
        };

        let min_properties = usize_keyword(object, "minProperties", pointer)?;
        let max_properties = usize_keyword(object, "maxProperties", pointer)?;
        check_range(
            pointer,
            "minProperties",
            min_properties,
            "maxProperties",
            max_properties,
        )?;

        Ok(ObjectSpec {
            properties,
            required: string_list(object, "required", pointer)?,
            additional,
            min_properties,
            max_properties,
        })
    }

    fn composition(
        &mut self,
        keyword: &str,
        value: &Value,
        pointer: &str,
    ) -> Result<Option<CompositionNode>> {
        let at = child(pointer, keyword);
        Ok(Some(match keyword {
            "allOf" => CompositionNode::AllOf(self.branches(keyword, value, pointer)?),
            "anyOf" => CompositionNode::AnyOf(self.branches(keyword, value, pointer)?),
            "oneOf" => CompositionNode::OneOf(self.branches(keyword, value, pointer)?),
            "not" => CompositionNode::Not(Box::new(self.node(value, &at)?)),
            "const" => CompositionNode::Const(value.clone()),
            "dependencies" | "dependentRequired" | "dependentSchemas" => {
                let triggers = value
                    .as_object()
                    .ok_or_else(|| invalid_keyword(pointer, keyword, "an object"))?;
                let mut dependencies = IndexMap::new();
                for (trigger, dependent) in triggers {
                    let dependency = match dependent {
                        Value::Array(_) => Dependency::Properties(string_list(
                            triggers,
                            trigger,
                            &at,
                        )?),
                        Value::Object(_) | Value::Bool(_) => Dependency::Schema(Box::new(
                            self.node(dependent, &child(&at, trigger))?,
                        )),
                        _ => {
                            return Err(invalid_keyword(
                                &at,
                                trigger,
                                "an array of property names or a schema object",
                            ));
                        }
                    };
                    dependencies.insert(trigger.clone(), dependency);
                }
                CompositionNode::Dependencies(dependencies)
            }
            _ => return Ok(None),
        }))
    }

    fn branches(&mut self, keyword: &str, value: &Value, pointer: &str) -> Result<Vec<SchemaNode>> {
        let schemas = value
            .as_array()
            .filter(|schemas| !schemas.is_empty())
            .ok_or_else(|| invalid_keyword(pointer, keyword, "a non-empty array of schemas"))?;
        let base = child(pointer, keyword);
        schemas
            .iter()
            .enumerate()
            .map(|(index, schema)| self.node(schema, &child(&base, &index.to_string())))
            .collect()
    }
}

// ============================================================================
// LEAF SPECS
// ============================================================================

fn string_spec(object: &Map<String, Value>, pointer: &str) -> Result<StringSpec> {
    let min_length = usize_keyword(object, "minLength", pointer)?;
    let max_length = usize_keyword(object, "maxLength", pointer)?;
    check_range(pointer, "minLength", min_length, "maxLength", max_length)?;

    let pattern = match object.get("pattern") {
        None => None,
        Some(Value::String(source)) => {
            let regex = Regex::new(source).map_err(|err| SchemaError::InvalidPattern {
                pointer: child(pointer, "pattern"),
                pattern: source.clone(),
                reason: err.to_string(),
            })?;
            Some(Pattern::new(source.clone(), regex))
        }
        Some(_) => return Err(invalid_keyword(pointer, "pattern", "a string")),
    };

    let format = match object.get("format") {
        None => None,
        Some(Value::String(name)) => {
            Some(Format::parse(name).ok_or_else(|| SchemaError::UnknownFormat {
                pointer: child(pointer, "format"),
                format: name.clone(),
            })?)
        }
        Some(_) => return Err(invalid_keyword(pointer, "format", "a string")),
    };

    Ok(StringSpec {
        min_length,
        max_length,
        pattern,
        format,
    })
}

fn numeric_spec(object: &Map<String, Value>, pointer: &str) -> Result<NumericSpec> {
    let mut spec = NumericSpec {
        minimum: number_keyword(object, "minimum", pointer)?,
        maximum: number_keyword(object, "maximum", pointer)?,
        exclusive_minimum: None,
        exclusive_maximum: None,
        multiple_of: number_keyword(object, "multipleOf", pointer)?,
    };

    // Draft 4 spells exclusive bounds as a flag on minimum/maximum.
    match object.get("exclusiveMinimum") {
        Some(Value::Bool(true)) => spec.exclusive_minimum = spec.minimum.take(),
        Some(Value::Bool(false)) | None => {}
        Some(_) => spec.exclusive_minimum = number_keyword(object, "exclusiveMinimum", pointer)?,
    }
    match object.get("exclusiveMaximum") {
        Some(Value::Bool(true)) => spec.exclusive_maximum = spec.maximum.take(),
        Some(Value::Bool(false)) | None => {}
        Some(_) => spec.exclusive_maximum = number_keyword(object, "exclusiveMaximum", pointer)?,
    }

    if let Some(divisor) = spec.multiple_of {
        if !divisor.is_positive() {
            return Err(SchemaError::ConflictingConstraints {
                pointer: child(pointer, "multipleOf"),
                reason: format!("multipleOf must be greater than 0, found {divisor}"),
            });
        }
    }
    let lower = [spec.minimum, spec.exclusive_minimum];
    let upper = [spec.maximum, spec.exclusive_maximum];
    for (lo_index, lo) in lower.iter().enumerate() {
        for (hi_index, hi) in upper.iter().enumerate() {
            let (Some(lo), Some(hi)) = (lo, hi) else {
                continue;
            };
            let inclusive = lo_index == 0 && hi_index == 0;
            let conflict = match lo.compare(*hi) {
                Some(std::cmp::Ordering::Greater) => true,
                Some(std::cmp::Ordering::Equal) => !inclusive,
                _ => false,
            };
            if conflict {
                return Err(SchemaError::ConflictingConstraints {
                    pointer: pointer.to_owned(),
                    reason: format!("lower bound {lo} is not below upper bound {hi}"),
                });
            }
        }
    }
    Ok(spec)
}

// ============================================================================
// HELPERS
// ============================================================================

fn declared_types(object: &Map<String, Value>, pointer: &str) -> Result<(Vec<ValueType>, bool)> {
    let names: Vec<&str> = match object.get("type") {
        None => return Ok((Vec::new(), false)),
        Some(Value::String(name)) => vec![name.as_str()],
        Some(Value::Array(names)) => names
            .iter()
            .map(|name| {
                name.as_str()
                    .ok_or_else(|| invalid_keyword(pointer, "type", "a string or an array of strings"))
            })
            .collect::<Result<_>>()?,
        Some(_) => {
            return Err(invalid_keyword(
                pointer,
                "type",
                "a string or an array of strings",
            ));
        }
    };

    let mut types = Vec::with_capacity(names.len());
    let mut nullable = false;
    for name in names {
        match ValueType::parse(name) {
            Some(ValueType::Null) => nullable = true,
            Some(ty) => types.push(ty),
            None => {
                return Err(SchemaError::UnknownType {
                    pointer: child(pointer, "type"),
                    ty: name.to_owned(),
                });
            }
        }
    }
    Ok((types, nullable))
}

fn infer_type(object: &Map<String, Value>) -> Option<ValueType> {
    let has_any = |keys: &[&str]| keys.iter().any(|key| object.contains_key(*key));
    if has_any(&OBJECT_HINTS) {
        Some(ValueType::Object)
    } else if has_any(&ARRAY_HINTS) {
        Some(ValueType::Array)
    } else if has_any(&STRING_HINTS) {
        Some(ValueType::String)
    } else if has_any(&NUMBER_HINTS) {
        Some(ValueType::Number)
    } else {
        None
    }
}

fn check_default(node: &SchemaNode, default: &Value, pointer: &str) -> Result<()> {
    if default.is_null() && node.nullable {
        return Ok(());
    }
    let expected = match &node.kind {
        NodeKind::Any => return Ok(()),
        NodeKind::Null => (default.is_null(), "null"),
        NodeKind::Boolean => (default.is_boolean(), "a boolean"),
        NodeKind::Integer(_) => (
            default.is_i64() || default.as_f64().is_some_and(|f| f.fract() == 0.0),
            "an integer",
        ),
        NodeKind::Number(_) => (default.is_number(), "a number"),
        NodeKind::String(_) => (default.is_string(), "a string"),
        NodeKind::Array(_) => (default.is_array(), "an array"),
        NodeKind::Object(_) => (default.is_object(), "an object"),
    };
    match expected {
        (true, _) => Ok(()),
        (false, expected) => Err(SchemaError::InvalidDefault {
            pointer: child(pointer, "default"),
            expected,
        }),
    }
}

fn check_range(
    pointer: &str,
    min_keyword: &str,
    min: Option<usize>,
    max_keyword: &str,
    max: Option<usize>,
) -> Result<()> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(SchemaError::ConflictingConstraints {
            pointer: pointer.to_owned(),
            reason: format!("{min_keyword} {min} exceeds {max_keyword} {max}"),
        }),
        _ => Ok(()),
    }
}

fn usize_keyword(object: &Map<String, Value>, keyword: &str, pointer: &str) -> Result<Option<usize>> {
    object
        .get(keyword)
        .map(|value| {
            value
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| invalid_keyword(pointer, keyword, "a non-negative integer"))
        })
        .transpose()
}

fn u64_keyword(object: &Map<String, Value>, keyword: &str, pointer: &str) -> Result<Option<u64>> {
    object
        .get(keyword)
        .map(|value| {
            value
                .as_u64()
                .ok_or_else(|| invalid_keyword(pointer, keyword, "a non-negative integer"))
        })
        .transpose()
}

fn number_keyword(object: &Map<String, Value>, keyword: &str, pointer: &str) -> Result<Option<Number>> {
    object
        .get(keyword)
        .map(|value| match value {
            Value::Number(number) => Number::from_json(number)
                .ok_or_else(|| invalid_keyword(pointer, keyword, "a finite number")),
            _ => Err(invalid_keyword(pointer, keyword, "a number")),
        })
        .transpose()
}

fn bool_keyword(object: &Map<String, Value>, keyword: &str, pointer: &str) -> Result<Option<bool>> {
    object
        .get(keyword)
        .map(|value| {
            value
                .as_bool()
                .ok_or_else(|| invalid_keyword(pointer, keyword, "a boolean"))
        })
        .transpose()
}

fn string_list(object: &Map<String, Value>, keyword: &str, pointer: &str) -> Result<Vec<String>> {
    match object.get(keyword) {
        None | Some(Value::Bool(_)) if keyword == "required" => Ok(Vec::new()),
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| invalid_keyword(pointer, keyword, "an array of strings"))
            })
            .collect(),
        Some(_) => Err(invalid_keyword(pointer, keyword, "an array of strings")),
    }
}

fn invalid_keyword(pointer: &str, keyword: &str, expected: &'static str) -> SchemaError {
    SchemaError::InvalidKeyword {
        pointer: pointer.to_owned(),
        keyword: keyword.to_owned(),
        expected,
    }
}

/// Appends one reference token to a JSON pointer.
fn child(pointer: &str, token: &str) -> String {
    format!("{pointer}/{}", token.replace('~', "~0").replace('/', "~1"))
}
