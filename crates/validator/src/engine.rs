//! The validation entry point.
//!
//! [`ValidationEngine::validate`] runs every declared field of a route
//! through extraction, coercion and constraint checks, and either returns
//! the typed parameters or rejects the request with every error found.
//!
//! ```rust
//! use gatehouse_schema::compile;
//! use gatehouse_validator::{RawView, ValidationEngine};
//! use serde_json::json;
//!
//! let schema = compile(&json!({
//!     "parameters": {
//!         "properties": { "item_id": { "type": "integer", "source": "path" } }
//!     }
//! }))
//! .unwrap();
//! let engine = ValidationEngine::default();
//!
//! let ok = engine
//!     .validate(&schema, &RawView::new().with_path_param("item_id", "42"))
//!     .unwrap();
//! assert_eq!(ok.get("item_id").and_then(|v| v.as_i64()), Some(42));
//!
//! let rejected = engine
//!     .validate(&schema, &RawView::new().with_path_param("item_id", "foobar"))
//!     .unwrap_err();
//! assert_eq!(rejected.status(), 422);
//! assert_eq!(rejected.errors()[0].loc, ["path", "item_id"]);
//! ```

use gatehouse_schema::{FieldShape, FieldSpec, SchemaModel, Source};
use tracing::{debug, debug_span, trace, warn};

use crate::coerce::Mode;
use crate::config::{ConfigError, EngineConfig, MIN_MAGIC_SNIFF_LEN};
use crate::constraints::ConstraintValidator;
use crate::extract::{Extracted, ValueExtractor};
use crate::files::FileValidator;
use crate::foundation::{Location, ValidationError};
use crate::raw::RawView;
use crate::report::{ErrorAggregator, ProblemDetails, Rejection};
use crate::typed::TypedParams;

/// Orchestrates validation of one request against one route schema.
///
/// The engine holds only configuration; it is cheap to share and safe to
/// use from any number of threads at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationEngine {
    config: EngineConfig,
}

impl ValidationEngine {
    /// Builds an engine without checking `config`. A `magic_sniff_len`
    /// below [`MIN_MAGIC_SNIFF_LEN`] is raised to it when files are
    /// checked; use [`ValidationEngine::try_new`] to reject it instead.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        if config.magic_sniff_len < MIN_MAGIC_SNIFF_LEN {
            warn!(
                magic_sniff_len = config.magic_sniff_len,
                min = MIN_MAGIC_SNIFF_LEN,
                "magic sniff length raised to the minimum"
            );
        }
        Self { config }
    }

    /// Builds an engine from a config that passes
    /// [`EngineConfig::validate`].
    pub fn try_new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validates a request, collecting every error.
    ///
    /// Fields are processed in schema order: parameters, then the body,
    /// then files. A body that is not parseable JSON rejects the request
    /// before any field is looked at.
    pub fn validate(&self, schema: &SchemaModel, raw: &RawView) -> Result<TypedParams, Rejection> {
        let span = debug_span!("validate", route = schema.route().unwrap_or("-"), fields = schema.len());
        let _guard = span.enter();

        let extractor = ValueExtractor::new(schema, raw).inspect_err(|malformed| {
            debug!(reason = %malformed.reason, "malformed request body");
        })?;
        let files = FileValidator::new(self.config.max_file_size, self.config.magic_sniff_len)
            .with_input(self.config.include_input);

        let mut errors = ErrorAggregator::new();
        let mut params = TypedParams::default();
        for field in schema.fields() {
            trace!(field = %field.name, source = field.source.as_str(), "validating field");
            match &field.shape {
                FieldShape::File(rules) => {
                    let part = extractor.part(&field.name);
                    if let Some(file) =
                        files.validate(&field.name, field.required, rules, part, &mut errors)
                    {
                        params.insert_file(&field.name, file);
                    }
                }
                FieldShape::Value(node) => {
                    let loc = field_location(field);
                    let typed = match extractor.extract(field) {
                        Extracted::Found(value) => {
                            let mode = self.mode_for(field, &extractor);
                            ConstraintValidator::new(mode)
                                .with_input(self.config.include_input)
                                .validate(node, &value, &loc, &mut errors)
                        }
                        Extracted::UsesDefault(default) => {
                            Some(ConstraintValidator::default_value(node, default))
                        }
                        Extracted::Missing => {
                            if field.required {
                                errors.add(ValidationError::missing().at(loc));
                            }
                            None
                        }
                    };
                    match (typed, field.source) {
                        (Some(typed), Source::Body) => params.set_body(typed),
                        (Some(typed), source) => params.insert_param(source, &field.name, typed),
                        (None, _) => {}
                    }
                }
            }
        }

        match errors.into_report(&self.config.problem_type_base) {
            Some(report) => {
                debug!(errors = report.errors.len(), "request rejected");
                Err(Rejection::Validation(report))
            }
            None => Ok(params),
        }
    }

    /// The envelope to send for a rejection, using this engine's problem
    /// type base.
    #[must_use]
    pub fn problem_details(&self, rejection: &Rejection) -> ProblemDetails {
        rejection.to_problem(&self.config.problem_type_base)
    }

    /// Bytes to buffer for a multipart part before draining the rest: the
    /// file field's `max_size` plus one, so an oversized part is still seen
    /// as oversized. Parts that are not declared files use the global cap.
    #[must_use]
    pub fn part_limit(&self, schema: &SchemaModel, name: &str) -> u64 {
        schema
            .field(Source::Files, name)
            .and_then(FieldSpec::file_rules)
            .and_then(|rules| rules.max_size)
            .unwrap_or(self.config.max_file_size)
            .saturating_add(1)
    }

    fn mode_for(&self, field: &FieldSpec, extractor: &ValueExtractor<'_>) -> Mode {
        if field.source == Source::Body && extractor.body_is_json() {
            Mode::Json
        } else {
            self.config.wire_mode(field.source)
        }
    }
}

/// Validates with the default configuration.
pub fn validate(schema: &SchemaModel, raw: &RawView) -> Result<TypedParams, Rejection> {
    ValidationEngine::default().validate(schema, raw)
}

fn field_location(field: &FieldSpec) -> Location {
    let root = Location::root(field.source);
    if field.source == Source::Body {
        root
    } else {
        root.key(field.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::ErrorKind;
    use crate::raw::Part;
    use crate::typed::TypedValue;
    use gatehouse_schema::compile;
    use serde_json::json;

    fn schema(declaration: serde_json::Value) -> SchemaModel {
        compile(&declaration).unwrap()
    }

    #[test]
    fn collects_errors_across_sources() {
        let schema = schema(json!({
            "parameters": {"properties": {
                "item_id": {"type": "integer", "source": "path"},
                "x_token": {"type": "string", "source": "header"},
                "limit": {"type": "integer", "minimum": 1}
            }, "required": ["x_token"]},
            "body": {"type": "object", "properties": {"name": {"type": "string"}}, "required": ["name"]}
        }));
        let raw = RawView::new()
            .with_path_param("item_id", "abc")
            .with_query("limit=0")
            .with_json_body(&b"{}"[..]);
        let rejection = ValidationEngine::default().validate(&schema, &raw).unwrap_err();
        let locs: Vec<Vec<String>> = rejection.errors().iter().map(|e| e.loc.to_strings()).collect();
        assert_eq!(
            locs,
            vec![
                vec!["path", "item_id"],
                vec!["header", "x_token"],
                vec!["query", "limit"],
                vec!["body", "name"],
            ]
        );
        assert_eq!(rejection.errors()[1].kind, ErrorKind::Missing);
    }

    #[test]
    fn defaults_fill_absent_parameters() {
        let schema = schema(json!({"parameters": {"properties": {
            "page": {"type": "integer", "default": 1},
            "sort": {"type": "string", "enum": ["asc", "desc"], "default": "asc"}
        }}}));
        let params = validate(&schema, &RawView::new()).unwrap();
        assert_eq!(params.get("page"), Some(&TypedValue::Integer(1)));
        assert_eq!(params.get("sort").and_then(TypedValue::as_str), Some("asc"));
    }

    #[test]
    fn empty_query_bool_is_false_but_not_in_headers() {
        let schema = schema(json!({"parameters": {"properties": {
            "flag": {"type": "boolean"},
            "x_flag": {"type": "boolean", "source": "header"}
        }}}));
        let raw = RawView::new().with_query("flag=").with_header("X-Flag", "");
        let rejection = validate(&schema, &raw).unwrap_err();
        assert_eq!(rejection.errors().len(), 1);
        assert_eq!(rejection.errors()[0].loc, ["header", "x_flag"]);
        assert_eq!(rejection.errors()[0].kind, ErrorKind::BoolParsing);
    }

    #[test]
    fn input_can_be_omitted() {
        let schema = schema(json!({"parameters": {"properties": {"n": {"type": "integer"}}}}));
        let engine = ValidationEngine::new(EngineConfig::default().with_include_input(false));
        let rejection = engine.validate(&schema, &RawView::new().with_query("n=x")).unwrap_err();
        assert_eq!(rejection.errors()[0].input, None);
    }

    #[test]
    fn malformed_json_short_circuits() {
        let schema = schema(json!({
            "parameters": {"properties": {"q": {"type": "string"}}, "required": ["q"]},
            "body": {"type": "object"}
        }));
        let rejection = validate(&schema, &RawView::new().with_json_body(&b"{oops"[..])).unwrap_err();
        assert_eq!(rejection.status(), 400);
        let problem = ValidationEngine::default().problem_details(&rejection);
        assert_eq!(problem.title, "Invalid request format");
    }

    #[test]
    fn files_are_returned_with_detected_type() {
        let schema = schema(json!({"files": {"avatar": {"content_type": ["image/png"]}}}));
        let raw = RawView::new().with_part(Part::file(
            "avatar",
            "a.png",
            "image/png",
            &b"\x89PNG\r\n\x1a\nrest"[..],
        ));
        let params = validate(&schema, &raw).unwrap();
        let file = params.file("avatar").unwrap();
        assert_eq!(file.size, 12);
        assert_eq!(file.detected_type, Some("image/png"));
    }

    #[test]
    fn short_sniff_len_is_rejected_or_raised() {
        let config = EngineConfig::default().with_magic_sniff_len(0);
        assert!(matches!(
            ValidationEngine::try_new(config.clone()),
            Err(ConfigError::Invalid { field: "magic_sniff_len", .. })
        ));

        let schema = schema(json!({"files": {"image": {
            "content_type": ["image/jpeg"],
            "validate_magic_numbers": true
        }}}));
        let raw = RawView::new().with_part(Part::file(
            "image",
            "a.jpg",
            "image/jpeg",
            &b"\x89PNG\r\n\x1a\nrest"[..],
        ));
        let rejection = ValidationEngine::new(config).validate(&schema, &raw).unwrap_err();
        assert_eq!(rejection.errors().len(), 1);
        assert_eq!(
            rejection.errors()[0].ctx_value("detected_type"),
            Some(json!("image/png"))
        );
    }

    #[test]
    fn part_limit_prefers_declared_max() {
        let schema = schema(json!({"files": {"doc": {"max_size": 100}, "any": {}}}));
        let engine = ValidationEngine::default();
        assert_eq!(engine.part_limit(&schema, "doc"), 101);
        assert_eq!(engine.part_limit(&schema, "any"), 10 * 1024 * 1024 + 1);
    }
}
