//! Prelude module for convenient imports.
//!
//! ```rust
//! use gatehouse_validator::prelude::*;
//! use serde_json::json;
//!
//! let schema = compile(&json!({ "body": { "type": "integer", "minimum": 1 } })).unwrap();
//! let raw = RawView::new().with_json_body(&b"0"[..]);
//! let rejection = ValidationEngine::default().validate(&schema, &raw).unwrap_err();
//! assert_eq!(rejection.errors()[0].kind, ErrorKind::GreaterThanEqual);
//! ```

// ============================================================================
// SCHEMA
// ============================================================================

pub use gatehouse_schema::{FieldSpec, SchemaError, SchemaModel, Source, compile};

// ============================================================================
// ENGINE: Entry point, configuration, request view
// ============================================================================

pub use crate::config::{ConfigError, EngineConfig};
pub use crate::engine::{ValidationEngine, validate};
pub use crate::raw::{Part, RawBody, RawView};

// ============================================================================
// RESULTS: Typed output and rejections
// ============================================================================

pub use crate::report::{
    ErrorAggregator, MalformedBody, ProblemDetails, Rejection, ValidationReport,
};
pub use crate::typed::{TypedParams, TypedValue, UploadedFile};

// ============================================================================
// FOUNDATION: Errors and locations
// ============================================================================

pub use crate::foundation::{ErrorContext, ErrorKind, Location, Validate, ValidationError};
