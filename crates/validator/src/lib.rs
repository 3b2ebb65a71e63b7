//! # gatehouse-validator
//!
//! Validates raw HTTP requests against a compiled route schema and turns
//! them into typed parameters.
//!
//! ## Quick Start
//!
//! ```rust
//! use gatehouse_validator::prelude::*;
//! use serde_json::json;
//!
//! let schema = compile(&json!({
//!     "parameters": {
//!         "properties": {
//!             "quantity": { "type": "integer", "multipleOf": 5 },
//!             "x_token": { "type": "string", "source": "header", "minLength": 8 }
//!         },
//!         "required": ["x_token"]
//!     }
//! }))
//! .unwrap()
//! .shared();
//!
//! let raw = RawView::new().with_query("quantity=17");
//! let rejection = validate(&schema, &raw).unwrap_err();
//!
//! // Every violation is reported, not just the first.
//! assert_eq!(rejection.errors().len(), 2);
//! assert_eq!(rejection.errors()[0].ctx_value("multiple_of"), Some(json!(5)));
//! assert_eq!(rejection.errors()[1].kind, ErrorKind::Missing);
//! ```
//!
//! ## Pipeline
//!
//! - [`extract`]: pulls each declared field out of a [`RawView`]
//! - [`coerce`]: turns wire strings into typed values, including formats
//! - [`constraints`]: walks the schema node, applying keyword checks
//! - [`combinators`]: `allOf`, `anyOf`, `oneOf`, `not`, `const`, `dependencies`
//! - [`files`]: multipart presence, size, content type and magic numbers
//! - [`report`]: collects errors into the problem-details envelope
//!
//! [`ValidationEngine`] ties these together.

// ValidationError travels by value through every check; boxing it would add
// an allocation per failure for no gain.
#![allow(clippy::result_large_err)]

pub mod coerce;
pub mod combinators;
pub mod config;
pub mod constraints;
pub mod engine;
pub mod extract;
pub mod files;
pub mod foundation;
mod macros;
pub mod prelude;
pub mod raw;
pub mod report;
pub mod typed;
pub mod validators;

pub use config::{ConfigError, EngineConfig};
pub use engine::{ValidationEngine, validate};
pub use raw::{Part, RawBody, RawView};
pub use report::{MalformedBody, ProblemDetails, Rejection, ValidationReport};
pub use typed::{TypedParams, TypedValue, UploadedFile};
