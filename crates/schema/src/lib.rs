//! # gatehouse-schema
//!
//! Compiles a route's parameter, body and file declarations into an
//! immutable [`SchemaModel`].
//!
//! ```rust
//! use gatehouse_schema::{Source, compile};
//! use serde_json::json;
//!
//! let model = compile(&json!({
//!     "parameters": {
//!         "type": "object",
//!         "properties": {
//!             "q": { "type": "string", "minLength": 3 },
//!             "x_token": { "type": "string", "source": "header" }
//!         },
//!         "required": ["x_token"]
//!     },
//!     "body": { "type": "object", "properties": { "name": { "type": "string" } } }
//! }))
//! .unwrap();
//!
//! assert_eq!(model.parameters().count(), 2);
//! assert!(model.field(Source::Header, "x_token").unwrap().required);
//! assert!(model.body().is_some());
//! ```
//!
//! Compilation is the only place schema problems surface: a bad regex,
//! an unknown format or a dangling `$ref` fail route registration with a
//! [`SchemaError`] instead of failing requests later.

mod compile;
mod error;
mod kind;
mod model;
mod node;

pub use compile::{SchemaCompiler, compile};
pub use error::SchemaError;
pub use kind::{Format, Separator, Source, ValueType};
pub use model::{FieldShape, FieldSpec, FileRules, SchemaModel};
pub use node::{
    AdditionalProperties, ArraySpec, CompositionNode, Dependency, NodeKind, Number, NumericSpec,
    ObjectSpec, Pattern, SchemaNode, StringSpec,
};
