//! Core validation types and traits
//!
//! - **Traits**: [`Validate`]
//! - **Errors**: [`ValidationError`], [`ErrorKind`], [`ErrorContext`]
//! - **Locations**: [`Location`], [`Segment`]
//!
//! Leaf validators return a single unpositioned [`ValidationError`]; the
//! constraint walker positions it and collects it into an
//! [`ErrorAggregator`](crate::report::ErrorAggregator).

pub mod context;
pub mod error;
pub mod location;
pub mod traits;

pub use context::ErrorContext;
pub use error::{ErrorKind, ValidationError, json_type_name};
pub use location::{Location, Segment};
pub use traits::Validate;
