//! Route-level model: the ordered list of fields a request is checked
//! against.

use std::sync::Arc;

use serde_json::Value;

use crate::kind::{Separator, Source};
use crate::node::SchemaNode;

// ============================================================================
// FILE RULES
// ============================================================================

/// Declared checks for one multipart file field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileRules {
    /// Allowed MIME types; empty means any.
    pub content_types: Vec<String>,
    pub validate_magic_numbers: bool,
    pub max_size: Option<u64>,
    pub min_size: Option<u64>,
}

impl FileRules {
    /// Whether `content_type` is in the allowlist. Parameters after `;` are
    /// ignored and the comparison is case-insensitive.
    #[must_use]
    pub fn allows(&self, content_type: &str) -> bool {
        if self.content_types.is_empty() {
            return true;
        }
        let essence = content_type.split(';').next().unwrap_or("").trim();
        self.content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(essence))
    }
}

// ============================================================================
// FIELD SPEC
// ============================================================================

/// What a field holds: a schema-typed value or an uploaded file.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldShape {
    Value(SchemaNode),
    File(FileRules),
}

/// Compiled description of one declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub source: Source,
    pub required: bool,
    pub default: Option<Value>,
    pub separator: Option<Separator>,
    /// Path capture spanning the remainder of the path (`{file_path:path}`).
    /// Only a remainder capture decodes an encoded `/`.
    pub path_remainder: bool,
    pub shape: FieldShape,
}

impl FieldSpec {
    /// The value schema, `None` for file fields.
    #[must_use]
    pub fn schema(&self) -> Option<&SchemaNode> {
        match &self.shape {
            FieldShape::Value(node) => Some(node),
            FieldShape::File(_) => None,
        }
    }

    /// The file rules, `None` for value fields.
    #[must_use]
    pub fn file_rules(&self) -> Option<&FileRules> {
        match &self.shape {
            FieldShape::File(rules) => Some(rules),
            FieldShape::Value(_) => None,
        }
    }
}

// ============================================================================
// SCHEMA MODEL
// ============================================================================

/// Immutable compiled schema of one route.
///
/// Fields are ordered: parameters in declaration order, then the body, then
/// file fields. The model is `Send + Sync` and is meant to be built once and
/// shared behind an [`Arc`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaModel {
    route: Option<String>,
    fields: Vec<FieldSpec>,
}

impl SchemaModel {
    pub(crate) fn new(route: Option<String>, fields: Vec<FieldSpec>) -> Self {
        Self { route, fields }
    }

    /// Wraps the model for sharing across requests.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Route label given at compile time, used in log spans.
    #[must_use]
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks a field up by source and name.
    #[must_use]
    pub fn field(&self, source: Source, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|field| field.source == source && field.name == name)
    }

    /// Path, query, header and cookie fields.
    pub fn parameters(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|field| field.source.is_parameter())
    }

    /// The body field, if the route declares one.
    #[must_use]
    pub fn body(&self) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.source == Source::Body)
    }

    /// Declared file fields.
    pub fn files(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields
            .iter()
            .filter(|field| field.source == Source::Files)
    }
}
