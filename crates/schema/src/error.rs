/// Error type for schema compilation.
///
/// Every variant carries the JSON pointer of the offending keyword inside
/// the route declaration, so a registration failure points straight at the
/// broken line of the declaration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The declaration (or a sub-schema) is not a JSON object.
    #[error("expected a JSON object at `{pointer}`")]
    NotAnObject { pointer: String },

    /// `pattern` is not a valid regular expression.
    #[error("invalid pattern `{pattern}` at `{pointer}`: {reason}")]
    InvalidPattern {
        pointer: String,
        pattern: String,
        reason: String,
    },

    /// `format` names a format the engine does not know.
    #[error("unknown format `{format}` at `{pointer}`")]
    UnknownFormat { pointer: String, format: String },

    /// `type` names a type the engine does not know.
    #[error("unknown type `{ty}` at `{pointer}`")]
    UnknownType { pointer: String, ty: String },

    /// `source` is not one of `path`, `query`, `header`, `cookie`.
    #[error("unknown parameter source `{value}` at `{pointer}`")]
    UnknownSource { pointer: String, value: String },

    /// `separator` is not one of `|`, `;`, space or `,`, or is declared on
    /// a field that cannot carry one.
    #[error("invalid separator `{value}` at `{pointer}`: {reason}")]
    InvalidSeparator {
        pointer: String,
        value: String,
        reason: String,
    },

    /// Two constraints can never be satisfied together.
    #[error("conflicting constraints at `{pointer}`: {reason}")]
    ConflictingConstraints { pointer: String, reason: String },

    /// A keyword holds a value of the wrong JSON type.
    #[error("keyword `{keyword}` at `{pointer}` must be {expected}")]
    InvalidKeyword {
        pointer: String,
        keyword: String,
        expected: &'static str,
    },

    /// `$ref` does not point at anything inside the declaration.
    #[error("unresolved reference `{reference}` at `{pointer}`")]
    UnresolvedRef { pointer: String, reference: String },

    /// `$ref` chain loops back onto itself.
    #[error("circular reference `{reference}` at `{pointer}`")]
    CircularRef { pointer: String, reference: String },

    /// `default` does not have the JSON type the field declares.
    #[error("default at `{pointer}` must be {expected}")]
    InvalidDefault {
        pointer: String,
        expected: &'static str,
    },
}

impl SchemaError {
    /// Broad error category for grouping in logs.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::NotAnObject { .. } | Self::InvalidKeyword { .. } => "shape",
            Self::InvalidPattern { .. } => "pattern",
            Self::UnknownFormat { .. } | Self::UnknownType { .. } | Self::UnknownSource { .. } => {
                "vocabulary"
            }
            Self::InvalidSeparator { .. } => "separator",
            Self::ConflictingConstraints { .. } | Self::InvalidDefault { .. } => "constraint",
            Self::UnresolvedRef { .. } | Self::CircularRef { .. } => "reference",
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::NotAnObject { .. } => "SCHEMA_NOT_OBJECT",
            Self::InvalidPattern { .. } => "SCHEMA_INVALID_PATTERN",
            Self::UnknownFormat { .. } => "SCHEMA_UNKNOWN_FORMAT",
            Self::UnknownType { .. } => "SCHEMA_UNKNOWN_TYPE",
            Self::UnknownSource { .. } => "SCHEMA_UNKNOWN_SOURCE",
            Self::InvalidSeparator { .. } => "SCHEMA_INVALID_SEPARATOR",
            Self::ConflictingConstraints { .. } => "SCHEMA_CONFLICT",
            Self::InvalidKeyword { .. } => "SCHEMA_INVALID_KEYWORD",
            Self::UnresolvedRef { .. } => "SCHEMA_UNRESOLVED_REF",
            Self::CircularRef { .. } => "SCHEMA_CIRCULAR_REF",
            Self::InvalidDefault { .. } => "SCHEMA_INVALID_DEFAULT",
        }
    }

    /// JSON pointer of the offending keyword.
    #[must_use]
    pub fn pointer(&self) -> &str {
        match self {
            Self::NotAnObject { pointer }
            | Self::InvalidPattern { pointer, .. }
            | Self::UnknownFormat { pointer, .. }
            | Self::UnknownType { pointer, .. }
            | Self::UnknownSource { pointer, .. }
            | Self::InvalidSeparator { pointer, .. }
            | Self::ConflictingConstraints { pointer, .. }
            | Self::InvalidKeyword { pointer, .. }
            | Self::UnresolvedRef { pointer, .. }
            | Self::CircularRef { pointer, .. }
            | Self::InvalidDefault { pointer, .. } => pointer,
        }
    }
}
