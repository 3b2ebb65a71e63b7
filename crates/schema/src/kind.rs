//! Closed vocabularies of the declaration language: parameter sources,
//! JSON types, string formats and array separators.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// SOURCE
// ============================================================================

/// Where in the request a field is read from.
///
/// The lowercase name doubles as the first segment of every error `loc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Named capture of the matched route path.
    Path,
    /// Query string key.
    Query,
    /// Request header, matched case-insensitively.
    Header,
    /// Cookie, matched exactly.
    Cookie,
    /// The request body as a whole.
    Body,
    /// A multipart file part.
    Files,
}

impl Source {
    /// All sources, in the order used for `loc` prefixes.
    pub const ALL: [Self; 6] = [
        Self::Path,
        Self::Query,
        Self::Header,
        Self::Cookie,
        Self::Body,
        Self::Files,
    ];

    /// The lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
            Self::Body => "body",
            Self::Files => "files",
        }
    }

    /// Parses a wire name. Unknown names yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|source| source.as_str() == name)
    }

    /// Whether a parameter declared under `parameters` may use this source.
    #[must_use]
    pub const fn is_parameter(self) -> bool {
        matches!(self, Self::Path | Self::Query | Self::Header | Self::Cookie)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// VALUE TYPE
// ============================================================================

/// A JSON Schema `type` name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    Null,
}

impl ValueType {
    /// The JSON Schema name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
        }
    }

    /// Parses a JSON Schema type name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "string" => Self::String,
            "integer" => Self::Integer,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            "object" => Self::Object,
            "null" => Self::Null,
            _ => return None,
        })
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// FORMAT
// ============================================================================

/// A string `format` the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Uuid,
    Date,
    DateTime,
    Time,
    /// ISO 8601 duration such as `P1DT2H`.
    Duration,
    /// Arbitrary-precision decimal number carried as a string.
    Decimal,
    Email,
    Ipv4,
    Ipv6,
    Uri,
    Hostname,
    /// Opaque payload; any string passes.
    Binary,
}

impl Format {
    /// The JSON Schema format name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uuid => "uuid",
            Self::Date => "date",
            Self::DateTime => "date-time",
            Self::Time => "time",
            Self::Duration => "duration",
            Self::Decimal => "decimal",
            Self::Email => "email",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
            Self::Uri => "uri",
            Self::Hostname => "hostname",
            Self::Binary => "binary",
        }
    }

    /// Parses a format name, accepting the common aliases (`datetime`,
    /// `url`, `byte`).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "uuid" => Self::Uuid,
            "date" => Self::Date,
            "date-time" | "datetime" => Self::DateTime,
            "time" => Self::Time,
            "duration" => Self::Duration,
            "decimal" => Self::Decimal,
            "email" => Self::Email,
            "ipv4" => Self::Ipv4,
            "ipv6" => Self::Ipv6,
            "uri" | "url" => Self::Uri,
            "hostname" => Self::Hostname,
            "binary" | "byte" => Self::Binary,
            _ => return None,
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SEPARATOR
// ============================================================================

/// Delimiter used to split a single wire value into array elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Separator {
    Pipe,
    Semicolon,
    Space,
    Comma,
}

impl Separator {
    /// The delimiter character.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Pipe => '|',
            Self::Semicolon => ';',
            Self::Space => ' ',
            Self::Comma => ',',
        }
    }

    /// Parses either the literal delimiter or its name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "|" | "pipe" => Self::Pipe,
            ";" | "semicolon" => Self::Semicolon,
            " " | "space" => Self::Space,
            "," | "comma" => Self::Comma,
            _ => return None,
        })
    }

    /// Splits `raw` on this delimiter. Empty input yields no elements.
    pub fn split(self, raw: &str) -> impl Iterator<Item = &str> {
        raw.split(self.as_char()).filter(|_| !raw.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_round_trips_through_wire_name() {
        for source in Source::ALL {
            assert_eq!(Source::parse(source.as_str()), Some(source));
        }
        assert_eq!(Source::parse("Query"), None);
        assert!(Source::Header.is_parameter());
        assert!(!Source::Files.is_parameter());
    }

    #[test]
    fn format_aliases() {
        assert_eq!(Format::parse("datetime"), Some(Format::DateTime));
        assert_eq!(Format::parse("url"), Some(Format::Uri));
        assert_eq!(Format::parse("ulid"), None);
        assert_eq!(Format::DateTime.to_string(), "date-time");
    }

    #[test]
    fn separator_split() {
        let sep = Separator::parse("|").unwrap();
        assert_eq!(sep.split("a|b|c").collect::<Vec<_>>(), ["a", "b", "c"]);
        assert_eq!(sep.split("").count(), 0);
        assert_eq!(Separator::parse("comma"), Some(Separator::Comma));
        assert_eq!(Separator::parse("/"), None);
    }

    #[test]
    fn value_type_names() {
        assert_eq!(ValueType::parse("integer"), Some(ValueType::Integer));
        assert_eq!(ValueType::parse("int"), None);
        assert_eq!(ValueType::Null.to_string(), "null");
    }
}
