//! Regex pattern validator

use gatehouse_schema::Pattern;

use crate::foundation::{ErrorContext, ErrorKind, Validate, ValidationError};

/// Validates that a string matches a compiled `pattern` keyword.
///
/// Matching is an unanchored search: `^`/`$` must be spelled out in the
/// pattern to anchor it.
#[derive(Debug, Clone, Copy)]
pub struct Matches<'p> {
    pattern: &'p Pattern,
}

impl<'p> Matches<'p> {
    #[must_use]
    pub fn new(pattern: &'p Pattern) -> Self {
        Self { pattern }
    }
}

impl Validate for Matches<'_> {
    type Input = str;

    fn validate(&self, input: &str) -> Result<(), ValidationError> {
        if self.pattern.is_match(input) {
            return Ok(());
        }
        Err(ValidationError::new(
            ErrorKind::StringPatternMismatch,
            format!("String should match pattern '{}'", self.pattern.as_str()),
        )
        .with_ctx(ErrorContext::Pattern {
            pattern: self.pattern.as_str().to_owned(),
            value: input.to_owned(),
        }))
    }
}

/// Creates a [`Matches`] validator.
#[must_use]
pub fn matches(pattern: &Pattern) -> Matches<'_> {
    Matches::new(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_schema::{NodeKind, compile};
    use serde_json::json;

    fn pattern(source: &str) -> Pattern {
        let model = compile(&json!({"body": {"type": "string", "pattern": source}})).unwrap();
        match &model.body().unwrap().schema().unwrap().kind {
            NodeKind::String(spec) => spec.pattern.clone().unwrap(),
            _ => unreachable!(),
        }
    }

    #[test]
    fn unanchored_search() {
        let p = pattern("[0-9]+");
        assert!(matches(&p).validate("abc123").is_ok());
        assert!(matches(&p).validate("abc").is_err());
    }

    #[test]
    fn error_names_pattern() {
        let p = pattern("^[a-z]+$");
        let err = matches(&p).validate("invalid@owner").unwrap_err();
        assert_eq!(err.kind, ErrorKind::StringPatternMismatch);
        assert_eq!(err.msg, "String should match pattern '^[a-z]+$'");
        assert_eq!(err.ctx_value("value"), Some(json!("invalid@owner")));
    }
}
