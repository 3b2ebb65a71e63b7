//! String length validators
//!
//! Length is measured in Unicode scalar values (chars), as JSON Schema
//! prescribes.

use crate::foundation::{ErrorContext, ErrorKind, ValidationError};
use crate::validators::plural;

// ============================================================================
// MIN LENGTH
// ============================================================================

crate::validator! {
    /// Validates that a string has at least a minimum length.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub MinLength { min: usize } for str;
    rule(self, input) { input.chars().count() >= self.min }
    error(self, input) {
        ValidationError::new(
            ErrorKind::StringTooShort,
            format!("String should have at least {}", plural(self.min, "character")),
        )
        .with_ctx(ErrorContext::MinLength {
            min_length: self.min,
            actual_length: input.chars().count(),
        })
    }
    fn min_length(min: usize);
}

// ============================================================================
// MAX LENGTH
// ============================================================================

crate::validator! {
    /// Validates that a string does not exceed a maximum length.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub MaxLength { max: usize } for str;
    rule(self, input) { input.chars().count() <= self.max }
    error(self, input) {
        ValidationError::new(
            ErrorKind::StringTooLong,
            format!("String should have at most {}", plural(self.max, "character")),
        )
        .with_ctx(ErrorContext::MaxLength {
            max_length: self.max,
            actual_length: input.chars().count(),
        })
    }
    fn max_length(max: usize);
}
