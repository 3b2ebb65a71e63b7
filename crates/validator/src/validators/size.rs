//! Collection size validators: array item counts, object property counts
//! and item uniqueness.

use serde_json::{Map, Value};

use crate::foundation::{ErrorContext, ErrorKind, ValidationError};
use crate::validators::{json_eq, plural};

// ============================================================================
// ARRAYS
// ============================================================================

crate::validator! {
    /// `minItems`.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub MinItems { min: usize } for [Value];
    rule(self, input) { input.len() >= self.min }
    error(self, input) {
        ValidationError::new(
            ErrorKind::TooShort,
            format!("List should have at least {} after validation", plural(self.min, "item")),
        )
        .with_ctx(ErrorContext::MinLength { min_length: self.min, actual_length: input.len() })
    }
    fn min_items(min: usize);
}

crate::validator! {
    /// `maxItems`.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub MaxItems { max: usize } for [Value];
    rule(self, input) { input.len() <= self.max }
    error(self, input) {
        ValidationError::new(
            ErrorKind::TooMany,
            format!("List should have at most {} after validation", plural(self.max, "item")),
        )
        .with_ctx(ErrorContext::MaxLength { max_length: self.max, actual_length: input.len() })
    }
    fn max_items(max: usize);
}

crate::validator! {
    /// `uniqueItems`. Reports the first repeated element.
    pub UniqueItems for [Value];
    rule(input) { first_duplicate(input).is_none() }
    error(input) {
        let (first_index, duplicate_index) = first_duplicate(input).unwrap_or_default();
        ValidationError::rule("Array items must be unique")
            .with_ctx(ErrorContext::UniqueItems { duplicate_index, first_index })
    }
    fn unique_items();
}

/// `(first, duplicate)` indices of the first repeated element.
fn first_duplicate(items: &[Value]) -> Option<(usize, usize)> {
    items.iter().enumerate().skip(1).find_map(|(j, later)| {
        items[..j]
            .iter()
            .position(|earlier| json_eq(earlier, later))
            .map(|i| (i, j))
    })
}

// ============================================================================
// OBJECTS
// ============================================================================

crate::validator! {
    /// `minProperties`; counts own keys only.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub MinProperties { min: usize } for Map<String, Value>;
    rule(self, input) { input.len() >= self.min }
    error(self, input) {
        ValidationError::rule(format!("Object must have at least {}", plural(self.min, "property")))
            .with_ctx(ErrorContext::MinProperties { min_properties: self.min, actual_properties: input.len() })
    }
    fn min_properties(min: usize);
}

crate::validator! {
    /// `maxProperties`; counts own keys only.
    #[derive(Copy, PartialEq, Eq, Hash)]
    pub MaxProperties { max: usize } for Map<String, Value>;
    rule(self, input) { input.len() <= self.max }
    error(self, input) {
        ValidationError::rule(format!("Object must have at most {}", plural(self.max, "property")))
            .with_ctx(ErrorContext::MaxProperties { max_properties: self.max, actual_properties: input.len() })
    }
    fn max_properties(max: usize);
}
