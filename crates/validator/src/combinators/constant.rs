//! `const`: the value must equal one fixed value.

use serde_json::Value;

use super::{Compose, Subject};
use crate::foundation::Validate;
use crate::report::ErrorAggregator;
use crate::typed::TypedValue;
use crate::validators::{ConstValue, json_eq};

/// Compares the raw value, and the coerced value when there is one, so a
/// wire `"1"` satisfies `const: 1` on an integer field.
#[derive(Debug, Clone, Copy)]
pub struct Const<'s> {
    expected: &'s Value,
}

impl<'s> Const<'s> {
    #[must_use]
    pub fn new(expected: &'s Value) -> Self {
        Self { expected }
    }
}

impl Compose for Const<'_> {
    fn apply(&self, subject: &Subject<'_>, sink: &mut ErrorAggregator) -> Option<TypedValue> {
        let typed_matches = subject
            .typed
            .is_some_and(|typed| json_eq(self.expected, &typed.to_json()));
        if typed_matches {
            return None;
        }
        if let Err(error) = ConstValue::new(self.expected).validate(subject.value) {
            subject.report(error, sink);
        }
        None
    }
}
