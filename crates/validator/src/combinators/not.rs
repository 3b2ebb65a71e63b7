//! `not`: the branch must fail.

use gatehouse_schema::SchemaNode;

use super::{Compose, Subject};
use crate::foundation::{ErrorContext, ValidationError};
use crate::report::ErrorAggregator;
use crate::typed::TypedValue;

/// Fails when the subject satisfies the prohibited schema.
#[derive(Debug, Clone, Copy)]
pub struct Not<'s> {
    branch: &'s SchemaNode,
}

impl<'s> Not<'s> {
    #[must_use]
    pub fn new(branch: &'s SchemaNode) -> Self {
        Self { branch }
    }
}

impl Compose for Not<'_> {
    fn apply(&self, subject: &Subject<'_>, sink: &mut ErrorAggregator) -> Option<TypedValue> {
        if subject.trial(self.branch).passed() {
            subject.report(
                ValidationError::rule("Must not match the schema").with_ctx(
                    ErrorContext::Prohibited {
                        prohibited_value: subject.value.clone(),
                    },
                ),
                sink,
            );
        }
        None
    }
}
