//! `allOf`: every branch must hold.

use gatehouse_schema::SchemaNode;

use super::{Compose, Subject};
use crate::report::ErrorAggregator;
use crate::typed::TypedValue;

/// Evaluates every branch against the subject and surfaces all of their
/// errors in branch order.
#[derive(Debug, Clone, Copy)]
pub struct AllOf<'s> {
    branches: &'s [SchemaNode],
}

impl<'s> AllOf<'s> {
    #[must_use]
    pub fn new(branches: &'s [SchemaNode]) -> Self {
        Self { branches }
    }
}

impl Compose for AllOf<'_> {
    fn apply(&self, subject: &Subject<'_>, sink: &mut ErrorAggregator) -> Option<TypedValue> {
        for branch in self.branches {
            subject
                .validator
                .validate(branch, subject.value, subject.loc, sink);
        }
        None
    }
}
