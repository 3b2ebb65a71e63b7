//! `oneOf`: exactly one branch must hold.

use gatehouse_schema::SchemaNode;

use super::{Compose, Subject};
use crate::foundation::{ErrorContext, ValidationError};
use crate::report::ErrorAggregator;
use crate::typed::TypedValue;

/// Evaluates every branch and fails unless exactly one matched. The error
/// carries the match count.
#[derive(Debug, Clone, Copy)]
pub struct OneOf<'s> {
    branches: &'s [SchemaNode],
}

impl<'s> OneOf<'s> {
    #[must_use]
    pub fn new(branches: &'s [SchemaNode]) -> Self {
        Self { branches }
    }
}

impl Compose for OneOf<'_> {
    fn apply(&self, subject: &Subject<'_>, sink: &mut ErrorAggregator) -> Option<TypedValue> {
        let mut matched = 0;
        let mut selected = None;
        for branch in self.branches {
            let trial = subject.trial(branch);
            if trial.passed() {
                matched += 1;
                if selected.is_none() {
                    selected = trial.typed;
                }
            }
        }
        if matched == 1 {
            return selected;
        }
        subject.report(
            ValidationError::rule(format!(
                "Must match exactly one schema (oneOf), but matched {matched}"
            ))
            .with_ctx(ErrorContext::MatchedSchemas {
                matched_schemas: matched,
            }),
            sink,
        );
        None
    }
}
