//! `anyOf`: at least one branch must hold.

use gatehouse_schema::SchemaNode;

use super::{Compose, Subject};
use crate::foundation::{ErrorContext, ValidationError};
use crate::report::ErrorAggregator;
use crate::typed::TypedValue;

/// Passes on the first matching branch; fails with a single error when no
/// branch matches. Branch errors are not reported.
#[derive(Debug, Clone, Copy)]
pub struct AnyOf<'s> {
    branches: &'s [SchemaNode],
}

impl<'s> AnyOf<'s> {
    #[must_use]
    pub fn new(branches: &'s [SchemaNode]) -> Self {
        Self { branches }
    }
}

impl Compose for AnyOf<'_> {
    fn apply(&self, subject: &Subject<'_>, sink: &mut ErrorAggregator) -> Option<TypedValue> {
        for branch in self.branches {
            let trial = subject.trial(branch);
            if trial.passed() {
                return trial.typed;
            }
        }
        subject.report(
            ValidationError::rule("Must match at least one schema (anyOf), but matched 0")
                .with_ctx(ErrorContext::MatchedSchemas { matched_schemas: 0 }),
            sink,
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use crate::combinators::test_support::run;
    use crate::typed::TypedValue;
    use serde_json::json;

    #[test]
    fn fails_only_when_nothing_matches() {
        let schema = json!({"anyOf": [{"type": "string", "maxLength": 2}, {"type": "integer"}]});
        assert!(run(schema.clone(), json!("ab")).1.is_empty());
        assert!(run(schema.clone(), json!(5)).1.is_empty());

        let (_, errors) = run(schema, json!("abc"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].msg, "Must match at least one schema (anyOf), but matched 0");
        assert_eq!(errors[0].ctx_value("matched_schemas"), Some(json!(0)));
        assert_eq!(errors[0].input, Some(json!("abc")));
    }

    #[test]
    fn untyped_node_takes_the_matching_branch_value() {
        let schema = json!({"anyOf": [{"type": "integer"}, {"type": "string", "format": "date"}]});
        let (typed, _) = run(schema, json!("2024-01-02"));
        assert!(matches!(typed, Some(TypedValue::Date(_))));
    }
}
