//! `dependencies`: keys that require other keys or extra schemas.

use gatehouse_schema::Dependency;
use indexmap::IndexMap;
use serde_json::Value;

use super::{Compose, Subject};
use crate::foundation::{ErrorContext, ValidationError};
use crate::report::ErrorAggregator;
use crate::typed::TypedValue;
use crate::validators::quote;

/// For each trigger key present in the object:
/// - property form: one error listing the dependents that are absent
/// - schema form: the whole object is validated against the schema
///
/// Non-object subjects are ignored.
#[derive(Debug, Clone, Copy)]
pub struct Dependencies<'s> {
    entries: &'s IndexMap<String, Dependency>,
}

impl<'s> Dependencies<'s> {
    #[must_use]
    pub fn new(entries: &'s IndexMap<String, Dependency>) -> Self {
        Self { entries }
    }
}

impl Compose for Dependencies<'_> {
    fn apply(&self, subject: &Subject<'_>, sink: &mut ErrorAggregator) -> Option<TypedValue> {
        let Value::Object(map) = subject.value else {
            return None;
        };
        for (trigger, dependency) in self.entries {
            if !map.contains_key(trigger) {
                continue;
            }
            match dependency {
                Dependency::Properties(dependents) => {
                    let absent: Vec<String> = dependents
                        .iter()
                        .filter(|name| !map.contains_key(*name))
                        .cloned()
                        .collect();
                    if absent.is_empty() {
                        continue;
                    }
                    let names = absent
                        .iter()
                        .map(|name| quote(&Value::String(name.clone())))
                        .collect::<Vec<_>>()
                        .join(", ");
                    let verb = if absent.len() == 1 { "is" } else { "are" };
                    subject.report(
                        ValidationError::rule(format!(
                            "When '{trigger}' is present, {names} {verb} required"
                        ))
                        .with_ctx(ErrorContext::Dependency {
                            dependency: trigger.clone(),
                            required_fields: absent,
                        }),
                        sink,
                    );
                }
                Dependency::Schema(node) => {
                    subject
                        .validator
                        .validate(node, subject.value, subject.loc, sink);
                }
            }
        }
        None
    }
}
