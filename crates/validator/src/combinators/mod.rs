//! Composition keywords: `allOf`, `anyOf`, `oneOf`, `not`, `const` and
//! `dependencies`.
//!
//! Each keyword runs after the node's own checks and sees the same
//! [`Subject`]: the raw value, its coerced form and its location. Branches
//! that only decide pass/fail run as a [`Trial`] against a scratch
//! aggregator, so their errors never leak into the report.

mod all_of;
mod any_of;
mod constant;
mod dependencies;
mod not;
mod one_of;

pub use all_of::AllOf;
pub use any_of::AnyOf;
pub use constant::Const;
pub use dependencies::Dependencies;
pub use not::Not;
pub use one_of::OneOf;

use gatehouse_schema::{CompositionNode, SchemaNode};
use serde_json::Value;

use crate::constraints::ConstraintValidator;
use crate::foundation::{Location, ValidationError};
use crate::report::ErrorAggregator;
use crate::typed::TypedValue;

/// The value a composition keyword is applied to.
#[derive(Debug, Clone, Copy)]
pub struct Subject<'a> {
    pub validator: &'a ConstraintValidator,
    pub value: &'a Value,
    /// The node's own coercion result, when it succeeded.
    pub typed: Option<&'a TypedValue>,
    pub loc: &'a Location,
}

impl Subject<'_> {
    /// Validates the subject against a branch in isolation.
    #[must_use]
    pub fn trial(&self, branch: &SchemaNode) -> Trial {
        let mut errors = ErrorAggregator::new();
        let typed = self.validator.validate(branch, self.value, self.loc, &mut errors);
        Trial { typed, errors }
    }

    /// Positions an error at the subject and adds it to `sink`.
    pub fn report(&self, error: ValidationError, sink: &mut ErrorAggregator) {
        sink.add(self.validator.position(error, self.loc, self.value));
    }
}

/// Outcome of one isolated branch evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub typed: Option<TypedValue>,
    pub errors: ErrorAggregator,
}

impl Trial {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A composition keyword.
pub trait Compose {
    /// Checks the subject, adding violations to `sink`. Returns the typed
    /// value of the branch that matched, for keywords that select one.
    fn apply(&self, subject: &Subject<'_>, sink: &mut ErrorAggregator) -> Option<TypedValue>;
}

/// Applies a node's compositions in declaration order. Returns the first
/// typed value selected by `anyOf`/`oneOf`.
pub(crate) fn evaluate(
    validator: &ConstraintValidator,
    compositions: &[CompositionNode],
    value: &Value,
    typed: Option<&TypedValue>,
    loc: &Location,
    sink: &mut ErrorAggregator,
) -> Option<TypedValue> {
    let subject = Subject {
        validator,
        value,
        typed,
        loc,
    };
    let mut selected = None;
    for composition in compositions {
        let chosen = match composition {
            CompositionNode::AllOf(branches) => AllOf::new(branches).apply(&subject, sink),
            CompositionNode::AnyOf(branches) => AnyOf::new(branches).apply(&subject, sink),
            CompositionNode::OneOf(branches) => OneOf::new(branches).apply(&subject, sink),
            CompositionNode::Not(branch) => Not::new(branch).apply(&subject, sink),
            CompositionNode::Const(expected) => Const::new(expected).apply(&subject, sink),
            CompositionNode::Dependencies(entries) => {
                Dependencies::new(entries).apply(&subject, sink)
            }
        };
        if selected.is_none() {
            selected = chosen;
        }
    }
    selected
}
