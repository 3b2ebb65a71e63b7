//! Numeric bound validators
//!
//! Bounds and inputs are [`Number`]s: integer pairs compare exactly, any
//! pair involving a float compares as `f64`. An incomparable pair (NaN)
//! fails every bound.

use std::cmp::Ordering;

use gatehouse_schema::Number;

use crate::foundation::{ErrorContext, ErrorKind, ValidationError};

crate::validator! {
    /// `minimum`: the value must be at least the bound.
    #[derive(Copy, PartialEq)]
    pub Minimum { bound: Number } for Number;
    rule(self, input) {
        matches!(input.compare(self.bound), Some(Ordering::Greater | Ordering::Equal))
    }
    error(self, input) {
        ValidationError::new(
            ErrorKind::GreaterThanEqual,
            format!("Input should be greater than or equal to {}", self.bound),
        )
        .with_ctx(ErrorContext::GreaterThanEqual { ge: self.bound.to_json(), value: input.to_json() })
    }
    fn minimum(bound: Number);
}

crate::validator! {
    /// `maximum`: the value must be at most the bound.
    #[derive(Copy, PartialEq)]
    pub Maximum { bound: Number } for Number;
    rule(self, input) {
        matches!(input.compare(self.bound), Some(Ordering::Less | Ordering::Equal))
    }
    error(self, input) {
        ValidationError::new(
            ErrorKind::LessThanEqual,
            format!("Input should be less than or equal to {}", self.bound),
        )
        .with_ctx(ErrorContext::LessThanEqual { le: self.bound.to_json(), value: input.to_json() })
    }
    fn maximum(bound: Number);
}

crate::validator! {
    /// `exclusiveMinimum`: the value must be strictly greater than the bound.
    #[derive(Copy, PartialEq)]
    pub ExclusiveMinimum { bound: Number } for Number;
    rule(self, input) { input.compare(self.bound) == Some(Ordering::Greater) }
    error(self, input) {
        ValidationError::new(
            ErrorKind::GreaterThan,
            format!("Input should be greater than {}", self.bound),
        )
        .with_ctx(ErrorContext::GreaterThan { gt: self.bound.to_json(), value: input.to_json() })
    }
    fn exclusive_minimum(bound: Number);
}

crate::validator! {
    /// `exclusiveMaximum`: the value must be strictly less than the bound.
    #[derive(Copy, PartialEq)]
    pub ExclusiveMaximum { bound: Number } for Number;
    rule(self, input) { input.compare(self.bound) == Some(Ordering::Less) }
    error(self, input) {
        ValidationError::new(
            ErrorKind::LessThan,
            format!("Input should be less than {}", self.bound),
        )
        .with_ctx(ErrorContext::LessThan { lt: self.bound.to_json(), value: input.to_json() })
    }
    fn exclusive_maximum(bound: Number);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::Validate;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Number::Int(2), false)]
    #[case(Number::Int(3), false)]
    #[case(Number::Int(4), true)]
    #[case(Number::Float(3.01), true)]
    fn exclusive_minimum_three(#[case] input: Number, #[case] ok: bool) {
        assert_eq!(exclusive_minimum(Number::Int(3)).validate(&input).is_ok(), ok);
    }

    #[rstest]
    #[case(Number::Int(2), false)]
    #[case(Number::Int(3), true)]
    #[case(Number::Int(4), true)]
    fn minimum_three(#[case] input: Number, #[case] ok: bool) {
        assert_eq!(minimum(Number::Int(3)).validate(&input).is_ok(), ok);
    }

    #[test]
    fn error_shapes() {
        let err = exclusive_minimum(Number::Int(0)).validate(&Number::Int(0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::GreaterThan);
        assert_eq!(err.msg, "Input should be greater than 0");
        assert_eq!(err.ctx_value("gt"), Some(json!(0)));

        let err = maximum(Number::Float(9.5)).validate(&Number::Int(10)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::LessThanEqual);
        assert_eq!(err.msg, "Input should be less than or equal to 9.5");

        let err = exclusive_maximum(Number::Int(100)).validate(&Number::Int(100)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::LessThan);
        assert_eq!(err.ctx_value("lt"), Some(json!(100)));
    }

    #[test]
    fn nan_fails_every_bound() {
        let nan = Number::Float(f64::NAN);
        assert!(minimum(Number::Int(0)).validate(&nan).is_err());
        assert!(maximum(Number::Int(0)).validate(&nan).is_err());
    }
}
