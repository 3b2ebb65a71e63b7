//! `multipleOf` validator
//!
//! Integer pairs use exact integer arithmetic. Anything involving a float
//! goes through [`rust_decimal`], parsing each side from its shortest
//! round-trip decimal text, so `0.3` is a multiple of `0.1`. Magnitudes
//! beyond decimal range fall back to a relative `f64` tolerance.

use std::str::FromStr;

use gatehouse_schema::Number;
use rust_decimal::Decimal;

use crate::foundation::{ErrorContext, ErrorKind, ValidationError};

crate::validator! {
    /// Validates that a number is an integer multiple of a positive divisor.
    #[derive(Copy, PartialEq)]
    pub MultipleOf { divisor: Number } for Number;
    rule(self, input) { is_multiple(*input, self.divisor) }
    error(self, input) {
        ValidationError::new(
            ErrorKind::ValidationError,
            format!("Input should be a multiple of {}", self.divisor),
        )
        .with_ctx(ErrorContext::MultipleOf {
            multiple_of: self.divisor.to_json(),
            value: input.to_json(),
        })
    }
    fn multiple_of(divisor: Number);
}

fn is_multiple(value: Number, divisor: Number) -> bool {
    match (value, divisor) {
        (_, Number::Int(0)) => false,
        (Number::Int(value), Number::Int(divisor)) => value.checked_rem(divisor) == Some(0),
        (value, divisor) => match (to_decimal(value), to_decimal(divisor)) {
            (Some(value), Some(divisor)) if !divisor.is_zero() => {
                value.checked_rem(divisor).is_some_and(|rem| rem.is_zero())
            }
            _ => {
                let quotient = value.as_f64() / divisor.as_f64();
                quotient.is_finite() && (quotient - quotient.round()).abs() <= 1e-9 * quotient.abs().max(1.0)
            }
        },
    }
}

fn to_decimal(number: Number) -> Option<Decimal> {
    match number {
        Number::Int(int) => Some(Decimal::from(int)),
        Number::Float(float) if float.is_finite() => Decimal::from_str(&float.to_string()).ok(),
        Number::Float(_) => None,
    }
}
