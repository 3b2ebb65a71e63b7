//! Core traits for the validation system.

use super::ValidationError;

// ============================================================================
// CORE VALIDATOR TRAIT
// ============================================================================

/// The trait every leaf constraint implements.
///
/// A validator checks one already-coerced value and returns at most one
/// error. It knows nothing about where the value came from: the caller
/// positions the error with [`ValidationError::at`] and collects it, which
/// keeps leaf checks reusable across sources and nesting depths.
///
/// # Examples
///
/// ```rust
/// use gatehouse_validator::foundation::{ErrorKind, Validate, ValidationError};
///
/// struct NotBlank;
///
/// impl Validate for NotBlank {
///     type Input = str;
///
///     fn validate(&self, input: &str) -> Result<(), ValidationError> {
///         if input.trim().is_empty() {
///             Err(ValidationError::new(ErrorKind::ValidationError, "Must not be blank"))
///         } else {
///             Ok(())
///         }
///     }
/// }
///
/// assert!(NotBlank.validate("x").is_ok());
/// assert!(NotBlank.validate("  ").is_err());
/// ```
pub trait Validate {
    /// The type of input being validated.
    ///
    /// Use `?Sized` to allow validation of unsized types like `str` and `[T]`.
    type Input: ?Sized;

    /// Validates the input value.
    fn validate(&self, input: &Self::Input) -> Result<(), ValidationError>;

    /// Validates and, on failure, hands the error to `sink`.
    ///
    /// Returns whether the input passed.
    fn check_into(
        &self,
        input: &Self::Input,
        sink: &mut impl FnMut(ValidationError),
    ) -> bool {
        match self.validate(input) {
            Ok(()) => true,
            Err(error) => {
                sink(error);
                false
            }
        }
    }
}
