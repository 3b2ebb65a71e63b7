//! Error collection and the problem-details envelope.
//!
//! [`ErrorAggregator`] collects every error of a request in the order they
//! were found: top-level fields in declaration order, nested values depth
//! first, composition errors after the node's own checks. Nothing is
//! deduplicated.

use std::borrow::Cow;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::foundation::ValidationError;

/// Default problem-type base URI.
pub const DEFAULT_PROBLEM_TYPE_BASE: &str = "https://gatehouse.dev/errors";

// ============================================================================
// ERROR AGGREGATOR
// ============================================================================

/// Ordered accumulator of validation errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorAggregator {
    errors: Vec<ValidationError>,
}

impl ErrorAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = ValidationError>) {
        self.errors.extend(errors);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// The 422 report, or `None` when nothing failed.
    #[must_use]
    pub fn into_report(self, type_base: &str) -> Option<ValidationReport> {
        self.has_errors()
            .then(|| ProblemDetails::validation(self.errors, type_base))
    }
}

impl fmt::Display for ErrorAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

// ============================================================================
// PROBLEM DETAILS
// ============================================================================

/// RFC 7807 style error envelope.
///
/// ```rust
/// use gatehouse_validator::foundation::ValidationError;
/// use gatehouse_validator::report::{DEFAULT_PROBLEM_TYPE_BASE, ProblemDetails};
///
/// let report = ProblemDetails::validation(vec![ValidationError::missing()], DEFAULT_PROBLEM_TYPE_BASE);
/// assert_eq!(report.status, 422);
/// assert_eq!(report.detail, "1 validation error in request");
/// assert_eq!(report.problem_type, "https://gatehouse.dev/errors/validation-error");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemDetails {
    pub detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
    pub status: u16,
    pub title: Cow<'static, str>,
    #[serde(rename = "type")]
    pub problem_type: String,
}

/// The 422 envelope of a failed validation.
pub type ValidationReport = ProblemDetails;

impl ProblemDetails {
    /// 422: request validation failed.
    #[must_use]
    pub fn validation(errors: Vec<ValidationError>, type_base: &str) -> Self {
        let detail = count_detail(errors.len());
        Self {
            detail,
            errors,
            status: 422,
            title: Cow::Borrowed("Request Validation Failed"),
            problem_type: problem_type(type_base, "validation-error"),
        }
    }

    /// 500: a handler dependency could not be resolved. Same shape as a
    /// validation report.
    #[must_use]
    pub fn dependency_failure(errors: Vec<ValidationError>, type_base: &str) -> Self {
        let detail = count_detail(errors.len());
        Self {
            detail,
            errors,
            status: 500,
            title: Cow::Borrowed("Dependency Resolution Failed"),
            problem_type: problem_type(type_base, "dependency-error"),
        }
    }

    /// 400: the body could not be parsed.
    #[must_use]
    pub fn bad_request(detail: impl Into<String>, type_base: &str) -> Self {
        Self {
            detail: detail.into(),
            errors: Vec::new(),
            status: 400,
            title: Cow::Borrowed("Invalid request format"),
            problem_type: problem_type(type_base, "bad-request"),
        }
    }

    /// The envelope as JSON.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.detail)?;
        for error in &self.errors {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ProblemDetails {}

fn count_detail(count: usize) -> String {
    if count == 1 {
        "1 validation error in request".to_owned()
    } else {
        format!("{count} validation errors in request")
    }
}

fn problem_type(base: &str, slug: &str) -> String {
    format!("{}/{slug}", base.trim_end_matches('/'))
}

// ============================================================================
// REJECTION
// ============================================================================

/// A request body that could not be parsed as JSON.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid request format: {reason}")]
pub struct MalformedBody {
    pub reason: String,
}

impl MalformedBody {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Why a request was not accepted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    /// One or more fields failed validation (422).
    #[error("{0}")]
    Validation(ValidationReport),
    /// The body was not parseable (400).
    #[error(transparent)]
    MalformedBody(#[from] MalformedBody),
}

impl Rejection {
    /// HTTP status for the rejection.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation(report) => report.status,
            Self::MalformedBody(_) => 400,
        }
    }

    /// The validation report, if this is a validation failure.
    #[must_use]
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Validation(report) => Some(report),
            Self::MalformedBody(_) => None,
        }
    }

    /// The validation errors; empty for malformed bodies.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            Self::Validation(report) => &report.errors,
            Self::MalformedBody(_) => &[],
        }
    }

    /// The problem-details envelope for the response.
    #[must_use]
    pub fn to_problem(&self, type_base: &str) -> ProblemDetails {
        match self {
            Self::Validation(report) => report.clone(),
            Self::MalformedBody(malformed) => {
                ProblemDetails::bad_request(malformed.reason.clone(), type_base)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{ErrorKind, Location};
    use gatehouse_schema::Source;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn aggregator_keeps_order_and_duplicates() {
        let mut errors = ErrorAggregator::new();
        errors.add(ValidationError::missing().at(Location::root(Source::Query).key("b")));
        errors.add(ValidationError::missing().at(Location::root(Source::Query).key("a")));
        errors.add(ValidationError::missing().at(Location::root(Source::Query).key("a")));
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.errors()[0].loc, ["query", "b"]);
        assert_eq!(
            errors.to_string(),
            "[query.b] missing: Field required\n[query.a] missing: Field required\n[query.a] missing: Field required"
        );
    }

    #[test]
    fn empty_aggregator_has_no_report() {
        assert!(ErrorAggregator::new().into_report(DEFAULT_PROBLEM_TYPE_BASE).is_none());
    }

    #[test]
    fn envelope_shape() {
        let error = ValidationError::new(ErrorKind::IntParsing, "Input should be a valid integer")
            .at(Location::root(Source::Path).key("item_id"))
            .with_input(json!("x"));
        let report = ProblemDetails::validation(vec![error.clone(), error], "https://e.test/errors/");
        assert_eq!(
            report.to_json(),
            json!({
                "detail": "2 validation errors in request",
                "errors": [
                    {"loc": ["path", "item_id"], "msg": "Input should be a valid integer", "type": "int_parsing", "input": "x"},
                    {"loc": ["path", "item_id"], "msg": "Input should be a valid integer", "type": "int_parsing", "input": "x"}
                ],
                "status": 422,
                "title": "Request Validation Failed",
                "type": "https://e.test/errors/validation-error"
            })
        );
    }

    #[test]
    fn dependency_failure_reuses_shape() {
        let report = ProblemDetails::dependency_failure(
            vec![ValidationError::rule("db unavailable")],
            DEFAULT_PROBLEM_TYPE_BASE,
        );
        assert_eq!(report.status, 500);
        assert_eq!(report.title, "Dependency Resolution Failed");
        assert_eq!(report.problem_type, "https://gatehouse.dev/errors/dependency-error");
    }

    #[test]
    fn malformed_body_is_400() {
        let rejection = Rejection::from(MalformedBody::new("EOF while parsing"));
        assert_eq!(rejection.status(), 400);
        assert!(rejection.errors().is_empty());
        let problem = rejection.to_problem(DEFAULT_PROBLEM_TYPE_BASE);
        assert_eq!(
            problem.to_json(),
            json!({
                "detail": "EOF while parsing",
                "status": 400,
                "title": "Invalid request format",
                "type": "https://gatehouse.dev/errors/bad-request"
            })
        );
    }
}
