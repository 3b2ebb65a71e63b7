//! Network-shaped string validators: hostname (RFC 1123) and email.
//!
//! Hostname rules:
//! - Total length: 1..=253 characters (excluding optional trailing dot)
//! - Split by `.` into labels
//! - Each label: 1..=63 characters, `[a-zA-Z0-9-]` only
//! - Labels must not start or end with a hyphen
//! - Trailing dot optional (FQDN)
//!
//! An email is a dot-atom local part (RFC 5322 `atext`, at most 64 chars),
//! `@`, and a hostname with at least two labels.

use crate::foundation::{Validate, ValidationError};

// ============================================================================
// HOSTNAME
// ============================================================================

/// Validates hostnames per RFC 1123.
///
/// # Examples
///
/// ```
/// use gatehouse_validator::validators::Hostname;
/// use gatehouse_validator::foundation::Validate;
///
/// assert!(Hostname.validate("example.com").is_ok());
/// assert!(Hostname.validate("localhost").is_ok());
/// assert!(Hostname.validate("example.com.").is_ok());
/// assert!(Hostname.validate("-bad.com").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hostname;

impl Validate for Hostname {
    type Input = str;

    fn validate(&self, input: &str) -> Result<(), ValidationError> {
        hostname_violation(input).map_or(Ok(()), |reason| {
            Err(invalid("hostname", input, reason))
        })
    }
}

/// Creates a new [`Hostname`] validator.
#[must_use]
pub const fn hostname() -> Hostname {
    Hostname
}

fn hostname_violation(input: &str) -> Option<String> {
    let hostname = input.strip_suffix('.').unwrap_or(input);
    if hostname.is_empty() {
        return Some("hostname must contain at least one label".to_owned());
    }
    if hostname.len() > 253 {
        return Some(format!(
            "hostname length {} exceeds maximum of 253 characters",
            hostname.len()
        ));
    }

    for label in hostname.split('.') {
        if label.is_empty() {
            return Some("labels must not be empty".to_owned());
        }
        if label.len() > 63 {
            return Some(format!(
                "label '{label}' exceeds maximum of 63 characters"
            ));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Some(format!(
                "label '{label}' must not start or end with a hyphen"
            ));
        }
        if let Some(ch) = label
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
        {
            return Some(format!("label '{label}' contains invalid character '{ch}'"));
        }
    }
    None
}

// ============================================================================
// EMAIL
// ============================================================================

/// Validates email addresses (dot-atom local part, RFC 1123 domain).
///
/// ```
/// use gatehouse_validator::validators::Email;
/// use gatehouse_validator::foundation::Validate;
///
/// assert!(Email.validate("alice@example.com").is_ok());
/// assert!(Email.validate("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Email;

impl Validate for Email {
    type Input = str;

    fn validate(&self, input: &str) -> Result<(), ValidationError> {
        email_violation(input).map_or(Ok(()), |reason| Err(invalid("email", input, reason)))
    }
}

/// Creates a new [`Email`] validator.
#[must_use]
pub const fn email() -> Email {
    Email
}

fn email_violation(input: &str) -> Option<String> {
    let Some((local, domain)) = input.rsplit_once('@') else {
        return Some("missing '@'".to_owned());
    };
    if local.is_empty() || local.len() > 64 {
        return Some("local part must be 1 to 64 characters".to_owned());
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return Some("local part has a misplaced '.'".to_owned());
    }
    if let Some(ch) = local.chars().find(|c| !is_atext(*c) && *c != '.') {
        return Some(format!("local part contains invalid character '{ch}'"));
    }
    if !domain.trim_end_matches('.').contains('.') {
        return Some("domain must contain at least two labels".to_owned());
    }
    hostname_violation(domain)
}

/// RFC 5322 `atext`.
fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~-".contains(c)
}

fn invalid(format: &'static str, input: &str, reason: String) -> ValidationError {
    let error = ValidationError::invalid_format(format, input);
    let msg = format!("{}: {reason}", error.msg);
    ValidationError { msg: msg.into(), ..error }
}
