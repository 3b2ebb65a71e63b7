//! Format-qualified strings.

use std::net::{Ipv4Addr, Ipv6Addr};

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use gatehouse_schema::Format;
use rust_decimal::Decimal;
use url::Url;
use uuid::Uuid;

use super::IsoDuration;
use crate::foundation::{ErrorContext, ErrorKind, Validate, ValidationError};
use crate::typed::TypedValue;
use crate::validators::{email, hostname};

/// Parses `input` according to `format`.
///
/// Parser-backed formats fail with their own parsing kind and the parser's
/// reason in `ctx.error`; structural formats fail with `validation_error`
/// and `ctx {format, value}`.
pub fn parse_format(format: Format, input: &str) -> Result<TypedValue, ValidationError> {
    match format {
        Format::Uuid => Uuid::parse_str(input)
            .map(TypedValue::Uuid)
            .map_err(|e| parsing(ErrorKind::UuidParsing, "Input should be a valid UUID", e)),
        Format::DateTime => parse_datetime(input)
            .map(TypedValue::DateTime)
            .map_err(|e| parsing(ErrorKind::DatetimeParsing, "Input should be a valid datetime", e)),
        Format::Date => NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .map(TypedValue::Date)
            .map_err(|e| parsing(ErrorKind::DateParsing, "Input should be a valid date", e)),
        Format::Time => parse_time(input)
            .map(TypedValue::Time)
            .map_err(|e| parsing(ErrorKind::TimeParsing, "Input should be a valid time", e)),
        Format::Duration => input
            .parse::<IsoDuration>()
            .map(TypedValue::Duration)
            .map_err(|e| parsing(ErrorKind::DurationParsing, "Input should be a valid duration", e)),
        Format::Decimal => parse_decimal(input)
            .map(TypedValue::Decimal)
            .map_err(|e| parsing(ErrorKind::DecimalParsing, "Input should be a valid decimal", e)),
        Format::Email => email()
            .validate(input)
            .map(|()| TypedValue::Email(input.to_owned())),
        Format::Hostname => hostname()
            .validate(input)
            .map(|()| TypedValue::Hostname(input.to_owned())),
        Format::Ipv4 => input
            .parse::<Ipv4Addr>()
            .map(TypedValue::Ipv4)
            .map_err(|_| ValidationError::invalid_format("ipv4", input)),
        Format::Ipv6 => input
            .parse::<Ipv6Addr>()
            .map(TypedValue::Ipv6)
            .map_err(|_| ValidationError::invalid_format("ipv6", input)),
        Format::Uri => Url::parse(input)
            .map(TypedValue::Uri)
            .map_err(|_| ValidationError::invalid_format("uri", input)),
        Format::Binary => Ok(TypedValue::Binary(Bytes::copy_from_slice(input.as_bytes()))),
    }
}

fn parsing(kind: ErrorKind, msg: &'static str, reason: impl ToString) -> ValidationError {
    ValidationError::new(kind, msg).with_ctx(ErrorContext::Parse {
        error: reason.to_string(),
    })
}

/// RFC 3339, or a naive timestamp taken as UTC.
fn parse_datetime(input: &str) -> Result<DateTime<chrono::FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(input).or_else(|rfc_error| {
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
            .map(|naive| naive.and_utc().fixed_offset())
            .ok_or(rfc_error)
    })
}

/// `HH:MM:SS[.fff]` or `HH:MM`, with an optional trailing `Z`.
fn parse_time(input: &str) -> Result<NaiveTime, chrono::ParseError> {
    let input = input.strip_suffix(['Z', 'z']).unwrap_or(input);
    NaiveTime::parse_from_str(input, "%H:%M:%S%.f")
        .or_else(|first| NaiveTime::parse_from_str(input, "%H:%M").map_err(|_| first))
}

fn parse_decimal(input: &str) -> Result<Decimal, rust_decimal::Error> {
    input
        .parse::<Decimal>()
        .or_else(|first| Decimal::from_scientific(input).map_err(|_| first))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Format::Uuid, "not-a-uuid", ErrorKind::UuidParsing)]
    #[case(Format::DateTime, "2024-13-01T00:00:00Z", ErrorKind::DatetimeParsing)]
    #[case(Format::Date, "2024-02-30", ErrorKind::DateParsing)]
    #[case(Format::Time, "25:00", ErrorKind::TimeParsing)]
    #[case(Format::Duration, "1 day", ErrorKind::DurationParsing)]
    #[case(Format::Decimal, "12,5", ErrorKind::DecimalParsing)]
    #[case(Format::Ipv4, "256.0.0.1", ErrorKind::ValidationError)]
    #[case(Format::Ipv6, "::g", ErrorKind::ValidationError)]
    #[case(Format::Uri, "no scheme", ErrorKind::ValidationError)]
    #[case(Format::Email, "user@", ErrorKind::ValidationError)]
    #[case(Format::Hostname, "-bad.example", ErrorKind::ValidationError)]
    fn rejects_with_kind(#[case] format: Format, #[case] input: &str, #[case] kind: ErrorKind) {
        assert_eq!(parse_format(format, input).unwrap_err().kind, kind);
    }

    #[rstest]
    #[case(Format::Uuid, "a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11")]
    #[case(Format::DateTime, "2024-01-15T10:30:00Z")]
    #[case(Format::DateTime, "2024-01-15T10:30:00+02:00")]
    #[case(Format::DateTime, "2024-01-15T10:30:00")]
    #[case(Format::Date, "2024-02-29")]
    #[case(Format::Time, "10:30")]
    #[case(Format::Time, "10:30:15.250Z")]
    #[case(Format::Duration, "PT15M")]
    #[case(Format::Decimal, "19.99")]
    #[case(Format::Decimal, "1e3")]
    #[case(Format::Ipv4, "192.168.0.1")]
    #[case(Format::Ipv6, "::1")]
    #[case(Format::Uri, "https://example.com/a?b=c")]
    #[case(Format::Email, "user@example.com")]
    #[case(Format::Hostname, "api.example.com")]
    #[case(Format::Binary, "\u{1}raw")]
    fn accepts(#[case] format: Format, #[case] input: &str) {
        assert!(parse_format(format, input).is_ok(), "{format:?} {input}");
    }

    #[test]
    fn structural_failures_carry_format_and_value() {
        let error = parse_format(Format::Ipv4, "1.2.3").unwrap_err();
        assert_eq!(error.msg, "Invalid ipv4 format");
        assert_eq!(error.ctx_value("format"), Some(serde_json::json!("ipv4")));
        assert_eq!(error.ctx_value("value"), Some(serde_json::json!("1.2.3")));
    }

    #[test]
    fn parsing_failures_carry_reason() {
        let error = parse_format(Format::Uuid, "xyz").unwrap_err();
        assert_eq!(error.msg, "Input should be a valid UUID");
        assert!(error.ctx_value("error").is_some());
    }

    #[test]
    fn naive_datetime_is_utc() {
        let TypedValue::DateTime(dt) = parse_format(Format::DateTime, "2024-01-15 10:30:00").unwrap()
        else {
            panic!("expected datetime");
        };
        assert_eq!(dt.offset().local_minus_utc(), 0);
    }
}
