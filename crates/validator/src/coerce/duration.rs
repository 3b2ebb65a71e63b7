//! ISO 8601 durations (`P1Y2M3DT4H5M6.5S`, `P2W`, `-PT30M`).

use std::fmt;
use std::str::FromStr;

/// A parsed ISO 8601 duration.
///
/// Calendar components (years, months) have no fixed length, so they are
/// kept separate from the exact part.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IsoDuration {
    pub negative: bool,
    pub years: u64,
    pub months: u64,
    pub weeks: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: f64,
}

impl IsoDuration {
    /// Whether the duration has calendar components.
    #[must_use]
    pub fn is_calendar(&self) -> bool {
        self.years > 0 || self.months > 0
    }

    /// Exact length, for non-negative durations without calendar components.
    #[must_use]
    pub fn to_std(&self) -> Option<std::time::Duration> {
        if self.negative || self.is_calendar() {
            return None;
        }
        let whole = self
            .weeks
            .checked_mul(7)?
            .checked_add(self.days)?
            .checked_mul(24)?
            .checked_add(self.hours)?
            .checked_mul(60)?
            .checked_add(self.minutes)?
            .checked_mul(60)?;
        std::time::Duration::try_from_secs_f64(self.seconds)
            .ok()?
            .checked_add(std::time::Duration::from_secs(whole))
    }
}

/// Why a duration failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    #[error("duration must start with 'P'")]
    MissingDesignator,
    #[error("duration has no components")]
    Empty,
    #[error("unexpected '{0}' in duration")]
    Unexpected(char),
    #[error("component '{0}' is out of order or repeated")]
    OutOfOrder(char),
    #[error("only the seconds component may have a fraction")]
    Fraction,
    #[error("component value is too large")]
    Overflow,
}

impl FromStr for IsoDuration {
    type Err = DurationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (negative, rest) = match input.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, input.strip_prefix('+').unwrap_or(input)),
        };
        let rest = rest
            .strip_prefix('P')
            .ok_or(DurationError::MissingDesignator)?;
        let (date, time) = match rest.split_once('T') {
            Some((_, "")) => return Err(DurationError::Empty),
            Some((date, time)) => (date, Some(time)),
            None => (rest, None),
        };

        let mut out = Self {
            negative,
            ..Self::default()
        };
        let mut seen = 0;
        seen += components(date, &['Y', 'M', 'W', 'D'], |designator, value| {
            let whole = whole(value)?;
            match designator {
                'Y' => out.years = whole,
                'M' => out.months = whole,
                'W' => out.weeks = whole,
                _ => out.days = whole,
            }
            Ok(())
        })?;
        if let Some(time) = time {
            seen += components(time, &['H', 'M', 'S'], |designator, value| {
                match designator {
                    'H' => out.hours = whole(value)?,
                    'M' => out.minutes = whole(value)?,
                    _ => {
                        out.seconds = value
                            .replace(',', ".")
                            .parse::<f64>()
                            .map_err(|_| DurationError::Unexpected('.'))?;
                    }
                }
                Ok(())
            })?;
        }
        if seen == 0 {
            return Err(DurationError::Empty);
        }
        Ok(out)
    }
}

/// Walks `<digits><designator>` pairs, enforcing designator order. Returns
/// the number of components seen.
fn components(
    part: &str,
    order: &[char],
    mut apply: impl FnMut(char, &str) -> Result<(), DurationError>,
) -> Result<usize, DurationError> {
    let mut position = 0;
    let mut seen = 0;
    let mut start = 0;
    for (i, c) in part.char_indices() {
        if c.is_ascii_digit() || c == '.' || c == ',' {
            continue;
        }
        let value = &part[start..i];
        if value.is_empty() {
            return Err(DurationError::Unexpected(c));
        }
        let slot = order[position..]
            .iter()
            .position(|d| *d == c)
            .ok_or_else(|| {
                if order.contains(&c) {
                    DurationError::OutOfOrder(c)
                } else {
                    DurationError::Unexpected(c)
                }
            })?;
        apply(c, value)?;
        position += slot + 1;
        seen += 1;
        start = i + c.len_utf8();
    }
    if start < part.len() {
        // Trailing digits without a designator.
        let tail = part[start..].chars().next().unwrap_or('?');
        return Err(DurationError::Unexpected(tail));
    }
    Ok(seen)
}

fn whole(value: &str) -> Result<u64, DurationError> {
    if value.contains(['.', ',']) {
        return Err(DurationError::Fraction);
    }
    value.parse().map_err(|_| DurationError::Overflow)
}

impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        for (value, designator) in [
            (self.years, 'Y'),
            (self.months, 'M'),
            (self.weeks, 'W'),
            (self.days, 'D'),
        ] {
            if value > 0 {
                write!(f, "{value}{designator}")?;
            }
        }
        let has_time = self.hours > 0 || self.minutes > 0 || self.seconds > 0.0;
        let has_date = self.years > 0 || self.months > 0 || self.weeks > 0 || self.days > 0;
        if has_time || !has_date {
            f.write_str("T")?;
            if self.hours > 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes > 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if self.seconds > 0.0 || !has_time {
                write!(f, "{}S", self.seconds)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("P1Y2M3DT4H5M6S")]
    #[case("P2W")]
    #[case("PT30M")]
    #[case("PT0.5S")]
    #[case("PT1,5S")]
    #[case("-P1D")]
    #[case("P1DT12H")]
    fn accepts(#[case] input: &str) {
        assert!(input.parse::<IsoDuration>().is_ok(), "{input}");
    }

    #[rstest]
    #[case("", DurationError::MissingDesignator)]
    #[case("1D", DurationError::MissingDesignator)]
    #[case("P", DurationError::Empty)]
    #[case("P1DT", DurationError::Empty)]
    #[case("PT1D", DurationError::Unexpected('D'))]
    #[case("P1D2Y", DurationError::OutOfOrder('Y'))]
    #[case("P1.5D", DurationError::Fraction)]
    #[case("P1", DurationError::Unexpected('1'))]
    #[case("PXD", DurationError::Unexpected('X'))]
    fn rejects(#[case] input: &str, #[case] expected: DurationError) {
        assert_eq!(input.parse::<IsoDuration>().unwrap_err(), expected);
    }

    #[test]
    fn exact_length() {
        let d: IsoDuration = "P1DT1H1M1.5S".parse().unwrap();
        assert_eq!(
            d.to_std(),
            Some(std::time::Duration::from_secs_f64(86_400.0 + 3_600.0 + 61.5))
        );
        let calendar: IsoDuration = "P1M".parse().unwrap();
        assert_eq!(calendar.to_std(), None);
    }

    #[test]
    fn displays_canonically() {
        let d: IsoDuration = "P0DT2H".parse().unwrap();
        assert_eq!(d.to_string(), "PT2H");
        assert_eq!(IsoDuration::default().to_string(), "PT0S");
        let neg: IsoDuration = "-P1W".parse().unwrap();
        assert_eq!(neg.to_string(), "-P1W");
    }
}
