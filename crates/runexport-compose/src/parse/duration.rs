//! Duration strings such as `1m30s`, `1.5h` or `250ms`.
//!
//! A duration is a sequence of `<decimal><unit>` components with units `ns`,
//! `us` (or `µs`), `ms`, `s`, `m` and `h`. A bare `0` is accepted, a leading
//! `+` is ignored, and negative durations are rejected since compose has no
//! use for them.

use std::time::Duration;

use nom::{
    IResult, Parser,
    bytes::complete::take_while1,
    character::complete::{char, digit0},
    combinator::opt,
    sequence::preceded,
};

use super::{ParseError, Result};

const NANOS_PER_SEC: u128 = 1_000_000_000;
/// Fraction digits beyond this cannot change a nanosecond count.
const MAX_FRACTION_DIGITS: usize = 18;

/// `<digits>[.<digits>]`; either side may be empty.
fn number(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    (digit0, opt(preceded(char('.'), digit0))).parse(input)
}

/// Everything up to the next number.
fn unit(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_ascii_digit() && c != '.')(input)
}

fn unit_nanos(unit: &str) -> Option<u128> {
    let scale = match unit {
        "ns" => 1,
        // micro sign and greek small mu
        "us" | "\u{b5}s" | "\u{3bc}s" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SEC,
        "m" => 60 * NANOS_PER_SEC,
        "h" => 3_600 * NANOS_PER_SEC,
        _ => return None,
    };
    Some(scale)
}

fn component_nanos(whole: &str, fraction: &str, scale: u128) -> Option<u128> {
    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut numerator = 0_u128;
    let mut denominator = 1_u128;
    for digit in fraction.chars().take(MAX_FRACTION_DIGITS) {
        numerator = numerator * 10 + u128::from(digit.to_digit(10)?);
        denominator *= 10;
    }
    whole
        .checked_mul(scale)?
        .checked_add(numerator * scale / denominator)
}

/// Parses a duration string.
///
/// # Errors
///
/// Returns [`ParseError::InvalidDuration`] if the input is empty, negative,
/// lacks a unit, uses an unknown unit, or overflows.
pub fn parse_duration(value: &str) -> Result<Duration> {
    let invalid = |reason| ParseError::InvalidDuration {
        value: value.to_owned(),
        reason,
    };

    if value.starts_with('-') {
        return Err(invalid("negative durations are not supported"));
    }
    let mut rest = value.strip_prefix('+').unwrap_or(value);
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid("empty duration"));
    }

    let mut total = 0_u128;
    while !rest.is_empty() {
        let (after_number, (whole, fraction)) =
            number(rest).map_err(|_| invalid("expected a number"))?;
        if whole.is_empty() && fraction.is_none_or(str::is_empty) {
            return Err(invalid("expected a number"));
        }
        let (after_unit, unit) = unit(after_number).map_err(|_| invalid("missing unit"))?;
        let scale = unit_nanos(unit).ok_or_else(|| invalid("unknown unit"))?;
        let nanos = component_nanos(whole, fraction.unwrap_or_default(), scale)
            .ok_or_else(|| invalid("duration out of range"))?;
        total = total
            .checked_add(nanos)
            .ok_or_else(|| invalid("duration out of range"))?;
        rest = after_unit;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| invalid("duration out of range"))?;
    #[allow(clippy::cast_possible_truncation)]
    let nanos = (total % NANOS_PER_SEC) as u32;
    Ok(Duration::new(secs, nanos))
}

/// Renders `value / unit` as a decimal without trailing zeros.
fn decimal(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let fraction = value % unit;
    if fraction == 0 {
        return whole.to_string();
    }
    let width = unit.ilog10() as usize;
    let digits = format!("{fraction:0width$}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Formats a duration in the notation [`parse_duration`] reads.
///
/// Sub-second values use the largest fitting unit (`ns`, `µs`, `ms`); longer
/// values are written as `[<h>h<m>m]<s>s`, e.g. `1h0m0s` or `1m30.5s`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".into();
    }
    if nanos < 1_000 {
        return format!("{nanos}ns");
    }
    if nanos < 1_000_000 {
        return format!("{}µs", decimal(nanos, 1_000));
    }
    if nanos < NANOS_PER_SEC {
        return format!("{}ms", decimal(nanos, 1_000_000));
    }

    let total_secs = duration.as_secs();
    let hours = total_secs / 3_600;
    let minutes = total_secs % 3_600 / 60;
    let seconds = decimal(
        u128::from(total_secs % 60) * NANOS_PER_SEC + u128::from(duration.subsec_nanos()),
        NANOS_PER_SEC,
    );

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}
