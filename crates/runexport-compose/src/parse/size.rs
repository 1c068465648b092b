//! Human-readable byte sizes such as `512m`, `1.5GiB` or `10 kb`.
//!
//! The grammar is `<digits>[.<digits>][ ][kmgtp][i][b]`, case-insensitive.
//! Whether `k` means 1000 or 1024 depends on the flag: device byte rates are
//! decimal, memory-like sizes are binary.

use nom::{
    IResult, Parser,
    character::complete::{char, digit1, one_of},
    combinator::{opt, recognize},
};

use super::{ParseError, Result};

/// Multiplier family applied to the unit letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeBase {
    /// `k` = 1000.
    Decimal,
    /// `k` = 1024.
    Binary,
}

impl SizeBase {
    const fn step(self) -> f64 {
        match self {
            Self::Decimal => 1000.0,
            Self::Binary => 1024.0,
        }
    }
}

struct RawSize<'a> {
    number: &'a str,
    unit: Option<char>,
}

fn raw_size(input: &str) -> IResult<&str, RawSize<'_>> {
    let (input, number) = recognize((digit1, opt((char('.'), digit1)))).parse(input)?;
    let (input, _) = opt(char(' ')).parse(input)?;
    let (input, unit) = opt(one_of("kKmMgGtTpP")).parse(input)?;
    let (input, _) = opt(one_of("iI")).parse(input)?;
    let (input, _) = opt(one_of("bB")).parse(input)?;
    Ok((input, RawSize { number, unit }))
}

const fn unit_power(unit: Option<char>) -> i32 {
    match unit {
        Some('k' | 'K') => 1,
        Some('m' | 'M') => 2,
        Some('g' | 'G') => 3,
        Some('t' | 'T') => 4,
        Some('p' | 'P') => 5,
        _ => 0,
    }
}

/// Parses a size string in the given base and returns a byte count.
///
/// Fractional results are truncated toward zero.
///
/// # Errors
///
/// Returns [`ParseError::InvalidSize`] if the input does not match the grammar
/// or the result does not fit in an `i64`.
pub fn parse_size(value: &str, base: SizeBase) -> Result<i64> {
    let invalid = || ParseError::InvalidSize {
        value: value.to_owned(),
    };

    let (rest, raw) = raw_size(value).map_err(|_| invalid())?;
    if !rest.is_empty() {
        return Err(invalid());
    }
    let number: f64 = raw.number.parse().map_err(|_| invalid())?;
    let bytes = number * base.step().powi(unit_power(raw.unit));

    #[allow(clippy::cast_precision_loss)]
    let limit = i64::MAX as f64;
    if !bytes.is_finite() || bytes >= limit {
        return Err(invalid());
    }
    #[allow(clippy::cast_possible_truncation)]
    let count = bytes as i64;
    Ok(count)
}

/// Parses a size with decimal multipliers (`1kb` = 1000 bytes).
///
/// # Errors
///
/// Returns [`ParseError::InvalidSize`] on malformed input.
pub fn parse_human_size(value: &str) -> Result<i64> {
    parse_size(value, SizeBase::Decimal)
}

/// Parses a size with binary multipliers (`1k` = 1024 bytes).
///
/// # Errors
///
/// Returns [`ParseError::InvalidSize`] on malformed input.
pub fn parse_ram_size(value: &str) -> Result<i64> {
    parse_size(value, SizeBase::Binary)
}

/// Parses a swap limit: a binary size, or `-1` for unlimited swap.
///
/// # Errors
///
/// Returns [`ParseError::InvalidSize`] on malformed input.
pub fn parse_swap_size(value: &str) -> Result<i64> {
    if value == "-1" {
        return Ok(-1);
    }
    parse_ram_size(value)
}
