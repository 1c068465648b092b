//! Parsers for the compound values carried by `run` flags.
//!
//! Each mini-language (durations, human sizes, volume and mount specs, tmpfs,
//! ulimits, port publishing) lives in its own module and returns
//! a [`ParseError`] on failure. None of them touch the compose model's
//! lifecycle: the translation pass decides what a failure means.

pub mod duration;
pub mod mount;
pub mod port;
pub mod size;
pub mod ulimit;
pub mod volume;

use thiserror::Error;

pub use self::duration::parse_duration;
pub use self::size::{parse_human_size, parse_ram_size};

/// Failure to read a compound flag value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A duration string did not follow `<number><unit>` notation.
    #[error("invalid duration {value:?}: {reason}")]
    InvalidDuration {
        /// Offending input.
        value: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// A size string did not follow `<number>[unit]` notation.
    #[error("invalid size: {value:?}")]
    InvalidSize {
        /// Offending input.
        value: String,
    },

    /// A boolean token was not one of the accepted spellings.
    #[error("invalid boolean: {value:?}")]
    InvalidBool {
        /// Offending input.
        value: String,
    },

    /// An integer component could not be read.
    #[error("invalid integer: {value:?}")]
    InvalidInteger {
        /// Offending input.
        value: String,
    },

    /// A delimited value lacked its separator.
    #[error("expected {expected} separated by {separator:?}")]
    MissingSeparator {
        /// Description of the expected shape.
        expected: &'static str,
        /// Separator that was missing.
        separator: char,
    },

    /// A `--volume` spec carried a mode other than `ro` or `rw`.
    #[error("invalid read mode {mode:?}")]
    InvalidMode {
        /// Offending mode segment.
        mode: String,
    },

    /// A `--mount` spec named a type other than `volume`, `bind` or `tmpfs`.
    #[error("unknown mount type {kind:?}")]
    UnknownMountType {
        /// Offending type.
        kind: String,
    },

    /// A tmpfs mount was given a source.
    #[error("invalid source value for tmpfs")]
    TmpfsSource,

    /// A mount option was used with a mount type that does not support it.
    #[error("invalid {option} option for {kind} mount")]
    OptionNotAllowed {
        /// The option key.
        option: &'static str,
        /// The mount type it was used with.
        kind: &'static str,
    },

    /// A port publishing spec was malformed.
    #[error("invalid port spec: {reason}")]
    InvalidPort {
        /// What was wrong with it.
        reason: String,
    },

    /// A shell-quoted command ended inside a quote.
    #[error("missing closing quote")]
    UnterminatedQuote,

    /// A value that must carry content was empty.
    #[error("empty {what}")]
    Empty {
        /// What was empty.
        what: &'static str,
    },
}

/// Convenience alias for parser results.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Parses a boolean token.
///
/// Accepts `1`/`0`, `y`/`n`, `yes`/`no`, `true`/`false` and `on`/`off`,
/// case-insensitively.
///
/// # Errors
///
/// Returns [`ParseError::InvalidBool`] for any other spelling.
pub fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "y" | "yes" | "true" | "on" => Ok(true),
        "0" | "n" | "no" | "false" | "off" => Ok(false),
        _ => Err(ParseError::InvalidBool {
            value: value.to_owned(),
        }),
    }
}

/// Splits `key<sep>value` on the first separator.
///
/// A value without the separator yields the whole input as key and an empty
/// value.
#[must_use]
pub fn split_pair(value: &str, separator: char) -> (&str, &str) {
    value.split_once(separator).unwrap_or((value, ""))
}

/// Splits `key<sep>value` on the first separator, requiring it to be present.
///
/// # Errors
///
/// Returns [`ParseError::MissingSeparator`] when the separator is absent.
pub fn split_required<'a>(
    value: &'a str,
    separator: char,
    expected: &'static str,
) -> Result<(&'a str, &'a str)> {
    value
        .split_once(separator)
        .ok_or(ParseError::MissingSeparator {
            expected,
            separator,
        })
}

/// Parses a comma-separated `key[=value]` option list into ordered pairs.
///
/// Empty items (as produced by a trailing comma) are skipped.
#[must_use]
pub fn parse_options(value: &str) -> Vec<(&str, &str)> {
    value
        .split(',')
        .filter(|part| !part.is_empty())
        .map(|part| split_pair(part, '='))
        .collect()
}

/// Parses a signed integer component.
///
/// # Errors
///
/// Returns [`ParseError::InvalidInteger`] if the input is not a base-10 integer.
pub fn parse_int(value: &str) -> Result<i64> {
    value.parse().map_err(|_| ParseError::InvalidInteger {
        value: value.to_owned(),
    })
}

/// Parses an unsigned integer component.
///
/// # Errors
///
/// Returns [`ParseError::InvalidInteger`] if the input is not a base-10
/// non-negative integer.
pub fn parse_uint(value: &str) -> Result<u64> {
    value.parse().map_err(|_| ParseError::InvalidInteger {
        value: value.to_owned(),
    })
}
