//! `--ulimit` specs: `name=value` or `name=soft:hard`.

use crate::model::Ulimit;

use super::{ParseError, Result, parse_int, split_pair};

/// Parses a `--ulimit` spec into its name and limit.
///
/// An empty hard component (`nofile=1024:`) is read as a single value.
///
/// # Errors
///
/// Returns [`ParseError::Empty`] for a missing name and
/// [`ParseError::InvalidInteger`] for any non-integer component.
pub fn parse_ulimit(value: &str) -> Result<(String, Ulimit)> {
    let (name, limits) = split_pair(value, '=');
    if name.is_empty() {
        return Err(ParseError::Empty {
            what: "ulimit name",
        });
    }

    let ulimit = match split_pair(limits, ':') {
        (single, "") => Ulimit::Single(parse_int(single)?),
        (soft, hard) => Ulimit::Range {
            soft: parse_int(soft)?,
            hard: parse_int(hard)?,
        },
    };
    Ok((name.to_owned(), ulimit))
}
