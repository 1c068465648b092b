//! Warnings and errors collected during one translation pass.
//!
//! Both lists only ever grow, keep insertion order, and are handed to the
//! caller as-is when the pass ends. Repeated identical diagnostics are kept.

use std::fmt;

use serde::Serialize;

/// A single warning or error, tied to the flag it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Flag name without leading dashes (`volume`, `health-cmd`, ...).
    pub flag: &'static str,
    /// Human-readable description, naming the flag.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Append-only warning and error accumulator.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Diagnostic>,
    errors: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records input that was accepted but degraded or dropped.
    pub fn warn(&mut self, flag: &'static str, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(flag, %message, "translation warning");
        self.warnings.push(Diagnostic { flag, message });
    }

    /// Records a value that could not be turned into output.
    pub fn error(&mut self, flag: &'static str, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(flag, %message, "translation error");
        self.errors.push(Diagnostic { flag, message });
    }

    /// Warnings recorded so far.
    #[must_use]
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Errors recorded so far.
    #[must_use]
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    /// Consumes the accumulator, returning `(warnings, errors)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Diagnostic>, Vec<Diagnostic>) {
        (self.warnings, self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_and_duplicates() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn("rm", "first");
        diagnostics.error("volume", "bad");
        diagnostics.warn("rm", "first");
        diagnostics.warn("detach", "second");

        let (warnings, errors) = diagnostics.into_parts();
        let messages: Vec<_> = warnings.iter().map(ToString::to_string).collect();
        assert_eq!(messages, vec!["first", "first", "second"]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].flag, "volume");
    }

    #[test]
    fn starts_empty() {
        let diagnostics = Diagnostics::new();
        assert!(diagnostics.warnings().is_empty());
        assert!(diagnostics.errors().is_empty());
    }
}
