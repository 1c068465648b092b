//! Output helpers: diagnostics on stderr, the document on stdout.

use std::io::{self, Write};

use runexport_common::config::Format;
use runexport_compose::Translation;

/// YAML document-start marker written before compose output.
const DOCUMENT_START: &[u8] = b"---\n";

/// Formats every diagnostic as one line, warnings first.
#[must_use]
pub fn diagnostic_lines(translation: &Translation) -> Vec<String> {
    let warnings = translation
        .warnings
        .iter()
        .map(|warning| format!("warning: {warning}"));
    let errors = translation
        .errors
        .iter()
        .map(|error| format!("error: {error}"));
    warnings.chain(errors).collect()
}

/// Prints the diagnostics of a pass to standard error.
///
/// # Errors
///
/// Returns an error if standard error cannot be written.
pub fn report(translation: &Translation) -> io::Result<()> {
    let mut stderr = io::stderr().lock();
    for line in diagnostic_lines(translation) {
        writeln!(stderr, "{line}")?;
    }
    Ok(())
}

/// Frames serialized bytes as a document in the given format.
#[must_use]
pub fn document(bytes: &[u8], format: Format) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + DOCUMENT_START.len());
    if format.is_yaml() {
        out.extend_from_slice(DOCUMENT_START);
    }
    out.extend_from_slice(bytes);
    if !out.ends_with(b"\n") {
        out.push(b'\n');
    }
    out
}

/// Writes the framed document to standard output.
///
/// # Errors
///
/// Returns an error if standard output cannot be written.
pub fn write_document(bytes: &[u8], format: Format) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(&document(bytes, format))?;
    stdout.flush()
}
