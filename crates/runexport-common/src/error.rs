//! Unified error types for the runexport workspace.
//!
//! Translation problems are never errors of this kind: they are collected as
//! diagnostics by the translation pass. These variants cover the failures that
//! stop an export outright.

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The requested output format is not one the serializer knows.
    #[error("unsupported format {format:?}")]
    UnsupportedFormat {
        /// Format name as requested by the caller.
        format: String,
    },

    /// JSON serialization failed.
    #[error("json serialization error: {source}")]
    Json {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// YAML serialization failed.
    #[error("yaml serialization error: {source}")]
    Yaml {
        /// Underlying serialization error.
        #[from]
        source: serde_yaml::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ExportError>;
