//! Export configuration: which project name to stamp and which format to emit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Textual formats the serializer can produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Compose YAML document.
    #[default]
    Compose,
    /// Pretty-printed JSON.
    Json,
}

impl Format {
    /// Returns the canonical name of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compose => "compose",
            Self::Json => "json",
        }
    }

    /// Whether the output is a YAML document (and wants a `---` header).
    #[must_use]
    pub const fn is_yaml(self) -> bool {
        matches!(self, Self::Compose)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compose" | "yaml" | "yml" => Ok(Self::Compose),
            "json" => Ok(Self::Json),
            other => Err(ExportError::UnsupportedFormat {
                format: other.to_owned(),
            }),
        }
    }
}

/// Settings that live outside the run flags themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Name stamped on the generated project; may be empty.
    pub project_name: String,
    /// Output format.
    pub format: Format,
}
