//! Project serialization.

use runexport_common::config::Format;
use runexport_common::error::Result;

use crate::model::Project;

/// Serializes a project into the named format.
///
/// `compose` (also `yaml`/`yml`) produces YAML, `json` produces pretty JSON.
///
/// # Errors
///
/// Returns [`ExportError::UnsupportedFormat`] for any other name, or the
/// underlying serializer error.
///
/// [`ExportError::UnsupportedFormat`]: runexport_common::error::ExportError::UnsupportedFormat
pub fn marshal(project: &Project, format: &str) -> Result<Vec<u8>> {
    marshal_as(project, format.parse()?)
}

/// Serializes a project into an already resolved format.
///
/// # Errors
///
/// Returns the underlying serializer error.
pub fn marshal_as(project: &Project, format: Format) -> Result<Vec<u8>> {
    let bytes = match format {
        Format::Compose => serde_yaml::to_string(project)?.into_bytes(),
        Format::Json => serde_json::to_vec_pretty(project)?,
    };
    tracing::debug!(%format, bytes = bytes.len(), "project serialized");
    Ok(bytes)
}
