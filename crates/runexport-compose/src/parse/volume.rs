//! `--volume` specs: `target`, `source:target` or `source:target:mode`.
//!
//! Windows drive-letter paths (`C:\data:/data`) are not recognized; the drive
//! colon is read as a separator.

use crate::model::{MountKind, VolumeMount};

use super::{ParseError, Result};

/// Parses a `--volume` spec into a service mount.
///
/// A lone target becomes a named volume called `anonymous_name`; two or three
/// segments become a bind mount, the third segment being `ro` or `rw`.
///
/// # Errors
///
/// Returns [`ParseError::InvalidMode`] for a mode other than `ro`/`rw`, and
/// [`ParseError::Empty`] when the source or target segment is empty.
pub fn parse_volume(value: &str, anonymous_name: &str) -> Result<VolumeMount> {
    let segments: Vec<&str> = value.splitn(3, ':').collect();
    let mount = match segments.as_slice() {
        [target] => VolumeMount {
            kind: MountKind::Volume,
            source: anonymous_name.to_owned(),
            target: required(target, "volume target")?,
            ..VolumeMount::default()
        },
        [source, target] => bind(source, target, false)?,
        [source, target, mode] => {
            let read_only = match *mode {
                "ro" => true,
                "rw" => false,
                other => {
                    return Err(ParseError::InvalidMode {
                        mode: other.to_owned(),
                    });
                }
            };
            bind(source, target, read_only)?
        }
        _ => return Err(ParseError::Empty { what: "volume" }),
    };
    Ok(mount)
}

fn bind(source: &str, target: &str, read_only: bool) -> Result<VolumeMount> {
    Ok(VolumeMount {
        kind: MountKind::Bind,
        source: required(source, "volume source")?,
        target: required(target, "volume target")?,
        read_only,
        ..VolumeMount::default()
    })
}

fn required(segment: &str, what: &'static str) -> Result<String> {
    if segment.is_empty() {
        return Err(ParseError::Empty { what });
    }
    Ok(segment.to_owned())
}
