//! `--mount` key/value specs and `--tmpfs` specs.
//!
//! A `--mount` value is a comma-separated list of `key=value` pairs:
//!
//! | key                               | valid for | value              |
//! |-----------------------------------|-----------|--------------------|
//! | `type`                            | all       | volume, bind, tmpfs |
//! | `src`, `source`                   | volume, bind | path or name    |
//! | `dst`, `destination`, `target`    | all       | container path     |
//! | `readonly`, `ro`                  | all       | boolean token      |
//! | `bind-propagation`, `consistency` | bind      | free string        |
//! | `volume-nocopy`                   | volume    | boolean token      |
//! | `tmpfs-size`                      | tmpfs     | binary size        |
//! | `tmpfs-mode`                      | tmpfs     | octal mode         |
//!
//! Unknown keys are ignored. When a key repeats, the last occurrence wins.

use runexport_common::constants::DEFAULT_TMPFS_SIZE;

use crate::model::{BindOptions, MountKind, TmpfsOptions, VolumeMount, VolumeOptions};

use super::size::parse_ram_size;
use super::{ParseError, Result, parse_bool, parse_options, split_required};

struct MountOptions<'a> {
    pairs: Vec<(&'a str, &'a str)>,
}

impl<'a> MountOptions<'a> {
    fn get(&self, keys: &[&str]) -> Option<&'a str> {
        self.pairs
            .iter()
            .rev()
            .find(|(key, _)| keys.contains(key))
            .map(|&(_, value)| value)
    }
}

/// A flag-style boolean: a bare key means `true`.
fn flag(value: &str) -> Result<bool> {
    if value.is_empty() {
        return Ok(true);
    }
    parse_bool(value)
}

fn parse_mode(value: &str) -> Result<u32> {
    u32::from_str_radix(value, 8).map_err(|_| ParseError::InvalidInteger {
        value: value.to_owned(),
    })
}

fn require(kind: MountKind, allowed: MountKind, option: &'static str) -> Result<()> {
    if kind == allowed {
        Ok(())
    } else {
        Err(ParseError::OptionNotAllowed {
            option,
            kind: kind.as_str(),
        })
    }
}

fn parse_kind(value: Option<&str>) -> Result<MountKind> {
    match value {
        None | Some("volume") => Ok(MountKind::Volume),
        Some("bind") => Ok(MountKind::Bind),
        Some("tmpfs") => Ok(MountKind::Tmpfs),
        Some(other) => Err(ParseError::UnknownMountType {
            kind: other.to_owned(),
        }),
    }
}

/// Parses a `--mount` spec into a service mount.
///
/// The type defaults to `volume` when not given.
///
/// # Errors
///
/// Returns the first problem found: an unknown type, a source on a tmpfs
/// mount, an option used with the wrong mount type, a malformed boolean,
/// size or mode, or a missing target.
pub fn parse_mount(value: &str) -> Result<VolumeMount> {
    let options = MountOptions {
        pairs: parse_options(value),
    };
    let kind = parse_kind(options.get(&["type"]))?;
    let mut mount = VolumeMount {
        kind,
        ..VolumeMount::default()
    };

    if let Some(source) = options.get(&["src", "source"]) {
        if kind == MountKind::Tmpfs {
            return Err(ParseError::TmpfsSource);
        }
        source.clone_into(&mut mount.source);
    }
    if let Some(target) = options.get(&["dst", "destination", "target"]) {
        target.clone_into(&mut mount.target);
    }
    if let Some(read_only) = options.get(&["readonly", "ro"]) {
        mount.read_only = flag(read_only)?;
    }

    if let Some(propagation) = options.get(&["bind-propagation"]) {
        require(kind, MountKind::Bind, "bind-propagation")?;
        mount.bind = Some(BindOptions {
            propagation: Some(propagation.to_owned()),
        });
    }
    if let Some(consistency) = options.get(&["consistency"]) {
        require(kind, MountKind::Bind, "consistency")?;
        mount.consistency = Some(consistency.to_owned());
    }
    if let Some(nocopy) = options.get(&["volume-nocopy"]) {
        require(kind, MountKind::Volume, "volume-nocopy")?;
        mount.volume = Some(VolumeOptions {
            nocopy: flag(nocopy)?,
        });
    }
    if let Some(size) = options.get(&["tmpfs-size"]) {
        require(kind, MountKind::Tmpfs, "tmpfs-size")?;
        mount.tmpfs.get_or_insert_default().size = Some(parse_ram_size(size)?);
    }
    if let Some(mode) = options.get(&["tmpfs-mode"]) {
        require(kind, MountKind::Tmpfs, "tmpfs-mode")?;
        mount.tmpfs.get_or_insert_default().mode = Some(parse_mode(mode)?);
    }

    if mount.target.is_empty() {
        return Err(ParseError::Empty {
            what: "mount target",
        });
    }
    Ok(mount)
}

/// Parses a `--tmpfs` spec, `target:options`, into a tmpfs mount.
///
/// Recognized options are `size=<binary size>` and `mode=<octal>`; anything
/// else (`rw`, `noexec`, ...) is ignored. The size defaults to 1024 bytes.
///
/// # Errors
///
/// Returns [`ParseError::MissingSeparator`] when the `:` is absent, and a
/// size or mode error when those options are malformed.
pub fn parse_tmpfs(value: &str) -> Result<VolumeMount> {
    let (target, options) = split_required(value, ':', "target:options")?;
    if target.is_empty() {
        return Err(ParseError::Empty {
            what: "tmpfs target",
        });
    }

    let mut tmpfs = TmpfsOptions {
        size: Some(DEFAULT_TMPFS_SIZE),
        mode: None,
    };
    for (key, option) in parse_options(options) {
        match key {
            "size" => tmpfs.size = Some(parse_ram_size(option)?),
            "mode" => tmpfs.mode = Some(parse_mode(option)?),
            _ => {}
        }
    }

    Ok(VolumeMount {
        kind: MountKind::Tmpfs,
        target: target.to_owned(),
        tmpfs: Some(tmpfs),
        ..VolumeMount::default()
    })
}
