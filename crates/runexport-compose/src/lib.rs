//! # runexport-compose
//!
//! Turns the flags of a single `run` invocation into a compose project.
//!
//! Handles:
//! - **Options**: the flat `run` flag set and the image/command positionals.
//! - **Parse**: mini-grammars for durations, sizes, volumes, mounts, tmpfs,
//!   ulimits and ports.
//! - **Translate**: the flag table and the pass that applies it.
//! - **Diagnostics**: warnings and errors gathered during a pass.
//! - **Model**: the compose project, services and mounts.
//! - **Marshal**: YAML and JSON output.

pub mod diagnostics;
pub mod marshal;
pub mod model;
pub mod options;
pub mod parse;
pub mod translate;

pub use diagnostics::Diagnostic;
pub use marshal::{marshal, marshal_as};
pub use model::Project;
pub use options::{Positionals, RunOptions};
pub use translate::{Translation, translate};
