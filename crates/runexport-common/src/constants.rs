//! Names and default values shared by the translator and the CLI.

/// Name given to the single service every export produces.
pub const SERVICE_NAME: &str = "app";

/// Key of the network attachment created for network-scoped flags.
pub const DEFAULT_NETWORK: &str = "default";

/// Prefix of the volume names generated for anonymous `--volume` targets.
pub const VOLUME_NAME_PREFIX: &str = SERVICE_NAME;

/// Size in bytes of a `--tmpfs` mount that does not declare `size=`.
pub const DEFAULT_TMPFS_SIZE: i64 = 1024;

/// Value the health-check duration flags hold when the user did not set them.
pub const UNSET_DURATION: &str = "0s";

/// Pull policy the `run` command applies when `--pull` is not given.
pub const DEFAULT_PULL_POLICY: &str = "missing";

/// Restart policy the `run` command applies when `--restart` is not given.
pub const DEFAULT_RESTART_POLICY: &str = "no";

/// Stop signal the `run` command applies when `--stop-signal` is not given.
pub const DEFAULT_STOP_SIGNAL: &str = "SIGTERM";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "runexport";

/// Environment variable selecting the output format.
pub const FORMAT_ENV: &str = "RUNEXPORT_FORMAT";

/// Environment variable selecting the project name.
pub const PROJECT_ENV: &str = "RUNEXPORT_PROJECT";
