//! Flat option set of a single `run` invocation.
//!
//! [`RunOptions`] has one field per `run` flag, declared in flag order. That
//! order is also the order in which the translation pass visits the flags and
//! therefore the order of its diagnostics.

use clap::{ArgAction, Args};
use runexport_common::constants::{
    DEFAULT_PULL_POLICY, DEFAULT_RESTART_POLICY, DEFAULT_STOP_SIGNAL, UNSET_DURATION,
};

use crate::parse::size::{parse_ram_size, parse_swap_size};

/// Every flag accepted by `run`, with the defaults `run` applies.
///
/// Plain string flags are `None` when not given; repeatable flags keep their
/// values in command-line order.
#[derive(Debug, Clone, PartialEq, Args)]
pub struct RunOptions {
    /// Add a custom host-to-IP mapping.
    #[arg(long, value_name = "HOST:IP")]
    pub add_host: Vec<String>,
    /// Attach to STDIN, STDOUT or STDERR.
    #[arg(short = 'a', long)]
    pub attach: Vec<String>,
    /// Block IO relative weight, between 10 and 1000, or 0 to disable.
    #[arg(long, default_value_t)]
    pub blkio_weight: u16,
    /// Block IO relative device weight.
    #[arg(long, value_name = "PATH:WEIGHT")]
    pub blkio_weight_device: Vec<String>,
    /// Add Linux capabilities.
    #[arg(long)]
    pub cap_add: Vec<String>,
    /// Drop Linux capabilities.
    #[arg(long)]
    pub cap_drop: Vec<String>,
    /// Optional parent cgroup for the container.
    #[arg(long)]
    pub cgroup_parent: Option<String>,
    /// Cgroup namespace to use (host|private).
    #[arg(long)]
    pub cgroupns: Option<String>,
    /// Write the container ID to the file.
    #[arg(long)]
    pub cidfile: Option<String>,
    /// Limit CPU CFS period.
    #[arg(long, default_value_t)]
    pub cpu_period: i64,
    /// Limit CPU CFS quota.
    #[arg(long, default_value_t)]
    pub cpu_quota: i64,
    /// Limit CPU real-time period in microseconds.
    #[arg(long, default_value_t)]
    pub cpu_rt_period: i64,
    /// Limit CPU real-time runtime in microseconds.
    #[arg(long, default_value_t)]
    pub cpu_rt_runtime: i64,
    /// CPU shares (relative weight).
    #[arg(short = 'c', long, default_value_t)]
    pub cpu_shares: i64,
    /// Number of CPUs.
    #[arg(long, default_value_t)]
    pub cpus: f64,
    /// CPUs in which to allow execution (0-3, 0,1).
    #[arg(long)]
    pub cpuset_cpus: Option<String>,
    /// MEMs in which to allow execution (0-3, 0,1).
    #[arg(long)]
    pub cpuset_mems: Option<String>,
    /// Run container in background and print container ID.
    #[arg(short = 'd', long)]
    pub detach: bool,
    /// Override the key sequence for detaching a container.
    #[arg(long)]
    pub detach_keys: Option<String>,
    /// Add a host device to the container.
    #[arg(long)]
    pub device: Vec<String>,
    /// Add a rule to the cgroup allowed devices list.
    #[arg(long)]
    pub device_cgroup_rule: Vec<String>,
    /// Limit read rate (bytes per second) from a device.
    #[arg(long, value_name = "PATH:RATE")]
    pub device_read_bps: Vec<String>,
    /// Limit read rate (IO per second) from a device.
    #[arg(long, value_name = "PATH:COUNT")]
    pub device_read_iops: Vec<String>,
    /// Limit write rate (bytes per second) to a device.
    #[arg(long, value_name = "PATH:RATE")]
    pub device_write_bps: Vec<String>,
    /// Limit write rate (IO per second) to a device.
    #[arg(long, value_name = "PATH:COUNT")]
    pub device_write_iops: Vec<String>,
    /// Skip image verification.
    #[arg(long, default_value_t = true, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub disable_content_trust: bool,
    /// Set custom DNS servers.
    #[arg(long)]
    pub dns: Vec<String>,
    /// Set DNS options.
    #[arg(long)]
    pub dns_option: Vec<String>,
    /// Set custom DNS search domains.
    #[arg(long)]
    pub dns_search: Vec<String>,
    /// Container NIS domain name.
    #[arg(long)]
    pub domainname: Option<String>,
    /// Overwrite the default ENTRYPOINT of the image.
    #[arg(long)]
    pub entrypoint: Option<String>,
    /// Set environment variables.
    #[arg(short = 'e', long)]
    pub env: Vec<String>,
    /// Read in a file of environment variables.
    #[arg(long)]
    pub env_file: Vec<String>,
    /// Expose a port or a range of ports.
    #[arg(long)]
    pub expose: Vec<String>,
    /// GPU devices to add to the container ('all' to pass all GPUs).
    #[arg(long)]
    pub gpus: Option<String>,
    /// Add additional groups to join.
    #[arg(long)]
    pub group_add: Vec<String>,
    /// Command to run to check health.
    #[arg(long)]
    pub health_cmd: Option<String>,
    /// Time between running the check (ms|s|m|h).
    #[arg(long, default_value = UNSET_DURATION)]
    pub health_interval: String,
    /// Consecutive failures needed to report unhealthy.
    #[arg(long, default_value_t)]
    pub health_retries: u64,
    /// Start period for the container to initialize before counting retries (ms|s|m|h).
    #[arg(long, default_value = UNSET_DURATION)]
    pub health_start_period: String,
    /// Maximum time to allow one check to run (ms|s|m|h).
    #[arg(long, default_value = UNSET_DURATION)]
    pub health_timeout: String,
    /// Container host name.
    #[arg(short = 'h', long)]
    pub hostname: Option<String>,
    /// Run an init inside the container that forwards signals and reaps processes.
    #[arg(long)]
    pub init: bool,
    /// Keep STDIN open even if not attached.
    #[arg(short = 'i', long)]
    pub interactive: bool,
    /// IPv4 address (e.g., 172.30.100.104).
    #[arg(long)]
    pub ip: Option<String>,
    /// IPv6 address (e.g., 2001:db8::33).
    #[arg(long)]
    pub ip6: Option<String>,
    /// IPC mode to use.
    #[arg(long)]
    pub ipc: Option<String>,
    /// Container isolation technology.
    #[arg(long)]
    pub isolation: Option<String>,
    /// Kernel memory limit.
    #[arg(long, default_value_t, value_parser = parse_ram_size)]
    pub kernel_memory: i64,
    /// Set meta data on a container.
    #[arg(short = 'l', long)]
    pub label: Vec<String>,
    /// Read in a line delimited file of labels.
    #[arg(long)]
    pub label_file: Vec<String>,
    /// Add link to another container.
    #[arg(long)]
    pub link: Vec<String>,
    /// Container IPv4/IPv6 link-local addresses.
    #[arg(long)]
    pub link_local_ip: Vec<String>,
    /// Logging driver for the container.
    #[arg(long)]
    pub log_driver: Option<String>,
    /// Log driver options.
    #[arg(long)]
    pub log_opt: Vec<String>,
    /// Container MAC address (e.g., 92:d0:c6:0a:29:33).
    #[arg(long)]
    pub mac_address: Option<String>,
    /// Memory limit.
    #[arg(short = 'm', long, default_value_t, value_parser = parse_ram_size)]
    pub memory: i64,
    /// Memory soft limit.
    #[arg(long, default_value_t, value_parser = parse_ram_size)]
    pub memory_reservation: i64,
    /// Swap limit equal to memory plus swap: '-1' to enable unlimited swap.
    #[arg(long, default_value_t, allow_negative_numbers = true, value_parser = parse_swap_size)]
    pub memory_swap: i64,
    /// Tune container memory swappiness (0 to 100).
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub memory_swappiness: i64,
    /// Attach a filesystem mount to the container.
    #[arg(long)]
    pub mount: Vec<String>,
    /// Assign a name to the container.
    #[arg(long)]
    pub name: Option<String>,
    /// Connect a container to a network.
    #[arg(long)]
    pub network: Option<String>,
    /// Add network-scoped alias for the container.
    #[arg(long)]
    pub network_alias: Vec<String>,
    /// Disable any container-specified HEALTHCHECK.
    #[arg(long)]
    pub no_healthcheck: bool,
    /// Disable OOM Killer.
    #[arg(long)]
    pub oom_kill_disable: bool,
    /// Tune host's OOM preferences (-1000 to 1000).
    #[arg(long, default_value_t, allow_negative_numbers = true)]
    pub oom_score_adj: i64,
    /// PID namespace to use.
    #[arg(long)]
    pub pid: Option<String>,
    /// Tune container pids limit (set -1 for unlimited).
    #[arg(long, default_value_t, allow_negative_numbers = true)]
    pub pids_limit: i64,
    /// Set platform if server is multi-platform capable.
    #[arg(long)]
    pub platform: Option<String>,
    /// Give extended privileges to this container.
    #[arg(long)]
    pub privileged: bool,
    /// Publish a container's port(s) to the host.
    #[arg(short = 'p', long)]
    pub publish: Vec<String>,
    /// Publish all exposed ports to random ports.
    #[arg(short = 'P', long)]
    pub publish_all: bool,
    /// Pull image before running ('always'|'missing'|'never').
    #[arg(long, default_value = DEFAULT_PULL_POLICY)]
    pub pull: String,
    /// Mount the container's root filesystem as read only.
    #[arg(long)]
    pub read_only: bool,
    /// Restart policy to apply when a container exits.
    #[arg(long, default_value = DEFAULT_RESTART_POLICY)]
    pub restart: String,
    /// Automatically remove the container when it exits.
    #[arg(long)]
    pub rm: bool,
    /// Runtime to use for this container.
    #[arg(long)]
    pub runtime: Option<String>,
    /// Security Options.
    #[arg(long)]
    pub security_opt: Vec<String>,
    /// Size of /dev/shm.
    #[arg(long, default_value_t, value_parser = parse_ram_size)]
    pub shm_size: i64,
    /// Proxy received signals to the process.
    #[arg(long, default_value_t = true, action = ArgAction::Set, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub sig_proxy: bool,
    /// Signal to stop a container.
    #[arg(long, default_value = DEFAULT_STOP_SIGNAL)]
    pub stop_signal: String,
    /// Timeout (in seconds) to stop a container.
    #[arg(long, default_value_t)]
    pub stop_timeout: i64,
    /// Storage driver options for the container.
    #[arg(long)]
    pub storage_opt: Vec<String>,
    /// Sysctl options.
    #[arg(long, value_name = "KEY=VALUE")]
    pub sysctl: Vec<String>,
    /// Mount a tmpfs directory.
    #[arg(long, value_name = "TARGET:OPTIONS")]
    pub tmpfs: Vec<String>,
    /// Allocate a pseudo-TTY.
    #[arg(short = 't', long)]
    pub tty: bool,
    /// Ulimit options.
    #[arg(long, value_name = "NAME=SOFT[:HARD]")]
    pub ulimit: Vec<String>,
    /// Username or UID (format: <name|uid>[:<group|gid>]).
    #[arg(short = 'u', long)]
    pub user: Option<String>,
    /// User namespace to use.
    #[arg(long)]
    pub userns: Option<String>,
    /// UTS namespace to use.
    #[arg(long)]
    pub uts: Option<String>,
    /// Bind mount a volume.
    #[arg(short = 'v', long)]
    pub volume: Vec<String>,
    /// Optional volume driver for the container.
    #[arg(long)]
    pub volume_driver: Option<String>,
    /// Mount volumes from the specified container(s).
    #[arg(long)]
    pub volumes_from: Vec<String>,
    /// Working directory inside the container.
    #[arg(short = 'w', long)]
    pub workdir: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            add_host: Vec::new(),
            attach: Vec::new(),
            blkio_weight: 0,
            blkio_weight_device: Vec::new(),
            cap_add: Vec::new(),
            cap_drop: Vec::new(),
            cgroup_parent: None,
            cgroupns: None,
            cidfile: None,
            cpu_period: 0,
            cpu_quota: 0,
            cpu_rt_period: 0,
            cpu_rt_runtime: 0,
            cpu_shares: 0,
            cpus: 0.0,
            cpuset_cpus: None,
            cpuset_mems: None,
            detach: false,
            detach_keys: None,
            device: Vec::new(),
            device_cgroup_rule: Vec::new(),
            device_read_bps: Vec::new(),
            device_read_iops: Vec::new(),
            device_write_bps: Vec::new(),
            device_write_iops: Vec::new(),
            disable_content_trust: true,
            dns: Vec::new(),
            dns_option: Vec::new(),
            dns_search: Vec::new(),
            domainname: None,
            entrypoint: None,
            env: Vec::new(),
            env_file: Vec::new(),
            expose: Vec::new(),
            gpus: None,
            group_add: Vec::new(),
            health_cmd: None,
            health_interval: UNSET_DURATION.to_owned(),
            health_retries: 0,
            health_start_period: UNSET_DURATION.to_owned(),
            health_timeout: UNSET_DURATION.to_owned(),
            hostname: None,
            init: false,
            interactive: false,
            ip: None,
            ip6: None,
            ipc: None,
            isolation: None,
            kernel_memory: 0,
            label: Vec::new(),
            label_file: Vec::new(),
            link: Vec::new(),
            link_local_ip: Vec::new(),
            log_driver: None,
            log_opt: Vec::new(),
            mac_address: None,
            memory: 0,
            memory_reservation: 0,
            memory_swap: 0,
            memory_swappiness: -1,
            mount: Vec::new(),
            name: None,
            network: None,
            network_alias: Vec::new(),
            no_healthcheck: false,
            oom_kill_disable: false,
            oom_score_adj: 0,
            pid: None,
            pids_limit: 0,
            platform: None,
            privileged: false,
            publish: Vec::new(),
            publish_all: false,
            pull: DEFAULT_PULL_POLICY.to_owned(),
            read_only: false,
            restart: DEFAULT_RESTART_POLICY.to_owned(),
            rm: false,
            runtime: None,
            security_opt: Vec::new(),
            shm_size: 0,
            sig_proxy: true,
            stop_signal: DEFAULT_STOP_SIGNAL.to_owned(),
            stop_timeout: 0,
            storage_opt: Vec::new(),
            sysctl: Vec::new(),
            tmpfs: Vec::new(),
            tty: false,
            ulimit: Vec::new(),
            user: None,
            userns: None,
            uts: None,
            volume: Vec::new(),
            volume_driver: None,
            volumes_from: Vec::new(),
            workdir: None,
        }
    }
}

/// Positional arguments of `run`: the image and the command to run in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Positionals {
    /// Image reference; required.
    pub image: String,
    /// Command and arguments; empty to use the image default.
    pub command: Vec<String>,
}

impl Positionals {
    /// Creates positional arguments from an image and a command.
    #[must_use]
    pub fn new(image: impl Into<String>, command: Vec<String>) -> Self {
        Self {
            image: image.into(),
            command,
        }
    }
}
