//! The flag table, one row per `run` flag in alphabetical order.

use std::time::Duration;

use runexport_common::constants::{
    DEFAULT_NETWORK, DEFAULT_PULL_POLICY, DEFAULT_RESTART_POLICY, DEFAULT_STOP_SIGNAL,
    UNSET_DURATION, VOLUME_NAME_PREFIX,
};

use crate::model::{MountKind, Network, ThrottleDevice, Volume, WeightDevice};
use crate::options::RunOptions;
use crate::parse::mount::{parse_mount, parse_tmpfs};
use crate::parse::port::parse_port;
use crate::parse::ulimit::parse_ulimit;
use crate::parse::volume::parse_volume;
use crate::parse::{
    self, ParseError, parse_duration, parse_human_size, parse_uint, split_pair, split_required,
};

use super::{Pass, Policy, Rule};

const NOT_IN_COMPOSE: &str = "the property is not valid in compose v3";
const ALWAYS_PULLED: &str = "images will always be pulled if missing";

const fn direct(
    flag: &'static str,
    is_set: fn(&RunOptions) -> bool,
    apply: fn(&mut Pass<'_>),
) -> Rule {
    Rule {
        flag,
        policy: Policy::Direct { is_set, apply },
        health: false,
    }
}

const fn unsupported(flag: &'static str, is_set: fn(&RunOptions) -> bool) -> Rule {
    Rule {
        flag,
        policy: Policy::Unsupported {
            is_set,
            reason: NOT_IN_COMPOSE,
        },
        health: false,
    }
}

const fn parsed(
    flag: &'static str,
    values: fn(&RunOptions) -> Vec<&str>,
    apply: fn(&mut Pass<'_>, &str) -> parse::Result<()>,
) -> Rule {
    Rule {
        flag,
        policy: Policy::Parsed { values, apply },
        health: false,
    }
}

/// Marks a rule as yielding to `--no-healthcheck`.
const fn health(rule: Rule) -> Rule {
    Rule {
        health: true,
        ..rule
    }
}

fn all(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}

fn given(value: Option<&str>) -> Vec<&str> {
    value.filter(|value| !value.is_empty()).into_iter().collect()
}

/// A string flag whose `unset` value means it was not given.
fn unless<'a>(value: &'a str, unset: &str) -> Vec<&'a str> {
    given(Some(value).filter(|value| *value != unset))
}

fn is_given(value: Option<&str>) -> bool {
    value.is_some_and(|value| !value.is_empty())
}

fn nonempty(value: Option<&str>) -> Option<String> {
    value.filter(|value| !value.is_empty()).map(str::to_owned)
}

fn throttle(value: &str, rate: fn(&str) -> parse::Result<u64>) -> parse::Result<ThrottleDevice> {
    let (path, amount) = split_required(value, ':', "path:rate")?;
    Ok(ThrottleDevice {
        path: path.to_owned(),
        rate: rate(amount)?,
    })
}

fn byte_rate(value: &str) -> parse::Result<u64> {
    u64::try_from(parse_human_size(value)?).map_err(|_| ParseError::InvalidSize {
        value: value.to_owned(),
    })
}

/// Splits a command shell-style; an empty command is an error.
fn command_words(value: &str, what: &'static str) -> parse::Result<Vec<String>> {
    let words = shell_words::split(value).map_err(|_| ParseError::UnterminatedQuote)?;
    if words.is_empty() {
        return Err(ParseError::Empty { what });
    }
    Ok(words)
}

fn add_host(pass: &mut Pass<'_>, value: &str) -> parse::Result<()> {
    let (host, ip) = split_required(value, ':', "host:ip")?;
    let _ = pass
        .service
        .extra_hosts
        .insert(host.to_owned(), ip.to_owned());
    Ok(())
}

fn blkio_weight_device(pass: &mut Pass<'_>, value: &str) -> parse::Result<()> {
    let (path, weight) = split_required(value, ':', "path:weight")?;
    let weight = weight.parse().map_err(|_| ParseError::InvalidInteger {
        value: weight.to_owned(),
    })?;
    pass.blkio().weight_device.push(WeightDevice {
        path: path.to_owned(),
        weight,
    });
    Ok(())
}

fn device_read_bps(pass: &mut Pass<'_>, value: &str) -> parse::Result<()> {
    let device = throttle(value, byte_rate)?;
    pass.blkio().device_read_bps.push(device);
    Ok(())
}

fn device_read_iops(pass: &mut Pass<'_>, value: &str) -> parse::Result<()> {
    let device = throttle(value, parse_uint)?;
    pass.blkio().device_read_iops.push(device);
    Ok(())
}

fn device_write_bps(pass: &mut Pass<'_>, value: &str) -> parse::Result<()> {
    let device = throttle(value, byte_rate)?;
    pass.blkio().device_write_bps.push(device);
    Ok(())
}

fn device_write_iops(pass: &mut Pass<'_>, value: &str) -> parse::Result<()> {
    let device = throttle(value, parse_uint)?;
    pass.blkio().device_write_iops.push(device);
    Ok(())
}

fn entrypoint(pass: &mut Pass<'_>, value: &str) -> parse::Result<()> {
    pass.service.entrypoint = command_words(value, "entrypoint")?;
    Ok(())
}

fn environment(pass: &mut Pass<'_>) {
    for entry in &pass.options.env {
        let (key, value) = match entry.split_once('=') {
            Some((key, value)) => (key, Some(value.to_owned())),
            None => (entry.as_str(), None),
        };
        let _ = pass.service.environment.insert(key.to_owned(), value);
    }
}

fn health_cmd(pass: &mut Pass<'_>, value: &str) -> parse::Result<()> {
    let words = command_words(value, "health command")?;
    pass.healthcheck().test = std::iter::once("CMD".to_owned()).chain(words).collect();
    Ok(())
}

fn health_interval(pass: &mut Pass<'_>, value: &str) -> parse::Result<()> {
    let interval = parse_duration(value)?;
    pass.healthcheck().interval = Some(interval.into());
    Ok(())
}

fn health_start_period(pass: &mut Pass<'_>, value: &str) -> parse::Result<()> {
    let start_period = parse_duration(value)?;
    pass.healthcheck().start_period = Some(start_period.into());
    Ok(())
}

fn health_timeout(pass: &mut Pass<'_>, value: &str) -> parse::Result<()> {
    let timeout = parse_duration(value)?;
    pass.healthcheck().timeout = Some(timeout.into());
    Ok(())
}

fn labels(pass: &mut Pass<'_>) {
    for label in &pass.options.label {
        let (key, value) = split_pair(label, '=');
        let _ = pass
            .service
            .labels
            .insert(key.to_owned(), value.to_owned());
    }
}

fn log_options(pass: &mut Pass<'_>) {
    let options = pass.options;
    let logging = pass.logging();
    for option in &options.log_opt {
        let (key, value) = split_pair(option, '=');
        let _ = logging.options.insert(key.to_owned(), value.to_owned());
    }
}

fn mount(pass: &mut Pass<'_>, value: &str) -> parse::Result<()> {
    pass.service.volumes.push(parse_mount(value)?);
    Ok(())
}

fn network(pass: &mut Pass<'_>) {
    let _ = pass.project.networks.insert(
        DEFAULT_NETWORK.to_owned(),
        Network {
            name: pass.options.network.clone(),
            external: true,
        },
    );
}

fn publish(pass: &mut Pass<'_>, value: &str) -> parse::Result<()> {
    pass.service.ports.extend(parse_port(value)?);
    Ok(())
}

fn sysctls(pass: &mut Pass<'_>) {
    for sysctl in &pass.options.sysctl {
        let (key, value) = split_pair(sysctl, '=');
        let _ = pass
            .service
            .sysctls
            .insert(key.to_owned(), value.to_owned());
    }
}

fn tmpfs(pass: &mut Pass<'_>, value: &str) -> parse::Result<()> {
    pass.service.volumes.push(parse_tmpfs(value)?);
    Ok(())
}

fn ulimit(pass: &mut Pass<'_>, value: &str) -> parse::Result<()> {
    let (name, limit) = parse_ulimit(value)?;
    let _ = pass.service.ulimits.insert(name, limit);
    Ok(())
}

/// One-segment volumes become named volumes keyed by their position.
fn volume(pass: &mut Pass<'_>, value: &str) -> parse::Result<()> {
    let name = format!("{VOLUME_NAME_PREFIX}-{}", pass.occurrence);
    let mount = parse_volume(value, &name)?;
    if mount.kind == MountKind::Volume {
        let _ = pass.project.volumes.insert(name, Volume::default());
    }
    pass.service.volumes.push(mount);
    Ok(())
}

pub(super) static RULES: &[Rule] = &[
    parsed("add-host", |o| all(&o.add_host), add_host),
    unsupported("attach", |o| !o.attach.is_empty()),
    direct(
        "blkio-weight",
        |o| o.blkio_weight != 0,
        |p| p.blkio().weight = Some(p.options.blkio_weight),
    ),
    parsed(
        "blkio-weight-device",
        |o| all(&o.blkio_weight_device),
        blkio_weight_device,
    ),
    direct(
        "cap-add",
        |o| !o.cap_add.is_empty(),
        |p| p.service.cap_add.clone_from(&p.options.cap_add),
    ),
    direct(
        "cap-drop",
        |o| !o.cap_drop.is_empty(),
        |p| p.service.cap_drop.clone_from(&p.options.cap_drop),
    ),
    direct(
        "cgroup-parent",
        |o| is_given(o.cgroup_parent.as_deref()),
        |p| p.service.cgroup_parent = nonempty(p.options.cgroup_parent.as_deref()),
    ),
    unsupported("cgroupns", |o| is_given(o.cgroupns.as_deref())),
    unsupported("cidfile", |o| is_given(o.cidfile.as_deref())),
    unsupported("cpu-period", |o| o.cpu_period != 0),
    unsupported("cpu-quota", |o| o.cpu_quota != 0),
    unsupported("cpu-rt-period", |o| o.cpu_rt_period != 0),
    unsupported("cpu-rt-runtime", |o| o.cpu_rt_runtime != 0),
    direct(
        "cpu-shares",
        |o| o.cpu_shares != 0,
        |p| p.service.cpu_shares = Some(p.options.cpu_shares),
    ),
    direct(
        "cpus",
        |o| o.cpus.is_finite() && o.cpus > 0.0,
        |p| p.limits().cpus = Some(format!("{:.6}", p.options.cpus)),
    ),
    unsupported("cpuset-cpus", |o| is_given(o.cpuset_cpus.as_deref())),
    unsupported("cpuset-mems", |o| is_given(o.cpuset_mems.as_deref())),
    unsupported("detach", |o| o.detach),
    unsupported("detach-keys", |o| is_given(o.detach_keys.as_deref())),
    direct(
        "device",
        |o| !o.device.is_empty(),
        |p| p.service.devices.clone_from(&p.options.device),
    ),
    direct(
        "device-cgroup-rule",
        |o| !o.device_cgroup_rule.is_empty(),
        |p| {
            p.service
                .device_cgroup_rules
                .clone_from(&p.options.device_cgroup_rule);
        },
    ),
    parsed("device-read-bps", |o| all(&o.device_read_bps), device_read_bps),
    parsed("device-read-iops", |o| all(&o.device_read_iops), device_read_iops),
    parsed("device-write-bps", |o| all(&o.device_write_bps), device_write_bps),
    parsed(
        "device-write-iops",
        |o| all(&o.device_write_iops),
        device_write_iops,
    ),
    unsupported("disable-content-trust", |o| !o.disable_content_trust),
    direct(
        "dns",
        |o| !o.dns.is_empty(),
        |p| p.service.dns.clone_from(&p.options.dns),
    ),
    direct(
        "dns-option",
        |o| !o.dns_option.is_empty(),
        |p| p.service.dns_opt.clone_from(&p.options.dns_option),
    ),
    direct(
        "dns-search",
        |o| !o.dns_search.is_empty(),
        |p| p.service.dns_search.clone_from(&p.options.dns_search),
    ),
    direct(
        "domainname",
        |o| is_given(o.domainname.as_deref()),
        |p| p.service.domainname = nonempty(p.options.domainname.as_deref()),
    ),
    parsed("entrypoint", |o| given(o.entrypoint.as_deref()), entrypoint),
    direct("env", |o| !o.env.is_empty(), environment),
    direct(
        "env-file",
        |o| !o.env_file.is_empty(),
        |p| p.service.env_file.clone_from(&p.options.env_file),
    ),
    direct(
        "expose",
        |o| !o.expose.is_empty(),
        |p| p.service.expose.clone_from(&p.options.expose),
    ),
    unsupported("gpus", |o| is_given(o.gpus.as_deref())),
    direct(
        "group-add",
        |o| !o.group_add.is_empty(),
        |p| p.service.group_add.clone_from(&p.options.group_add),
    ),
    health(parsed(
        "health-cmd",
        |o| given(o.health_cmd.as_deref()),
        health_cmd,
    )),
    health(parsed(
        "health-interval",
        |o| unless(&o.health_interval, UNSET_DURATION),
        health_interval,
    )),
    health(direct(
        "health-retries",
        |o| o.health_retries != 0,
        |p| p.healthcheck().retries = Some(p.options.health_retries),
    )),
    health(parsed(
        "health-start-period",
        |o| unless(&o.health_start_period, UNSET_DURATION),
        health_start_period,
    )),
    health(parsed(
        "health-timeout",
        |o| unless(&o.health_timeout, UNSET_DURATION),
        health_timeout,
    )),
    direct(
        "hostname",
        |o| is_given(o.hostname.as_deref()),
        |p| p.service.hostname = nonempty(p.options.hostname.as_deref()),
    ),
    direct("init", |o| o.init, |p| p.service.init = true),
    unsupported("interactive", |o| o.interactive),
    direct(
        "ip",
        |o| is_given(o.ip.as_deref()),
        |p| p.default_network().ipv4_address = nonempty(p.options.ip.as_deref()),
    ),
    direct(
        "ip6",
        |o| is_given(o.ip6.as_deref()),
        |p| p.default_network().ipv6_address = nonempty(p.options.ip6.as_deref()),
    ),
    direct(
        "ipc",
        |o| is_given(o.ipc.as_deref()),
        |p| p.service.ipc = nonempty(p.options.ipc.as_deref()),
    ),
    direct(
        "isolation",
        |o| is_given(o.isolation.as_deref()),
        |p| p.service.isolation = nonempty(p.options.isolation.as_deref()),
    ),
    unsupported("kernel-memory", |o| o.kernel_memory != 0),
    direct("label", |o| !o.label.is_empty(), labels),
    unsupported("label-file", |o| !o.label_file.is_empty()),
    direct(
        "link",
        |o| !o.link.is_empty(),
        |p| p.service.links.clone_from(&p.options.link),
    ),
    direct(
        "link-local-ip",
        |o| !o.link_local_ip.is_empty(),
        |p| {
            let addresses = p.options.link_local_ip.clone();
            p.default_network().link_local_ips = addresses;
        },
    ),
    direct(
        "log-driver",
        |o| is_given(o.log_driver.as_deref()),
        |p| p.logging().driver = nonempty(p.options.log_driver.as_deref()),
    ),
    direct("log-opt", |o| !o.log_opt.is_empty(), log_options),
    direct(
        "mac-address",
        |o| is_given(o.mac_address.as_deref()),
        |p| p.service.mac_address = nonempty(p.options.mac_address.as_deref()),
    ),
    direct(
        "memory",
        |o| o.memory > 0,
        |p| p.limits().memory = Some(p.options.memory),
    ),
    direct(
        "memory-reservation",
        |o| o.memory_reservation != 0,
        |p| p.service.mem_reservation = Some(p.options.memory_reservation),
    ),
    direct(
        "memory-swap",
        |o| o.memory_swap != 0,
        |p| p.service.memswap_limit = Some(p.options.memory_swap),
    ),
    direct(
        "memory-swappiness",
        |o| o.memory_swappiness != -1,
        |p| p.service.mem_swappiness = Some(p.options.memory_swappiness),
    ),
    parsed("mount", |o| all(&o.mount), mount),
    direct(
        "name",
        |o| is_given(o.name.as_deref()),
        |p| p.service.container_name = nonempty(p.options.name.as_deref()),
    ),
    direct("network", |o| is_given(o.network.as_deref()), network),
    direct(
        "network-alias",
        |o| !o.network_alias.is_empty(),
        |p| {
            let aliases = p.options.network_alias.clone();
            p.default_network().aliases = aliases;
        },
    ),
    direct(
        "no-healthcheck",
        |o| o.no_healthcheck,
        |p| p.healthcheck().disable = true,
    ),
    direct(
        "oom-kill-disable",
        |o| o.oom_kill_disable,
        |p| p.service.oom_kill_disable = true,
    ),
    direct(
        "oom-score-adj",
        |o| o.oom_score_adj != 0,
        |p| p.service.oom_score_adj = Some(p.options.oom_score_adj),
    ),
    direct(
        "pid",
        |o| is_given(o.pid.as_deref()),
        |p| p.service.pid = nonempty(p.options.pid.as_deref()),
    ),
    direct(
        "pids-limit",
        |o| o.pids_limit != 0,
        |p| p.service.pids_limit = Some(p.options.pids_limit),
    ),
    direct(
        "platform",
        |o| is_given(o.platform.as_deref()),
        |p| p.service.platform = nonempty(p.options.platform.as_deref()),
    ),
    direct(
        "privileged",
        |o| o.privileged,
        |p| p.service.privileged = true,
    ),
    parsed("publish", |o| all(&o.publish), publish),
    unsupported("publish-all", |o| o.publish_all),
    Rule {
        flag: "pull",
        policy: Policy::Unsupported {
            is_set: |o| o.pull != DEFAULT_PULL_POLICY,
            reason: ALWAYS_PULLED,
        },
        health: false,
    },
    direct(
        "read-only",
        |o| o.read_only,
        |p| p.service.read_only = true,
    ),
    direct(
        "restart",
        |o| !o.restart.is_empty() && o.restart != DEFAULT_RESTART_POLICY,
        |p| p.service.restart = Some(p.options.restart.clone()),
    ),
    unsupported("rm", |o| o.rm),
    direct(
        "runtime",
        |o| is_given(o.runtime.as_deref()),
        |p| p.service.runtime = nonempty(p.options.runtime.as_deref()),
    ),
    direct(
        "security-opt",
        |o| !o.security_opt.is_empty(),
        |p| p.service.security_opt.clone_from(&p.options.security_opt),
    ),
    direct(
        "shm-size",
        |o| o.shm_size != 0,
        |p| p.service.shm_size = Some(p.options.shm_size),
    ),
    unsupported("sig-proxy", |o| !o.sig_proxy),
    direct(
        "stop-signal",
        |o| !o.stop_signal.is_empty() && o.stop_signal != DEFAULT_STOP_SIGNAL,
        |p| p.service.stop_signal = Some(p.options.stop_signal.clone()),
    ),
    direct(
        "stop-timeout",
        |o| o.stop_timeout > 0,
        |p| {
            let seconds = p.options.stop_timeout.unsigned_abs();
            p.service.stop_grace_period = Some(Duration::from_secs(seconds).into());
        },
    ),
    unsupported("storage-opt", |o| !o.storage_opt.is_empty()),
    direct("sysctl", |o| !o.sysctl.is_empty(), sysctls),
    parsed("tmpfs", |o| all(&o.tmpfs), tmpfs),
    direct("tty", |o| o.tty, |p| p.service.tty = true),
    parsed("ulimit", |o| all(&o.ulimit), ulimit),
    direct(
        "user",
        |o| is_given(o.user.as_deref()),
        |p| p.service.user = nonempty(p.options.user.as_deref()),
    ),
    direct(
        "userns",
        |o| is_given(o.userns.as_deref()),
        |p| p.service.userns_mode = nonempty(p.options.userns.as_deref()),
    ),
    direct(
        "uts",
        |o| is_given(o.uts.as_deref()),
        |p| p.service.uts = nonempty(p.options.uts.as_deref()),
    ),
    parsed("volume", |o| all(&o.volume), volume),
    direct(
        "volume-driver",
        |o| is_given(o.volume_driver.as_deref()),
        |p| p.service.volume_driver = nonempty(p.options.volume_driver.as_deref()),
    ),
    direct(
        "volumes-from",
        |o| !o.volumes_from.is_empty(),
        |p| p.service.volumes_from.clone_from(&p.options.volumes_from),
    ),
    direct(
        "workdir",
        |o| is_given(o.workdir.as_deref()),
        |p| p.service.working_dir = nonempty(p.options.workdir.as_deref()),
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_sorted_and_unique() {
        let flags: Vec<_> = RULES.iter().map(|rule| rule.flag).collect();
        let mut sorted = flags.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(flags, sorted);
    }

    #[test]
    fn only_health_flags_yield_to_no_healthcheck() {
        let flags: Vec<_> = RULES
            .iter()
            .filter(|rule| rule.health)
            .map(|rule| rule.flag)
            .collect();
        assert_eq!(
            flags,
            vec![
                "health-cmd",
                "health-interval",
                "health-retries",
                "health-start-period",
                "health-timeout",
            ]
        );
    }

    #[test]
    fn every_rule_is_unset_by_default() {
        let options = RunOptions::default();
        for rule in RULES {
            assert!(
                !rule.policy.is_set(&options),
                "--{} should be unset by default",
                rule.flag
            );
        }
    }

    #[test]
    fn command_words_follow_shell_quoting() {
        assert_eq!(
            command_words(r#"sh -c "echo 'hi there'""#, "entrypoint"),
            Ok(vec!["sh".to_owned(), "-c".to_owned(), "echo 'hi there'".to_owned()])
        );
        assert_eq!(
            command_words("a\\\nb", "entrypoint"),
            Ok(vec!["ab".to_owned()])
        );
        assert_eq!(
            command_words("curl -f localhost # liveness", "health command"),
            Ok(vec!["curl".to_owned(), "-f".to_owned(), "localhost".to_owned()])
        );
    }

    #[test]
    fn command_words_reject_open_quotes_and_empty_commands() {
        assert_eq!(
            command_words("'oops", "health command"),
            Err(ParseError::UnterminatedQuote)
        );
        assert_eq!(
            command_words("   ", "entrypoint"),
            Err(ParseError::Empty { what: "entrypoint" })
        );
    }

    #[test]
    fn sentinel_durations_count_as_unset() {
        assert!(unless("0s", UNSET_DURATION).is_empty());
        assert!(unless("", UNSET_DURATION).is_empty());
        assert_eq!(unless("5s", UNSET_DURATION), vec!["5s"]);
    }
}
