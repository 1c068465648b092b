//! End-to-end translation and serialization tests.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use runexport_common::error::ExportError;
use runexport_compose::model::{HealthCheck, MountKind, Project, Service, Ulimit, VolumeMount};
use runexport_compose::{Positionals, RunOptions, Translation, marshal, translate};

fn run(options: &RunOptions) -> Translation {
    translate(
        "demo",
        options,
        &Positionals::new("nginx:1.27", vec!["nginx".into(), "-g".into()]),
    )
}

fn service(translation: &Translation) -> &Service {
    assert_eq!(translation.project.services.len(), 1);
    &translation.project.services[0]
}

fn messages(diagnostics: &[runexport_compose::Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(ToString::to_string).collect()
}

#[test]
fn add_host_maps_host_to_ip() {
    let options = RunOptions {
        add_host: vec!["db:10.0.0.5".into(), "cache:10.0.0.6".into(), "db:10.0.0.7".into()],
        ..RunOptions::default()
    };
    let translation = run(&options);
    let hosts = &service(&translation).extra_hosts;
    assert_eq!(hosts.get("db").map(String::as_str), Some("10.0.0.7"));
    assert_eq!(hosts.get("cache").map(String::as_str), Some("10.0.0.6"));
    assert!(translation.errors.is_empty());
}

#[test]
fn lone_volume_target_registers_named_volume() {
    let options = RunOptions {
        volume: vec!["/data".into()],
        ..RunOptions::default()
    };
    let translation = run(&options);
    let volumes = &service(&translation).volumes;
    assert_eq!(volumes.len(), 1);
    assert_eq!(volumes[0].kind, MountKind::Volume);
    assert_eq!(volumes[0].source, "app-0");
    assert_eq!(volumes[0].target, "/data");
    assert!(translation.project.volumes.contains_key("app-0"));
}

#[test]
fn every_named_volume_is_registered() {
    let options = RunOptions {
        volume: vec!["/data".into(), "/srv:/srv".into(), "/cache".into()],
        ..RunOptions::default()
    };
    let translation = run(&options);
    let names: Vec<_> = translation.project.volumes.keys().cloned().collect();
    assert_eq!(names, vec!["app-0", "app-2"]);
    let targets: Vec<_> = service(&translation)
        .volumes
        .iter()
        .map(|mount| mount.target.as_str())
        .collect();
    assert_eq!(targets, vec!["/data", "/srv", "/cache"]);
}

#[test]
fn read_only_bind_volume() {
    let options = RunOptions {
        volume: vec!["/host:/container:ro".into()],
        ..RunOptions::default()
    };
    let translation = run(&options);
    assert_eq!(
        service(&translation).volumes,
        vec![VolumeMount {
            kind: MountKind::Bind,
            source: "/host".into(),
            target: "/container".into(),
            read_only: true,
            ..VolumeMount::default()
        }]
    );
    assert!(translation.project.volumes.is_empty());
}

#[test]
fn bogus_volume_mode_is_one_error_and_no_mount() {
    let options = RunOptions {
        volume: vec!["/host:/container:bogus".into()],
        ..RunOptions::default()
    };
    let translation = run(&options);
    assert_eq!(translation.errors.len(), 1);
    assert_eq!(translation.errors[0].flag, "volume");
    assert!(service(&translation).volumes.is_empty());
}

#[test]
fn tmpfs_mount_carries_size_in_bytes() {
    let options = RunOptions {
        mount: vec!["type=tmpfs,target=/tmp,tmpfs-size=2m".into()],
        ..RunOptions::default()
    };
    let translation = run(&options);
    let volumes = &service(&translation).volumes;
    assert_eq!(volumes.len(), 1);
    assert_eq!(volumes[0].kind, MountKind::Tmpfs);
    assert_eq!(volumes[0].target, "/tmp");
    assert_eq!(
        volumes[0].tmpfs.as_ref().and_then(|tmpfs| tmpfs.size),
        Some(2_097_152)
    );
}

#[test]
fn tmpfs_source_fails_alone() {
    let options = RunOptions {
        mount: vec![
            "type=tmpfs,src=/x".into(),
            "type=bind,src=/srv,dst=/srv".into(),
        ],
        ..RunOptions::default()
    };
    let translation = run(&options);
    assert_eq!(translation.errors.len(), 1);
    assert_eq!(translation.errors[0].flag, "mount");
    let volumes = &service(&translation).volumes;
    assert_eq!(volumes.len(), 1);
    assert_eq!(volumes[0].kind, MountKind::Bind);
}

#[test]
fn tmpfs_flag_without_separator_is_an_error() {
    let options = RunOptions {
        tmpfs: vec!["/run".into(), "/tmp:size=64m".into()],
        ..RunOptions::default()
    };
    let translation = run(&options);
    assert_eq!(translation.errors.len(), 1);
    let volumes = &service(&translation).volumes;
    assert_eq!(volumes.len(), 1);
    assert_eq!(
        volumes[0].tmpfs.as_ref().and_then(|tmpfs| tmpfs.size),
        Some(67_108_864)
    );
}

#[test]
fn no_healthcheck_wins_over_health_cmd() {
    let options = RunOptions {
        no_healthcheck: true,
        health_cmd: Some("curl -f /".into()),
        ..RunOptions::default()
    };
    let translation = run(&options);
    let health = service(&translation)
        .healthcheck
        .as_ref()
        .expect("healthcheck should be allocated");
    assert!(health.disable);
    assert!(health.test.is_empty());
    assert_eq!(
        messages(&translation.warnings),
        vec!["ignoring --health-cmd as --no-healthcheck is specified"]
    );
    assert!(translation.errors.is_empty());
}

#[test]
fn no_healthcheck_ignores_every_health_duration() {
    let options = RunOptions {
        no_healthcheck: true,
        health_interval: "30s".into(),
        health_retries: 3,
        health_start_period: "10s".into(),
        health_timeout: "5s".into(),
        ..RunOptions::default()
    };
    let translation = run(&options);
    assert_eq!(
        messages(&translation.warnings),
        vec![
            "ignoring --health-interval as --no-healthcheck is specified",
            "ignoring --health-retries as --no-healthcheck is specified",
            "ignoring --health-start-period as --no-healthcheck is specified",
            "ignoring --health-timeout as --no-healthcheck is specified",
        ]
    );
    assert!(translation.errors.is_empty());
    assert_eq!(
        service(&translation).healthcheck,
        Some(HealthCheck {
            disable: true,
            ..HealthCheck::default()
        })
    );
}

#[test]
fn health_options_fill_one_block() {
    let options = RunOptions {
        health_cmd: Some("curl -f 'http://localhost/health check'".into()),
        health_interval: "30s".into(),
        health_retries: 3,
        health_timeout: "1m30s".into(),
        ..RunOptions::default()
    };
    let translation = run(&options);
    let health = service(&translation)
        .healthcheck
        .as_ref()
        .expect("healthcheck should be allocated");
    assert_eq!(
        health.test,
        vec!["CMD", "curl", "-f", "http://localhost/health check"]
    );
    assert_eq!(health.interval.map(|d| d.to_string()).as_deref(), Some("30s"));
    assert_eq!(health.timeout.map(|d| d.to_string()).as_deref(), Some("1m30s"));
    assert_eq!(health.retries, Some(3));
    assert!(health.start_period.is_none());
    assert!(!health.disable);
}

#[test]
fn bad_health_duration_names_its_flag() {
    let options = RunOptions {
        health_start_period: "soon".into(),
        ..RunOptions::default()
    };
    let translation = run(&options);
    assert_eq!(translation.errors.len(), 1);
    assert_eq!(translation.errors[0].flag, "health-start-period");
    assert!(translation.errors[0].message.contains("--health-start-period"));
}

#[test]
fn unterminated_health_cmd_leaves_no_healthcheck() {
    let options = RunOptions {
        health_cmd: Some("'oops".into()),
        ..RunOptions::default()
    };
    let translation = run(&options);
    assert!(service(&translation).healthcheck.is_none());
    assert_eq!(translation.errors.len(), 1);
    assert_eq!(translation.errors[0].flag, "health-cmd");
    assert!(translation.errors[0].message.contains("missing closing quote"));
}

#[test]
fn blkio_block_is_lazy() {
    let translation = run(&RunOptions::default());
    assert!(service(&translation).blkio_config.is_none());

    let options = RunOptions {
        device_read_bps: vec!["/dev/sda:1mb".into()],
        device_write_iops: vec!["/dev/sda:300".into()],
        blkio_weight_device: vec!["/dev/sdb:200".into()],
        ..RunOptions::default()
    };
    let translation = run(&options);
    let blkio = service(&translation)
        .blkio_config
        .as_ref()
        .expect("blkio should be allocated");
    assert_eq!(blkio.device_read_bps[0].rate, 1_000_000);
    assert_eq!(blkio.device_write_iops[0].rate, 300);
    assert_eq!(blkio.weight_device[0].weight, 200);
    assert!(blkio.weight.is_none());
}

#[test]
fn failing_blkio_entries_leave_no_block() {
    let options = RunOptions {
        blkio_weight_device: vec!["/dev/sda".into()],
        device_write_bps: vec!["/dev/sda:lots".into()],
        ..RunOptions::default()
    };
    let translation = run(&options);
    assert_eq!(translation.errors.len(), 2);
    assert!(service(&translation).blkio_config.is_none());
}

#[test]
fn malformed_rate_fails_only_its_entry() {
    let options = RunOptions {
        device_read_bps: vec!["/dev/sda:1zb".into(), "/dev/sdb:10k".into()],
        device_read_iops: vec!["/dev/sda:many".into()],
        ..RunOptions::default()
    };
    let translation = run(&options);
    assert_eq!(translation.errors.len(), 2);
    let blkio = service(&translation)
        .blkio_config
        .as_ref()
        .expect("blkio should be allocated");
    assert_eq!(blkio.device_read_bps.len(), 1);
    assert_eq!(blkio.device_read_bps[0].rate, 10_000);
    assert!(blkio.device_read_iops.is_empty());
}

#[test]
fn non_finite_cpus_are_unset() {
    for cpus in [f64::INFINITY, f64::NAN] {
        let options = RunOptions {
            cpus,
            ..RunOptions::default()
        };
        let translation = run(&options);
        assert!(service(&translation).deploy.is_none());
        assert!(translation.errors.is_empty());
    }
}

#[test]
fn resource_limits_from_cpus_and_memory() {
    let options = RunOptions {
        cpus: 1.5,
        memory: 536_870_912,
        ..RunOptions::default()
    };
    let translation = run(&options);
    let limits = service(&translation)
        .deploy
        .as_ref()
        .and_then(|deploy| deploy.resources.limits.as_ref())
        .expect("limits should be allocated");
    assert_eq!(limits.cpus.as_deref(), Some("1.500000"));
    assert_eq!(limits.memory, Some(536_870_912));
}

#[test]
fn ulimits_and_bad_entries() {
    let options = RunOptions {
        ulimit: vec!["nofile=1024:4096".into(), "nproc=lots".into()],
        ..RunOptions::default()
    };
    let translation = run(&options);
    assert_eq!(translation.errors.len(), 1);
    assert_eq!(
        service(&translation).ulimits.get("nofile"),
        Some(&Ulimit::Range {
            soft: 1024,
            hard: 4096
        })
    );
    assert!(!service(&translation).ulimits.contains_key("nproc"));
}

#[test]
fn publish_failure_names_the_value() {
    let options = RunOptions {
        publish: vec!["8080:80".into(), "http".into()],
        ..RunOptions::default()
    };
    let translation = run(&options);
    assert_eq!(service(&translation).ports.len(), 1);
    assert_eq!(translation.errors.len(), 1);
    assert!(translation.errors[0].message.contains("\"http\""));
}

#[test]
fn network_scoped_flags_share_default_attachment() {
    let options = RunOptions {
        network: Some("backend".into()),
        ip: Some("172.20.0.5".into()),
        network_alias: vec!["web".into()],
        ..RunOptions::default()
    };
    let translation = run(&options);
    let network = translation
        .project
        .networks
        .get("default")
        .expect("project network should exist");
    assert_eq!(network.name.as_deref(), Some("backend"));
    assert!(network.external);

    let attachment = service(&translation)
        .networks
        .get("default")
        .expect("attachment should exist");
    assert_eq!(attachment.ipv4_address.as_deref(), Some("172.20.0.5"));
    assert_eq!(attachment.aliases, vec!["web"]);
}

#[test]
fn key_value_lists_tolerate_missing_values() {
    let options = RunOptions {
        label: vec!["tier=web".into(), "canary".into()],
        sysctl: vec!["net.core.somaxconn=1024".into()],
        log_opt: vec!["max-size=10m".into()],
        env: vec!["MODE=prod".into(), "HOME".into()],
        ..RunOptions::default()
    };
    let translation = run(&options);
    let service = service(&translation);
    assert_eq!(service.labels.get("canary").map(String::as_str), Some(""));
    assert_eq!(
        service.sysctls.get("net.core.somaxconn").map(String::as_str),
        Some("1024")
    );
    let logging = service.logging.as_ref().expect("logging should be allocated");
    assert_eq!(
        logging.options.get("max-size").map(String::as_str),
        Some("10m")
    );
    assert_eq!(service.environment.get("MODE"), Some(&Some("prod".into())));
    assert_eq!(service.environment.get("HOME"), Some(&None));
    assert!(translation.errors.is_empty());
}

#[test]
fn unsupported_flags_warn_in_flag_order() {
    let options = RunOptions {
        rm: true,
        detach: true,
        interactive: true,
        pull: "always".into(),
        sig_proxy: false,
        ..RunOptions::default()
    };
    let translation = run(&options);
    let flags: Vec<_> = translation.warnings.iter().map(|w| w.flag).collect();
    assert_eq!(flags, vec!["detach", "interactive", "pull", "rm", "sig-proxy"]);
    assert!(translation.warnings[2].message.contains("pulled if missing"));
    assert!(translation.errors.is_empty());
}

#[test]
fn defaults_pass_through_silently() {
    let options = RunOptions {
        restart: "no".into(),
        stop_signal: "SIGTERM".into(),
        pull: "missing".into(),
        ..RunOptions::default()
    };
    let translation = run(&options);
    let service = service(&translation);
    assert!(service.restart.is_none());
    assert!(service.stop_signal.is_none());
    assert!(translation.warnings.is_empty());
}

#[test]
fn stop_timeout_becomes_grace_period() {
    let options = RunOptions {
        stop_timeout: 90,
        restart: "unless-stopped".into(),
        stop_signal: "SIGQUIT".into(),
        ..RunOptions::default()
    };
    let translation = run(&options);
    let service = service(&translation);
    assert_eq!(
        service.stop_grace_period.map(|d| d.to_string()).as_deref(),
        Some("1m30s")
    );
    assert_eq!(service.restart.as_deref(), Some("unless-stopped"));
    assert_eq!(service.stop_signal.as_deref(), Some("SIGQUIT"));
}

#[test]
fn translation_is_deterministic() {
    let options = RunOptions {
        volume: vec!["/data".into(), "/a:/b:bogus".into()],
        rm: true,
        publish: vec!["80".into()],
        label: vec!["a=b".into()],
        ..RunOptions::default()
    };
    assert_eq!(run(&options), run(&options));
}

#[test]
fn json_round_trip_keeps_image_command_and_volumes() {
    let options = RunOptions {
        volume: vec!["/data".into(), "/host:/container:ro".into()],
        mount: vec!["type=tmpfs,dst=/tmp,tmpfs-size=1m".into()],
        ..RunOptions::default()
    };
    let translation = run(&options);
    let bytes = marshal(&translation.project, "json").expect("should marshal");
    let back: Project = serde_json::from_slice(&bytes).expect("should parse back");

    let expected = service(&translation);
    let parsed = &back.services[0];
    assert_eq!(parsed.name, "app");
    assert_eq!(parsed.image, expected.image);
    assert_eq!(parsed.command, expected.command);
    assert_eq!(parsed.volumes, expected.volumes);
}

#[test]
fn yaml_round_trip() {
    let options = RunOptions {
        health_cmd: Some("true".into()),
        health_interval: "10s".into(),
        ulimit: vec!["nproc=100".into()],
        ..RunOptions::default()
    };
    let translation = run(&options);
    let bytes = marshal(&translation.project, "compose").expect("should marshal");
    let back: Project = serde_yaml::from_slice(&bytes).expect("should parse back");
    assert_eq!(back, translation.project);
}

#[test]
fn xml_is_unsupported() {
    let translation = run(&RunOptions::default());
    let err = marshal(&translation.project, "xml").expect_err("should reject xml");
    assert!(matches!(err, ExportError::UnsupportedFormat { .. }));
    assert!(err.to_string().contains("xml"));
}
