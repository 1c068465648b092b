//! Run options to compose project translation.
//!
//! Every flag is described once in [`rules::RULES`] with one of three
//! policies: copied directly, dropped with a warning, or parsed per value with
//! failures recorded as errors. [`translate`] walks that table in order, so the
//! diagnostics come out in flag order and a pass never stops early.

mod rules;

use runexport_common::constants::{DEFAULT_NETWORK, SERVICE_NAME};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::model::{
    BlkioConfig, HealthCheck, Logging, Project, ResourceLimits, Service, ServiceNetwork,
};
use crate::options::{Positionals, RunOptions};
use crate::parse;

/// Outcome of one translation pass.
///
/// The project is always present, even when `errors` is not empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    /// The project, holding exactly one service.
    pub project: Project,
    /// Accepted input that was degraded or dropped, in flag order.
    pub warnings: Vec<Diagnostic>,
    /// Values that could not be translated, in flag order.
    pub errors: Vec<Diagnostic>,
}

impl Translation {
    /// Whether any flag value failed to translate.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Translates one set of run options into a single-service compose project.
///
/// Pure function of its inputs: the same options always produce the same
/// project and the same diagnostics.
#[must_use]
pub fn translate(project_name: &str, options: &RunOptions, positionals: &Positionals) -> Translation {
    tracing::info!(
        image = %positionals.image,
        project = project_name,
        "translating run options"
    );

    let mut pass = Pass::new(project_name, options);
    for rule in rules::RULES {
        pass.apply(rule);
    }
    pass.finish(positionals)
}

/// How a single flag reaches the project.
pub(crate) enum Policy {
    /// Copied across without diagnostics.
    Direct {
        is_set: fn(&RunOptions) -> bool,
        apply: fn(&mut Pass<'_>),
    },
    /// No compose equivalent; setting it records a warning.
    Unsupported {
        is_set: fn(&RunOptions) -> bool,
        reason: &'static str,
    },
    /// Each value goes through a parser; a failure drops that value only.
    Parsed {
        values: fn(&RunOptions) -> Vec<&str>,
        apply: fn(&mut Pass<'_>, &str) -> parse::Result<()>,
    },
}

impl Policy {
    fn is_set(&self, options: &RunOptions) -> bool {
        match self {
            Self::Direct { is_set, .. } | Self::Unsupported { is_set, .. } => is_set(options),
            Self::Parsed { values, .. } => !values(options).is_empty(),
        }
    }
}

/// One row of the translation table.
pub(crate) struct Rule {
    /// Flag name without leading dashes.
    pub(crate) flag: &'static str,
    pub(crate) policy: Policy,
    /// Skipped with a warning when `--no-healthcheck` is given.
    pub(crate) health: bool,
}

/// State of one translation pass.
pub(crate) struct Pass<'a> {
    options: &'a RunOptions,
    /// Position of the value being parsed among the current flag's values.
    occurrence: usize,
    project: Project,
    service: Service,
    diagnostics: Diagnostics,
}

impl<'a> Pass<'a> {
    fn new(project_name: &str, options: &'a RunOptions) -> Self {
        Self {
            options,
            occurrence: 0,
            project: Project {
                name: project_name.to_owned(),
                ..Project::default()
            },
            service: Service {
                name: SERVICE_NAME.to_owned(),
                ..Service::default()
            },
            diagnostics: Diagnostics::new(),
        }
    }

    fn apply(&mut self, rule: &Rule) {
        let options = self.options;
        if !rule.policy.is_set(options) {
            return;
        }
        let flag = rule.flag;
        if rule.health && options.no_healthcheck {
            self.diagnostics.warn(
                flag,
                format!("ignoring --{flag} as --no-healthcheck is specified"),
            );
            return;
        }

        match &rule.policy {
            Policy::Direct { apply, .. } => apply(self),
            Policy::Unsupported { reason, .. } => self.diagnostics.warn(
                flag,
                format!("unable to set --{flag} property in compose spec as {reason}"),
            ),
            Policy::Parsed { values, apply } => {
                for (occurrence, value) in values(options).into_iter().enumerate() {
                    self.occurrence = occurrence;
                    if let Err(err) = apply(self, value) {
                        self.diagnostics.error(
                            flag,
                            format!("unable to parse --{flag} value \"{value}\": {err}"),
                        );
                    }
                }
            }
        }
    }

    fn finish(mut self, positionals: &Positionals) -> Translation {
        if positionals.image.is_empty() {
            self.diagnostics.error("image", "an image is required");
        }
        self.service.image.clone_from(&positionals.image);
        self.service.command.clone_from(&positionals.command);
        self.project.services.push(self.service);

        let (warnings, errors) = self.diagnostics.into_parts();
        tracing::debug!(
            warnings = warnings.len(),
            errors = errors.len(),
            "translation finished"
        );
        Translation {
            project: self.project,
            warnings,
            errors,
        }
    }

    fn blkio(&mut self) -> &mut BlkioConfig {
        self.service.blkio_config.get_or_insert_default()
    }

    fn healthcheck(&mut self) -> &mut HealthCheck {
        self.service.healthcheck.get_or_insert_default()
    }

    fn limits(&mut self) -> &mut ResourceLimits {
        self.service
            .deploy
            .get_or_insert_default()
            .resources
            .limits
            .get_or_insert_default()
    }

    fn logging(&mut self) -> &mut Logging {
        self.service.logging.get_or_insert_default()
    }

    fn default_network(&mut self) -> &mut ServiceNetwork {
        self.service
            .networks
            .entry(DEFAULT_NETWORK.to_owned())
            .or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(options: &RunOptions) -> Translation {
        translate("", options, &Positionals::new("nginx", Vec::new()))
    }

    #[test]
    fn always_one_service_named_app() {
        let translation = run(&RunOptions::default());
        assert_eq!(translation.project.services.len(), 1);
        let service = &translation.project.services[0];
        assert_eq!(service.name, "app");
        assert_eq!(service.image, "nginx");
        assert!(translation.warnings.is_empty());
        assert!(!translation.has_errors());
    }

    #[test]
    fn defaults_allocate_no_nested_blocks() {
        let translation = run(&RunOptions::default());
        let service = &translation.project.services[0];
        assert!(service.blkio_config.is_none());
        assert!(service.healthcheck.is_none());
        assert!(service.deploy.is_none());
        assert!(service.logging.is_none());
        assert!(service.networks.is_empty());
        assert!(translation.project.networks.is_empty());
        assert!(translation.project.volumes.is_empty());
    }

    #[test]
    fn missing_image_is_an_error() {
        let translation = translate(
            "demo",
            &RunOptions::default(),
            &Positionals::new("", Vec::new()),
        );
        assert_eq!(translation.project.name, "demo");
        assert_eq!(translation.project.services.len(), 1);
        assert_eq!(translation.errors.len(), 1);
        assert_eq!(translation.errors[0].flag, "image");
    }

    #[test]
    fn failed_values_do_not_stop_the_pass() {
        let options = RunOptions {
            add_host: vec!["nocolon".into()],
            hostname: Some("web".into()),
            volume: vec!["/a:/b:bogus".into(), "/c:/d".into()],
            ..RunOptions::default()
        };
        let translation = run(&options);
        let service = &translation.project.services[0];
        assert_eq!(translation.errors.len(), 2);
        assert_eq!(translation.errors[0].flag, "add-host");
        assert_eq!(translation.errors[1].flag, "volume");
        assert_eq!(service.hostname.as_deref(), Some("web"));
        assert_eq!(service.volumes.len(), 1);
        assert_eq!(service.volumes[0].target, "/d");
    }

    #[test]
    fn error_messages_name_flag_and_value() {
        let options = RunOptions {
            volume: vec!["/a:/b:bogus".into()],
            ..RunOptions::default()
        };
        let translation = run(&options);
        let message = translation.errors[0].to_string();
        assert!(message.starts_with("unable to parse --volume value \"/a:/b:bogus\""));
        assert!(message.contains("bogus"));
    }
}
