//! `--publish` specs: `[ip:][hostPort:]containerPort[/protocol]`.
//!
//! Ports may be ranges (`8000-8010`). An IPv6 host address may be written in
//! brackets (`[::1]:8080:80`). A host range must have the same length as the
//! container range, unless the container side is a single port, in which case
//! the whole host range is published for it.

use std::net::IpAddr;

use crate::model::PortConfig;

use super::{ParseError, Result};

const PROTOCOLS: [&str; 3] = ["tcp", "udp", "sctp"];
const PUBLISH_MODE: &str = "ingress";

fn invalid(reason: impl Into<String>) -> ParseError {
    ParseError::InvalidPort {
        reason: reason.into(),
    }
}

/// Splits into host ip, host port and container port.
fn split_spec(spec: &str) -> (String, &str, &str) {
    let parts: Vec<&str> = spec.split(':').collect();
    match parts.as_slice() {
        &[container] => (String::new(), "", container),
        &[host, container] => (String::new(), host, container),
        // unbracketed IPv6 addresses contain colons of their own
        &[ref ip @ .., host, container] => (ip.join(":"), host, container),
        &[] => (String::new(), "", ""),
    }
}

fn port_range(value: &str) -> Result<(u16, u16)> {
    let parse = |port: &str| {
        port.parse::<u16>()
            .map_err(|_| invalid(format!("invalid port {port:?}")))
    };
    match value.split_once('-') {
        None => {
            let port = parse(value)?;
            Ok((port, port))
        }
        Some((start, end)) => {
            let (start, end) = (parse(start)?, parse(end)?);
            if end < start {
                return Err(invalid(format!("invalid port range {value:?}")));
            }
            Ok((start, end))
        }
    }
}

fn host_ip(raw: &str) -> Result<Option<String>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let trimmed = raw.trim_start_matches('[').trim_end_matches(']');
    trimmed
        .parse::<IpAddr>()
        .map_err(|_| invalid(format!("invalid host ip {raw:?}")))?;
    Ok(Some(trimmed.to_owned()))
}

/// Parses a `--publish` spec into one port entry per container port.
///
/// # Errors
///
/// Returns [`ParseError::InvalidPort`] for an unknown protocol, a bad host
/// address, a missing or malformed port, or mismatched range lengths.
pub fn parse_port(value: &str) -> Result<Vec<PortConfig>> {
    let (spec, protocol) = value.rsplit_once('/').unwrap_or((value, "tcp"));
    let protocol = protocol.to_ascii_lowercase();
    if !PROTOCOLS.contains(&protocol.as_str()) {
        return Err(invalid(format!("unknown protocol {protocol:?}")));
    }

    let (ip, host, container) = split_spec(spec);
    if container.is_empty() {
        return Err(invalid("no container port specified"));
    }
    let host_ip = host_ip(&ip)?;
    let (start, end) = port_range(container)?;
    let host_range = if host.is_empty() {
        None
    } else {
        Some(port_range(host)?)
    };

    if let Some((host_start, host_end)) = host_range {
        if host_end - host_start != end - start && start != end {
            return Err(invalid(
                "host and container port ranges differ in length",
            ));
        }
    }

    let ports = (start..=end)
        .enumerate()
        .map(|(offset, target)| {
            let published = host_range.map(|(host_start, host_end)| {
                if start == end && host_start != host_end {
                    format!("{host_start}-{host_end}")
                } else {
                    // offset is bounded by the equal-length check above
                    #[allow(clippy::cast_possible_truncation)]
                    let port = host_start + offset as u16;
                    port.to_string()
                }
            });
            PortConfig {
                mode: PUBLISH_MODE.to_owned(),
                host_ip: host_ip.clone(),
                target,
                published,
                protocol: protocol.clone(),
            }
        })
        .collect();
    Ok(ports)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(host_ip: Option<&str>, target: u16, published: Option<&str>, protocol: &str) -> PortConfig {
        PortConfig {
            mode: "ingress".into(),
            host_ip: host_ip.map(Into::into),
            target,
            published: published.map(Into::into),
            protocol: protocol.into(),
        }
    }

    #[test]
    fn container_port_only() {
        assert_eq!(parse_port("80"), Ok(vec![port(None, 80, None, "tcp")]));
    }

    #[test]
    fn host_and_container() {
        assert_eq!(
            parse_port("8080:80"),
            Ok(vec![port(None, 80, Some("8080"), "tcp")])
        );
    }

    #[test]
    fn ip_host_container_protocol() {
        assert_eq!(
            parse_port("127.0.0.1:53:53/udp"),
            Ok(vec![port(Some("127.0.0.1"), 53, Some("53"), "udp")])
        );
    }

    #[test]
    fn protocol_is_case_insensitive() {
        assert_eq!(
            parse_port("80/TCP"),
            Ok(vec![port(None, 80, None, "tcp")])
        );
        assert_eq!(
            parse_port("5353:53/Udp"),
            Ok(vec![port(None, 53, Some("5353"), "udp")])
        );
    }

    #[test]
    fn ip_with_ephemeral_host_port() {
        assert_eq!(
            parse_port("127.0.0.1::80"),
            Ok(vec![port(Some("127.0.0.1"), 80, None, "tcp")])
        );
    }

    #[test]
    fn bracketed_ipv6() {
        assert_eq!(
            parse_port("[::1]:8080:80"),
            Ok(vec![port(Some("::1"), 80, Some("8080"), "tcp")])
        );
    }

    #[test]
    fn matching_ranges_expand() {
        assert_eq!(
            parse_port("8000-8001:80-81"),
            Ok(vec![
                port(None, 80, Some("8000"), "tcp"),
                port(None, 81, Some("8001"), "tcp"),
            ])
        );
    }

    #[test]
    fn host_range_for_single_container_port() {
        assert_eq!(
            parse_port("8000-8010:80"),
            Ok(vec![port(None, 80, Some("8000-8010"), "tcp")])
        );
    }

    #[test]
    fn rejects_malformed_specs() {
        for spec in [
            "",
            "8080:",
            "http",
            "80/icmp",
            "70000",
            "90-80",
            "8000-8002:80-81",
            "not-an-ip:80:80",
        ] {
            assert!(
                matches!(parse_port(spec), Err(ParseError::InvalidPort { .. })),
                "spec {spec:?} should be rejected"
            );
        }
    }
}
