//! Network primitives behind the discovery strategies.
//!
//! * [`dns`]: the hickory-backed [`hostsweep_common::dns::Resolver`].
//! * [`tls`]: certificate retrieval and X.509 name extraction.
//! * [`http`]: the shared HTTP client and hostname extraction from URLs, links and headers.

pub mod dns;
pub mod http;
pub mod tls;

use std::net::IpAddr;

/// True when `host` is an IPv4/IPv6 literal, with or without brackets.
pub fn is_ip_literal(host: &str) -> bool {
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .is_ok()
}

/// Whether `name` looks like something a resolver could answer for.
pub fn is_plausible_hostname(name: &str) -> bool {
    let name = name.trim_end_matches('.');
    !name.is_empty()
        && name.len() <= 253
        && name.contains('.')
        && !is_ip_literal(name)
        && name.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
}
