use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::header::{self, HeaderMap};
use reqwest::{Client, Url};

use crate::{is_ip_literal, is_plausible_hostname};

const USER_AGENT: &str = concat!("hostsweep/", env!("CARGO_PKG_VERSION"));

static HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)href\s*=\s*["'](https?://[^"'\s>]+)"#).unwrap());

static COOKIE_DOMAIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|;)\s*domain\s*=\s*\.?([a-z0-9._-]+)").unwrap());

/// Header fields whose values are URLs worth mining for hostnames.
static URL_HEADERS: [header::HeaderName; 3] = [
    header::LOCATION,
    header::CONTENT_LOCATION,
    header::ACCESS_CONTROL_ALLOW_ORIGIN,
];

/// The two HTTP clients of a run.
#[derive(Debug, Clone)]
pub struct HttpClients {
    /// Third-party services (search engine, passive DNS). Certificates are verified.
    pub api: Client,
    /// The targets themselves. See [`build_target_client`].
    pub target: Client,
}

impl HttpClients {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            api: build_api_client(timeout)?,
            target: build_target_client(timeout)?,
        })
    }
}

/// Client for third-party APIs. Default redirect policy, full certificate checks.
pub fn build_api_client(timeout: Duration) -> anyhow::Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Client for talking to targets directly.
///
/// Redirects are not followed so `Location` headers stay visible, and certificate
/// errors are ignored because targets are addressed by IP. Never hand it credentials.
pub fn build_target_client(timeout: Duration) -> anyhow::Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(true)
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Host part of an absolute URL, unless it is an IP literal.
pub fn host_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?;
    if is_ip_literal(host) || !is_plausible_hostname(host) {
        return None;
    }
    Some(host.to_ascii_lowercase())
}

/// Hostnames from absolute links in an HTML page, skipping any host under one of the
/// `excluded` domains.
pub fn hostnames_from_links(html: &str, excluded: &[&str]) -> Vec<String> {
    let hosts = HREF
        .captures_iter(html)
        .filter_map(|caps| host_from_url(&caps[1]))
        .filter(|host| !excluded.iter().any(|domain| is_within(host, domain)));
    dedup(hosts)
}

/// Hostnames advertised by a response's redirect, origin and cookie headers.
pub fn hostnames_from_headers(headers: &HeaderMap) -> Vec<String> {
    let from_urls = URL_HEADERS
        .iter()
        .flat_map(|name| headers.get_all(name))
        .filter_map(|value| value.to_str().ok())
        .filter_map(host_from_url);

    let from_cookies = headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|cookie| COOKIE_DOMAIN.captures(cookie))
        .map(|caps| caps[1].trim_end_matches('.').to_ascii_lowercase())
        .filter(|host| is_plausible_hostname(host));

    dedup(from_urls.chain(from_cookies))
}

fn is_within(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

fn dedup(hosts: impl Iterator<Item = String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for host in hosts {
        if !unique.contains(&host) {
            unique.push(host);
        }
    }
    unique
}
