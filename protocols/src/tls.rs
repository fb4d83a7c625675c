//! Certificate retrieval for the `cert` strategy.
//!
//! Chain and hostname verification are off. Only the names carried by the leaf
//! certificate are read.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpStream;
use x509_parser::prelude::*;

use crate::is_plausible_hostname;

pub const HTTPS_PORT: u16 = 443;

#[derive(Clone)]
pub struct CertFetcher {
    connector: tokio_native_tls::TlsConnector,
    timeout: Duration,
}

impl CertFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let connector = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true)
            .build()
            .context("building tls connector")?;

        Ok(Self {
            connector: tokio_native_tls::TlsConnector::from(connector),
            timeout,
        })
    }

    /// Hostnames found in the leaf certificate served on `ip:port`.
    pub async fn names(&self, ip: IpAddr, port: u16) -> anyhow::Result<Vec<String>> {
        let addr = SocketAddr::new(ip, port);
        let stream = tokio::time::timeout(self.timeout, TcpStream::connect(addr))
            .await
            .with_context(|| format!("connecting to {addr} timed out"))??;

        let tls_stream = tokio::time::timeout(
            self.timeout,
            self.connector.connect(&ip.to_string(), stream),
        )
        .await
        .with_context(|| format!("tls handshake with {addr} timed out"))??;

        let cert = tls_stream
            .get_ref()
            .peer_certificate()?
            .with_context(|| format!("{addr} presented no certificate"))?;

        names_from_der(&cert.to_der()?)
    }
}

/// Subject common names followed by SAN DNS names, deduplicated, wildcards and IP
/// literals removed.
pub fn names_from_der(der: &[u8]) -> anyhow::Result<Vec<String>> {
    let (_, cert) = X509Certificate::from_der(der)
        .map_err(|e| anyhow::anyhow!("failed to parse certificate: {e}"))?;

    let mut candidates: Vec<String> = cert
        .subject()
        .iter_common_name()
        .filter_map(|cn| cn.as_str().ok())
        .map(str::to_string)
        .collect();

    if let Ok(Some(san)) = cert.subject_alternative_name() {
        for name in &san.value.general_names {
            if let GeneralName::DNSName(dns) = name {
                candidates.push(dns.to_string());
            }
        }
    }

    Ok(usable_names(candidates))
}

fn usable_names(candidates: Vec<String>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for candidate in candidates {
        let candidate = candidate.trim().to_ascii_lowercase();
        if is_plausible_hostname(&candidate) && !names.contains(&candidate) {
            names.push(candidate);
        }
    }
    names
}
