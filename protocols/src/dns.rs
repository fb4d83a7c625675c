use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use tracing::debug;

use hostsweep_common::dns::Resolver;

/// [`Resolver`] backed by the system's configured name servers.
#[derive(Clone)]
pub struct DnsResolver {
    inner: TokioAsyncResolver,
}

impl DnsResolver {
    /// Uses the system configuration, falling back to the resolver defaults when it
    /// cannot be read. Every query gets a single attempt bounded by `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let (config, mut opts) = hickory_resolver::system_conf::read_system_conf()
            .unwrap_or_else(|e| {
                debug!("Falling back to default resolver configuration: {e}");
                (ResolverConfig::default(), ResolverOpts::default())
            });
        opts.timeout = timeout;
        opts.attempts = 1;

        Self {
            inner: TokioAsyncResolver::tokio(config, opts),
        }
    }
}

#[async_trait]
impl Resolver for DnsResolver {
    async fn reverse(&self, ip: IpAddr) -> anyhow::Result<Vec<String>> {
        let lookup = self.inner.reverse_lookup(ip).await?;
        Ok(lookup
            .iter()
            .map(|name| name.to_string().trim_end_matches('.').to_string())
            .collect())
    }

    async fn forward(&self, name: &str) -> anyhow::Result<Vec<IpAddr>> {
        let lookup = self.inner.lookup_ip(fully_qualified(name)).await?;
        Ok(lookup.iter().collect())
    }
}

/// Appends the root label so search domains are never tried.
fn fully_qualified(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{name}.")
    }
}
