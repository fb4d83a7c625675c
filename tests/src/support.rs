use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use hostsweep_common::dns::Resolver;

/// In-memory DNS with fixed PTR and A tables. Unknown names fail like NXDOMAIN.
#[derive(Default)]
pub struct StaticResolver {
    ptr: HashMap<IpAddr, Vec<String>>,
    a: HashMap<String, Vec<IpAddr>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ptr(mut self, ip: &str, names: &[&str]) -> Self {
        let ip: IpAddr = ip.parse().unwrap();
        self.ptr
            .insert(ip, names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn a(mut self, name: &str, ips: &[&str]) -> Self {
        self.a.insert(
            name.to_string(),
            ips.iter().map(|ip| ip.parse().unwrap()).collect(),
        );
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Highest number of lookups that were running at the same time.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Resolver for StaticResolver {
    async fn reverse(&self, ip: IpAddr) -> anyhow::Result<Vec<String>> {
        self.enter().await;
        self.ptr
            .get(&ip)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no PTR for {ip}"))
    }

    async fn forward(&self, name: &str) -> anyhow::Result<Vec<IpAddr>> {
        self.enter().await;
        self.a
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("{name} does not exist"))
    }
}
