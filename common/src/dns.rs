//! The DNS seam shared by the reverse, dictionary and confirmation stages.
//!
//! Production code plugs in the hickory-backed resolver from `hostsweep-protocols`;
//! tests plug in canned answers.

use std::net::IpAddr;

use async_trait::async_trait;

#[async_trait]
pub trait Resolver: Send + Sync {
    /// PTR names for `ip`. An error or an empty list both mean "no result".
    async fn reverse(&self, ip: IpAddr) -> anyhow::Result<Vec<String>>;

    /// Addresses `name` resolves to. An error or an empty list both mean "no result".
    async fn forward(&self, name: &str) -> anyhow::Result<Vec<IpAddr>>;
}
