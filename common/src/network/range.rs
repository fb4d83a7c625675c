use std::net::{IpAddr, Ipv4Addr};

use crate::error::SweepError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    pub fn to_iter(&self) -> impl Iterator<Item = IpAddr> {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        (start..=end).map(|ip| IpAddr::V4(Ipv4Addr::from(ip)))
    }

    pub fn len(&self) -> usize {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        end.saturating_sub(start) as usize + 1
    }
}

/// Usable address range of `ip/prefix`.
///
/// Network and broadcast addresses are dropped for prefixes up to /30; a /31 keeps
/// both of its addresses and a /32 is the single host.
pub fn cidr_range(ip: Ipv4Addr, prefix: u8) -> anyhow::Result<Ipv4Range> {
    let network = pnet::ipnetwork::Ipv4Network::new(ip, prefix)?;
    let start: u32 = network.network().into();
    let end: u32 = network.broadcast().into();

    if prefix <= 30 {
        return Ok(Ipv4Range::new(
            Ipv4Addr::from(start + 1),
            Ipv4Addr::from(end - 1),
        ));
    }

    Ok(Ipv4Range::new(Ipv4Addr::from(start), Ipv4Addr::from(end)))
}

/// Parses CIDR notation like "192.168.1.0/24". A bare address is treated as a /32.
pub fn parse_cidr(s: &str) -> Result<Ipv4Range, SweepError> {
    let invalid = |reason: String| SweepError::InvalidRange {
        range: s.to_string(),
        reason,
    };

    let s = s.trim();
    let (ip_str, prefix_str) = s.split_once('/').unwrap_or((s, "32"));

    let ipv4_addr = ip_str
        .parse::<Ipv4Addr>()
        .map_err(|e| invalid(format!("invalid address '{ip_str}': {e}")))?;

    let prefix = prefix_str
        .parse::<u8>()
        .map_err(|e| invalid(format!("invalid prefix '{prefix_str}': {e}")))?;

    cidr_range(ipv4_addr, prefix).map_err(|e| invalid(e.to_string()))
}
