//! # Target Set Builder
//!
//! Materializes the addresses a run investigates, either from a CIDR block or from a
//! newline-delimited input file. The resulting [`TargetSet`] keeps the input order
//! (ascending for CIDR blocks, file order otherwise) and is never modified afterwards.

use std::net::IpAddr;
use std::path::Path;

use tracing::warn;

use crate::error::SweepError;
use crate::network::range;
use crate::utils::input;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    addrs: Vec<IpAddr>,
}

impl TargetSet {
    pub fn new(addrs: Vec<IpAddr>) -> Self {
        Self { addrs }
    }

    /// Expands a CIDR block (e.g. `10.0.0.0/24`) into its usable addresses.
    pub fn from_range(cidr: &str) -> Result<Self, SweepError> {
        let ipv4_range = range::parse_cidr(cidr)?;
        Ok(Self::new(ipv4_range.to_iter().collect()))
    }

    /// Loads one address per line from `path`.
    pub fn from_file(path: &Path) -> Result<Self, SweepError> {
        let content = input::read_text(path)?;

        let mut addrs = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let addr = line.parse::<IpAddr>().map_err(|e| SweepError::InvalidInput {
                path: path.to_path_buf(),
                reason: format!("line {}: '{line}' is not an ip address: {e}", idx + 1),
            })?;
            addrs.push(addr);
        }

        Ok(Self::new(addrs))
    }

    /// Picks the active input mode. A range takes precedence over an input file.
    pub fn select(range: Option<&str>, input: Option<&Path>) -> Result<Self, SweepError> {
        match (range, input) {
            (Some(range), Some(_)) => {
                warn!("Both a range and an input file were given, ignoring input file");
                Self::from_range(range)
            }
            (Some(range), None) => Self::from_range(range),
            (None, Some(path)) => Self::from_file(path),
            (None, None) => Ok(Self::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IpAddr> {
        self.addrs.iter()
    }

    pub fn as_slice(&self) -> &[IpAddr] {
        &self.addrs
    }
}

impl FromIterator<IpAddr> for TargetSet {
    fn from_iter<I: IntoIterator<Item = IpAddr>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Reads a dictionary word list, one candidate label per line.
pub fn load_words(path: &Path) -> Result<Vec<String>, SweepError> {
    input::read_lines(path).map(|words| words.into_iter().map(|w| w.trim().to_string()).collect())
}
