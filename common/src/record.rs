//! # Discovery Records
//!
//! A [`Record`] ties one candidate hostname to one address and remembers which
//! strategy found it. Records are only ever built through [`Record::new`], which
//! refuses empty names, so a "found nothing" outcome can never leak into the stream
//! as a half-filled record.

use std::fmt;
use std::net::IpAddr;

/// The strategy that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    Reverse,
    Cert,
    Bing,
    Robtex,
    Dictionary,
    Headers,
}

impl Source {
    pub const ALL: [Source; 6] = [
        Source::Reverse,
        Source::Cert,
        Source::Bing,
        Source::Robtex,
        Source::Dictionary,
        Source::Headers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Reverse => "reverse",
            Source::Cert => "cert",
            Source::Bing => "bing",
            Source::Robtex => "robtex",
            Source::Dictionary => "dictionary",
            Source::Headers => "headers",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub name: String,
    pub ip: IpAddr,
    pub source: Source,
}

impl Record {
    /// Builds a record, or `None` when `name` normalizes to nothing.
    pub fn new(name: &str, ip: IpAddr, source: Source) -> Option<Self> {
        let name = normalize_hostname(name)?;
        Some(Self { name, ip, source })
    }
}

/// Lower-cases a hostname and strips surrounding whitespace and the root dot.
pub fn normalize_hostname(name: &str) -> Option<String> {
    let name = name.trim().trim_end_matches('.');
    if name.is_empty() {
        return None;
    }
    Some(name.to_ascii_lowercase())
}
