use std::time::Duration;

use crate::error::SweepError;
use crate::record::Source;

pub const DEFAULT_CONCURRENCY: usize = 1000;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Immutable settings for one run, built once before discovery starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Upper bound on network operations in flight at the same time.
    pub concurrency: usize,
    pub selection: StrategySelection,
    /// Drop every record whose name does not resolve back to its address.
    pub fcrdns: bool,
    pub output: OutputMode,
    /// Timeout applied to each individual DNS query, TLS handshake or HTTP request.
    pub request_timeout: Duration,
    /// Bound on discovery plus confirmation as a whole.
    pub deadline: Option<Duration>,
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            selection: StrategySelection::default(),
            fcrdns: false,
            output: OutputMode::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            deadline: None,
            quiet: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.concurrency == 0 {
            return Err(SweepError::configuration("--concurrency must be at least 1"));
        }
        if self.selection.is_empty() {
            return Err(SweepError::configuration("no discovery method selected"));
        }
        if let Some(dictionary) = &self.selection.dictionary {
            if dictionary.domain.trim().trim_matches('.').is_empty() {
                return Err(SweepError::configuration(
                    "dictionary attack requires target domain",
                ));
            }
        }
        Ok(())
    }
}

/// Which strategies run, with their parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategySelection {
    pub reverse: bool,
    pub cert: bool,
    pub headers: bool,
    pub robtex: bool,
    pub bing: Option<BingMode>,
    pub dictionary: Option<DictionaryConfig>,
}

impl StrategySelection {
    pub fn is_empty(&self) -> bool {
        self.enabled().is_empty()
    }

    pub fn enabled(&self) -> Vec<Source> {
        Source::ALL
            .into_iter()
            .filter(|source| match source {
                Source::Reverse => self.reverse,
                Source::Cert => self.cert,
                Source::Bing => self.bing.is_some(),
                Source::Robtex => self.robtex,
                Source::Dictionary => self.dictionary.is_some(),
                Source::Headers => self.headers,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BingMode {
    /// Search API, authenticated with the given account key.
    Api { key: String },
    /// Unauthenticated scraping of the public search page.
    Scrape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryConfig {
    pub domain: String,
    pub words: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// `name: <name> ip: <ip> method: <source>` per record.
    #[default]
    Plain,
    /// `name,ip,source` per record.
    Csv,
    /// Grouped by address, one indented hostname per line.
    Clean,
    /// Grouped by address as a JSON array.
    Json,
}
