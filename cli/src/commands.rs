pub mod discover;

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use tracing::warn;

use hostsweep_common::SweepError;
use hostsweep_common::config::{
    BingMode, Config, DEFAULT_CONCURRENCY, DictionaryConfig, OutputMode, StrategySelection,
};
use hostsweep_common::network::target::load_words;

#[derive(Parser, Debug)]
#[command(name = "hostsweep", version)]
#[command(about = "Collect hostnames for an IP range from DNS, certificates, search engines and web servers.")]
pub struct CommandLine {
    /// IP range in CIDR notation, e.g. 192.168.0.0/24
    pub range: Option<String>,

    /// Limit the number of network requests in flight
    #[arg(short, long, value_name = "INT", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Guess hostnames from a one word per line dictionary
    #[arg(short, long, value_name = "FILE")]
    pub dictionary: Option<PathBuf>,

    /// Domain to use for dictionary guessing
    #[arg(short, long, value_name = "DOMAIN")]
    pub target: Option<String>,

    /// Reverse name lookup
    #[arg(short, long)]
    pub reverse: bool,

    /// Grab names from TLS certificates
    #[arg(short, long)]
    pub ssl: bool,

    /// Search Bing for virtual hosts
    #[arg(short, long)]
    pub bing: bool,

    /// Account key for the Bing search API
    #[arg(short = 'k', long, value_name = "APIKEY")]
    pub bingkey: Option<String>,

    /// Grab names from DNS aggregation websites (robtex.com)
    #[arg(short, long)]
    pub web: bool,

    /// Keep only names that resolve back to their address
    #[arg(short, long)]
    pub fcrdns: bool,

    /// Parse HTTP and HTTPS response headers for hostnames
    #[arg(long)]
    pub headers: bool,

    /// File containing one IP address per line
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output as CSV
    #[arg(long, group = "format")]
    pub csv: bool,

    /// Output grouped by address
    #[arg(long, group = "format")]
    pub clean: bool,

    /// Output as a JSON array
    #[arg(long, group = "format")]
    pub json: bool,

    /// Timeout for each DNS query, handshake or HTTP request
    #[arg(long, value_name = "MS", default_value_t = 5000)]
    pub timeout: u64,

    /// Abort the whole run after this many seconds
    #[arg(long, value_name = "SECS")]
    pub deadline: Option<u64>,

    /// Only print warnings, errors and results
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Checks flag combinations and turns them into a run configuration.
    /// The dictionary file is read here so that a bad path fails before any network activity.
    pub fn to_config(&self) -> Result<Config, SweepError> {
        if self.target.is_some() && self.dictionary.is_none() {
            return Err(SweepError::configuration("--target is used for --dictionary attacks"));
        }
        if self.range.is_none() && self.input.is_none() && self.dictionary.is_none() {
            return Err(SweepError::configuration("no ip range or dictionary provided"));
        }

        let dictionary = match &self.dictionary {
            Some(path) => {
                let domain = self.target.clone().ok_or_else(|| {
                    SweepError::configuration("dictionary attack requires target domain")
                })?;
                Some(DictionaryConfig {
                    domain,
                    words: load_words(path)?,
                })
            }
            None => None,
        };

        let bing = match (self.bing, &self.bingkey) {
            (true, Some(key)) => Some(BingMode::Api { key: key.clone() }),
            (true, None) => Some(BingMode::Scrape),
            (false, Some(_)) => {
                warn!("--bingkey given without --bing, ignoring key");
                None
            }
            (false, None) => None,
        };

        let config = Config {
            concurrency: self.concurrency,
            selection: StrategySelection {
                reverse: self.reverse,
                cert: self.ssl,
                headers: self.headers,
                robtex: self.web,
                bing,
                dictionary,
            },
            fcrdns: self.fcrdns,
            output: self.output_mode(),
            request_timeout: Duration::from_millis(self.timeout),
            deadline: self.deadline.map(Duration::from_secs),
            quiet: self.quiet,
        };

        config.validate()?;
        Ok(config)
    }

    fn output_mode(&self) -> OutputMode {
        if self.csv {
            OutputMode::Csv
        } else if self.clean {
            OutputMode::Clean
        } else if self.json {
            OutputMode::Json
        } else {
            OutputMode::Plain
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> CommandLine {
        let argv = std::iter::once("hostsweep").chain(args.iter().copied());
        CommandLine::try_parse_from(argv).unwrap()
    }

    #[test]
    fn range_with_reverse() {
        let cfg = parse(&["10.0.0.0/30", "-r"]).to_config().unwrap();

        assert!(cfg.selection.reverse);
        assert_eq!(cfg.concurrency, 1000);
        assert_eq!(cfg.output, OutputMode::Plain);
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn output_flags_are_exclusive() {
        let argv = ["hostsweep", "10.0.0.0/30", "-r", "--csv", "--json"];
        assert!(CommandLine::try_parse_from(argv).is_err());

        let cfg = parse(&["10.0.0.0/30", "-r", "--clean"]).to_config().unwrap();
        assert_eq!(cfg.output, OutputMode::Clean);
    }

    #[test]
    fn target_requires_dictionary() {
        let err = parse(&["10.0.0.0/30", "-r", "-t", "example.com"])
            .to_config()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn dictionary_requires_target() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "www").unwrap();
        let path = file.path().to_str().unwrap();

        let err = parse(&["-d", path]).to_config().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn dictionary_alone_is_enough() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "www\nmail\n").unwrap();
        let path = file.path().to_str().unwrap();

        let cfg = parse(&["-d", path, "-t", "target.example"]).to_config().unwrap();
        let dictionary = cfg.selection.dictionary.unwrap();

        assert_eq!(dictionary.domain, "target.example");
        assert_eq!(dictionary.words, vec!["www", "mail"]);
    }

    #[test]
    fn nothing_to_do() {
        assert!(parse(&["-r"]).to_config().unwrap_err().is_configuration());
        assert!(parse(&["10.0.0.0/30"]).to_config().unwrap_err().is_configuration());
        assert!(parse(&["10.0.0.0/30", "-r", "-c", "0"]).to_config().unwrap_err().is_configuration());
    }

    #[test]
    fn bing_mode_follows_key() {
        let cfg = parse(&["10.0.0.0/30", "-b", "-k", "secret"]).to_config().unwrap();
        assert_eq!(cfg.selection.bing, Some(BingMode::Api { key: "secret".into() }));

        let cfg = parse(&["10.0.0.0/30", "-b"]).to_config().unwrap();
        assert_eq!(cfg.selection.bing, Some(BingMode::Scrape));

        let cfg = parse(&["10.0.0.0/30", "-r", "-k", "secret"]).to_config().unwrap();
        assert!(cfg.selection.bing.is_none());
    }

    #[test]
    fn timeouts() {
        let cfg = parse(&["10.0.0.0/30", "-r", "--timeout", "250", "--deadline", "30"])
            .to_config()
            .unwrap();
        assert_eq!(cfg.request_timeout, Duration::from_millis(250));
        assert_eq!(cfg.deadline, Some(Duration::from_secs(30)));
    }
}
