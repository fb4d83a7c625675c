use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::record::Source;

/// Every way a run can fail as a whole.
///
/// Per-item network failures never show up here; strategies and the confirmation
/// pass turn them into "no result" for the affected item.
#[derive(Debug, Error)]
pub enum SweepError {
    /// The CIDR range supplied on the command line could not be parsed.
    #[error("invalid ip range '{range}': {reason}")]
    InvalidRange { range: String, reason: String },

    /// An input file (addresses or dictionary) is missing, unreadable or malformed.
    #[error("invalid input file '{}': {reason}", path.display())]
    InvalidInput { path: PathBuf, reason: String },

    /// None of the candidate API endpoints accepted the supplied key.
    #[error("invalid {service} api key")]
    InvalidCredential { service: &'static str },

    /// Flags that cannot be combined, or required flags that are missing.
    #[error("{0}")]
    Configuration(String),

    /// Discovery and confirmation did not finish within the configured deadline.
    #[error("run did not complete within {0:?}")]
    DeadlineExceeded(Duration),

    /// A strategy could not be set up at all.
    #[error("{strategy} strategy failed: {reason}")]
    Strategy { strategy: Source, reason: String },
}

impl SweepError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Errors that are detected before any network activity starts.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidRange { .. } | Self::InvalidInput { .. } | Self::Configuration(_)
        )
    }
}
