pub mod app_config;
pub mod config;
pub mod metadata;
pub mod source;

pub use app_config::{AppConfig, DbSettings, MatchStrategy, SslMode};
pub use config::{load_app_config, load_app_config_from_env};
pub use metadata::{NormalizedMetadata, PriceRepresentation, FREE_TOKEN};
pub use source::{IdentifierRecord, IdentifierSource, LineFormat, MalformedLine};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Which of the two passes is running.
///
/// The bulk pass reads the tab-separated game list and leaves `name`
/// untouched; the retry pass reads the failure log and also rewrites `name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Bulk,
    Retry,
}

impl RunMode {
    #[must_use]
    pub fn line_format(self) -> LineFormat {
        match self {
            RunMode::Bulk => LineFormat::Tab,
            RunMode::Retry => LineFormat::Whitespace,
        }
    }

    /// Whether the reconciler overwrites the stored display name.
    #[must_use]
    pub fn overwrites_name(self) -> bool {
        matches!(self, RunMode::Retry)
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::Bulk => write!(f, "bulk"),
            RunMode::Retry => write!(f, "retry"),
        }
    }
}
