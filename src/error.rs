//! Top-level error type for the installer binary.
//!
//! Module errors pass through unchanged; their messages already name the
//! pattern, URL or path involved.

use thiserror::Error;

use crate::config::ConfigError;
use crate::extraction::UnwrapError;
use crate::repository::RepositoryError;
use crate::rule::RuleError;
use crate::sink::SinkError;
use crate::source::SourceError;

/// Errors that can occur while finding or installing a binary.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// Rule parsing, selection or name derivation failed.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// The downloaded content could not be unwrapped.
    #[error(transparent)]
    Unwrap(#[from] UnwrapError),

    /// Listing or downloading release assets failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Writing the binary failed.
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The repository argument is malformed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// A command-line `--pattern` value lacks the `=` separator.
    #[error("invalid --pattern \"{value}\": expected REGEX=TEMPLATE")]
    InvalidPatternArgument {
        /// The rejected argument.
        value: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for installer operations.
pub type Result<T> = std::result::Result<T, InstallerError>;
