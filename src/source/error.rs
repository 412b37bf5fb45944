//! Error types for release listing and artifact download.

use thiserror::Error;

use crate::template::TemplateError;

/// Errors arising from asset sources.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("request failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The release or asset was not found (HTTP 404).
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The server answered with a body we could not interpret.
    #[error("unexpected response from {url}: {reason}")]
    InvalidResponse {
        /// The URL that was requested.
        url: String,
        /// Why the body was rejected.
        reason: String,
    },

    /// A request or download URL could not be built.
    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A download URL template failed to render.
    #[error(transparent)]
    Template(#[from] TemplateError),
}
