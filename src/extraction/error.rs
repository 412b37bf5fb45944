//! Error types for the unwrap loop.

use thiserror::Error;

use super::ContentType;

/// Errors arising while reducing downloaded content to its payload.
#[derive(Debug, Error)]
pub enum UnwrapError {
    /// The sniffed type is neither a payload nor a format we decode.
    #[error("unsupported content type: {content_type}")]
    UnsupportedContentType {
        /// The sniffed type.
        content_type: ContentType,
    },

    /// No regular file with the target base name exists in the archive.
    #[error("no file named \"{name}\" found in {container} archive")]
    EntryNotFound {
        /// The binary name searched for.
        name: String,
        /// The archive format searched.
        container: ContentType,
    },

    /// The content was still wrapped after the maximum number of layers.
    #[error("content still wrapped after {limit} decode layer(s)")]
    ExtractionTooDeep {
        /// The layer cap that was reached.
        limit: usize,
    },

    /// A compressed stream or tar archive was corrupt.
    #[error("failed to decode {content_type} content: {source}")]
    Decode {
        /// The format being decoded.
        content_type: ContentType,
        /// The underlying decoder error.
        #[source]
        source: std::io::Error,
    },

    /// A zip archive's directory could not be read.
    #[error("invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}
