//! Reducing downloaded content to the executable it wraps.
//!
//! Release assets arrive as bare binaries or wrapped in any nesting of
//! compression and archive layers (`.tar.gz`, `.zip`, `.gz` of a `.xz`, and
//! so on). [`ContentUnwrapper`] sniffs the buffer, peels one layer, and
//! repeats until the sniffed type is an executable payload.

mod decode;
mod error;
mod sniff;

pub use error::UnwrapError;
pub use sniff::{ContentType, sniff};

use log::debug;

use crate::artifact::{BinaryContent, RawContent, ResolvedBinary};

/// Default cap on the number of layers peeled before giving up.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Repeatedly decodes content until a raw executable payload remains.
///
/// # Examples
///
/// ```
/// use release_install::artifact::{RawContent, ResolvedBinary};
/// use release_install::extraction::ContentUnwrapper;
///
/// let payload = vec![0x00, 0xFF, 0x10];
/// let out = ContentUnwrapper::default()
///     .unwrap_content(RawContent::from(payload.clone()), &ResolvedBinary::new("tool"))
///     .unwrap();
/// assert_eq!(out.as_bytes(), payload.as_slice());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentUnwrapper {
    max_depth: usize,
}

impl Default for ContentUnwrapper {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl ContentUnwrapper {
    /// Create an unwrapper that peels at most `max_depth` layers.
    #[must_use]
    pub const fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// The layer cap.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Unwrap `content` until the buffer sniffs as an executable payload.
    ///
    /// Archive layers are searched for a regular file whose base name
    /// equals the binary's name; directory components are ignored.
    ///
    /// # Errors
    ///
    /// - [`UnwrapError::UnsupportedContentType`] when a layer is neither a
    ///   payload nor a decodable format.
    /// - [`UnwrapError::EntryNotFound`] when an archive layer holds no
    ///   matching regular file.
    /// - [`UnwrapError::ExtractionTooDeep`] when the content is still
    ///   wrapped after `max_depth` layers.
    /// - [`UnwrapError::Decode`] or [`UnwrapError::Zip`] on corrupt input.
    pub fn unwrap_content(
        &self,
        content: RawContent,
        binary: &ResolvedBinary,
    ) -> Result<BinaryContent, UnwrapError> {
        let mut buffer = content.into_bytes();
        let mut layers = 0;
        loop {
            let content_type = sniff(&buffer);
            debug!(
                "layer {layers}: sniffed {content_type} ({} bytes)",
                buffer.len()
            );
            if content_type.is_payload() {
                return Ok(BinaryContent::new(buffer));
            }
            if !decode::is_decodable(content_type) {
                return Err(UnwrapError::UnsupportedContentType { content_type });
            }
            if layers == self.max_depth {
                return Err(UnwrapError::ExtractionTooDeep {
                    limit: self.max_depth,
                });
            }
            buffer = decode::decode_layer(content_type, &buffer, binary.name())?;
            layers += 1;
        }
    }
}

#[cfg(test)]
#[path = "unwrap_tests.rs"]
mod tests;
