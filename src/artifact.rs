//! Release artifact data model.
//!
//! These are the values that flow between the components: the candidate
//! artifacts offered by a release, the binary name resolved for the chosen
//! one, and the byte buffers before and after unwrapping.

use std::fmt;
use url::Url;

/// One downloadable file offered as part of a release.
///
/// Identity is the URL. The identifier is only meaningful to the asset
/// source that produced the artifact; sources without native identifiers
/// leave it empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Artifact {
    identifier: Option<u64>,
    url: Url,
}

impl Artifact {
    /// Create an artifact from an optional source identifier and its URL.
    #[must_use]
    pub const fn new(identifier: Option<u64>, url: Url) -> Self {
        Self { identifier, url }
    }

    /// Source-specific identifier, if the source assigns one.
    #[must_use]
    pub const fn identifier(&self) -> Option<u64> {
        self.identifier
    }

    /// Absolute download URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// The ordered artifacts of one release.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet(Vec<Artifact>);

impl CandidateSet {
    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the release offered no artifacts at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over candidates in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Artifact> {
        self.0.iter()
    }
}

impl From<Vec<Artifact>> for CandidateSet {
    fn from(artifacts: Vec<Artifact>) -> Self {
        Self(artifacts)
    }
}

impl FromIterator<Artifact> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = Artifact>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Artifact;
    type IntoIter = std::slice::Iter<'a, Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The file name under which the extracted binary is installed.
///
/// Also used to locate the binary inside archive layers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedBinary {
    name: String,
}

impl ResolvedBinary {
    /// Create a resolved binary name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The binary's file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ResolvedBinary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Downloaded artifact bytes whose format has not been inspected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawContent(Vec<u8>);

impl RawContent {
    /// Borrow the bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the wrapper and return the bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for RawContent {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Bytes verified by content sniffing to be an unwrapped executable payload.
///
/// Only [`crate::extraction::ContentUnwrapper`] produces this type outside
/// of tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryContent(Vec<u8>);

impl BinaryContent {
    pub(crate) const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrow the bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Payload size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl BinaryContent {
    /// Wrap arbitrary bytes without sniffing them (test support only).
    #[must_use]
    pub const fn unchecked(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(url: &str) -> Artifact {
        Artifact::new(None, Url::parse(url).expect("valid URL"))
    }

    #[test]
    fn artifact_displays_as_its_url() {
        let a = artifact("https://example.test/tool-linux-amd64");
        assert_eq!(a.to_string(), "https://example.test/tool-linux-amd64");
        assert_eq!(a.identifier(), None);
    }

    #[test]
    fn candidate_set_preserves_order() {
        let set: CandidateSet = vec![
            artifact("https://example.test/b"),
            artifact("https://example.test/a"),
        ]
        .into();
        let urls: Vec<&str> = set.iter().map(|a| a.url().as_str()).collect();
        assert_eq!(urls, ["https://example.test/b", "https://example.test/a"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn raw_content_round_trips_bytes() {
        let raw = RawContent::from(b"abc".to_vec());
        assert_eq!(raw.as_bytes(), b"abc");
        assert_eq!(raw.into_bytes(), b"abc".to_vec());
    }
}
