//! Release tag wrapper with semantic-version normalisation.

use std::fmt;

/// A release identified by its exact tag.
///
/// # Examples
///
/// ```
/// use release_install::release::ReleaseTag;
///
/// assert_eq!(ReleaseTag::new("v1.2.3").semver(), "1.2.3");
/// assert_eq!(ReleaseTag::new("nightly").semver(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseTag(String);

impl ReleaseTag {
    /// Wrap a tag string.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// The tag exactly as published.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The tag as a semantic version string.
    ///
    /// A single leading `v` is stripped and the remainder must parse as
    /// `MAJOR.MINOR.PATCH` with optional pre-release and build metadata.
    /// Returns an empty string when the tag is not a semantic version.
    #[must_use]
    pub fn semver(&self) -> String {
        let candidate = self.0.strip_prefix('v').unwrap_or(&self.0);
        match semver::Version::parse(candidate) {
            Ok(_) => candidate.to_owned(),
            Err(_) => String::new(),
        }
    }
}

impl From<&str> for ReleaseTag {
    fn from(tag: &str) -> Self {
        Self(tag.to_owned())
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::prefixed("v1.2.3", "1.2.3")]
    #[case::bare("0.8.0", "0.8.0")]
    #[case::prerelease("v2.0.0-rc.1", "2.0.0-rc.1")]
    #[case::build_metadata("v1.0.0+build.5", "1.0.0+build.5")]
    #[case::missing_patch("v1.2", "")]
    #[case::not_a_version("nightly", "")]
    #[case::double_prefix("vv1.2.3", "")]
    #[case::empty("", "")]
    fn semver_normalisation(#[case] tag: &str, #[case] expected: &str) {
        assert_eq!(ReleaseTag::new(tag).semver(), expected);
    }

    #[test]
    fn display_keeps_original_tag() {
        assert_eq!(ReleaseTag::from("v0.53.0").to_string(), "v0.53.0");
    }
}
