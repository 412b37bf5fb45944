//! Asset source backed by download URL templates.
//!
//! Some projects publish binaries on their own servers rather than as
//! release assets. For those, candidates are produced by rendering a fixed
//! list of URL templates with the release tag.

use std::collections::BTreeMap;

use log::debug;
use url::Url;

use super::http::{self, RequestHeaders};
use super::{AssetSource, SourceError};
use crate::artifact::{Artifact, CandidateSet, RawContent};
use crate::release::ReleaseTag;
use crate::template::Template;

/// A download URL template rendered with the keys `Tag` and `SemVer`.
///
/// # Examples
///
/// ```
/// use release_install::release::ReleaseTag;
/// use release_install::source::UrlTemplate;
///
/// let template = UrlTemplate::parse("https://get.example.test/tool-{{.SemVer}}.tar.gz").unwrap();
/// let url = template.render(&ReleaseTag::new("v1.2.3")).unwrap();
/// assert_eq!(url.as_str(), "https://get.example.test/tool-1.2.3.tar.gz");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate(Template);

impl UrlTemplate {
    /// Parse a URL template.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Template`] if the template text is malformed.
    pub fn parse(source: &str) -> Result<Self, SourceError> {
        Ok(Self(Template::parse(source)?))
    }

    /// The template text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Render the download URL for `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Template`] if the template references a key
    /// other than `Tag` or `SemVer`, or [`SourceError::InvalidUrl`] if the
    /// rendered text is not an absolute URL.
    pub fn render(&self, tag: &ReleaseTag) -> Result<Url, SourceError> {
        let data = BTreeMap::from([
            ("Tag".to_owned(), tag.as_str().to_owned()),
            ("SemVer".to_owned(), tag.semver()),
        ]);
        let rendered = self.0.render(&data)?;
        Url::parse(&rendered).map_err(|e| SourceError::InvalidUrl {
            url: rendered.clone(),
            reason: e.to_string(),
        })
    }
}

/// Produces candidates by rendering URL templates; downloads with plain GETs.
#[derive(Debug, Clone)]
pub struct TemplateSource {
    templates: Vec<UrlTemplate>,
    show_progress: bool,
}

impl TemplateSource {
    /// Create a source over an ordered list of URL templates.
    #[must_use]
    pub const fn new(templates: Vec<UrlTemplate>, show_progress: bool) -> Self {
        Self {
            templates,
            show_progress,
        }
    }
}

impl AssetSource for TemplateSource {
    fn list(&self, tag: &ReleaseTag) -> Result<CandidateSet, SourceError> {
        let candidates = self
            .templates
            .iter()
            .map(|template| template.render(tag).map(|url| Artifact::new(None, url)))
            .collect::<Result<CandidateSet, _>>()?;
        debug!("rendered {} candidate URL(s) for {tag}", candidates.len());
        Ok(candidates)
    }

    fn download(&self, artifact: &Artifact) -> Result<RawContent, SourceError> {
        http::fetch_bytes(artifact.url(), RequestHeaders::plain(), self.show_progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn source(templates: &[&str]) -> TemplateSource {
        let templates = templates
            .iter()
            .map(|t| UrlTemplate::parse(t).expect("valid template"))
            .collect();
        TemplateSource::new(templates, false)
    }

    #[rstest]
    #[case::semver(
        "https://releases.hashicorp.com/terraform/{{.SemVer}}/terraform_{{.SemVer}}_linux_amd64.zip",
        "v1.9.2",
        "https://releases.hashicorp.com/terraform/1.9.2/terraform_1.9.2_linux_amd64.zip"
    )]
    #[case::tag(
        "https://get.helm.sh/helm-{{.Tag}}-linux-amd64.tar.gz",
        "v3.15.3",
        "https://get.helm.sh/helm-v3.15.3-linux-amd64.tar.gz"
    )]
    fn renders_tag_and_semver(#[case] template: &str, #[case] tag: &str, #[case] expected: &str) {
        let url = UrlTemplate::parse(template)
            .expect("valid template")
            .render(&ReleaseTag::new(tag))
            .expect("render");
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn list_preserves_template_order_without_identifiers() {
        let set = source(&[
            "https://dl.example.test/{{.Tag}}/darwin/tool",
            "https://dl.example.test/{{.Tag}}/linux/tool",
        ])
        .list(&ReleaseTag::new("v1.0.0"))
        .expect("list");
        let urls: Vec<&str> = set.iter().map(|a| a.url().as_str()).collect();
        assert_eq!(
            urls,
            [
                "https://dl.example.test/v1.0.0/darwin/tool",
                "https://dl.example.test/v1.0.0/linux/tool",
            ]
        );
        assert!(set.iter().all(|a| a.identifier().is_none()));
    }

    #[test]
    fn unknown_key_fails_render() {
        let err = source(&["https://dl.example.test/{{.Os}}/tool"])
            .list(&ReleaseTag::new("v1.0.0"))
            .expect_err("should fail");
        assert!(matches!(err, SourceError::Template(_)));
    }

    #[test]
    fn relative_render_is_invalid_url() {
        let err = source(&["tool-{{.Tag}}"])
            .list(&ReleaseTag::new("v1.0.0"))
            .expect_err("should fail");
        assert!(matches!(err, SourceError::InvalidUrl { .. }));
    }
}
