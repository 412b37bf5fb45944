//! Where release candidates and artifact bytes come from.
//!
//! [`AssetSource`] is the list/download contract the installer depends on.
//! Two implementations exist: [`GitHubSource`] talks to the REST API and
//! [`TemplateSource`] renders fixed download URLs. [`SourceCatalog`] picks
//! one per repository from a static table.

mod error;
mod github;
mod http;
mod template;

use std::collections::BTreeMap;

use log::debug;

pub use error::SourceError;
pub use github::{GitHubSource, api_base_for};
pub use template::{TemplateSource, UrlTemplate};

use crate::artifact::{Artifact, CandidateSet, RawContent};
use crate::release::ReleaseTag;
use crate::repository::Repository;

/// Lists a release's artifacts and downloads their bytes.
///
/// # Examples
///
/// ```
/// use release_install::source::{AssetSource, SourceCatalog, SourceOptions};
///
/// let repo = "helm/helm".parse().unwrap();
/// let source = SourceCatalog::builtin().source_for(&repo, SourceOptions::default()).unwrap();
/// // source.list(&tag) renders the helm download URLs without any network access.
/// # let _ = source;
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait AssetSource {
    /// Return the release's candidate artifacts in source order.
    ///
    /// # Errors
    ///
    /// Returns an error if the release cannot be found or listed.
    fn list(&self, tag: &ReleaseTag) -> Result<CandidateSet, SourceError>;

    /// Download one artifact's bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer fails.
    fn download(&self, artifact: &Artifact) -> Result<RawContent, SourceError>;
}

/// Settings shared by all source kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceOptions {
    /// API token sent as a bearer credential.
    pub token: Option<String>,
    /// Draw a progress bar on stderr while downloading.
    pub show_progress: bool,
}

/// The source chosen for a repository.
#[derive(Debug, Clone)]
pub enum ReleaseSource {
    /// Release assets listed through the hosting API.
    GitHub(GitHubSource),
    /// Candidates rendered from download URL templates.
    Template(TemplateSource),
}

impl AssetSource for ReleaseSource {
    fn list(&self, tag: &ReleaseTag) -> Result<CandidateSet, SourceError> {
        match self {
            Self::GitHub(source) => source.list(tag),
            Self::Template(source) => source.list(tag),
        }
    }

    fn download(&self, artifact: &Artifact) -> Result<RawContent, SourceError> {
        match self {
            Self::GitHub(source) => source.download(artifact),
            Self::Template(source) => source.download(artifact),
        }
    }
}

/// Static table of repositories whose binaries are hosted off-platform.
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
    templates: BTreeMap<(String, String), Vec<UrlTemplate>>,
}

impl SourceCatalog {
    /// The built-in table.
    ///
    /// Templates that fail to parse are skipped.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        for (owner, name, urls) in BUILTIN_TEMPLATES {
            let templates = urls
                .iter()
                .filter_map(|url| UrlTemplate::parse(url).ok())
                .collect();
            catalog.insert(owner, name, templates);
        }
        catalog
    }

    /// Register templates for `owner/name` on the default host.
    pub fn insert(&mut self, owner: &str, name: &str, templates: Vec<UrlTemplate>) {
        self.templates
            .insert((owner.to_owned(), name.to_owned()), templates);
    }

    /// Templates registered for `repo`, if any.
    #[must_use]
    pub fn templates_for(&self, repo: &Repository) -> Option<&[UrlTemplate]> {
        if !repo.is_default_host() {
            return None;
        }
        self.templates
            .get(&(repo.owner().to_owned(), repo.name().to_owned()))
            .map(Vec::as_slice)
    }

    /// Choose the source for `repo`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidUrl`] if the repository host cannot
    /// form an API URL.
    pub fn source_for(
        &self,
        repo: &Repository,
        options: SourceOptions,
    ) -> Result<ReleaseSource, SourceError> {
        if let Some(templates) = self.templates_for(repo) {
            debug!("using download URL templates for {repo}");
            return Ok(ReleaseSource::Template(TemplateSource::new(
                templates.to_vec(),
                options.show_progress,
            )));
        }
        debug!("using the release API for {repo}");
        GitHubSource::new(repo.clone(), options).map(ReleaseSource::GitHub)
    }
}

type TemplateRow = (&'static str, &'static str, &'static [&'static str]);

const BUILTIN_TEMPLATES: [TemplateRow; 4] = [
    (
        "gravitational",
        "teleport",
        &["https://cdn.teleport.dev/teleport-v{{.SemVer}}-linux-amd64-bin.tar.gz"],
    ),
    (
        "hashicorp",
        "terraform",
        &[
            "https://releases.hashicorp.com/terraform/{{.SemVer}}/terraform_{{.SemVer}}_darwin_amd64.zip",
            "https://releases.hashicorp.com/terraform/{{.SemVer}}/terraform_{{.SemVer}}_darwin_arm64.zip",
            "https://releases.hashicorp.com/terraform/{{.SemVer}}/terraform_{{.SemVer}}_freebsd_amd64.zip",
            "https://releases.hashicorp.com/terraform/{{.SemVer}}/terraform_{{.SemVer}}_linux_386.zip",
            "https://releases.hashicorp.com/terraform/{{.SemVer}}/terraform_{{.SemVer}}_linux_amd64.zip",
            "https://releases.hashicorp.com/terraform/{{.SemVer}}/terraform_{{.SemVer}}_linux_arm.zip",
            "https://releases.hashicorp.com/terraform/{{.SemVer}}/terraform_{{.SemVer}}_linux_arm64.zip",
            "https://releases.hashicorp.com/terraform/{{.SemVer}}/terraform_{{.SemVer}}_windows_amd64.zip",
        ],
    ),
    (
        "helm",
        "helm",
        &[
            "https://get.helm.sh/helm-{{.Tag}}-darwin-amd64.tar.gz",
            "https://get.helm.sh/helm-{{.Tag}}-darwin-arm64.tar.gz",
            "https://get.helm.sh/helm-{{.Tag}}-linux-386.tar.gz",
            "https://get.helm.sh/helm-{{.Tag}}-linux-amd64.tar.gz",
            "https://get.helm.sh/helm-{{.Tag}}-linux-arm.tar.gz",
            "https://get.helm.sh/helm-{{.Tag}}-linux-arm64.tar.gz",
            "https://get.helm.sh/helm-{{.Tag}}-windows-amd64.zip",
        ],
    ),
    (
        "kubernetes",
        "kubernetes",
        &[
            "https://dl.k8s.io/release/{{.Tag}}/bin/darwin/amd64/kubectl",
            "https://dl.k8s.io/release/{{.Tag}}/bin/darwin/arm64/kubectl",
            "https://dl.k8s.io/release/{{.Tag}}/bin/linux/amd64/kubectl",
            "https://dl.k8s.io/release/{{.Tag}}/bin/linux/arm64/kubectl",
            "https://dl.k8s.io/release/{{.Tag}}/bin/windows/amd64/kubectl.exe",
        ],
    ),
];

/// Resolve the API token for `host`.
///
/// An explicit token wins. Otherwise `GH_TOKEN` then `GITHUB_TOKEN` apply
/// to `github.com`, and `GH_ENTERPRISE_TOKEN` then
/// `GITHUB_ENTERPRISE_TOKEN` to any other host.
pub fn token_for_host<F>(host: &str, explicit: Option<&str>, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = explicit.filter(|t| !t.is_empty()) {
        return Some(token.to_owned());
    }
    let names: [&str; 2] = if host.eq_ignore_ascii_case(crate::repository::DEFAULT_HOST) {
        ["GH_TOKEN", "GITHUB_TOKEN"]
    } else {
        ["GH_ENTERPRISE_TOKEN", "GITHUB_ENTERPRISE_TOKEN"]
    };
    names
        .into_iter()
        .filter_map(lookup)
        .find(|value| !value.is_empty())
}
