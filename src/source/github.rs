//! Asset source backed by the GitHub REST API.

use log::{debug, info};
use serde::Deserialize;
use url::Url;

use super::http::{self, ACCEPT_BINARY, ACCEPT_JSON, RequestHeaders};
use super::{AssetSource, SourceError, SourceOptions};
use crate::artifact::{Artifact, CandidateSet, RawContent};
use crate::release::ReleaseTag;
use crate::repository::Repository;

const PUBLIC_API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct Release {
    id: u64,
    tag_name: String,
}

#[derive(Debug, Deserialize)]
struct ReleaseAsset {
    id: u64,
    name: String,
    browser_download_url: String,
}

/// Lists and downloads release assets through the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubSource {
    repo: Repository,
    api_base: Url,
    token: Option<String>,
    show_progress: bool,
}

impl GitHubSource {
    /// Create a source for `repo`, using the public API for `github.com`
    /// and `https://HOST/api/v3` for Enterprise hosts.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidUrl`] if the host does not form a
    /// valid API URL.
    pub fn new(repo: Repository, options: SourceOptions) -> Result<Self, SourceError> {
        let base = api_base_for(&repo);
        let api_base = Url::parse(&base).map_err(|e| SourceError::InvalidUrl {
            url: base.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            repo,
            api_base,
            token: options.token,
            show_progress: options.show_progress,
        })
    }

    fn headers(&self, accept: &'static str) -> RequestHeaders<'_> {
        RequestHeaders {
            accept,
            token: self.token.as_deref(),
            api_version: Some(API_VERSION),
        }
    }

    /// `{api}/repos/{owner}/{repo}/releases/...` with each segment escaped.
    fn endpoint(&self, tail: &[&str]) -> Result<Url, SourceError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| SourceError::InvalidUrl {
                url: self.api_base.to_string(),
                reason: "API base cannot carry a path".to_owned(),
            })?
            .pop_if_empty()
            .extend(["repos", self.repo.owner(), self.repo.name(), "releases"])
            .extend(tail);
        Ok(url)
    }

    fn release_url(&self, tag: &ReleaseTag) -> Result<Url, SourceError> {
        self.endpoint(&["tags", tag.as_str()])
    }

    fn assets_url(&self, release_id: u64, page: usize) -> Result<Url, SourceError> {
        let id = release_id.to_string();
        let mut url = self.endpoint(&[id.as_str(), "assets"])?;
        url.query_pairs_mut()
            .append_pair("per_page", &PAGE_SIZE.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    fn asset_url(&self, asset_id: u64) -> Result<Url, SourceError> {
        let id = asset_id.to_string();
        self.endpoint(&["assets", id.as_str()])
    }
}

impl AssetSource for GitHubSource {
    fn list(&self, tag: &ReleaseTag) -> Result<CandidateSet, SourceError> {
        let release_url = self.release_url(tag)?;
        let release: Release = http::fetch_json(&release_url, self.headers(ACCEPT_JSON))?;
        info!("found release {} ({})", release.tag_name, release.id);

        let assets = collect_pages(|page| {
            let url = self.assets_url(release.id, page)?;
            http::fetch_json(&url, self.headers(ACCEPT_JSON))
        })?;
        debug!("release {} has {} asset(s)", release.tag_name, assets.len());
        artifacts_from_assets(&release_url, assets)
    }

    fn download(&self, artifact: &Artifact) -> Result<RawContent, SourceError> {
        match artifact.identifier() {
            Some(id) => http::fetch_bytes(
                &self.asset_url(id)?,
                self.headers(ACCEPT_BINARY),
                self.show_progress,
            ),
            None => http::fetch_bytes(artifact.url(), RequestHeaders::plain(), self.show_progress),
        }
    }
}

/// API base URL for a repository host.
#[must_use]
pub fn api_base_for(repo: &Repository) -> String {
    if repo.is_default_host() {
        PUBLIC_API_BASE.to_owned()
    } else {
        format!("https://{}/api/v3", repo.host())
    }
}

/// Fetch pages starting at 1 until one comes back short.
fn collect_pages<F>(mut fetch: F) -> Result<Vec<ReleaseAsset>, SourceError>
where
    F: FnMut(usize) -> Result<Vec<ReleaseAsset>, SourceError>,
{
    let mut assets = Vec::new();
    for page in 1.. {
        let batch = fetch(page)?;
        let last = batch.len() < PAGE_SIZE;
        assets.extend(batch);
        if last {
            break;
        }
    }
    Ok(assets)
}

fn artifacts_from_assets(
    release_url: &Url,
    assets: Vec<ReleaseAsset>,
) -> Result<CandidateSet, SourceError> {
    assets
        .into_iter()
        .map(|asset| {
            Url::parse(&asset.browser_download_url)
                .map(|url| Artifact::new(Some(asset.id), url))
                .map_err(|e| SourceError::InvalidResponse {
                    url: release_url.to_string(),
                    reason: format!("asset {} has an invalid download URL: {e}", asset.name),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn source() -> GitHubSource {
        GitHubSource::new(
            Repository::on_default_host("cli", "cli"),
            SourceOptions::default(),
        )
        .expect("valid source")
    }

    fn asset(id: u64, url: &str) -> ReleaseAsset {
        ReleaseAsset {
            id,
            name: url.rsplit('/').next().unwrap_or(url).to_owned(),
            browser_download_url: url.to_owned(),
        }
    }

    #[rstest]
    #[case::public(Repository::on_default_host("cli", "cli"), "https://api.github.com")]
    #[case::enterprise(Repository::new("ghe.example.com", "team", "tool"), "https://ghe.example.com/api/v3")]
    fn api_base_depends_on_host(#[case] repo: Repository, #[case] expected: &str) {
        assert_eq!(api_base_for(&repo), expected);
    }

    #[rstest]
    fn release_url_escapes_tag(source: GitHubSource) {
        let url = source
            .release_url(&ReleaseTag::new("release/v1 beta"))
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/cli/cli/releases/tags/release%2Fv1%20beta"
        );
    }

    #[rstest]
    fn assets_url_is_paginated(source: GitHubSource) {
        let url = source.assets_url(42, 3).expect("url");
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/cli/cli/releases/42/assets?per_page=100&page=3"
        );
    }

    #[test]
    fn enterprise_endpoints_keep_api_prefix() {
        let source = GitHubSource::new(
            Repository::new("ghe.example.com", "team", "tool"),
            SourceOptions::default(),
        )
        .expect("valid source");
        let url = source.asset_url(7).expect("url");
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/team/tool/releases/assets/7"
        );
    }

    #[test]
    fn pagination_stops_on_short_page() {
        let mut requested = Vec::new();
        let assets = collect_pages(|page| {
            requested.push(page);
            let count: u64 = if page < 3 { 100 } else { 5 };
            Ok((0..count)
                .map(|i| asset(i, "https://example.test/a"))
                .collect())
        })
        .expect("pages");
        assert_eq!(requested, [1, 2, 3]);
        assert_eq!(assets.len(), 2 * PAGE_SIZE + 5);
    }

    #[test]
    fn pagination_propagates_errors() {
        let err = collect_pages(|_| {
            Err(SourceError::NotFound {
                url: "https://example.test".to_owned(),
            })
        })
        .expect_err("should fail");
        assert!(matches!(err, SourceError::NotFound { .. }));
    }

    #[test]
    fn assets_become_identified_artifacts() {
        let release_url = Url::parse("https://api.github.com/repos/cli/cli/releases/tags/v2.52.0")
            .expect("valid URL");
        let set = artifacts_from_assets(
            &release_url,
            vec![
                asset(1, "https://github.com/cli/cli/releases/download/v2.52.0/gh_2.52.0_linux_amd64.tar.gz"),
                asset(2, "https://github.com/cli/cli/releases/download/v2.52.0/gh_2.52.0_macOS_arm64.zip"),
            ],
        )
        .expect("artifacts");
        let ids: Vec<Option<u64>> = set.iter().map(Artifact::identifier).collect();
        assert_eq!(ids, [Some(1), Some(2)]);
    }

    #[test]
    fn invalid_download_url_is_rejected() {
        let release_url = Url::parse("https://api.github.com/x").expect("valid URL");
        let err = artifacts_from_assets(&release_url, vec![asset(1, "not a url")])
            .expect_err("should fail");
        assert!(matches!(err, SourceError::InvalidResponse { .. }));
    }

    #[test]
    fn release_json_is_deserialised() {
        let release: Release =
            serde_json::from_str(r#"{"id": 9, "tag_name": "v1.0.0", "draft": false}"#)
                .expect("json");
        assert_eq!(release.id, 9);
        assert_eq!(release.tag_name, "v1.0.0");
    }
}
