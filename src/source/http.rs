//! Blocking HTTP helpers shared by the asset sources.

use std::io::Read;
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use serde::de::DeserializeOwned;
use ureq::Body;
use ureq::http::Response;
use ureq::http::header::CONTENT_LENGTH;
use url::Url;

use super::SourceError;
use crate::artifact::RawContent;

/// Connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
/// Overall timeout for a single request, including the body.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

const USER_AGENT: &str = concat!("release-install/", env!("CARGO_PKG_VERSION"));

const PROGRESS_TEMPLATE: &str =
    "{spinner} [{elapsed_precise}] {wide_bar} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

/// Media type for JSON API responses.
pub(crate) const ACCEPT_JSON: &str = "application/vnd.github+json";
/// Media type for raw asset bytes.
pub(crate) const ACCEPT_BINARY: &str = "application/octet-stream";

/// Per-request headers beyond the shared defaults.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestHeaders<'a> {
    pub(crate) accept: &'a str,
    pub(crate) token: Option<&'a str>,
    pub(crate) api_version: Option<&'a str>,
}

impl RequestHeaders<'_> {
    /// Headers for an anonymous plain download.
    pub(crate) const fn plain() -> Self {
        Self {
            accept: ACCEPT_BINARY,
            token: None,
            api_version: None,
        }
    }
}

/// GET `url` and deserialise the JSON body.
pub(crate) fn fetch_json<T: DeserializeOwned>(
    url: &Url,
    headers: RequestHeaders<'_>,
) -> Result<T, SourceError> {
    let response = get(url, headers)?;
    serde_json::from_reader(response.into_body().into_reader()).map_err(|e| {
        SourceError::InvalidResponse {
            url: url.to_string(),
            reason: e.to_string(),
        }
    })
}

/// GET `url` and collect the body, drawing a progress bar when requested.
pub(crate) fn fetch_bytes(
    url: &Url,
    headers: RequestHeaders<'_>,
    show_progress: bool,
) -> Result<RawContent, SourceError> {
    let response = get(url, headers)?;
    let length = content_length(&response);
    let progress = progress_bar(length, show_progress);

    let mut body = Vec::new();
    let read = progress
        .wrap_read(response.into_body().into_reader())
        .read_to_end(&mut body);
    progress.finish_and_clear();
    read.map_err(|e| SourceError::HttpError {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    debug!("downloaded {} bytes from {url}", body.len());
    Ok(RawContent::from(body))
}

fn get(url: &Url, headers: RequestHeaders<'_>) -> Result<Response<Body>, SourceError> {
    debug!("GET {url}");
    let mut request = http_agent()
        .get(url.as_str())
        .header("Accept", headers.accept)
        .header("User-Agent", USER_AGENT);
    if let Some(token) = headers.token {
        request = request.header("Authorization", format!("Bearer {token}"));
    }
    if let Some(version) = headers.api_version {
        request = request.header("X-GitHub-Api-Version", version);
    }
    request.call().map_err(|e| map_ureq_error(url.as_str(), &e))
}

fn content_length(response: &Response<Body>) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
}

fn progress_bar(length: Option<u64>, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let bar = length.map_or_else(ProgressBar::no_length, ProgressBar::new);
    if let Ok(style) = ProgressStyle::with_template(PROGRESS_TEMPLATE) {
        bar.set_style(style);
    }
    bar
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_connect(Some(CONNECT_TIMEOUT))
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`SourceError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> SourceError {
    match err {
        ureq::Error::StatusCode(404) => SourceError::NotFound {
            url: url.to_owned(),
        },
        other => SourceError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_ureq_error_maps_404_to_not_found() {
        let err = ureq::Error::StatusCode(404);
        let mapped = map_ureq_error("https://example.test/asset", &err);
        assert!(matches!(mapped, SourceError::NotFound { ref url } if url == "https://example.test/asset"));
    }

    #[test]
    fn map_ureq_error_maps_other_status_to_http_error() {
        let err = ureq::Error::StatusCode(500);
        let mapped = map_ureq_error("https://example.test/asset", &err);
        assert!(matches!(mapped, SourceError::HttpError { .. }));
    }

    #[test]
    fn hidden_progress_bar_when_quiet() {
        assert!(progress_bar(Some(10), false).is_hidden());
    }

    #[test]
    fn user_agent_names_the_crate() {
        assert!(USER_AGENT.starts_with("release-install/"));
    }
}
