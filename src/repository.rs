//! Repository identity parsed from user input.
//!
//! Accepts `OWNER/REPO`, `HOST/OWNER/REPO` and full repository URLs such as
//! `https://github.com/cli/cli.git`.

use std::fmt;
use std::str::FromStr;
use url::Url;

/// Host used when the input names only an owner and repository.
pub const DEFAULT_HOST: &str = "github.com";

/// Errors arising from repository parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// The input does not name a repository in any supported form.
    #[error("invalid repository \"{value}\": {reason}")]
    Invalid {
        /// The rejected input.
        value: String,
        /// Why the input was rejected.
        reason: String,
    },
}

/// A hosted source repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    host: String,
    owner: String,
    name: String,
}

impl Repository {
    /// Create a repository on the given host.
    #[must_use]
    pub fn new(host: impl Into<String>, owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Create a repository on [`DEFAULT_HOST`].
    #[must_use]
    pub fn on_default_host(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(DEFAULT_HOST, owner, name)
    }

    /// Host name, for example `github.com`.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Owning user or organisation.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the repository lives on the public GitHub host.
    #[must_use]
    pub fn is_default_host(&self) -> bool {
        self.host.eq_ignore_ascii_case(DEFAULT_HOST)
    }

    fn from_segments(value: &str, host: &str, segments: &[&str]) -> Result<Self, RepositoryError> {
        let [owner, name] = segments else {
            return Err(invalid(value, "expected OWNER/REPO, HOST/OWNER/REPO or a URL"));
        };
        let name = name.strip_suffix(".git").unwrap_or(name);
        if host.is_empty() || owner.is_empty() || name.is_empty() {
            return Err(invalid(value, "host, owner and name must be non-empty"));
        }
        Ok(Self::new(host, *owner, name))
    }
}

impl FromStr for Repository {
    type Err = RepositoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.contains("://") {
            let url = Url::parse(trimmed).map_err(|e| invalid(value, &e.to_string()))?;
            let host = url
                .host_str()
                .ok_or_else(|| invalid(value, "URL has no host"))?;
            let segments: Vec<&str> = url
                .path()
                .trim_matches('/')
                .split('/')
                .collect();
            return Self::from_segments(value, host, &segments);
        }

        let segments: Vec<&str> = trimmed.split('/').collect();
        match segments.as_slice() {
            [_, _] => Self::from_segments(value, DEFAULT_HOST, &segments),
            [host, rest @ ..] => Self::from_segments(value, host, rest),
            [] => Err(invalid(value, "empty repository")),
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default_host() {
            write!(f, "{}/{}", self.owner, self.name)
        } else {
            write!(f, "{}/{}/{}", self.host, self.owner, self.name)
        }
    }
}

fn invalid(value: &str, reason: &str) -> RepositoryError {
    RepositoryError::Invalid {
        value: value.to_owned(),
        reason: reason.to_owned(),
    }
}
