//! Optional TOML configuration.
//!
//! The file lives at `config.toml` in the platform configuration directory
//! (for example `~/.config/release-install/config.toml` on Linux) unless a
//! path is given explicitly. A missing default file is not an error.
//!
//! ```toml
//! dir = "/home/me/.local/bin"
//! max_depth = 8
//! replace_default_rules = false
//!
//! [[rule]]
//! pattern = 'https://example\.com/tool-.+-linux-amd64$'
//! template = "tool"
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use directories_next::ProjectDirs;
use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::rule::default_rules;

const CONFIG_FILE_NAME: &str = "config.toml";
const APPLICATION: &str = "release-install";

/// Errors arising from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path of the file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("invalid config file {path}: {reason}")]
    Parse {
        /// Path of the file.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        reason: String,
    },
}

/// One `[[rule]]` table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    /// Regex over download URLs.
    pub pattern: String,
    /// Template for the binary name.
    pub template: String,
}

/// Settings read from the configuration file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Default install directory.
    pub dir: Option<Utf8PathBuf>,
    /// Cap on unwrap layers.
    pub max_depth: Option<usize>,
    /// Use only the configured rules, dropping the built-in defaults.
    pub replace_default_rules: bool,
    /// Additional rules, in priority-tie order.
    #[serde(rename = "rule")]
    pub rules: Vec<RuleEntry>,
}

impl Config {
    /// Load from `explicit` if given, otherwise from the default location.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if an explicit file is missing or any
    /// file cannot be read, and [`ConfigError::Parse`] for invalid contents.
    pub fn load(explicit: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::read(path);
        }
        match default_path() {
            Some(path) if path.is_file() => Self::read(&path),
            Some(path) => {
                debug!("no config file at {path}");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration text; `path` is only used in diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid contents.
    pub fn from_toml(text: &str, path: &Utf8Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            reason: e.to_string(),
        })
    }

    fn read(path: &Utf8Path) -> Result<Self, ConfigError> {
        debug!("reading config file {path}");
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// The effective rule list.
    ///
    /// Rules given on the command line replace everything. Otherwise the
    /// configured rules come first, followed by the built-in defaults unless
    /// `replace_default_rules` is set.
    #[must_use]
    pub fn effective_rules(&self, cli: Vec<(String, String)>) -> Vec<(String, String)> {
        if !cli.is_empty() {
            return cli;
        }
        let configured = self
            .rules
            .iter()
            .map(|rule| (rule.pattern.clone(), rule.template.clone()));
        if self.replace_default_rules {
            configured.collect()
        } else {
            configured.chain(default_rules()).collect()
        }
    }
}

/// `config.toml` inside the platform configuration directory.
#[must_use]
pub fn default_path() -> Option<Utf8PathBuf> {
    let dirs = ProjectDirs::from("", "", APPLICATION)?;
    let path = dirs.config_dir().join(CONFIG_FILE_NAME);
    match Utf8PathBuf::from_path_buf(path) {
        Ok(path) => Some(path),
        Err(path) => {
            warn!("ignoring non UTF-8 config path {}", path.display());
            None
        }
    }
}
