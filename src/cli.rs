//! Command-line interface definitions.

use camino::Utf8PathBuf;
use clap::Parser;

use crate::error::{InstallerError, Result};

/// Install a binary from a release's assets.
#[derive(Parser, Debug, Clone)]
#[command(name = "release-install")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install a binary from a release's assets.\n\n",
    "The release's download URLs are matched against rules, each a regular ",
    "expression paired with a template for the binary name. The most specific ",
    "matching rule wins. The chosen asset is downloaded, unwrapped from any ",
    "compression and archive layers, and written as an executable.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install the GitHub CLI into ~/.local/bin:\n",
    "    $ release-install -R cli/cli --tag v2.52.0 -D ~/.local/bin\n\n",
    "  Use a custom rule:\n",
    "    $ release-install -R owner/tool --tag v1.0.0 \\\n",
    "        -p 'https://.+/tool-linux-x64\\.tgz$=tool'\n\n",
    "  Show what would be installed:\n",
    "    $ release-install -R helm/helm --tag v3.15.3 --dry-run",
))]
pub struct Cli {
    /// Repository as OWNER/REPO, HOST/OWNER/REPO or a URL.
    #[arg(short = 'R', long, value_name = "REPO")]
    pub repo: String,

    /// Release tag to install from.
    #[arg(long, value_name = "TAG")]
    pub tag: String,

    /// Rule as REGEX=TEMPLATE (repeatable); replaces configured and default rules.
    #[arg(short, long = "pattern", value_name = "REGEX=TEMPLATE")]
    pub patterns: Vec<String>,

    /// Install directory [default: config `dir`, else the current directory].
    #[arg(short = 'D', long, value_name = "DIR")]
    pub dir: Option<Utf8PathBuf>,

    /// API token [default: from GH_TOKEN / GITHUB_TOKEN or the enterprise variants].
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Configuration file [default: platform config directory].
    #[arg(long, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Maximum number of archive layers to unwrap [default: 16].
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Install without asking for confirmation.
    #[arg(short, long)]
    pub yes: bool,

    /// Show the selected asset and exit without downloading.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// The `--pattern` values as `(regex, template)` pairs, in flag order.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::InvalidPatternArgument`] for a value with
    /// no `=`.
    pub fn rules(&self) -> Result<Vec<(String, String)>> {
        self.patterns.iter().map(|value| split_rule(value)).collect()
    }
}

/// Split `REGEX=TEMPLATE` at the first `=`.
///
/// # Example
///
/// ```
/// use release_install::cli::split_rule;
///
/// let (pattern, template) = split_rule("linux-amd64$=tool").unwrap();
/// assert_eq!(pattern, "linux-amd64$");
/// assert_eq!(template, "tool");
/// ```
///
/// # Errors
///
/// Returns [`InstallerError::InvalidPatternArgument`] when there is no `=`.
pub fn split_rule(value: &str) -> Result<(String, String)> {
    value
        .split_once('=')
        .map(|(pattern, template)| (pattern.to_owned(), template.to_owned()))
        .ok_or_else(|| InstallerError::InvalidPatternArgument {
            value: value.to_owned(),
        })
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
