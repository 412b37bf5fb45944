//! Finding and installing a release binary.
//!
//! [`Installer`] ties the collaborators together: the asset source lists
//! and downloads, the rule set picks, the unwrapper peels archive layers and
//! the sink writes the result. Nothing is shared between [`Installer::find`]
//! and [`Installer::install`] beyond the returned [`Selection`].

use camino::Utf8PathBuf;
use log::info;

use crate::artifact::{Artifact, ResolvedBinary};
use crate::error::Result;
use crate::extraction::ContentUnwrapper;
use crate::release::ReleaseTag;
use crate::rule::RuleSet;
use crate::sink::BinarySink;
use crate::source::AssetSource;

/// The artifact chosen for a release and the name to install it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// The artifact to download.
    pub artifact: Artifact,
    /// The binary name derived from its URL.
    pub binary: ResolvedBinary,
}

/// Runs the find and install steps against borrowed collaborators.
pub struct Installer<'a> {
    source: &'a dyn AssetSource,
    sink: &'a dyn BinarySink,
    unwrapper: ContentUnwrapper,
}

impl<'a> Installer<'a> {
    /// Create an installer with the default unwrap layer cap.
    #[must_use]
    pub fn new(source: &'a dyn AssetSource, sink: &'a dyn BinarySink) -> Self {
        Self {
            source,
            sink,
            unwrapper: ContentUnwrapper::default(),
        }
    }

    /// Replace the content unwrapper.
    #[must_use]
    pub const fn with_unwrapper(mut self, unwrapper: ContentUnwrapper) -> Self {
        self.unwrapper = unwrapper;
        self
    }

    /// Choose the artifact and binary name for `tag`.
    ///
    /// Rules are compiled before the source is consulted, so a malformed
    /// rule fails without any network access.
    ///
    /// # Errors
    ///
    /// Returns the rule error for an invalid rule, no matching candidate or
    /// an unrenderable name, and passes listing failures through unchanged.
    pub fn find(&self, tag: &ReleaseTag, rules: &[(String, String)]) -> Result<Selection> {
        let rules = RuleSet::parse(rules.iter().map(|(p, t)| (p.as_str(), t.as_str())))?;
        let candidates = self.source.list(tag)?;
        info!("{} candidate(s) for {tag}", candidates.len());
        let (artifact, rule) = rules.select(&candidates)?;
        let binary = rule.execute(artifact)?;
        Ok(Selection {
            artifact: artifact.clone(),
            binary,
        })
    }

    /// Download, unwrap and write the selected binary, returning its path.
    ///
    /// # Errors
    ///
    /// Passes download, unwrap and write failures through unchanged.
    pub fn install(&self, selection: &Selection) -> Result<Utf8PathBuf> {
        let raw = self.source.download(&selection.artifact)?;
        let content = self.unwrapper.unwrap_content(raw, &selection.binary)?;
        info!(
            "unwrapped {} ({} bytes)",
            selection.binary,
            content.len()
        );
        Ok(self.sink.write(&selection.binary, &content)?)
    }
}

#[cfg(test)]
#[path = "install_flow_tests.rs"]
mod tests;
