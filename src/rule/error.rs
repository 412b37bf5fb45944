//! Error types for rule parsing, selection and name derivation.

use thiserror::Error;

/// Errors arising while turning rules and candidates into a selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// A rule's pattern or template failed to compile.
    #[error("invalid rule \"{pattern}\" => \"{template}\": {reason}")]
    InvalidRule {
        /// The URL pattern as supplied.
        pattern: String,
        /// The name template as supplied.
        template: String,
        /// Compiler diagnostic for whichever half failed.
        reason: String,
    },

    /// No rule matched any candidate artifact.
    #[error("no rule matched any of {candidates} release asset(s) ({rules} rule(s) tried)")]
    NoMatch {
        /// Number of rules tried.
        rules: usize,
        /// Number of candidate artifacts.
        candidates: usize,
    },

    /// The name template could not be rendered from the match.
    #[error("failed to render binary name from \"{template}\": {reason}")]
    TemplateRender {
        /// The name template.
        template: String,
        /// Why rendering failed.
        reason: String,
    },
}
