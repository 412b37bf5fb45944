//! URL rules: parsing, ranking and selection.
//!
//! A rule pairs a regex over download URLs with a template for the binary
//! name. [`RuleSet::select`] picks exactly one (artifact, rule) pair from a
//! release's candidates, preferring the most specific rule.

pub mod defaults;
mod error;
mod pattern;
mod selection;

pub use defaults::default_rules;
pub use error::RuleError;
pub use pattern::{Rule, literal_prefix_len};
pub use selection::RuleSet;
