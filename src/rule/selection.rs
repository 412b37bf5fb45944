//! Ranking rules and choosing the (artifact, rule) pair.

use log::{debug, trace};

use super::{Rule, RuleError};
use crate::artifact::{Artifact, CandidateSet};

/// An ordered, fully compiled set of rules.
///
/// Rules are held in descending priority order. Rules of equal priority
/// keep the order in which they were supplied.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compile `(pattern, template)` pairs into a ranked set.
    ///
    /// Compilation is all-or-nothing: the first invalid rule fails the
    /// whole set.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidRule`] for the first pair that does not
    /// compile.
    pub fn parse<I, P, T>(pairs: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = (P, T)>,
        P: AsRef<str>,
        T: AsRef<str>,
    {
        let mut rules = pairs
            .into_iter()
            .map(|(pattern, template)| Rule::parse(pattern.as_ref(), template.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        rules.sort_by_key(|rule| std::cmp::Reverse(rule.priority()));
        for rule in &rules {
            trace!(
                "rule priority {}: {} => {}",
                rule.priority(),
                rule.pattern(),
                rule.template()
            );
        }
        Ok(Self { rules })
    }

    /// Number of rules in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in ranked order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Pick the artifact to install and the rule that names it.
    ///
    /// Rules are tried from highest to lowest priority; for each rule the
    /// candidates are tried in their given order. The first match wins, so
    /// a more specific rule always beats a less specific one regardless of
    /// where its artifact sits in the list.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::NoMatch`] when no rule matches any candidate.
    pub fn select<'c>(
        &self,
        candidates: &'c CandidateSet,
    ) -> Result<(&'c Artifact, &Rule), RuleError> {
        let chosen = self.iter().find_map(|rule| {
            candidates
                .iter()
                .find(|artifact| rule.matches(artifact))
                .map(|artifact| (artifact, rule))
        });
        match chosen {
            Some((artifact, rule)) => {
                debug!(
                    "selected {artifact} with rule {} (priority {})",
                    rule.pattern(),
                    rule.priority()
                );
                Ok((artifact, rule))
            }
            None => Err(RuleError::NoMatch {
                rules: self.len(),
                candidates: candidates.len(),
            }),
        }
    }
}
