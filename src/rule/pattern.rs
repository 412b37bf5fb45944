//! A single URL-matching rule and its name template.

use std::collections::BTreeMap;

use regex::Regex;
use regex_syntax::hir::literal::{ExtractKind, Extractor};

use super::RuleError;
use crate::artifact::{Artifact, ResolvedBinary};
use crate::template::Template;

/// Upper bound on the length of any single extracted prefix literal.
const PREFIX_LITERAL_LIMIT: usize = 4096;

/// A compiled (URL pattern, name template) pair.
///
/// # Examples
///
/// ```
/// use release_install::rule::Rule;
///
/// let rule = Rule::parse(r"^https://dl\.example\.test/(?P<name>\w+)$", "{{.name}}").unwrap();
/// assert_eq!(rule.priority(), "https://dl.example.test/".len());
/// ```
#[derive(Debug, Clone)]
pub struct Rule {
    regex: Regex,
    template: Template,
    priority: usize,
}

impl Rule {
    /// Compile a rule from its pattern and template text.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidRule`] naming both halves when either the
    /// regex or the template fails to compile.
    pub fn parse(pattern: &str, template: &str) -> Result<Self, RuleError> {
        let invalid = |reason: String| RuleError::InvalidRule {
            pattern: pattern.to_owned(),
            template: template.to_owned(),
            reason,
        };
        let regex = Regex::new(pattern).map_err(|e| invalid(e.to_string()))?;
        let template = Template::parse(template).map_err(|e| invalid(e.to_string()))?;
        Ok(Self {
            priority: literal_prefix_len(pattern),
            regex,
            template,
        })
    }

    /// The URL pattern source.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// The name template source.
    #[must_use]
    pub fn template(&self) -> &str {
        self.template.as_str()
    }

    /// Specificity score: byte length of the pattern's literal prefix.
    #[must_use]
    pub const fn priority(&self) -> usize {
        self.priority
    }

    /// Whether the pattern matches anywhere in the artifact's URL.
    #[must_use]
    pub fn matches(&self, artifact: &Artifact) -> bool {
        self.regex.is_match(artifact.url().as_str())
    }

    /// Derive the binary name for an artifact this rule matches.
    ///
    /// Every capture group is available to the template under its 0-based
    /// index (`"0"` is the whole match) and, for named groups, under its
    /// name. Groups that did not participate in the match are empty.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::TemplateRender`] when the pattern does not match
    /// the URL or the template references an undefined key.
    pub fn execute(&self, artifact: &Artifact) -> Result<ResolvedBinary, RuleError> {
        let url = artifact.url().as_str();
        let captures = self
            .regex
            .captures(url)
            .ok_or_else(|| RuleError::TemplateRender {
                template: self.template.as_str().to_owned(),
                reason: format!("pattern \"{}\" does not match {url}", self.pattern()),
            })?;

        let mut data = BTreeMap::new();
        for (index, name) in self.regex.capture_names().enumerate() {
            let value = captures.get(index).map_or("", |m| m.as_str()).to_owned();
            if let Some(name) = name {
                data.insert(name.to_owned(), value.clone());
            }
            data.insert(index.to_string(), value);
        }

        let name = self
            .template
            .render(&data)
            .map_err(|e| RuleError::TemplateRender {
                template: self.template.as_str().to_owned(),
                reason: e.to_string(),
            })?;
        Ok(ResolvedBinary::new(name))
    }
}

/// Length of the literal text every match of `pattern` must start with.
///
/// Anchors contribute nothing; escaped metacharacters count as the literal
/// they denote. A pattern that starts with a wildcard, a case-insensitive
/// section or an unbounded class scores 0.
#[must_use]
pub fn literal_prefix_len(pattern: &str) -> usize {
    let Ok(hir) = regex_syntax::Parser::new().parse(pattern) else {
        return 0;
    };
    let prefixes = Extractor::new()
        .kind(ExtractKind::Prefix)
        .limit_literal_len(PREFIX_LITERAL_LIMIT)
        .extract(&hir);
    prefixes.longest_common_prefix().map_or(0, <[u8]>::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use url::Url;

    fn artifact(url: &str) -> Artifact {
        Artifact::new(None, Url::parse(url).expect("valid URL"))
    }

    #[rstest]
    #[case::wildcard_start("(?i)^.+/(?P<name>[^.]+)$", 0)]
    #[case::dot_plus(".+", 0)]
    #[case::trailing_anchor("linux-amd64$", 11)]
    #[case::anchored_literal("^https://host/a/linux-amd64$", 26)]
    #[case::escaped_dots(r"https://dl\.k8s\.io/release/.+/bin/linux/amd64/kubectl", 26)]
    #[case::stops_at_group(r"https://example\.test/(?P<name>\w+)", 21)]
    #[case::case_insensitive("(?i)abc", 0)]
    fn priority_is_literal_prefix_length(#[case] pattern: &str, #[case] expected: usize) {
        let rule = Rule::parse(pattern, "x").expect("valid rule");
        assert_eq!(rule.priority(), expected);
    }

    #[rstest]
    #[case::bad_regex("(unclosed", "x")]
    #[case::bad_template("^x$", "{{.name")]
    fn parse_reports_both_halves(#[case] pattern: &str, #[case] template: &str) {
        let err = Rule::parse(pattern, template).expect_err("should fail");
        let RuleError::InvalidRule {
            pattern: p,
            template: t,
            ..
        } = err
        else {
            panic!("expected InvalidRule, got {err:?}");
        };
        assert_eq!(p, pattern);
        assert_eq!(t, template);
    }

    #[test]
    fn execute_renders_named_group() {
        let rule = Rule::parse(
            r"^https://github\.com/cli/cli/releases/download/.+/(?P<name>\w+)_[\d.]+_linux_amd64\.tar\.gz$",
            "{{.name}}",
        )
        .expect("valid rule");
        let gh = artifact(
            "https://github.com/cli/cli/releases/download/v2.52.0/gh_2.52.0_linux_amd64.tar.gz",
        );
        assert!(rule.matches(&gh));
        assert_eq!(rule.execute(&gh).expect("render").name(), "gh");
    }

    #[test]
    fn execute_exposes_positional_and_whole_match() {
        let rule = Rule::parse(r"/(\w+)-(\w+)$", "{{index . \"2\"}}-{{index . \"1\"}}|{{.}}")
            .expect("valid rule");
        let binary = rule
            .execute(&artifact("https://example.test/tool-linux"))
            .expect("render");
        assert_eq!(binary.name(), "linux-tool|/tool-linux");
    }

    #[test]
    fn execute_renders_unmatched_group_as_empty() {
        let rule = Rule::parse(r"/(?P<name>\w+)(?P<suffix>\.exe)?$", "{{.name}}{{.suffix}}")
            .expect("valid rule");
        let binary = rule
            .execute(&artifact("https://example.test/tool"))
            .expect("render");
        assert_eq!(binary.name(), "tool");
    }

    #[test]
    fn execute_fails_on_undefined_key() {
        let rule = Rule::parse(r"/(?P<name>\w+)$", "{{.os}}").expect("valid rule");
        let err = rule
            .execute(&artifact("https://example.test/tool"))
            .expect_err("should fail");
        assert!(matches!(err, RuleError::TemplateRender { .. }));
    }

    #[test]
    fn execute_fails_when_pattern_does_not_match() {
        let rule = Rule::parse("^never$", "x").expect("valid rule");
        let err = rule
            .execute(&artifact("https://example.test/tool"))
            .expect_err("should fail");
        assert!(matches!(err, RuleError::TemplateRender { .. }));
    }
}
