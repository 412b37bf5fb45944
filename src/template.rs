//! Minimal text templates for binary names and download URLs.
//!
//! A template is literal text interleaved with `{{ … }}` actions. Three
//! action forms are understood:
//!
//! - `{{.key}}` looks up `key` (letters, digits and `_`).
//! - `{{index . "key"}}` looks up any key, including positional ones such
//!   as `"1"`.
//! - `{{.}}` stands for key `"0"`, the entire regex match.
//!
//! Whitespace inside the braces is ignored.

use std::collections::BTreeMap;
use std::fmt;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Errors arising from template parsing and rendering.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// The template text is malformed.
    #[error("invalid template \"{template}\": {reason}")]
    Parse {
        /// The template source.
        template: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The template references a key that has no value.
    #[error("template \"{template}\" references undefined key \"{key}\"")]
    MissingKey {
        /// The template source.
        template: String,
        /// The missing key.
        key: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Key(String),
}

/// A parsed template.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use release_install::template::Template;
///
/// let template = Template::parse("{{.name}}-{{index . \"1\"}}").unwrap();
/// let data = BTreeMap::from([
///     ("name".to_owned(), "gh".to_owned()),
///     ("1".to_owned(), "linux".to_owned()),
/// ]);
/// assert_eq!(template.render(&data).unwrap(), "gh-linux");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template text.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Parse`] for an unterminated, empty or
    /// unsupported action.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;

        while let Some(start) = rest.find(OPEN) {
            let (text, after_open) = rest.split_at(start);
            if !text.is_empty() {
                segments.push(Segment::Text(text.to_owned()));
            }
            let body_and_tail = after_open.get(OPEN.len()..).unwrap_or_default();
            let Some(end) = body_and_tail.find(CLOSE) else {
                return Err(parse_error(source, "unterminated action"));
            };
            let (body, tail) = body_and_tail.split_at(end);
            segments.push(Segment::Key(parse_action(source, body.trim())?));
            rest = tail.get(CLOSE.len()..).unwrap_or_default();
        }

        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_owned()));
        }

        Ok(Self {
            source: source.to_owned(),
            segments,
        })
    }

    /// The text the template was parsed from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render the template against a key/value lookup.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingKey`] when an action references a key
    /// absent from `data`.
    pub fn render(&self, data: &BTreeMap<String, String>) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Key(key) => {
                    let value = data.get(key).ok_or_else(|| TemplateError::MissingKey {
                        template: self.source.clone(),
                        key: key.clone(),
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_action(source: &str, action: &str) -> Result<String, TemplateError> {
    if action.is_empty() {
        return Err(parse_error(source, "empty action"));
    }
    if action == "." {
        return Ok("0".to_owned());
    }
    if let Some(field) = action.strip_prefix('.') {
        if is_identifier(field) {
            return Ok(field.to_owned());
        }
        return Err(parse_error(source, &format!("invalid field name \"{field}\"")));
    }
    if let Some(args) = action.strip_prefix("index") {
        return parse_index(source, args.trim());
    }
    Err(parse_error(source, &format!("unsupported action \"{action}\"")))
}

fn parse_index(source: &str, args: &str) -> Result<String, TemplateError> {
    let Some(quoted) = args.strip_prefix('.').map(str::trim_start) else {
        return Err(parse_error(source, "index expects \".\" as its first argument"));
    };
    quoted
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .filter(|key| !key.contains('"'))
        .map(str::to_owned)
        .ok_or_else(|| parse_error(source, "index expects a quoted key"))
}

fn is_identifier(field: &str) -> bool {
    !field.is_empty() && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_error(source: &str, reason: &str) -> TemplateError {
    TemplateError::Parse {
        template: source.to_owned(),
        reason: reason.to_owned(),
    }
}
