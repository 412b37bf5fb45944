//! User-facing messages on stderr.
//!
//! Progress lines and the confirmation prompt bypass the logger so they
//! stay visible at the default log level.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use camino::Utf8Path;

use crate::artifact::{Artifact, ResolvedBinary};

/// Write `message` and a newline, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Describe the selected artifact.
///
/// # Example
///
/// ```
/// use release_install::artifact::{Artifact, ResolvedBinary};
/// use release_install::output::selection_summary;
/// use url::Url;
///
/// let url = Url::parse("https://example.test/tool-linux-amd64").unwrap();
/// let summary = selection_summary(&ResolvedBinary::new("tool"), &Artifact::new(None, url));
/// assert_eq!(summary, "Found tool at https://example.test/tool-linux-amd64");
/// ```
#[must_use]
pub fn selection_summary(binary: &ResolvedBinary, artifact: &Artifact) -> String {
    format!("Found {binary} at {artifact}")
}

/// The confirmation question asked before installing.
#[must_use]
pub fn confirm_prompt(binary: &ResolvedBinary, artifact: &Artifact) -> String {
    format!("Install {binary} from {artifact}? [Y/n] ")
}

/// Ask `prompt` on `stderr` and read one answer line from `input`.
///
/// An empty answer, `y` or `yes` (any case) accepts; anything else,
/// including end of input, declines.
///
/// # Errors
///
/// Returns an I/O error if the prompt cannot be flushed or the answer
/// cannot be read.
pub fn confirm(prompt: &str, input: &mut dyn BufRead, stderr: &mut dyn Write) -> io::Result<bool> {
    write!(stderr, "{prompt}")?;
    stderr.flush()?;
    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    let answer = answer.trim();
    Ok(answer.is_empty() || answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

/// Format a success message after installation.
#[must_use]
pub fn success_message(binary: &ResolvedBinary, path: &Utf8Path) -> String {
    format!("Installed {binary} to {path}")
}
