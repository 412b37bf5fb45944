//! Writing the unwrapped binary to its destination.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::artifact::{BinaryContent, ResolvedBinary};

/// Permission bits for installed binaries (rwxr-xr-x).
#[cfg(unix)]
const EXECUTABLE_MODE: u32 = 0o755;

/// Errors arising while writing the binary.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The resolved name would not stay inside the destination directory.
    #[error("refusing to install binary with invalid file name \"{name}\"")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// Creating, writing or renaming the file failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The path being written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Persists binary content under its resolved name.
#[cfg_attr(test, mockall::automock)]
pub trait BinarySink {
    /// Write `content` as an executable named after `binary` and return
    /// the final path.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::InvalidName`] for names that are not a single
    /// path component, or [`SinkError::Write`] on I/O failure.
    fn write(&self, binary: &ResolvedBinary, content: &BinaryContent)
    -> Result<Utf8PathBuf, SinkError>;
}

/// Writes binaries into a directory on the local filesystem.
///
/// The file is staged as a temporary file inside the destination and
/// renamed into place, so an interrupted install never leaves a truncated
/// binary behind.
#[derive(Debug, Clone)]
pub struct FsBinarySink {
    dir: Utf8PathBuf,
}

impl FsBinarySink {
    /// Create a sink for `dir`.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The destination directory.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }
}

impl BinarySink for FsBinarySink {
    fn write(
        &self,
        binary: &ResolvedBinary,
        content: &BinaryContent,
    ) -> Result<Utf8PathBuf, SinkError> {
        validate_name(binary.name())?;
        let path = self.dir.join(binary.name());
        let write_error = |source| SinkError::Write {
            path: path.clone(),
            source,
        };

        let mut staged = NamedTempFile::new_in(&self.dir).map_err(write_error)?;
        staged.write_all(content.as_bytes()).map_err(write_error)?;
        staged.as_file().sync_all().map_err(write_error)?;
        set_executable(staged.path()).map_err(write_error)?;
        staged.persist(&path).map_err(|e| write_error(e.error))?;

        debug!("wrote {} bytes to {path}", content.len());
        Ok(path)
    }
}

/// Reject names that would resolve outside the destination directory.
fn validate_name(name: &str) -> Result<(), SinkError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(SinkError::InvalidName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &std::path::Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(EXECUTABLE_MODE))
}

#[cfg(not(unix))]
fn set_executable(_path: &std::path::Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn dest() -> (TempDir, FsBinarySink) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 path");
        (dir, FsBinarySink::new(path))
    }

    #[rstest]
    fn writes_named_file(dest: (TempDir, FsBinarySink)) {
        let (_dir, sink) = dest;
        let path = sink
            .write(
                &ResolvedBinary::new("tool"),
                &BinaryContent::unchecked(b"binary".to_vec()),
            )
            .expect("write");
        assert_eq!(path, sink.dir().join("tool"));
        assert_eq!(std::fs::read(&path).expect("read back"), b"binary");
    }

    #[rstest]
    fn overwrites_existing_file(dest: (TempDir, FsBinarySink)) {
        let (_dir, sink) = dest;
        std::fs::write(sink.dir().join("tool"), b"old").expect("seed");
        let path = sink
            .write(
                &ResolvedBinary::new("tool"),
                &BinaryContent::unchecked(b"new".to_vec()),
            )
            .expect("write");
        assert_eq!(std::fs::read(path).expect("read back"), b"new");
    }

    #[cfg(unix)]
    #[rstest]
    fn sets_executable_mode(dest: (TempDir, FsBinarySink)) {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, sink) = dest;
        let path = sink
            .write(
                &ResolvedBinary::new("tool"),
                &BinaryContent::unchecked(b"binary".to_vec()),
            )
            .expect("write");
        let mode = std::fs::metadata(path).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, EXECUTABLE_MODE);
    }

    #[rstest]
    #[case::empty("")]
    #[case::dot(".")]
    #[case::dotdot("..")]
    #[case::nested("bin/tool")]
    #[case::escape("../tool")]
    #[case::backslash("bin\\tool")]
    fn rejects_unsafe_names(dest: (TempDir, FsBinarySink), #[case] name: &str) {
        let (_dir, sink) = dest;
        let err = sink
            .write(
                &ResolvedBinary::new(name),
                &BinaryContent::unchecked(b"binary".to_vec()),
            )
            .expect_err("should fail");
        assert!(matches!(err, SinkError::InvalidName { .. }));
    }

    #[test]
    fn missing_directory_is_a_write_error() {
        let sink = FsBinarySink::new("/nonexistent/release-install-test");
        let err = sink
            .write(
                &ResolvedBinary::new("tool"),
                &BinaryContent::unchecked(b"binary".to_vec()),
            )
            .expect_err("should fail");
        assert!(matches!(err, SinkError::Write { .. }));
    }
}
