//! In-memory fixture builders for archive and executable payloads.
//!
//! Every builder runs the same codec crates the unwrapper decodes with, so
//! fixtures are byte-for-byte what a release would serve.

use std::io::{self, Cursor, Write};

use flate2::Compression;
use flate2::write::GzEncoder;
use tar::{EntryType, Header};
use xz2::write::XzEncoder;
use zip::write::SimpleFileOptions;

const ELF_HEADER_LEN: usize = 64;
const ELF_TYPE_EXEC: u8 = 2;
const ELF_TYPE_DYN: u8 = 3;

/// A fake little-endian ELF64 executable.
#[must_use]
pub fn elf_executable() -> Vec<u8> {
    elf_image(ELF_TYPE_EXEC)
}

/// A fake little-endian ELF64 shared object.
#[must_use]
pub fn elf_shared_library() -> Vec<u8> {
    elf_image(ELF_TYPE_DYN)
}

fn elf_image(e_type: u8) -> Vec<u8> {
    // ELFCLASS64, little-endian, version 1, then e_type and e_machine x86-64.
    let mut image = vec![0x7F, b'E', b'L', b'F', 2, 1, 1, 0];
    image.resize(16, 0);
    image.extend_from_slice(&[e_type, 0, 0x3E, 0]);
    image.resize(ELF_HEADER_LEN, 0);
    image.extend_from_slice(b"\x00fixture-payload\x00");
    image
}

/// Compress `data` as a single gzip member.
///
/// # Errors
///
/// Returns an error if the encoder fails.
pub fn gzip(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Wrap `data` in `layers` successive gzip members.
///
/// # Errors
///
/// Returns an error if any encoder fails.
pub fn nested_gzip(data: &[u8], layers: usize) -> io::Result<Vec<u8>> {
    (0..layers).try_fold(data.to_vec(), |acc, _| gzip(&acc))
}

/// Compress `data` as an xz stream.
///
/// # Errors
///
/// Returns an error if the encoder fails.
pub fn xz(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = XzEncoder::new(Vec::new(), 6);
    encoder.write_all(data)?;
    encoder.finish()
}

/// Compress `data` as a zstd frame.
///
/// # Errors
///
/// Returns an error if the encoder fails.
pub fn zstd(data: &[u8]) -> io::Result<Vec<u8>> {
    zstd::stream::encode_all(data, 0)
}

#[derive(Debug, Clone)]
enum FixtureEntry {
    File { path: String, data: Vec<u8> },
    Dir { path: String },
    Symlink { path: String, target: String },
}

/// Builds a tar archive entry by entry.
///
/// # Examples
///
/// ```
/// use release_install::test_utils::TarFixture;
///
/// let tar = TarFixture::new()
///     .dir("bin/")
///     .file("bin/tool", b"payload")
///     .build()
///     .unwrap();
/// assert!(tar.len() >= 1024);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TarFixture {
    entries: Vec<FixtureEntry>,
}

impl TarFixture {
    /// Start an empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a regular file.
    #[must_use]
    pub fn file(mut self, path: &str, data: &[u8]) -> Self {
        self.entries.push(FixtureEntry::File {
            path: path.to_owned(),
            data: data.to_vec(),
        });
        self
    }

    /// Append a directory.
    #[must_use]
    pub fn dir(mut self, path: &str) -> Self {
        self.entries.push(FixtureEntry::Dir {
            path: path.to_owned(),
        });
        self
    }

    /// Append a symbolic link.
    #[must_use]
    pub fn symlink(mut self, path: &str, target: &str) -> Self {
        self.entries.push(FixtureEntry::Symlink {
            path: path.to_owned(),
            target: target.to_owned(),
        });
        self
    }

    /// Serialise the archive.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry cannot be written.
    pub fn build(&self) -> io::Result<Vec<u8>> {
        let mut builder = tar::Builder::new(Vec::new());
        for entry in &self.entries {
            let mut header = Header::new_gnu();
            header.set_mode(0o755);
            match entry {
                FixtureEntry::File { path, data } => {
                    header.set_entry_type(EntryType::Regular);
                    header.set_size(u64::try_from(data.len()).map_err(io::Error::other)?);
                    builder.append_data(&mut header, path, data.as_slice())?;
                }
                FixtureEntry::Dir { path } => {
                    header.set_entry_type(EntryType::Directory);
                    header.set_size(0);
                    builder.append_data(&mut header, path, io::empty())?;
                }
                FixtureEntry::Symlink { path, target } => {
                    header.set_entry_type(EntryType::Symlink);
                    header.set_size(0);
                    builder.append_link(&mut header, path, target)?;
                }
            }
        }
        builder.into_inner()
    }
}

/// Builds a zip archive entry by entry.
#[derive(Debug, Clone, Default)]
pub struct ZipFixture {
    entries: Vec<FixtureEntry>,
}

impl ZipFixture {
    /// Start an empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a deflated file.
    #[must_use]
    pub fn file(mut self, path: &str, data: &[u8]) -> Self {
        self.entries.push(FixtureEntry::File {
            path: path.to_owned(),
            data: data.to_vec(),
        });
        self
    }

    /// Append a directory.
    #[must_use]
    pub fn dir(mut self, path: &str) -> Self {
        self.entries.push(FixtureEntry::Dir {
            path: path.to_owned(),
        });
        self
    }

    /// Serialise the archive.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry cannot be written.
    pub fn build(&self) -> io::Result<Vec<u8>> {
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .unix_permissions(0o755);
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for entry in &self.entries {
            match entry {
                FixtureEntry::File { path, data } => {
                    writer
                        .start_file(path.as_str(), options)
                        .map_err(io::Error::other)?;
                    writer.write_all(data)?;
                }
                FixtureEntry::Dir { path } => {
                    writer
                        .add_directory(path.as_str(), options)
                        .map_err(io::Error::other)?;
                }
                FixtureEntry::Symlink { path, target } => {
                    writer
                        .add_symlink(path.as_str(), target.as_str(), options)
                        .map_err(io::Error::other)?;
                }
            }
        }
        let cursor = writer.finish().map_err(io::Error::other)?;
        Ok(cursor.into_inner())
    }
}
