//! Content-type detection from magic bytes.
//!
//! Classification looks only at the buffer itself. File extensions and
//! transport headers are never consulted.

use std::fmt;

/// Offset of the POSIX `ustar` magic inside a tar header block.
const TAR_MAGIC_OFFSET: usize = 257;
const TAR_BLOCK_LEN: usize = 512;
const TAR_CHECKSUM_FIELD: std::ops::Range<usize> = 148..156;

/// Upper bound on the architecture count of a fat Mach-O header. Java class
/// files share the `CAFEBABE` magic but carry a version number here.
const MAX_FAT_ARCHES: u32 = 20;

/// The sniffed type of a byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// gzip stream.
    Gzip,
    /// xz stream.
    Xz,
    /// Zstandard frame.
    Zstd,
    /// bzip2 stream.
    Bzip2,
    /// 7-Zip archive.
    SevenZip,
    /// RAR archive.
    Rar,
    /// Zip archive.
    Zip,
    /// Tar archive.
    Tar,
    /// ELF executable.
    Executable,
    /// ELF shared object.
    SharedLibrary,
    /// ELF relocatable object or core dump.
    ElfObject,
    /// Mach-O image, thin or fat.
    MachO,
    /// Windows PE image.
    PortableExecutable,
    /// Zero-length buffer.
    Empty,
    /// UTF-8 text.
    Text,
    /// Unrecognised binary data.
    OctetStream,
}

impl ContentType {
    /// MIME-style name used in diagnostics.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Gzip => "application/gzip",
            Self::Xz => "application/x-xz",
            Self::Zstd => "application/zstd",
            Self::Bzip2 => "application/x-bzip2",
            Self::SevenZip => "application/x-7z-compressed",
            Self::Rar => "application/x-rar-compressed",
            Self::Zip => "application/zip",
            Self::Tar => "application/x-tar",
            Self::Executable => "application/x-executable",
            Self::SharedLibrary => "application/x-sharedlib",
            Self::ElfObject => "application/x-object",
            Self::MachO => "application/x-mach-binary",
            Self::PortableExecutable => "application/vnd.microsoft.portable-executable",
            Self::Empty => "inode/x-empty",
            Self::Text => "text/plain",
            Self::OctetStream => "application/octet-stream",
        }
    }

    /// Whether this type ends the unwrap loop as the final payload.
    #[must_use]
    pub const fn is_payload(self) -> bool {
        matches!(
            self,
            Self::Executable
                | Self::SharedLibrary
                | Self::MachO
                | Self::PortableExecutable
                | Self::OctetStream
        )
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// Classify a buffer by its leading bytes.
///
/// # Examples
///
/// ```
/// use release_install::extraction::{ContentType, sniff};
///
/// assert_eq!(sniff(&[0x1F, 0x8B, 0x08, 0x00]), ContentType::Gzip);
/// assert_eq!(sniff(b""), ContentType::Empty);
/// ```
#[must_use]
pub fn sniff(data: &[u8]) -> ContentType {
    match data {
        [0x1F, 0x8B, ..] => ContentType::Gzip,
        [0xFD, b'7', b'z', b'X', b'Z', 0x00, ..] => ContentType::Xz,
        [0x28, 0xB5, 0x2F, 0xFD, ..] => ContentType::Zstd,
        [b'B', b'Z', b'h', b'1'..=b'9', ..] => ContentType::Bzip2,
        [b'7', b'z', 0xBC, 0xAF, 0x27, 0x1C, ..] => ContentType::SevenZip,
        [b'R', b'a', b'r', b'!', 0x1A, 0x07, ..] => ContentType::Rar,
        [b'P', b'K', 0x03, 0x04, ..] | [b'P', b'K', 0x05, 0x06, ..] | [b'P', b'K', 0x07, 0x08, ..] => {
            ContentType::Zip
        }
        [0x7F, b'E', b'L', b'F', ..] => elf_type(data),
        [0xFE, 0xED, 0xFA, 0xCE | 0xCF, ..] | [0xCE | 0xCF, 0xFA, 0xED, 0xFE, ..] => {
            ContentType::MachO
        }
        [0xCA, 0xFE, 0xBA, 0xBE, a, b, c, d, ..]
            if u32::from_be_bytes([*a, *b, *c, *d]) < MAX_FAT_ARCHES =>
        {
            ContentType::MachO
        }
        _ if is_tar(data) => ContentType::Tar,
        [b'M', b'Z', ..] => ContentType::PortableExecutable,
        [] => ContentType::Empty,
        _ if is_text(data) => ContentType::Text,
        _ => ContentType::OctetStream,
    }
}

/// Read the ELF `e_type` field honouring the header's byte order.
fn elf_type(data: &[u8]) -> ContentType {
    let (Some(&encoding), Some(&lo), Some(&hi)) = (data.get(5), data.get(16), data.get(17)) else {
        return ContentType::ElfObject;
    };
    let e_type = match encoding {
        2 => u16::from_be_bytes([lo, hi]),
        _ => u16::from_le_bytes([lo, hi]),
    };
    match e_type {
        2 => ContentType::Executable,
        3 => ContentType::SharedLibrary,
        _ => ContentType::ElfObject,
    }
}

fn is_tar(data: &[u8]) -> bool {
    let Some(header) = data.get(..TAR_BLOCK_LEN) else {
        return false;
    };
    if header
        .get(TAR_MAGIC_OFFSET..TAR_MAGIC_OFFSET + 5)
        .is_some_and(|magic| magic == b"ustar")
    {
        return true;
    }
    has_valid_v7_checksum(header)
}

/// Pre-POSIX tar headers carry no magic; accept them when the stored
/// checksum matches the header contents.
fn has_valid_v7_checksum(header: &[u8]) -> bool {
    let Some(field) = header.get(TAR_CHECKSUM_FIELD) else {
        return false;
    };
    let digits: String = field
        .iter()
        .skip_while(|b| **b == b' ')
        .take_while(|b| (b'0'..=b'7').contains(*b))
        .map(|b| char::from(*b))
        .collect();
    let Ok(stored) = u32::from_str_radix(&digits, 8) else {
        return false;
    };
    let computed: u32 = header
        .iter()
        .enumerate()
        .map(|(i, b)| {
            if TAR_CHECKSUM_FIELD.contains(&i) {
                u32::from(b' ')
            } else {
                u32::from(*b)
            }
        })
        .sum();
    stored == computed
}

fn is_text(data: &[u8]) -> bool {
    std::str::from_utf8(data).is_ok_and(|text| {
        text.chars()
            .all(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r' | '\x0c' | '\x1b'))
    })
}
