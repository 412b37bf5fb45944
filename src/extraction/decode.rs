//! Single-layer decoders: decompression streams and archive lookups.

use std::ffi::OsStr;
use std::io::{Cursor, Read};

use flate2::read::GzDecoder;
use log::{debug, trace};
use xz2::read::XzDecoder;
use zip::ZipArchive;

use super::{ContentType, UnwrapError};

/// Whether [`decode_layer`] knows how to peel `content_type`.
pub(super) const fn is_decodable(content_type: ContentType) -> bool {
    matches!(
        content_type,
        ContentType::Gzip
            | ContentType::Xz
            | ContentType::Zstd
            | ContentType::Tar
            | ContentType::Zip
    )
}

/// Remove one layer of wrapping from `data`.
///
/// Compression layers yield their decompressed stream. Archive layers yield
/// the first regular file whose base name equals `target`.
pub(super) fn decode_layer(
    content_type: ContentType,
    data: &[u8],
    target: &str,
) -> Result<Vec<u8>, UnwrapError> {
    match content_type {
        ContentType::Gzip => read_stream(GzDecoder::new(data), content_type),
        ContentType::Xz => read_stream(XzDecoder::new(data), content_type),
        ContentType::Zstd => zstd::stream::decode_all(data).map_err(|e| decode_error(content_type, e)),
        ContentType::Tar => find_in_tar(data, target),
        ContentType::Zip => find_in_zip(data, target),
        other => Err(UnwrapError::UnsupportedContentType {
            content_type: other,
        }),
    }
}

fn read_stream(mut reader: impl Read, content_type: ContentType) -> Result<Vec<u8>, UnwrapError> {
    let mut out = Vec::new();
    reader
        .read_to_end(&mut out)
        .map_err(|e| decode_error(content_type, e))?;
    Ok(out)
}

fn find_in_tar(data: &[u8], target: &str) -> Result<Vec<u8>, UnwrapError> {
    let to_error = |e| decode_error(ContentType::Tar, e);
    let mut archive = tar::Archive::new(data);
    for entry in archive.entries().map_err(to_error)? {
        let mut entry = entry.map_err(to_error)?;
        let entry_type = entry.header().entry_type();
        let path = entry.path().map_err(to_error)?.into_owned();
        trace!("tar entry {} ({entry_type:?})", path.display());
        if !entry_type.is_file() || path.file_name().and_then(OsStr::to_str) != Some(target) {
            continue;
        }
        debug!("extracting {} from tar archive", path.display());
        let mut out = Vec::new();
        entry.read_to_end(&mut out).map_err(to_error)?;
        return Ok(out);
    }
    Err(entry_not_found(target, ContentType::Tar))
}

/// Only the matching entry is opened; other entries may be encrypted or
/// use methods the reader cannot decode.
fn find_in_zip(data: &[u8], target: &str) -> Result<Vec<u8>, UnwrapError> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;
    let index = (0..archive.len())
        .find(|&index| {
            archive.name_for_index(index).is_some_and(|name| {
                trace!("zip entry {name}");
                !is_dir_name(name) && base_name(name) == target
            })
        })
        .ok_or_else(|| entry_not_found(target, ContentType::Zip))?;
    let mut file = archive.by_index(index)?;
    debug!("extracting {} from zip archive", file.name());
    // The declared size is untrusted, so it is never used as a capacity.
    let mut out = Vec::new();
    file.read_to_end(&mut out)
        .map_err(|e| decode_error(ContentType::Zip, e))?;
    Ok(out)
}

fn is_dir_name(stored: &str) -> bool {
    stored.ends_with(['/', '\\'])
}

/// Final segment of a stored archive path, ignoring directory components.
fn base_name(stored: &str) -> &str {
    stored.rsplit(['/', '\\']).next().unwrap_or(stored)
}

const fn decode_error(content_type: ContentType, source: std::io::Error) -> UnwrapError {
    UnwrapError::Decode {
        content_type,
        source,
    }
}

fn entry_not_found(target: &str, container: ContentType) -> UnwrapError {
    UnwrapError::EntryNotFound {
        name: target.to_owned(),
        container,
    }
}
