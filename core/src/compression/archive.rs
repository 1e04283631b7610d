//! compression/archive.rs
//! gzip / tar / tar.gz unpacking via flate2 and tar.

use std::io::{Cursor, Read};

use flate2::read::MultiGzDecoder;

use crate::constants::archive::{GZIP_MAGIC, TAR_MAGIC, TAR_MAGIC_OFFSET};
use crate::constants::DEFAULT_MAX_DECOMPRESSED_LEN;
use crate::compression::types::{CompressionError, Decompressor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Gzip,
    Tar,
    Unknown,
}

pub fn detect_format(data: &[u8]) -> ArchiveFormat {
    if data.starts_with(&GZIP_MAGIC) {
        ArchiveFormat::Gzip
    } else if data.len() >= TAR_MAGIC_OFFSET + TAR_MAGIC.len()
        && &data[TAR_MAGIC_OFFSET..TAR_MAGIC_OFFSET + TAR_MAGIC.len()] == TAR_MAGIC
    {
        ArchiveFormat::Tar
    } else {
        ArchiveFormat::Unknown
    }
}

/// A regular file taken out of a tar archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: String,
    pub data: Vec<u8>,
}

/// Default post-processor.
///
/// - gzip → inflated (multi-member streams supported)
/// - tar (possibly after inflating) → regular files concatenated in archive
///   order, newline-separated when an entry does not end in one
/// - anything else → `NotAnArchive`
#[derive(Debug, Clone, Copy)]
pub struct ArchiveDecompressor {
    max_len: usize,
}

impl Default for ArchiveDecompressor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DECOMPRESSED_LEN)
    }
}

impl ArchiveDecompressor {
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Inflate if needed and list the regular files of the tar archive.
    pub fn extract_entries(&self, input: &[u8]) -> Result<Vec<ArchiveEntry>, CompressionError> {
        let data = match detect_format(input) {
            ArchiveFormat::Gzip => inflate(input, self.max_len)?,
            _ => input.to_vec(),
        };
        if detect_format(&data) != ArchiveFormat::Tar {
            return Err(CompressionError::NotAnArchive);
        }
        untar(&data, self.max_len)
    }
}

impl Decompressor for ArchiveDecompressor {
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
        let (data, inflated) = match detect_format(input) {
            ArchiveFormat::Gzip => (inflate(input, self.max_len)?, true),
            _ => (input.to_vec(), false),
        };

        match detect_format(&data) {
            ArchiveFormat::Tar => Ok(join_entries(untar(&data, self.max_len)?)),
            _ if inflated => Ok(data),
            _ => Err(CompressionError::NotAnArchive),
        }
    }
}

fn inflate(input: &[u8], limit: usize) -> Result<Vec<u8>, CompressionError> {
    let mut out = Vec::new();
    MultiGzDecoder::new(input)
        .take(limit as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| CompressionError::Gzip(e.to_string()))?;

    if out.len() > limit {
        return Err(CompressionError::TooLarge { limit });
    }
    Ok(out)
}

fn untar(data: &[u8], limit: usize) -> Result<Vec<ArchiveEntry>, CompressionError> {
    let tar_err = |e: std::io::Error| CompressionError::Tar(e.to_string());

    let mut archive = tar::Archive::new(Cursor::new(data));
    let mut out = Vec::new();
    let mut total = 0usize;

    for entry in archive.entries().map_err(tar_err)? {
        let mut entry = entry.map_err(tar_err)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let path = entry.path().map_err(tar_err)?.to_string_lossy().into_owned();
        let remaining = limit.saturating_sub(total);
        let mut buf = Vec::new();
        (&mut entry)
            .take(remaining as u64 + 1)
            .read_to_end(&mut buf)
            .map_err(tar_err)?;

        total += buf.len();
        if total > limit {
            return Err(CompressionError::TooLarge { limit });
        }
        out.push(ArchiveEntry { path, data: buf });
    }

    Ok(out)
}

fn join_entries(entries: Vec<ArchiveEntry>) -> Vec<u8> {
    let mut out = Vec::with_capacity(entries.iter().map(|e| e.data.len() + 1).sum());
    for entry in entries {
        if !out.is_empty() && !out.ends_with(b"\n") {
            out.push(b'\n');
        }
        out.extend_from_slice(&entry.data);
    }
    out
}
