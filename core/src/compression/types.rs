//! compression/types.rs
//! Decompression seam and its error type.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompressionError {
    #[error("payload is neither a gzip stream nor a tar archive")]
    NotAnArchive,

    #[error("decompressed output exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("gzip stream is corrupt: {0}")]
    Gzip(String),

    #[error("tar archive is corrupt: {0}")]
    Tar(String),
}

/// Turns an archived payload into the content it carries.
pub trait Decompressor: Send + Sync {
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CompressionError>;
}
