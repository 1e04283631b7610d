use thiserror::Error;

use crate::compression::CompressionError;
use crate::constants::{FAILURE_MESSAGE, FAILURE_STATUS_CODE};
use crate::engine::DecryptionFailed;
use crate::pipeline::DownloadFailure;

/// Terminal pipeline error.
/// - Carries the full diagnostic for the log.
/// - Converted once into the generic `DownloadFailure` handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// No credential opened the payload.
    #[error(transparent)]
    Decryption(#[from] DecryptionFailed),

    /// Decrypted payload could not be unpacked.
    #[error("decompression failed for {source_id}: {error}")]
    Decompression {
        source_id: String,
        error: CompressionError,
    },
}

impl PipelineError {
    pub fn source_id(&self) -> &str {
        match self {
            PipelineError::Decryption(e) => &e.source_id,
            PipelineError::Decompression { source_id, .. } => source_id,
        }
    }

    /// Caller-facing failure: status 500, generic message, source identifier.
    /// Never includes credential values or library error text.
    pub fn to_failure(&self) -> DownloadFailure {
        DownloadFailure {
            status_code: FAILURE_STATUS_CODE,
            message: FAILURE_MESSAGE.to_owned(),
            url: self.source_id().to_owned(),
        }
    }
}
