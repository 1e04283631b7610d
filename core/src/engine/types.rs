//! engine/types.rs
//! Engine inputs, outputs and the aggregated failure.

use std::fmt;

use thiserror::Error;

use crate::classifier::EncryptionScheme;
use crate::credentials::Credential;
use crate::crypto::CryptoError;

/// Payload handed to a scheme decryptor.
#[derive(Debug, Clone, Copy)]
pub struct DecryptInput<'a> {
    /// Source identifier, for diagnostics only.
    pub source: &'a str,
    pub payload: &'a [u8],
    /// Body was marked binary at fetch time.
    pub binary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptOutput {
    pub plaintext: Vec<u8>,
    /// Decrypt calls made against the underlying cipher.
    pub attempts: usize,
    /// Position of the credential that worked, when tried one at a time.
    pub credential_index: Option<usize>,
}

/// One failed attempt. `index` is `None` for a batch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    pub index: Option<usize>,
    pub reason: CryptoError,
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "credential #{}: {}", i, self.reason),
            None => write!(f, "all credentials: {}", self.reason),
        }
    }
}

/// No credential opened the payload. Terminal for the request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("decryption failed for {source_id} (scheme {scheme}): {}", render_failures(.failures))]
pub struct DecryptionFailed {
    pub source_id: String,
    pub scheme: EncryptionScheme,
    pub failures: Vec<AttemptFailure>,
}

fn render_failures(failures: &[AttemptFailure]) -> String {
    if failures.is_empty() {
        return "no credentials available".into();
    }
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Decrypts one scheme. Implementations must not return partial output.
pub trait SchemeDecryptor: Send + Sync {
    fn scheme(&self) -> EncryptionScheme;

    fn decrypt(
        &self,
        input: &DecryptInput<'_>,
        credentials: &[Credential],
    ) -> Result<DecryptOutput, DecryptionFailed>;
}
