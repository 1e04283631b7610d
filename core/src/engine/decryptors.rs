//! engine/decryptors.rs
//! Scheme decryptors: passthrough, one-credential-at-a-time, and batch.

use tracing::debug;

use crate::classifier::EncryptionScheme;
use crate::credentials::Credential;
use crate::crypto::{BatchPassphraseCipher, PassphraseCipher};
use crate::engine::types::{AttemptFailure, DecryptInput, DecryptOutput, DecryptionFailed, SchemeDecryptor};

/// Plaintext payloads. Credentials are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl SchemeDecryptor for Passthrough {
    fn scheme(&self) -> EncryptionScheme {
        EncryptionScheme::None
    }

    fn decrypt(&self, input: &DecryptInput<'_>, _credentials: &[Credential]) -> Result<DecryptOutput, DecryptionFailed> {
        Ok(DecryptOutput {
            plaintext: input.payload.to_vec(),
            attempts: 0,
            credential_index: None,
        })
    }
}

/// Tries credentials strictly in order and stops at the first success.
/// Every failed attempt is kept for the aggregated error.
pub struct SequentialDecryptor<C> {
    scheme: EncryptionScheme,
    cipher: C,
}

impl<C: PassphraseCipher> SequentialDecryptor<C> {
    pub fn new(scheme: EncryptionScheme, cipher: C) -> Self {
        Self { scheme, cipher }
    }
}

impl<C: PassphraseCipher> SchemeDecryptor for SequentialDecryptor<C> {
    fn scheme(&self) -> EncryptionScheme {
        self.scheme
    }

    fn decrypt(&self, input: &DecryptInput<'_>, credentials: &[Credential]) -> Result<DecryptOutput, DecryptionFailed> {
        let mut failures = Vec::with_capacity(credentials.len());

        for (index, credential) in credentials.iter().enumerate() {
            match self.cipher.decrypt(input.payload, credential) {
                Ok(plaintext) => {
                    debug!(source = input.source, cipher = self.cipher.name(), index, "decryption succeeded");
                    return Ok(DecryptOutput {
                        plaintext,
                        attempts: index + 1,
                        credential_index: Some(index),
                    });
                }
                Err(reason) => {
                    debug!(source = input.source, cipher = self.cipher.name(), index, error = %reason, "decryption attempt failed");
                    failures.push(AttemptFailure { index: Some(index), reason });
                }
            }
        }

        Err(DecryptionFailed {
            source_id: input.source.to_owned(),
            scheme: self.scheme,
            failures,
        })
    }
}

/// Hands the whole credential list to the cipher in a single call.
pub struct BatchDecryptor<B> {
    scheme: EncryptionScheme,
    cipher: B,
}

impl<B: BatchPassphraseCipher> BatchDecryptor<B> {
    pub fn new(scheme: EncryptionScheme, cipher: B) -> Self {
        Self { scheme, cipher }
    }
}

impl<B: BatchPassphraseCipher> SchemeDecryptor for BatchDecryptor<B> {
    fn scheme(&self) -> EncryptionScheme {
        self.scheme
    }

    fn decrypt(&self, input: &DecryptInput<'_>, credentials: &[Credential]) -> Result<DecryptOutput, DecryptionFailed> {
        debug!(
            source = input.source,
            cipher = self.cipher.name(),
            binary = input.binary,
            passphrases = credentials.len(),
            "decrypting"
        );

        match self.cipher.decrypt_batch(input.payload, input.binary, credentials) {
            Ok(plaintext) => Ok(DecryptOutput {
                plaintext,
                attempts: 1,
                credential_index: None,
            }),
            Err(reason) => Err(DecryptionFailed {
                source_id: input.source.to_owned(),
                scheme: self.scheme,
                failures: vec![AttemptFailure { index: None, reason }],
            }),
        }
    }
}
