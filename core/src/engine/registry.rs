//! engine/registry.rs
//! Maps each `EncryptionScheme` to its decryptor.

use std::collections::HashMap;

use crate::classifier::EncryptionScheme;
use crate::credentials::Credential;
use crate::crypto::{AnsibleVault, CryptoError, OpenPgp};
use crate::engine::decryptors::{BatchDecryptor, Passthrough, SequentialDecryptor};
use crate::engine::types::{AttemptFailure, DecryptInput, DecryptOutput, DecryptionFailed, SchemeDecryptor};

pub struct DecryptionEngine {
    decryptors: HashMap<EncryptionScheme, Box<dyn SchemeDecryptor>>,
}

impl Default for DecryptionEngine {
    fn default() -> Self {
        Self::empty()
            .with_decryptor(Box::new(Passthrough))
            .with_decryptor(Box::new(SequentialDecryptor::new(EncryptionScheme::SymmetricVault, AnsibleVault)))
            .with_decryptor(Box::new(BatchDecryptor::new(EncryptionScheme::Pgp, OpenPgp)))
    }
}

impl DecryptionEngine {
    /// Engine with no schemes registered.
    pub fn empty() -> Self {
        Self { decryptors: HashMap::new() }
    }

    /// Register `decryptor`, replacing any existing one for its scheme.
    pub fn with_decryptor(mut self, decryptor: Box<dyn SchemeDecryptor>) -> Self {
        self.register(decryptor);
        self
    }

    pub fn register(&mut self, decryptor: Box<dyn SchemeDecryptor>) {
        self.decryptors.insert(decryptor.scheme(), decryptor);
    }

    pub fn resolve(&self, scheme: EncryptionScheme) -> Option<&dyn SchemeDecryptor> {
        self.decryptors.get(&scheme).map(|d| d.as_ref())
    }

    pub fn decrypt(
        &self,
        input: &DecryptInput<'_>,
        scheme: EncryptionScheme,
        credentials: &[Credential],
    ) -> Result<DecryptOutput, DecryptionFailed> {
        match self.resolve(scheme) {
            Some(decryptor) => decryptor.decrypt(input, credentials),
            None => Err(DecryptionFailed {
                source_id: input.source.to_owned(),
                scheme,
                failures: vec![AttemptFailure {
                    index: None,
                    reason: CryptoError::Failure(format!("no decryptor registered for scheme {scheme}")),
                }],
            }),
        }
    }
}
