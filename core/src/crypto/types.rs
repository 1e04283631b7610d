// ## 📂 File: `src/crypto/types.rs`

use thiserror::Error;

use crate::credentials::Credential;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Payload is not a well-formed envelope for the scheme.
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),

    /// Envelope format version this crate does not read.
    #[error("unsupported vault format: {version}")]
    UnsupportedFormat { version: String },

    /// Envelope cipher this crate does not read.
    #[error("unsupported vault cipher: {cipher}")]
    UnsupportedCipher { cipher: String },

    /// HMAC over the ciphertext did not verify (wrong passphrase or tampering).
    #[error("HMAC mismatch")]
    HmacMismatch,

    /// PKCS#7 padding invalid after decryption.
    #[error("invalid padding")]
    InvalidPadding,

    /// No passphrase was supplied to a batch decrypt.
    #[error("no passphrases supplied")]
    NoPassphrases,

    /// OpenPGP parse or decrypt failure.
    #[error("pgp: {0}")]
    Pgp(String),

    /// General derivation or runtime error with context.
    #[error("crypto failure: {0}")]
    Failure(String),
}

/// A cipher that decrypts with one passphrase per call.
pub trait PassphraseCipher: Send + Sync {
    fn name(&self) -> &'static str;

    fn decrypt(&self, payload: &[u8], passphrase: &Credential) -> Result<Vec<u8>, CryptoError>;
}

/// A cipher that takes the whole passphrase list in a single call.
pub trait BatchPassphraseCipher: Send + Sync {
    fn name(&self) -> &'static str;

    /// `binary` selects binary packet parsing over ASCII armor.
    fn decrypt_batch(
        &self,
        payload: &[u8],
        binary: bool,
        passphrases: &[Credential],
    ) -> Result<Vec<u8>, CryptoError>;
}
