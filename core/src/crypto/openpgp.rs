//! crypto/openpgp.rs
//! OpenPGP messages protected by passphrases (SKESK + SEIPD).
//!
//! The whole passphrase list goes into one decrypt call; inside it each
//! passphrase is tried against the parsed message in order and the first
//! one that opens it wins. Compressed inner messages are unwrapped.

use std::io::Cursor;

use pgp::crypto::sym::SymmetricKeyAlgorithm;
use pgp::ser::Serialize;
use pgp::types::StringToKey;
use pgp::{Deserializable, Message};

use crate::credentials::Credential;
use crate::crypto::types::{BatchPassphraseCipher, CryptoError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PgpFormat {
    Binary,
    Armored,
}

impl PgpFormat {
    pub fn from_binary_flag(binary: bool) -> Self {
        if binary { PgpFormat::Binary } else { PgpFormat::Armored }
    }
}

fn pgp_error(e: pgp::errors::Error) -> CryptoError {
    CryptoError::Pgp(e.to_string())
}

pub fn read_message(payload: &[u8], format: PgpFormat) -> Result<Message, CryptoError> {
    match format {
        PgpFormat::Binary => Message::from_bytes(Cursor::new(payload)).map_err(pgp_error),
        PgpFormat::Armored => Message::from_armor_single(Cursor::new(payload))
            .map(|(message, _headers)| message)
            .map_err(pgp_error),
    }
}

/// Decrypt `payload` with the first passphrase in `passphrases` that opens it.
pub fn decrypt_pgp(
    payload: &[u8],
    format: PgpFormat,
    passphrases: &[Credential],
) -> Result<Vec<u8>, CryptoError> {
    if passphrases.is_empty() {
        return Err(CryptoError::NoPassphrases);
    }

    let message = read_message(payload, format)?;

    let mut last_error = None;
    for passphrase in passphrases {
        match message.decrypt_with_password(|| passphrase.expose().to_owned()) {
            Ok(decrypted) => {
                return decrypted
                    .get_content()
                    .map_err(pgp_error)?
                    .ok_or_else(|| CryptoError::Pgp("message has no literal data".into()));
            }
            Err(e) => last_error = Some(pgp_error(e)),
        }
    }

    Err(last_error.unwrap_or(CryptoError::NoPassphrases))
}

/// Produce a binary passphrase-protected SEIPD v1 message (AES-128, iterated+salted S2K).
pub fn encrypt_pgp(plaintext: &[u8], passphrase: &Credential) -> Result<Vec<u8>, CryptoError> {
    let mut rng = rand::thread_rng();
    let s2k = StringToKey::new_default(&mut rng);
    let password = passphrase.expose().to_owned();

    Message::new_literal_bytes("", plaintext)
        .encrypt_with_password_seipdv1(&mut rng, s2k, SymmetricKeyAlgorithm::AES128, || password)
        .map_err(pgp_error)?
        .to_bytes()
        .map_err(pgp_error)
}

/// OpenPGP as a batch passphrase cipher.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenPgp;

impl BatchPassphraseCipher for OpenPgp {
    fn name(&self) -> &'static str {
        "openpgp"
    }

    fn decrypt_batch(
        &self,
        payload: &[u8],
        binary: bool,
        passphrases: &[Credential],
    ) -> Result<Vec<u8>, CryptoError> {
        decrypt_pgp(payload, PgpFormat::from_binary_flag(binary), passphrases)
    }
}
