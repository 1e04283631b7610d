// ## src/crypto/kdf.rs

//! crypto/kdf.rs
//! PBKDF2-HMAC-SHA256 key schedule for Ansible Vault 1.1/1.2.
//!
//! Design:
//! - PBKDF2(passphrase, salt, 10 000) -> 80 bytes
//! - split as AES-256 key ‖ HMAC-SHA256 key ‖ CTR IV
//!
//! Security notes:
//! - Derived material lives in zeroizing buffers.
//! - The salt is random per envelope; an empty salt is rejected.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::constants::vault::{DERIVED_LEN, HMAC_KEY_LEN, IV_LEN, KEY_LEN, PBKDF2_ITERATIONS};
use crate::crypto::types::CryptoError;

pub struct VaultKeys {
    pub cipher_key: Zeroizing<[u8; KEY_LEN]>,
    pub hmac_key: Zeroizing<[u8; HMAC_KEY_LEN]>,
    pub iv: [u8; IV_LEN],
}

/// Derive the vault key schedule from a passphrase and envelope salt.
#[inline]
pub fn derive_vault_keys(passphrase: &[u8], salt: &[u8]) -> Result<VaultKeys, CryptoError> {
    derive_vault_keys_with_iterations(passphrase, salt, PBKDF2_ITERATIONS)
}

pub fn derive_vault_keys_with_iterations(
    passphrase: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<VaultKeys, CryptoError> {
    if salt.is_empty() {
        return Err(CryptoError::Failure("salt must not be empty".into()));
    }
    if iterations == 0 {
        return Err(CryptoError::Failure("PBKDF2 iterations must be >= 1".into()));
    }

    let mut derived = Zeroizing::new([0u8; DERIVED_LEN]);
    pbkdf2_hmac::<Sha256>(passphrase, salt, iterations, &mut derived[..]);

    let mut cipher_key = Zeroizing::new([0u8; KEY_LEN]);
    let mut hmac_key = Zeroizing::new([0u8; HMAC_KEY_LEN]);
    let mut iv = [0u8; IV_LEN];
    cipher_key.copy_from_slice(&derived[..KEY_LEN]);
    hmac_key.copy_from_slice(&derived[KEY_LEN..KEY_LEN + HMAC_KEY_LEN]);
    iv.copy_from_slice(&derived[KEY_LEN + HMAC_KEY_LEN..]);

    Ok(VaultKeys { cipher_key, hmac_key, iv })
}
