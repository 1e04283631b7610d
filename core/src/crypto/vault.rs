// ## 📂 File: `src/crypto/vault.rs`

//! src/crypto/vault.rs
//! Ansible Vault (format 1.1 / 1.2, AES256) envelopes.
//!
//! Layout:
//! ```text
//! $ANSIBLE_VAULT;1.1;AES256            (1.2 adds ";<vault-id>")
//! hex( hex(salt) "\n" hex(hmac) "\n" hex(ciphertext) ), wrapped at 80 columns
//! ```
//!
//! Design notes:
//! - HMAC-SHA256 over the ciphertext is verified (constant time) before any
//!   decryption; a wrong passphrase fails closed with `HmacMismatch`.
//! - AES-256-CTR with a 128-bit big-endian counter, PKCS#7 padded plaintext.

use ctr::cipher::{KeyIvInit, StreamCipher};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use crate::constants::vault::{
    BLOCK_LEN, CIPHER_AES256, FORMAT_1_1, FORMAT_1_2, LINE_WIDTH, MAGIC, SALT_LEN,
};
use crate::credentials::Credential;
use crate::crypto::kdf::{derive_vault_keys, VaultKeys};
use crate::crypto::types::{CryptoError, PassphraseCipher};

type Aes256Ctr = ctr::Ctr128BE<aes::Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// Parsed vault envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultEnvelope {
    pub version: String,
    pub cipher: String,
    pub vault_id: Option<String>,
    pub salt: Vec<u8>,
    pub hmac: Vec<u8>,
    pub ciphertext: Vec<u8>,
}

/// True when `data` starts (after leading whitespace) with the vault magic.
pub fn is_vault(data: &[u8]) -> bool {
    let start = data.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(data.len());
    data[start..].starts_with(MAGIC.as_bytes())
}

impl VaultEnvelope {
    pub fn parse(data: &[u8]) -> Result<Self, CryptoError> {
        let text = std::str::from_utf8(data)
            .map_err(|_| CryptoError::InvalidEnvelope("vault text is not utf-8".into()))?
            .trim();

        let mut lines = text.lines();
        let header = lines
            .next()
            .ok_or_else(|| CryptoError::InvalidEnvelope("empty payload".into()))?;

        let fields: Vec<&str> = header.trim().split(';').map(str::trim).collect();
        if fields.len() < 3 || fields[0] != MAGIC {
            return Err(CryptoError::InvalidEnvelope("missing $ANSIBLE_VAULT header".into()));
        }

        let version = fields[1];
        if version != FORMAT_1_1 && version != FORMAT_1_2 {
            return Err(CryptoError::UnsupportedFormat { version: version.to_owned() });
        }
        let cipher = fields[2];
        if cipher != CIPHER_AES256 {
            return Err(CryptoError::UnsupportedCipher { cipher: cipher.to_owned() });
        }
        let vault_id = fields.get(3).filter(|id| !id.is_empty()).map(|id| id.to_string());

        let body: String = lines
            .flat_map(|line| line.chars())
            .filter(|c| !c.is_whitespace())
            .collect();
        if body.is_empty() {
            return Err(CryptoError::InvalidEnvelope("vault body is empty".into()));
        }

        let inner = decode_hex(&body, "body")?;
        let inner = String::from_utf8(inner)
            .map_err(|_| CryptoError::InvalidEnvelope("vault body is not hex text".into()))?;

        let mut parts = inner.splitn(3, '\n');
        let salt = decode_hex(next_part(&mut parts, "salt")?, "salt")?;
        let hmac = decode_hex(next_part(&mut parts, "hmac")?, "hmac")?;
        let ciphertext = decode_hex(next_part(&mut parts, "ciphertext")?, "ciphertext")?;

        Ok(Self {
            version: version.to_owned(),
            cipher: cipher.to_owned(),
            vault_id,
            salt,
            hmac,
            ciphertext,
        })
    }

    /// Verify and decrypt with `passphrase`.
    pub fn decrypt(&self, passphrase: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let keys = derive_vault_keys(passphrase, &self.salt)?;

        let mut mac = HmacSha256::new_from_slice(&keys.hmac_key[..])
            .map_err(|_| CryptoError::Failure("invalid HMAC key length".into()))?;
        mac.update(&self.ciphertext);
        mac.verify_slice(&self.hmac).map_err(|_| CryptoError::HmacMismatch)?;

        if self.ciphertext.is_empty() || self.ciphertext.len() % BLOCK_LEN != 0 {
            return Err(CryptoError::InvalidPadding);
        }

        let mut buf = self.ciphertext.clone();
        apply_ctr(&keys, &mut buf)?;
        unpad_pkcs7(buf)
    }

    /// Render the envelope text, body wrapped at 80 columns, trailing newline.
    pub fn format(&self) -> String {
        let mut header = format!("{};{};{}", MAGIC, self.version, self.cipher);
        if let Some(id) = &self.vault_id {
            header.push(';');
            header.push_str(id);
        }

        let inner = format!(
            "{}\n{}\n{}",
            hex::encode(&self.salt),
            hex::encode(&self.hmac),
            hex::encode(&self.ciphertext)
        );
        let body = hex::encode(inner.as_bytes());

        let mut out = String::with_capacity(header.len() + body.len() + body.len() / LINE_WIDTH + 2);
        out.push_str(&header);
        for (i, c) in body.chars().enumerate() {
            if i % LINE_WIDTH == 0 {
                out.push('\n');
            }
            out.push(c);
        }
        out.push('\n');
        out
    }
}

/// Encrypt `plaintext` into a vault envelope with a fresh random salt.
/// A `vault_id` selects format 1.2.
pub fn encrypt_vault(plaintext: &[u8], passphrase: &[u8], vault_id: Option<&str>) -> Result<String, CryptoError> {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    encrypt_vault_with_salt(plaintext, passphrase, &salt, vault_id)
}

pub fn encrypt_vault_with_salt(
    plaintext: &[u8],
    passphrase: &[u8],
    salt: &[u8],
    vault_id: Option<&str>,
) -> Result<String, CryptoError> {
    let keys = derive_vault_keys(passphrase, salt)?;

    let mut ciphertext = pad_pkcs7(plaintext);
    apply_ctr(&keys, &mut ciphertext)?;

    let mut mac = HmacSha256::new_from_slice(&keys.hmac_key[..])
        .map_err(|_| CryptoError::Failure("invalid HMAC key length".into()))?;
    mac.update(&ciphertext);
    let hmac = mac.finalize().into_bytes().to_vec();

    let envelope = VaultEnvelope {
        version: if vault_id.is_some() { FORMAT_1_2 } else { FORMAT_1_1 }.to_owned(),
        cipher: CIPHER_AES256.to_owned(),
        vault_id: vault_id.map(str::to_owned),
        salt: salt.to_vec(),
        hmac,
        ciphertext,
    };
    Ok(envelope.format())
}

/// Ansible Vault as a per-passphrase cipher.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsibleVault;

impl PassphraseCipher for AnsibleVault {
    fn name(&self) -> &'static str {
        "ansible-vault"
    }

    fn decrypt(&self, payload: &[u8], passphrase: &Credential) -> Result<Vec<u8>, CryptoError> {
        VaultEnvelope::parse(payload)?.decrypt(passphrase.as_bytes())
    }
}

fn apply_ctr(keys: &VaultKeys, buf: &mut [u8]) -> Result<(), CryptoError> {
    let mut cipher = Aes256Ctr::new_from_slices(&keys.cipher_key[..], &keys.iv)
        .map_err(|_| CryptoError::Failure("invalid AES-CTR key or IV length".into()))?;
    cipher.apply_keystream(buf);
    Ok(())
}

fn next_part<'a>(parts: &mut impl Iterator<Item = &'a str>, what: &str) -> Result<&'a str, CryptoError> {
    parts
        .next()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| CryptoError::InvalidEnvelope(format!("vault body is missing the {what}")))
}

fn decode_hex(text: &str, what: &str) -> Result<Vec<u8>, CryptoError> {
    hex::decode(text).map_err(|e| CryptoError::InvalidEnvelope(format!("{what} is not valid hex: {e}")))
}

fn pad_pkcs7(data: &[u8]) -> Vec<u8> {
    let pad = BLOCK_LEN - data.len() % BLOCK_LEN;
    let mut out = Vec::with_capacity(data.len() + pad);
    out.extend_from_slice(data);
    out.resize(data.len() + pad, pad as u8);
    out
}

fn unpad_pkcs7(mut buf: Vec<u8>) -> Result<Vec<u8>, CryptoError> {
    let pad = *buf.last().ok_or(CryptoError::InvalidPadding)? as usize;
    if pad == 0 || pad > BLOCK_LEN || pad > buf.len() {
        return Err(CryptoError::InvalidPadding);
    }
    let body_len = buf.len() - pad;
    if !buf[body_len..].iter().all(|&b| b as usize == pad) {
        return Err(CryptoError::InvalidPadding);
    }
    buf.truncate(body_len);
    Ok(buf)
}
