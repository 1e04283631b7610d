//! classifier.rs
//! Decides the encryption scheme and archive flag from a source identifier.
//!
//! Matching is a case-sensitive substring test over the whole identifier.
//! `.gpg` is checked before `.vault`, so `bundle.vault.gpg` is a PGP payload.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{markers, CONTENT_TYPE_HEADER};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncryptionScheme {
    None,
    SymmetricVault,
    Pgp,
}

impl fmt::Display for EncryptionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EncryptionScheme::None => "none",
            EncryptionScheme::SymmetricVault => "vault",
            EncryptionScheme::Pgp => "pgp",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub scheme: EncryptionScheme,
    pub compressed: bool,
}

pub fn classify(source: &str) -> Classification {
    let scheme = if source.contains(markers::PGP) {
        EncryptionScheme::Pgp
    } else if source.contains(markers::VAULT) {
        EncryptionScheme::SymmetricVault
    } else {
        EncryptionScheme::None
    };

    Classification {
        scheme,
        compressed: is_compressed(source),
    }
}

#[inline]
pub fn is_compressed(source: &str) -> bool {
    source.contains(markers::TAR) || source.contains(markers::TGZ)
}

/// True when the response content type is one of `binary_types`.
/// Header names and values compare case-insensitively; `; charset=..` style
/// parameters are ignored.
pub fn is_binary_content<'a, I>(headers: I, binary_types: &[String]) -> bool
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    headers
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE_HEADER))
        .map(|(_, value)| {
            let media = value.split(';').next().unwrap_or("").trim();
            binary_types.iter().any(|t| t.eq_ignore_ascii_case(media))
        })
        .unwrap_or(false)
}
