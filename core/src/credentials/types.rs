// ## src/credentials/types.rs

//! credentials/types.rs
//! Declarations, resolved credentials and per-declaration outcomes.
//!
//! Security notes:
//! - `Credential` zeroizes its buffer on drop and never prints its value.
//! - Outcomes keep the failure next to the declaration that caused it, so
//!   collection always completes and callers can see what went wrong.

use std::fmt;

use subtle::ConstantTimeEq;
use thiserror::Error;
use zeroize::Zeroizing;

/// Plaintext secret used as a passphrase.
#[derive(Clone)]
pub struct Credential(Zeroizing<String>);

/// Constant-time comparison of the secret bytes.
impl PartialEq for Credential {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes().ct_eq(other.as_bytes()).into()
    }
}

impl Eq for Credential {}

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Borrow the secret. Never log the returned value.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Pointer to a value held by the secret store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRef {
    pub secret_name: String,
    pub secret_namespace: Option<String>,
    pub key: String,
}

/// Canonical credential declaration, produced once at ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialDeclaration {
    InlineValue(Credential),
    ExternalReference(SecretRef),
}

/// The legacy list a declaration was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationList {
    Keys,
    PasswordRefs,
    Passwords,
}

impl fmt::Display for DeclarationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeclarationList::Keys => "keys",
            DeclarationList::PasswordRefs => "passwordRefs",
            DeclarationList::Passwords => "passwords",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclarationOrigin {
    pub list: DeclarationList,
    /// Position inside `list`.
    pub index: usize,
}

impl fmt::Display for DeclarationOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.list, self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidDeclaration {
    #[error("secretKeyRef is missing `{field}`")]
    MissingField { field: &'static str },

    #[error("unsupported declaration shape: {kind}")]
    Unsupported { kind: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDeclaration {
    pub origin: DeclarationOrigin,
    pub declaration: Result<CredentialDeclaration, InvalidDeclaration>,
}

/// Secret-store failure for a single declaration. Never fatal for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    #[error("secret {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },

    #[error("secret store unavailable: {0}")]
    Unavailable(String),

    #[error("secret resolver panicked")]
    Panicked,

    #[error("secret resolution failed: {0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(Credential),
    /// Resolved to an empty or absent value; dropped silently.
    Empty,
    Failed(SecretError),
    Invalid(InvalidDeclaration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationOutcome {
    pub origin: DeclarationOrigin,
    pub resolution: Resolution,
}

/// Ordered collection result. Credential order follows declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedCredentials {
    outcomes: Vec<DeclarationOutcome>,
}

impl CollectedCredentials {
    pub fn new(outcomes: Vec<DeclarationOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[DeclarationOutcome] {
        &self.outcomes
    }

    pub fn credentials(&self) -> Vec<Credential> {
        self.outcomes
            .iter()
            .filter_map(|o| match &o.resolution {
                Resolution::Resolved(c) => Some(c.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn into_credentials(self) -> Vec<Credential> {
        self.outcomes
            .into_iter()
            .filter_map(|o| match o.resolution {
                Resolution::Resolved(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&DeclarationOrigin, &SecretError)> {
        self.outcomes.iter().filter_map(|o| match &o.resolution {
            Resolution::Failed(e) => Some((&o.origin, e)),
            _ => None,
        })
    }

    pub fn declared(&self) -> usize {
        self.outcomes.len()
    }

    pub fn resolved(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.resolution, Resolution::Resolved(_)))
            .count()
    }
}
