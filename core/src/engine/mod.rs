//! engine/mod.rs
//! Decryption engine, parameterized over the encryption scheme.
//!
//! - Vault payloads: credentials tried one by one, first success wins.
//! - PGP payloads: one call with the full passphrase list.
//! - New schemes plug in through `SchemeDecryptor` and the registry.

pub mod types;
pub mod decryptors;
pub mod registry;

pub use types::*;
pub use decryptors::*;
pub use registry::*;
