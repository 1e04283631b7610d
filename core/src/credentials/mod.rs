//! credentials/mod.rs
//! Credential collection: legacy-shape normalization, secret resolution and
//! ordered, best-effort assembly of passphrases.

pub mod types;
pub mod normalize;
pub mod resolver;
pub mod collect;

pub use types::*;
pub use normalize::*;
pub use resolver::*;
pub use collect::*;
