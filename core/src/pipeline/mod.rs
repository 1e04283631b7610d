//! pipeline/mod.rs
//! Composition of the stages into the post-download decryption pipeline.

pub mod types;
pub mod config;
pub mod core;

pub use types::*;
pub use config::*;
pub use self::core::*;
