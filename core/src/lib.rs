//! remote-decrypt-core
//!
//! Decryption pipeline for objects fetched from remote storage:
//! classify the source, collect candidate passphrases, decrypt, unpack.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

// Stages
pub mod classifier;
pub mod credentials;
pub mod crypto;
pub mod engine;
pub mod compression;

// Composition
pub mod pipeline;
pub mod telemetry;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::classifier::{classify, Classification, EncryptionScheme};
    pub use crate::credentials::{Credential, SecretError, SecretResolver, StaticSecretResolver};
    pub use crate::pipeline::{
        Body, DecryptionPipeline, DownloadFailure, DownloadResult, Fetcher, PipelineConfig, RequestOptions,
    };
    pub use crate::types::PipelineError;
}
