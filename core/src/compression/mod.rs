//! compression/mod.rs
//! Post-processing of decrypted payloads flagged as archives.
//!
//! Notes:
//! - gzip is inflated first, then a tar archive (if any) is unpacked.
//! - Output size is bounded; oversized archives fail instead of growing.

pub mod types;
pub mod archive;

pub use types::*;
pub use archive::*;
