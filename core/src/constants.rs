//! constants.rs
//! Stable markers, format parameters and resource paths shared across stages.

/// Source identifier markers inspected by the classifier.
pub mod markers {
    pub const PGP: &str = ".gpg";
    pub const VAULT: &str = ".vault";
    pub const TAR: &str = ".tar";
    pub const TGZ: &str = ".tgz";
}

/// Content types that mark a response body as binary.
pub const DEFAULT_BINARY_CONTENT_TYPES: &[&str] = &["binary/octet-stream"];

/// Header carrying the response content type.
pub const CONTENT_TYPE_HEADER: &str = "content-type";

/// Upper bound for decompressed output (64 MiB).
pub const DEFAULT_MAX_DECOMPRESSED_LEN: usize = 64 * 1024 * 1024;

/// Upper bound on scoped threads used for concurrent secret resolution.
pub const RESOLVER_WORKERS: usize = 4;

/// Status code returned to callers when decryption or decompression fails.
pub const FAILURE_STATUS_CODE: u16 = 500;
pub const FAILURE_MESSAGE: &str = "decryption failed.. see logs for details.";

/// Ansible Vault envelope parameters.
pub mod vault {
    pub const MAGIC: &str = "$ANSIBLE_VAULT";
    pub const CIPHER_AES256: &str = "AES256";
    pub const FORMAT_1_1: &str = "1.1";
    pub const FORMAT_1_2: &str = "1.2";

    pub const PBKDF2_ITERATIONS: u32 = 10_000;
    pub const SALT_LEN: usize = 32;
    pub const KEY_LEN: usize = 32;
    pub const HMAC_KEY_LEN: usize = 32;
    pub const IV_LEN: usize = 16;
    /// AES key ‖ HMAC key ‖ CTR IV
    pub const DERIVED_LEN: usize = KEY_LEN + HMAC_KEY_LEN + IV_LEN;
    pub const BLOCK_LEN: usize = 16;
    /// Body line width used when writing envelopes.
    pub const LINE_WIDTH: usize = 80;
}

/// Locations of the legacy credential lists inside a resource object.
/// Concatenated in this order; the order is the decryption attempt order.
pub mod resource_paths {
    pub const KEYS: &[&str] = &["spec", "keys"];
    pub const PASSWORD_REFS: &[&str] = &["spec", "password", "passwordRefs"];
    pub const PASSWORDS: &[&str] = &["spec", "password", "passwords"];
    pub const NAMESPACE: &[&str] = &["metadata", "namespace"];
    pub const SECRET_KEY_REF: &[&str] = &["valueFrom", "secretKeyRef"];
}

/// Archive detection.
pub mod archive {
    pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
    pub const TAR_MAGIC: &[u8; 5] = b"ustar";
    pub const TAR_MAGIC_OFFSET: usize = 257;
}
