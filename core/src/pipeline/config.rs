//! pipeline/config.rs
//! Pipeline tunables. Loading is the embedder's job; every field has a default.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BINARY_CONTENT_TYPES, DEFAULT_MAX_DECOMPRESSED_LEN};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Content types whose bodies are kept as raw bytes.
    /// Everything else is converted to UTF-8 text before decryption.
    pub binary_content_types: Vec<String>,

    /// Resolve external secret references on scoped worker threads.
    /// Credential order is unaffected.
    pub resolve_concurrently: bool,

    /// Upper bound for decompressed output, in bytes.
    pub max_decompressed_len: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            binary_content_types: DEFAULT_BINARY_CONTENT_TYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
            resolve_concurrently: false,
            max_decompressed_len: DEFAULT_MAX_DECOMPRESSED_LEN,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_concurrent_resolution(mut self, enabled: bool) -> Self {
        self.resolve_concurrently = enabled;
        self
    }

    pub fn with_max_decompressed_len(mut self, max: usize) -> Self {
        self.max_decompressed_len = max;
        self
    }

    pub fn with_binary_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.binary_content_types.push(content_type.into());
        self
    }
}
