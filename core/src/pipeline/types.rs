//! pipeline/types.rs
//! Request, response and failure shapes exchanged with the download orchestrator.

use std::collections::BTreeMap;

use thiserror::Error;

/// Response payload. Binary responses stay bytes; others are UTF-8 text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Bytes(Vec<u8>),
    Text(String),
}

impl Body {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Bytes(b) => b,
            Body::Text(t) => t.as_bytes(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Body::Text(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Body::Bytes(_) => "bytes",
            Body::Text(_) => "text",
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Body::Bytes(b) => b,
            Body::Text(t) => t.into_bytes(),
        }
    }

    /// Text when `prefer_text` is set and `bytes` is valid UTF-8, bytes otherwise.
    pub fn from_output(bytes: Vec<u8>, prefer_text: bool) -> Body {
        if !prefer_text {
            return Body::Bytes(bytes);
        }
        match String::from_utf8(bytes) {
            Ok(t) => Body::Text(t),
            Err(e) => Body::Bytes(e.into_bytes()),
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(b: Vec<u8>) -> Self {
        Body::Bytes(b)
    }
}

impl From<String> for Body {
    fn from(t: String) -> Self {
        Body::Text(t)
    }
}

impl From<&str> for Body {
    fn from(t: &str) -> Self {
        Body::Text(t.to_owned())
    }
}

/// Buffered response produced by the fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Body,
}

impl DownloadResult {
    pub fn new(status_code: u16, body: impl Into<Body>) -> Self {
        Self {
            status_code,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_owned(), value.to_owned());
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// Options for the fetch collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub uri: Option<String>,
    pub url: Option<String>,
    pub headers: BTreeMap<String, String>,
    /// Deliver the body undecoded, so content-type based binary detection holds.
    pub raw_body: bool,
    /// Buffer the whole response instead of streaming chunks.
    pub full_response: bool,
}

impl RequestOptions {
    pub fn for_uri(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            ..Self::default()
        }
    }

    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Source identifier: `uri`, falling back to `url`.
    pub fn source(&self) -> &str {
        self.uri
            .as_deref()
            .or(self.url.as_deref())
            .unwrap_or_default()
    }

    pub fn prepare_for_decryption(&mut self) {
        self.raw_body = true;
        self.full_response = true;
    }
}

/// The only failure shape callers observe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (url: {url}, status: {status_code})")]
pub struct DownloadFailure {
    pub status_code: u16,
    pub message: String,
    pub url: String,
}
