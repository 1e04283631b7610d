//! credentials/resolver.rs
//! Secret-store seam.

use std::collections::HashMap;
use std::sync::Arc;

use crate::credentials::types::SecretError;

/// Namespace used by `StaticSecretResolver` when a reference carries none.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Resolves `(name, key, namespace)` to a secret value.
///
/// `Ok(None)` means the secret exists but holds no value under `key`.
/// Calls are independent reads and may run concurrently.
pub trait SecretResolver: Send + Sync {
    fn resolve_secret(
        &self,
        name: &str,
        key: &str,
        namespace: Option<&str>,
    ) -> Result<Option<String>, SecretError>;
}

impl<T: SecretResolver + ?Sized> SecretResolver for &T {
    fn resolve_secret(&self, name: &str, key: &str, namespace: Option<&str>) -> Result<Option<String>, SecretError> {
        (**self).resolve_secret(name, key, namespace)
    }
}

impl<T: SecretResolver + ?Sized> SecretResolver for Arc<T> {
    fn resolve_secret(&self, name: &str, key: &str, namespace: Option<&str>) -> Result<Option<String>, SecretError> {
        (**self).resolve_secret(name, key, namespace)
    }
}

/// In-memory secret store.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretResolver {
    secrets: HashMap<(String, String), HashMap<String, String>>,
}

impl StaticSecretResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(
        mut self,
        namespace: &str,
        name: &str,
        key: &str,
        value: impl Into<String>,
    ) -> Self {
        self.insert(namespace, name, key, value);
        self
    }

    pub fn insert(&mut self, namespace: &str, name: &str, key: &str, value: impl Into<String>) {
        self.secrets
            .entry((namespace.to_owned(), name.to_owned()))
            .or_default()
            .insert(key.to_owned(), value.into());
    }
}

impl SecretResolver for StaticSecretResolver {
    fn resolve_secret(&self, name: &str, key: &str, namespace: Option<&str>) -> Result<Option<String>, SecretError> {
        let namespace = namespace.unwrap_or(DEFAULT_NAMESPACE);
        let data = self
            .secrets
            .get(&(namespace.to_owned(), name.to_owned()))
            .ok_or_else(|| SecretError::NotFound {
                namespace: namespace.to_owned(),
                name: name.to_owned(),
            })?;
        Ok(data.get(key).cloned())
    }
}
