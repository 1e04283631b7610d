//! credentials/normalize.rs
//! Adapter from the legacy resource shapes to `CredentialDeclaration`s.
//!
//! Three lists are read, in this order: `spec.keys`, `spec.password.passwordRefs`,
//! `spec.password.passwords`. A missing list is empty; a scalar or object in
//! place of a list counts as a one-element list.

use serde_json::Value;

use crate::constants::resource_paths;
use crate::credentials::types::{
    Credential, CredentialDeclaration, DeclarationList, DeclarationOrigin, InvalidDeclaration,
    NormalizedDeclaration, SecretRef,
};

const LISTS: [(DeclarationList, &[&str]); 3] = [
    (DeclarationList::Keys, resource_paths::KEYS),
    (DeclarationList::PasswordRefs, resource_paths::PASSWORD_REFS),
    (DeclarationList::Passwords, resource_paths::PASSWORDS),
];

/// Walk `path` through nested objects.
pub fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(*key))
}

/// Normalize every declaration on `resource`, preserving list order then
/// position. References without a namespace inherit `metadata.namespace`.
pub fn normalize_resource(resource: &Value) -> Vec<NormalizedDeclaration> {
    let default_namespace = lookup(resource, resource_paths::NAMESPACE).and_then(Value::as_str);

    let mut out = Vec::new();
    for (list, path) in LISTS {
        for (index, item) in list_items(lookup(resource, path)).into_iter().enumerate() {
            out.push(NormalizedDeclaration {
                origin: DeclarationOrigin { list, index },
                declaration: normalize_item(item, default_namespace),
            });
        }
    }
    out
}

fn list_items(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}

pub fn normalize_item(
    item: &Value,
    default_namespace: Option<&str>,
) -> Result<CredentialDeclaration, InvalidDeclaration> {
    match item {
        Value::String(s) => Ok(CredentialDeclaration::InlineValue(Credential::new(s.as_str()))),
        Value::Number(n) => Ok(CredentialDeclaration::InlineValue(Credential::new(n.to_string()))),
        Value::Bool(b) => Ok(CredentialDeclaration::InlineValue(Credential::new(b.to_string()))),
        Value::Object(_) => normalize_object(item, default_namespace),
        Value::Array(_) => Err(InvalidDeclaration::Unsupported { kind: "array" }),
        Value::Null => Err(InvalidDeclaration::Unsupported { kind: "null" }),
    }
}

fn normalize_object(
    item: &Value,
    default_namespace: Option<&str>,
) -> Result<CredentialDeclaration, InvalidDeclaration> {
    if let Some(key_ref) = lookup(item, resource_paths::SECRET_KEY_REF) {
        let secret_name = required_str(key_ref, "name")?;
        let key = required_str(key_ref, "key")?;
        let secret_namespace = key_ref
            .get("namespace")
            .and_then(Value::as_str)
            .or(default_namespace)
            .map(str::to_owned);

        return Ok(CredentialDeclaration::ExternalReference(SecretRef {
            secret_name,
            secret_namespace,
            key,
        }));
    }

    match item.get("value") {
        Some(Value::String(s)) => Ok(CredentialDeclaration::InlineValue(Credential::new(s.as_str()))),
        _ => Err(InvalidDeclaration::Unsupported { kind: "object" }),
    }
}

fn required_str(value: &Value, field: &'static str) -> Result<String, InvalidDeclaration> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or(InvalidDeclaration::MissingField { field })
}
