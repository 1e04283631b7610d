//! credentials/collect.rs
//! Resolves normalized declarations into an ordered credential list.
//!
//! Design:
//! - One outcome per declaration, in declaration order.
//! - Secret-store failures are recorded on the outcome and logged; they never
//!   stop collection of the remaining declarations.
//! - Concurrent mode feeds external lookups to at most `RESOLVER_WORKERS`
//!   scoped threads and reassembles results by position, so completion
//!   order cannot reorder credentials.

use std::panic::{self, AssertUnwindSafe};

use crossbeam::channel::unbounded;
use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::RESOLVER_WORKERS;
use crate::credentials::normalize::normalize_resource;
use crate::credentials::resolver::SecretResolver;
use crate::credentials::types::{
    CollectedCredentials, Credential, CredentialDeclaration, DeclarationOutcome,
    NormalizedDeclaration, Resolution, SecretError, SecretRef,
};

/// Read the declarations on `resource` and resolve them.
pub fn collect_credentials<R>(resource: &Value, resolver: &R, concurrent: bool) -> CollectedCredentials
where
    R: SecretResolver + ?Sized,
{
    resolve_declarations(normalize_resource(resource), resolver, concurrent)
}

pub fn resolve_declarations<R>(
    declarations: Vec<NormalizedDeclaration>,
    resolver: &R,
    concurrent: bool,
) -> CollectedCredentials
where
    R: SecretResolver + ?Sized,
{
    let external = declarations
        .iter()
        .filter(|d| matches!(d.declaration, Ok(CredentialDeclaration::ExternalReference(_))))
        .count();

    let outcomes = if concurrent && external > 1 {
        resolve_concurrently(&declarations, resolver)
    } else {
        declarations
            .iter()
            .map(|d| DeclarationOutcome {
                origin: d.origin,
                resolution: resolve_one(d, resolver),
            })
            .collect()
    };

    for outcome in &outcomes {
        log_outcome(outcome, &declarations);
    }

    let collected = CollectedCredentials::new(outcomes);
    debug!(
        declared = collected.declared(),
        resolved = collected.resolved(),
        "credentials collected"
    );
    collected
}

fn resolve_one<R>(declaration: &NormalizedDeclaration, resolver: &R) -> Resolution
where
    R: SecretResolver + ?Sized,
{
    match &declaration.declaration {
        Ok(CredentialDeclaration::InlineValue(value)) => inline(value),
        Ok(CredentialDeclaration::ExternalReference(secret)) => resolve_reference(resolver, secret),
        Err(invalid) => Resolution::Invalid(invalid.clone()),
    }
}

fn inline(value: &Credential) -> Resolution {
    if value.is_empty() {
        Resolution::Empty
    } else {
        Resolution::Resolved(value.clone())
    }
}

fn resolve_reference<R>(resolver: &R, secret: &SecretRef) -> Resolution
where
    R: SecretResolver + ?Sized,
{
    match resolver.resolve_secret(&secret.secret_name, &secret.key, secret.secret_namespace.as_deref()) {
        Ok(Some(value)) if !value.is_empty() => Resolution::Resolved(Credential::new(value)),
        Ok(_) => Resolution::Empty,
        Err(e) => Resolution::Failed(e),
    }
}

fn resolve_concurrently<R>(declarations: &[NormalizedDeclaration], resolver: &R) -> Vec<DeclarationOutcome>
where
    R: SecretResolver + ?Sized,
{
    let mut slots: Vec<Option<Resolution>> = vec![None; declarations.len()];

    let (job_tx, job_rx) = unbounded::<(usize, &SecretRef)>();
    for (pos, d) in declarations.iter().enumerate() {
        match &d.declaration {
            Ok(CredentialDeclaration::ExternalReference(secret)) => {
                // Receiver is alive until the scope below ends.
                let _ = job_tx.send((pos, secret));
            }
            _ => slots[pos] = Some(resolve_one(d, resolver)),
        }
    }
    let workers = job_tx.len().min(RESOLVER_WORKERS);
    drop(job_tx);

    let (out_tx, out_rx) = unbounded::<(usize, Resolution)>();
    let joined = crossbeam::thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let out_tx = out_tx.clone();
            scope.spawn(move |_| {
                for (pos, secret) in job_rx.iter() {
                    let resolution = panic::catch_unwind(AssertUnwindSafe(|| resolve_reference(resolver, secret)))
                        .unwrap_or(Resolution::Failed(SecretError::Panicked));
                    if out_tx.send((pos, resolution)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(out_tx);

    if joined.is_err() {
        warn!("secret resolution worker terminated abnormally");
    }
    for (pos, resolution) in out_rx.try_iter() {
        slots[pos] = Some(resolution);
    }

    declarations
        .iter()
        .zip(slots)
        .map(|(d, slot)| DeclarationOutcome {
            origin: d.origin,
            resolution: slot.unwrap_or(Resolution::Failed(SecretError::Panicked)),
        })
        .collect()
}

fn log_outcome(outcome: &DeclarationOutcome, declarations: &[NormalizedDeclaration]) {
    match &outcome.resolution {
        Resolution::Failed(error) => {
            let secret = declarations
                .iter()
                .find(|d| d.origin == outcome.origin)
                .and_then(|d| match &d.declaration {
                    Ok(CredentialDeclaration::ExternalReference(secret)) => Some(secret),
                    _ => None,
                });
            warn!(
                origin = %outcome.origin,
                secret_name = secret.map(|s| s.secret_name.as_str()),
                secret_namespace = secret.and_then(|s| s.secret_namespace.as_deref()),
                secret_key = secret.map(|s| s.key.as_str()),
                error = %error,
                "secret resolution failed, skipping declaration"
            );
        }
        Resolution::Invalid(reason) => {
            warn!(origin = %outcome.origin, reason = %reason, "invalid credential declaration, skipping");
        }
        Resolution::Empty => {
            debug!(origin = %outcome.origin, "credential declaration resolved to an empty value");
        }
        Resolution::Resolved(_) => {}
    }
}
