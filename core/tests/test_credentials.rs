// Credential collection: legacy shapes, ordering, best-effort resolution.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use proptest::prelude::*;
    use serde_json::{json, Value};

    use remote_decrypt_core::constants::RESOLVER_WORKERS;
    use remote_decrypt_core::credentials::{
        collect_credentials, normalize_resource, Credential, CredentialDeclaration, DeclarationList,
        InvalidDeclaration, Resolution, SecretError, SecretResolver, StaticSecretResolver,
    };

    fn secret_ref(name: &str, key: &str) -> Value {
        json!({ "valueFrom": { "secretKeyRef": { "name": name, "namespace": "razee", "key": key } } })
    }

    fn expose(creds: &[Credential]) -> Vec<&str> {
        creds.iter().map(Credential::expose).collect()
    }

    /// Fails for one secret name, sleeps inversely to position for the rest.
    struct SlowResolver {
        calls: AtomicUsize,
    }

    impl SecretResolver for SlowResolver {
        fn resolve_secret(&self, name: &str, key: &str, _ns: Option<&str>) -> Result<Option<String>, SecretError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if name == "down" {
                return Err(SecretError::Unavailable("connection refused".into()));
            }
            let delay: u64 = key.parse().unwrap_or(0);
            thread::sleep(Duration::from_millis(delay));
            Ok(Some(format!("{name}-{key}")))
        }
    }

    #[test]
    fn lists_are_concatenated_keys_then_refs_then_passwords() {
        let resource = json!({
            "spec": {
                "keys": ["a"],
                "password": {
                    "passwordRefs": [secret_ref("vault-pw", "b")],
                    "passwords": ["c"]
                }
            }
        });
        let resolver = StaticSecretResolver::new().with_secret("razee", "vault-pw", "b", "b");

        let collected = collect_credentials(&resource, &resolver, false);
        assert_eq!(expose(&collected.credentials()), vec!["a", "b", "c"]);
        assert_eq!(collected.declared(), 3);
    }

    #[test]
    fn references_are_resolved_in_place() {
        let resource = json!({
            "spec": {
                "keys": ["first", secret_ref("s", "k"), "third"],
            }
        });
        let resolver = StaticSecretResolver::new().with_secret("razee", "s", "k", "second");

        let collected = collect_credentials(&resource, &resolver, false);
        assert_eq!(expose(&collected.credentials()), vec!["first", "second", "third"]);
    }

    #[test]
    fn empty_and_absent_resolutions_are_dropped_silently() {
        let resource = json!({
            "spec": {
                "keys": ["a", ""],
                "password": { "passwordRefs": [secret_ref("s", "empty"), secret_ref("s", "missing-key")] }
            }
        });
        let resolver = StaticSecretResolver::new().with_secret("razee", "s", "empty", "");

        let collected = collect_credentials(&resource, &resolver, false);
        assert_eq!(expose(&collected.credentials()), vec!["a"]);
        assert_eq!(collected.failures().count(), 0);
        assert_eq!(
            collected.outcomes().iter().filter(|o| o.resolution == Resolution::Empty).count(),
            3
        );
    }

    #[test]
    fn one_failing_reference_does_not_abort_collection() {
        let resource = json!({
            "spec": {
                "password": {
                    "passwordRefs": [secret_ref("down", "1"), secret_ref("up", "2")],
                    "passwords": ["inline"]
                }
            }
        });
        let resolver = SlowResolver { calls: AtomicUsize::new(0) };

        let collected = collect_credentials(&resource, &resolver, false);
        assert_eq!(expose(&collected.credentials()), vec!["up-2", "inline"]);

        let failures: Vec<_> = collected.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0.list, DeclarationList::PasswordRefs);
        assert_eq!(failures[0].0.index, 0);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn missing_secret_is_reported_as_not_found() {
        let resource = json!({ "spec": { "keys": [secret_ref("nope", "k")] } });
        let collected = collect_credentials(&resource, &StaticSecretResolver::new(), false);

        assert!(collected.credentials().is_empty());
        let (_, err) = collected.failures().next().unwrap();
        assert_eq!(
            err,
            &SecretError::NotFound { namespace: "razee".into(), name: "nope".into() }
        );
    }

    #[test]
    fn missing_lists_yield_an_empty_sequence() {
        let collected = collect_credentials(&json!({ "spec": {} }), &StaticSecretResolver::new(), false);
        assert_eq!(collected.declared(), 0);
        assert!(collected.credentials().is_empty());

        let collected = collect_credentials(&json!({}), &StaticSecretResolver::new(), true);
        assert_eq!(collected.declared(), 0);
    }

    #[test]
    fn reference_without_namespace_uses_resource_namespace() {
        let resource = json!({
            "metadata": { "namespace": "team-a" },
            "spec": { "keys": [{ "valueFrom": { "secretKeyRef": { "name": "s", "key": "k" } } }] }
        });

        let declarations = normalize_resource(&resource);
        match &declarations[0].declaration {
            Ok(CredentialDeclaration::ExternalReference(r)) => {
                assert_eq!(r.secret_namespace.as_deref(), Some("team-a"));
            }
            other => panic!("unexpected declaration: {other:?}"),
        }

        let resolver = StaticSecretResolver::new().with_secret("team-a", "s", "k", "pw");
        assert_eq!(expose(&collect_credentials(&resource, &resolver, false).credentials()), vec!["pw"]);
    }

    #[test]
    fn scalar_in_place_of_list_counts_as_one_item() {
        let resource = json!({ "spec": { "keys": "solo", "password": { "passwords": 1234 } } });
        let collected = collect_credentials(&resource, &StaticSecretResolver::new(), false);
        assert_eq!(expose(&collected.credentials()), vec!["solo", "1234"]);
    }

    #[test]
    fn object_with_value_is_inline() {
        let resource = json!({ "spec": { "password": { "passwordRefs": [{ "value": "literal" }] } } });
        let collected = collect_credentials(&resource, &StaticSecretResolver::new(), false);
        assert_eq!(expose(&collected.credentials()), vec!["literal"]);
    }

    #[test]
    fn malformed_declarations_are_skipped() {
        let resource = json!({
            "spec": {
                "keys": [
                    null,
                    { "valueFrom": { "secretKeyRef": { "key": "k" } } },
                    { "unrelated": true },
                    "ok"
                ]
            }
        });

        let collected = collect_credentials(&resource, &StaticSecretResolver::new(), false);
        assert_eq!(expose(&collected.credentials()), vec!["ok"]);

        let invalid: Vec<_> = collected
            .outcomes()
            .iter()
            .filter_map(|o| match &o.resolution {
                Resolution::Invalid(reason) => Some(reason.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            invalid,
            vec![
                InvalidDeclaration::Unsupported { kind: "null" },
                InvalidDeclaration::MissingField { field: "name" },
                InvalidDeclaration::Unsupported { kind: "object" },
            ]
        );
    }

    #[test]
    fn concurrent_resolution_keeps_declaration_order() {
        // Earlier declarations sleep longer, so they finish last.
        let resource = json!({
            "spec": {
                "keys": [secret_ref("s", "40"), "inline-1"],
                "password": {
                    "passwordRefs": [secret_ref("s", "20"), secret_ref("down", "0"), secret_ref("s", "0")],
                    "passwords": ["inline-2"]
                }
            }
        });
        let resolver = SlowResolver { calls: AtomicUsize::new(0) };

        let concurrent = collect_credentials(&resource, &resolver, true);
        let sequential = collect_credentials(&resource, &resolver, false);

        assert_eq!(
            expose(&concurrent.credentials()),
            vec!["s-40", "inline-1", "s-20", "s-0", "inline-2"]
        );
        assert_eq!(concurrent, sequential);
    }

    #[test]
    fn concurrent_resolution_uses_a_bounded_worker_set() {
        struct Gauge {
            in_flight: AtomicUsize,
            peak: AtomicUsize,
        }

        impl SecretResolver for Gauge {
            fn resolve_secret(&self, name: &str, _key: &str, _ns: Option<&str>) -> Result<Option<String>, SecretError> {
                let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                self.peak.fetch_max(now, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(10));
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(Some(name.to_string()))
            }
        }

        let names: Vec<String> = (0..RESOLVER_WORKERS * 3).map(|i| format!("s{i}")).collect();
        let refs: Vec<Value> = names.iter().map(|n| secret_ref(n, "k")).collect();
        let resource = json!({ "spec": { "keys": refs } });
        let gauge = Gauge { in_flight: AtomicUsize::new(0), peak: AtomicUsize::new(0) };

        let collected = collect_credentials(&resource, &gauge, true);

        let got: Vec<String> = collected.credentials().iter().map(|c| c.expose().to_string()).collect();
        assert_eq!(got, names);
        assert!(gauge.peak.load(Ordering::SeqCst) <= RESOLVER_WORKERS);
    }

    #[test]
    fn panicking_resolver_only_fails_its_declaration() {
        struct Flaky;
        impl SecretResolver for Flaky {
            fn resolve_secret(&self, name: &str, _key: &str, _ns: Option<&str>) -> Result<Option<String>, SecretError> {
                if name == "boom" {
                    panic!("resolver bug");
                }
                Ok(Some(name.to_string()))
            }
        }

        let resource = json!({ "spec": { "keys": [secret_ref("boom", "k"), secret_ref("fine", "k")] } });
        let collected = collect_credentials(&resource, &Flaky, true);

        assert_eq!(expose(&collected.credentials()), vec!["fine"]);
        let (_, err) = collected.failures().next().unwrap();
        assert_eq!(err, &SecretError::Panicked);
    }

    #[test]
    fn credential_equality_compares_secret_bytes() {
        assert_eq!(Credential::new("same"), Credential::new("same"));
        assert_ne!(Credential::new("same"), Credential::new("sane"));
        assert_ne!(Credential::new("same"), Credential::new("same-but-longer"));
        assert_ne!(Credential::new(""), Credential::new("x"));
    }

    #[test]
    fn credential_debug_is_redacted() {
        let c = Credential::new("hunter2");
        let shown = format!("{c:?}");
        assert!(!shown.contains("hunter2"));

        let decl = CredentialDeclaration::InlineValue(c);
        assert!(!format!("{decl:?}").contains("hunter2"));
    }

    proptest! {
        #[test]
        fn prop_inline_order_is_preserved(
            keys in prop::collection::vec("[a-z]{1,8}", 0..4),
            passwords in prop::collection::vec("[A-Z]{1,8}", 0..4),
        ) {
            let resource = json!({ "spec": { "keys": keys, "password": { "passwords": passwords } } });
            let collected = collect_credentials(&resource, &StaticSecretResolver::new(), false);

            let expected: Vec<String> = keys.iter().chain(passwords.iter()).cloned().collect();
            let got: Vec<String> = collected.credentials().iter().map(|c| c.expose().to_string()).collect();
            prop_assert_eq!(got, expected);
        }
    }
}
