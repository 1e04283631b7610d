#[cfg(test)]
mod tests {
    use remote_decrypt_core::credentials::Credential;
    use remote_decrypt_core::crypto::{decrypt_pgp, encrypt_pgp, BatchPassphraseCipher, CryptoError, OpenPgp, PgpFormat};

    const PLAINTEXT: &[u8] = b"kind: Secret\ndata:\n  token: abc\n";

    fn creds(values: &[&str]) -> Vec<Credential> {
        values.iter().map(|v| Credential::new(*v)).collect()
    }

    #[test]
    fn format_follows_binary_flag() {
        assert_eq!(PgpFormat::from_binary_flag(true), PgpFormat::Binary);
        assert_eq!(PgpFormat::from_binary_flag(false), PgpFormat::Armored);
    }

    #[test]
    fn binary_round_trip_single_passphrase() {
        let payload = encrypt_pgp(PLAINTEXT, &Credential::new("pgp-pass")).unwrap();
        let plain = decrypt_pgp(&payload, PgpFormat::Binary, &creds(&["pgp-pass"])).unwrap();
        assert_eq!(plain, PLAINTEXT);
    }

    #[test]
    fn correct_passphrase_anywhere_in_list_opens_message() {
        let payload = encrypt_pgp(PLAINTEXT, &Credential::new("third")).unwrap();
        let plain = OpenPgp
            .decrypt_batch(&payload, true, &creds(&["first", "second", "third"]))
            .unwrap();
        assert_eq!(plain, PLAINTEXT);
    }

    #[test]
    fn wrong_passphrases_only_fail() {
        let payload = encrypt_pgp(PLAINTEXT, &Credential::new("right")).unwrap();
        let err = OpenPgp.decrypt_batch(&payload, true, &creds(&["nope", "still-nope"])).unwrap_err();
        assert!(matches!(err, CryptoError::Pgp(_)));
    }

    #[test]
    fn empty_passphrase_list_is_rejected_before_parsing() {
        assert_eq!(
            decrypt_pgp(b"not even pgp", PgpFormat::Binary, &[]),
            Err(CryptoError::NoPassphrases)
        );
    }

    #[test]
    fn garbage_payload_fails_in_both_formats() {
        let pw = creds(&["pw"]);
        assert!(matches!(decrypt_pgp(b"\x00\x01garbage", PgpFormat::Binary, &pw), Err(CryptoError::Pgp(_))));
        assert!(matches!(
            decrypt_pgp(b"this is not ascii armor", PgpFormat::Armored, &pw),
            Err(CryptoError::Pgp(_))
        ));
    }

    #[test]
    fn binary_payload_is_not_read_as_armor() {
        let payload = encrypt_pgp(PLAINTEXT, &Credential::new("pw")).unwrap();
        assert!(OpenPgp.decrypt_batch(&payload, false, &creds(&["pw"])).is_err());
    }
}
