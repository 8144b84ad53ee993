use base64::{engine::general_purpose::STANDARD, Engine};
use proptest::prelude::*;
use secdrop::envelope::MIN_ENVELOPE_LEN;
use secdrop::{encrypt_secure_drop, parse_payload, Envelope, PAYLOAD_PREFIX};

proptest! {
    #[test]
    fn parse_never_panics(input in ".*") {
        let _ = parse_payload(&input);
        let _ = parse_payload(&format!("{}{}", PAYLOAD_PREFIX, input));
    }

    #[test]
    fn parse_splits_any_large_enough_buffer(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let payload = format!("{}{}", PAYLOAD_PREFIX, STANDARD.encode(&bytes));
        match parse_payload(&payload) {
            None => prop_assert!(bytes.len() < MIN_ENVELOPE_LEN),
            Some(fields) => {
                prop_assert_eq!(fields.format_version, bytes[0]);
                prop_assert_eq!(fields.algo_version, bytes[1]);
                prop_assert_eq!(&fields.salt[..], &bytes[2..18]);
                prop_assert_eq!(&fields.nonce[..], &bytes[18..30]);
                prop_assert_eq!(fields.ciphertext_len, bytes.len() - MIN_ENVELOPE_LEN);
            }
        }
    }

    #[test]
    fn envelope_bytes_are_stable(
        version in any::<u8>(),
        algo in any::<u8>(),
        salt in any::<[u8; 16]>(),
        nonce in any::<[u8; 12]>(),
        ciphertext in proptest::collection::vec(any::<u8>(), 0..64),
        tag in any::<[u8; 16]>(),
    ) {
        let env = Envelope::from_parts(version, algo, salt, nonce, ciphertext, tag);
        let bytes = env.to_bytes();
        prop_assert_eq!(bytes.len(), env.byte_len());
        prop_assert_eq!(Envelope::from_bytes(&bytes).unwrap(), env);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn encrypted_length_tracks_utf8_length(secret in "\\PC{0,40}", passphrase in "\\PC{1,20}") {
        let payload = encrypt_secure_drop(&secret, &passphrase).unwrap();
        let fields = parse_payload(&payload).unwrap();
        prop_assert_eq!(fields.ciphertext_len, secret.len());
        prop_assert!(fields.is_current_format());
    }
}
