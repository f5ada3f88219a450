use proptest::prelude::*;
use weft_crypto::{decrypt, encrypt, generate_random_key, EncryptedData};

proptest! {
    #[test]
    fn roundtrip_any_payload(payload in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let key = generate_random_key();
        let encrypted = encrypt(&key, &payload).unwrap();
        let decrypted = decrypt(&key, &encrypted).unwrap();
        prop_assert_eq!(decrypted, payload);
    }

    #[test]
    fn base64_roundtrip_any_payload(payload in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let key = generate_random_key();
        let encrypted = encrypt(&key, &payload).unwrap();
        let back = EncryptedData::from_base64(&encrypted.to_base64()).unwrap();
        prop_assert_eq!(decrypt(&key, &back).unwrap(), payload);
    }

    #[test]
    fn ciphertext_never_contains_long_plaintext_run(payload in proptest::collection::vec(any::<u8>(), 64..256)) {
        let key = generate_random_key();
        let encrypted = encrypt(&key, &payload).unwrap();
        // The stream cipher output must not embed the plaintext verbatim.
        let window = &payload[..32];
        let leaked = encrypted
            .ciphertext
            .windows(window.len())
            .any(|w| w == window);
        prop_assert!(!leaked);
    }
}
