use weft_crypto::{
    decrypt, decrypt_string, encrypt, encrypt_string, generate_random_key, EncryptedData,
};

#[test]
fn encrypt_decrypt_roundtrip() {
    let key = generate_random_key();
    let plaintext = b"{\"apiKey\":\"abc123\"}";
    let encrypted = encrypt(&key, plaintext).unwrap();
    let decrypted = decrypt(&key, &encrypted).unwrap();
    assert_eq!(decrypted, plaintext);
}

#[test]
fn encrypt_decrypt_empty() {
    let key = generate_random_key();
    let encrypted = encrypt(&key, b"").unwrap();
    let decrypted = decrypt(&key, &encrypted).unwrap();
    assert_eq!(decrypted, b"");
}

#[test]
fn wrong_key_fails_decryption() {
    let key1 = generate_random_key();
    let key2 = generate_random_key();
    let encrypted = encrypt(&key1, b"secret").unwrap();
    assert!(decrypt(&key2, &encrypted).is_err());
}

#[test]
fn tampered_data_fails_decryption() {
    let key = generate_random_key();
    let mut encrypted = encrypt(&key, b"secret").unwrap();
    encrypted.ciphertext[0] ^= 0xFF;
    assert!(decrypt(&key, &encrypted).is_err());
}

#[test]
fn same_plaintext_produces_different_ciphertext() {
    let key = generate_random_key();
    let e1 = encrypt(&key, b"same").unwrap();
    let e2 = encrypt(&key, b"same").unwrap();
    assert_ne!(e1.nonce, e2.nonce);
    assert_ne!(e1.ciphertext, e2.ciphertext);
}

// ── String / base64 forms ────────────────────────────────────────

#[test]
fn string_roundtrip() {
    let key = generate_random_key();
    let encoded = encrypt_string(&key, "credentials go here").unwrap();
    assert_ne!(encoded, "credentials go here");
    let decoded = decrypt_string(&key, &encoded).unwrap();
    assert_eq!(decoded, "credentials go here");
}

#[test]
fn base64_roundtrip() {
    let key = generate_random_key();
    let encrypted = encrypt(&key, b"payload").unwrap();
    let encoded = encrypted.to_base64();
    let back = EncryptedData::from_base64(&encoded).unwrap();
    assert_eq!(back.nonce, encrypted.nonce);
    assert_eq!(back.ciphertext, encrypted.ciphertext);
}

#[test]
fn from_base64_rejects_invalid() {
    assert!(EncryptedData::from_base64("!!! not base64 !!!").is_err());
}

#[test]
fn from_base64_rejects_too_short() {
    use base64::{engine::general_purpose::STANDARD, Engine};
    let short = STANDARD.encode([0u8; 8]);
    assert!(EncryptedData::from_base64(&short).is_err());
}

#[test]
fn decrypt_string_rejects_wrong_key() {
    let key1 = generate_random_key();
    let key2 = generate_random_key();
    let encoded = encrypt_string(&key1, "secret").unwrap();
    assert!(decrypt_string(&key2, &encoded).is_err());
}
