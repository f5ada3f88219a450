//! Encryption primitives for Weft.
//!
//! Network credentials (`security_data`) are sealed with ChaCha20-Poly1305
//! under a random per-network key held in the vault. This crate provides the
//! AEAD primitives and the key type; key storage and lookup live in
//! `weft-vault`.

mod cipher;
mod error;
mod key;

pub use cipher::{
    decrypt, decrypt_string, encrypt, encrypt_string, EncryptedData, NONCE_SIZE, TAG_SIZE,
};
pub use error::{CryptoError, CryptoResult};
pub use key::{generate_random_key, SecretKey, KEY_SIZE};
