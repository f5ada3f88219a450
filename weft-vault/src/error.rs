//! Error types for the vault layer.

use thiserror::Error;

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// Errors that can occur in vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Database error.
    #[error("vault storage error: {0}")]
    Storage(String),

    /// No entry under the requested key.
    #[error("vault entry not found: {0}")]
    NotFound(String),

    /// Encryption/decryption failure.
    #[error("vault crypto error: {0}")]
    Crypto(#[from] weft_crypto::CryptoError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
