//! Error types for the sync engine.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// No matching record.
    #[error("not found: {0}")]
    NotFound(String),

    /// Attempt to change an immutable link target.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Network not yet authorized against its backend. Triggers a connect
    /// attempt during reconciliation; not fatal to the triggering caller.
    #[error("network not authorized: {0}")]
    Unauthorized(String),

    /// Opaque failure from a protocol handler call.
    #[error("handler error: {0}")]
    Handler(String),

    /// Uniqueness violation on the (resource, network) pair.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Database error.
    #[error("storage error: {0}")]
    Storage(String),

    /// Vault error.
    #[error("vault error: {0}")]
    Vault(#[from] weft_vault::VaultError),

    /// Encryption/decryption error.
    #[error("crypto error: {0}")]
    Crypto(#[from] weft_crypto::CryptoError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
