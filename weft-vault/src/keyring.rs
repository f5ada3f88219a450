//! Network credential sealing on top of the vault store.
//!
//! Each network is issued a fresh symmetric key at creation time, stored
//! under a reserved identifier derived from the network id. `security_data`
//! is sealed under that key before it ever reaches a catalog record and
//! opened transiently on load. Key lifecycle is decoupled from the network
//! record's own lifecycle: deleting the record and purging the keys are
//! separate steps.

use crate::error::{VaultError, VaultResult};
use crate::store::VaultStore;
use std::sync::Arc;
use weft_crypto::{decrypt_string, encrypt_string, generate_random_key, SecretKey};
use weft_types::{NetworkId, ProtocolId};

/// Reserved identifier prefix for network keys. Handlers must not use it.
pub const NETWORK_KEY_PREFIX: &str = "network-key:";

/// Issues, loads and applies per-network credential keys.
#[derive(Clone)]
pub struct NetworkKeyring {
    store: Arc<VaultStore>,
}

impl NetworkKeyring {
    /// Creates a keyring over the given vault store.
    pub fn new(store: Arc<VaultStore>) -> Self {
        Self { store }
    }

    fn key_identifier(network_id: &NetworkId) -> String {
        format!("{NETWORK_KEY_PREFIX}{network_id}")
    }

    /// Issues a fresh key for a network and stores it in the vault.
    ///
    /// Replaces any previously issued key, so only call this at network
    /// creation; re-issuing orphans existing ciphertext.
    pub fn issue(&self, network_id: &NetworkId, protocol_id: &ProtocolId) -> VaultResult<SecretKey> {
        let key = generate_random_key();
        self.store.upsert(
            network_id,
            protocol_id,
            &Self::key_identifier(network_id),
            &key.to_base64(),
        )?;
        Ok(key)
    }

    /// Loads the network's key from the vault.
    pub fn load_key(&self, network_id: &NetworkId, protocol_id: &ProtocolId) -> VaultResult<SecretKey> {
        let encoded =
            self.store
                .load_value(network_id, protocol_id, &Self::key_identifier(network_id))?;
        Ok(SecretKey::from_base64(&encoded)?)
    }

    /// Seals plaintext credentials under the network's key.
    pub fn seal(
        &self,
        network_id: &NetworkId,
        protocol_id: &ProtocolId,
        plaintext: &str,
    ) -> VaultResult<String> {
        let key = self.load_key(network_id, protocol_id)?;
        Ok(encrypt_string(&key, plaintext)?)
    }

    /// Opens sealed credentials back into plaintext.
    pub fn open(
        &self,
        network_id: &NetworkId,
        protocol_id: &ProtocolId,
        ciphertext: &str,
    ) -> VaultResult<String> {
        let key = self.load_key(network_id, protocol_id)?;
        Ok(decrypt_string(&key, ciphertext)?)
    }

    /// Removes every vault entry for the network, its key and any handler
    /// bookkeeping included. Called when the network record is deleted.
    /// Returns the number of entries removed.
    pub fn purge(&self, network_id: &NetworkId, protocol_id: &ProtocolId) -> VaultResult<usize> {
        self.store.clear_by_prefix(network_id, protocol_id, "")
    }

    /// Whether a key has been issued for the network.
    pub fn has_key(&self, network_id: &NetworkId, protocol_id: &ProtocolId) -> VaultResult<bool> {
        match self
            .store
            .load_value(network_id, protocol_id, &Self::key_identifier(network_id))
        {
            Ok(_) => Ok(true),
            Err(VaultError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
