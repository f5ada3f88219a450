//! Network credential lifecycle on top of the catalog and the vault.
//!
//! Plaintext credentials exist only on transient `Network` copies produced by
//! `load_network`; every record that reaches the catalog carries ciphertext.

use crate::engine::SyncEngine;
use crate::error::{SyncError, SyncResult};
use tracing::{debug, info};
use weft_types::{Network, NetworkId};

impl SyncEngine {
    /// Creates a network: issues its vault key, seals the supplied plaintext
    /// credentials and persists the sealed record. Returns the stored form.
    pub async fn create_network(&self, mut network: Network) -> SyncResult<Network> {
        self.keyring.issue(&network.id, &network.protocol_id)?;
        if let Some(plaintext) = network.security_data.take() {
            network.security_data =
                Some(self.keyring.seal(&network.id, &network.protocol_id, &plaintext)?);
        }
        self.catalog.insert_network(&network).await?;
        info!("created network {} ({})", network.name, network.id);
        Ok(network)
    }

    /// Loads a network with credentials opened into a transient plaintext
    /// copy. The copy must never be handed back to the catalog.
    pub async fn load_network(&self, id: &NetworkId) -> SyncResult<Network> {
        let mut network = self.catalog.load_network(id).await?;
        if let Some(ciphertext) = network.security_data.take() {
            network.security_data =
                Some(self.keyring.open(&network.id, &network.protocol_id, &ciphertext)?);
        }
        Ok(network)
    }

    /// Replaces a network's credentials, sealing before persistence.
    ///
    /// Fresh credentials must pass connect/test again, so the authorized flag
    /// is cleared; the next reconciliation attempt re-authorizes.
    pub async fn update_network_credentials(
        &self,
        id: &NetworkId,
        plaintext: Option<&str>,
    ) -> SyncResult<()> {
        let mut network = self.catalog.load_network(id).await?;
        network.security_data = match plaintext {
            Some(p) => Some(self.keyring.seal(&network.id, &network.protocol_id, p)?),
            None => None,
        };
        network.authorized = false;
        self.catalog.update_network(&network).await?;
        Ok(())
    }

    /// Deletes a network and purges every vault entry it owned.
    pub async fn remove_network(&self, id: &NetworkId) -> SyncResult<()> {
        let network = self.catalog.load_network(id).await?;
        self.catalog.delete_network(id).await?;
        let purged = self.keyring.purge(id, &network.protocol_id)?;
        debug!("removed network {id}, purged {purged} vault entries");
        Ok(())
    }

    /// Runs the handler's pull against a network, ingesting remotely-
    /// originated state. The resource layer applies what the handler pulled;
    /// changes it re-announces carry this network as origin so flagging skips
    /// the immediate echo.
    pub async fn pull_network(&self, id: &NetworkId) -> SyncResult<()> {
        let network = self.load_network(id).await?;
        let handler = self.handlers.resolve(&network.protocol_id)?;
        handler.pull_network(&network).await
    }

    /// Attempts to (re)authorize a network: connect, then test. Persists the
    /// authorized flag on success. `network` is a transient plaintext copy;
    /// the flag is written onto the freshly loaded catalog record so no
    /// plaintext leaks back into storage.
    pub(crate) async fn authorize_network(&self, network: &mut Network) -> SyncResult<()> {
        let handler = self.handlers.resolve(&network.protocol_id)?;
        handler
            .connect(network)
            .await
            .map_err(|e| SyncError::Unauthorized(format!("connect failed: {e}")))?;
        handler
            .test(network)
            .await
            .map_err(|e| SyncError::Unauthorized(format!("test failed: {e}")))?;

        network.authorized = true;
        let mut stored = self.catalog.load_network(&network.id).await?;
        stored.authorized = true;
        self.catalog.update_network(&stored).await?;
        info!("network {} authorized", network.name);
        Ok(())
    }
}
