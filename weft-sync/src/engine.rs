//! The sync engine: wiring for the reconciliation components.
//!
//! The engine owns no background machinery of its own: reconciliation runs
//! inside the call that triggered it, and the only task is the optional
//! periodic sweep (`spawn_sweep`).

use crate::catalog::CatalogStore;
use crate::config::SyncConfig;
use crate::deployment_store::DeploymentStore;
use crate::handler::HandlerRegistry;
use std::sync::Arc;
use weft_vault::{NetworkKeyring, VaultStore};

/// The engine — reconciles deployments across remote networks.
pub struct SyncEngine {
    /// Resource CRUD, consumed as a collaborator.
    pub(crate) catalog: Arc<dyn CatalogStore>,
    /// Per-(resource, network) reconciliation state.
    pub(crate) deployments: Arc<DeploymentStore>,
    /// Keyed store for secrets and handler bookkeeping.
    pub(crate) vault: Arc<VaultStore>,
    /// Credential sealing built on the vault.
    pub(crate) keyring: NetworkKeyring,
    /// Protocol handlers, resolved once at startup.
    pub(crate) handlers: Arc<HandlerRegistry>,
    /// Tunables.
    pub(crate) config: SyncConfig,
}

impl SyncEngine {
    /// Creates an engine with the default configuration.
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        deployments: Arc<DeploymentStore>,
        vault: Arc<VaultStore>,
        handlers: Arc<HandlerRegistry>,
    ) -> Self {
        Self::with_config(catalog, deployments, vault, handlers, SyncConfig::default())
    }

    /// Creates an engine with a custom configuration.
    pub fn with_config(
        catalog: Arc<dyn CatalogStore>,
        deployments: Arc<DeploymentStore>,
        vault: Arc<VaultStore>,
        handlers: Arc<HandlerRegistry>,
        config: SyncConfig,
    ) -> Self {
        let keyring = NetworkKeyring::new(vault.clone());
        Self {
            catalog,
            deployments,
            vault,
            keyring,
            handlers,
            config,
        }
    }

    /// Returns the catalog capability.
    pub fn catalog(&self) -> &Arc<dyn CatalogStore> {
        &self.catalog
    }

    /// Returns the deployment store.
    pub fn deployment_store(&self) -> &Arc<DeploymentStore> {
        &self.deployments
    }

    /// Returns the raw vault store (handler bookkeeping).
    pub fn vault(&self) -> &Arc<VaultStore> {
        &self.vault
    }

    /// Returns the credential keyring.
    pub fn keyring(&self) -> &NetworkKeyring {
        &self.keyring
    }

    /// Returns the handler registry.
    pub fn handlers(&self) -> &Arc<HandlerRegistry> {
        &self.handlers
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }
}
