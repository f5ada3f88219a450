//! Protocol handler abstraction and registry.
//!
//! One handler implementation exists per remote network technology. Handlers
//! are resolved from a static registry built at startup; the registry key is
//! the `ProtocolId` stored on the network record.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use weft_types::{Deployment, Network, ProtocolId};

/// Opaque bookkeeping a handler returns from a successful sync call.
///
/// Persisted verbatim on the deployment record; typical contents are the
/// resource's remote identifier and whatever session hints the handler wants
/// back on the next call.
pub type HandlerMeta = serde_json::Map<String, serde_json::Value>;

/// One remote network technology.
///
/// Handlers receive networks with `security_data` already opened to
/// plaintext; they never touch the vault key material. All calls may be
/// retried: the engine guarantees at-least-once delivery, so handlers must
/// tolerate re-syncing an already-present resource.
#[async_trait]
pub trait ProtocolHandler: Send + Sync {
    /// Symbolic name for logs and diagnostics.
    fn protocol_name(&self) -> &'static str;

    /// Establishes a session with the remote backend.
    async fn connect(&self, network: &Network) -> SyncResult<()>;

    /// Verifies the session actually works (cheap authenticated call).
    async fn test(&self, network: &Network) -> SyncResult<()>;

    /// Converges one application deployment; returns bookkeeping to persist.
    async fn sync_application(
        &self,
        network: &Network,
        deployment: &Deployment,
    ) -> SyncResult<HandlerMeta>;

    /// Converges one device deployment; returns bookkeeping to persist.
    async fn sync_device(
        &self,
        network: &Network,
        deployment: &Deployment,
    ) -> SyncResult<HandlerMeta>;

    /// Converges one device-profile deployment; returns bookkeeping to persist.
    async fn sync_device_profile(
        &self,
        network: &Network,
        deployment: &Deployment,
    ) -> SyncResult<HandlerMeta>;

    /// Ingests remotely-originated state for the resource layer to apply.
    async fn pull_network(&self, network: &Network) -> SyncResult<()>;
}

/// Static map from protocol identifier to handler implementation.
///
/// Built once at startup; resolution of an unregistered protocol is a
/// structural `NotFound`, not a retryable handler failure.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<ProtocolId, Arc<dyn ProtocolHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under a protocol identifier, replacing any
    /// previous registration for that identifier.
    pub fn register(&mut self, protocol_id: ProtocolId, handler: Arc<dyn ProtocolHandler>) {
        self.handlers.insert(protocol_id, handler);
    }

    /// Resolves the handler for a protocol.
    pub fn resolve(&self, protocol_id: &ProtocolId) -> SyncResult<Arc<dyn ProtocolHandler>> {
        self.handlers
            .get(protocol_id)
            .cloned()
            .ok_or_else(|| SyncError::NotFound(format!("protocol handler: {protocol_id}")))
    }

    /// Returns the registered protocol identifiers.
    pub fn protocols(&self) -> impl Iterator<Item = &ProtocolId> {
        self.handlers.keys()
    }
}
