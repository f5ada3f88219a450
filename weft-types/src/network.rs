//! Network and network-type records.

use crate::ids::{NetworkId, NetworkTypeId, ProtocolId};
use serde::{Deserialize, Serialize};

/// A group of networks sharing a protocol family.
///
/// The network type is the unit over which fan-out occurs: a resource linked
/// to a type is deployed to every enabled network of that type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkType {
    pub id: NetworkTypeId,
    pub name: String,
}

impl NetworkType {
    /// Creates a new network type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NetworkTypeId::new(),
            name: name.into(),
        }
    }
}

/// One configured remote backend instance.
///
/// `security_data` holds the credentials needed to talk to the backend. At
/// rest (and on every record persisted through the catalog) it is ciphertext
/// sealed under the network's vault key; the engine opens it into a transient
/// in-memory copy when the network is loaded for reconciliation. A `Network`
/// value with plaintext credentials must never be handed back to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub id: NetworkId,
    pub name: String,
    /// Base URL of the remote backend's API.
    pub base_url: String,
    /// Disabled networks are skipped by fan-out.
    pub enabled: bool,
    pub network_type_id: NetworkTypeId,
    /// Selects the protocol handler from the registry.
    pub protocol_id: ProtocolId,
    /// Credentials: ciphertext at rest, plaintext only in transient copies.
    pub security_data: Option<String>,
    /// Whether the last connect/test cycle against the backend succeeded.
    pub authorized: bool,
}

impl Network {
    /// Creates an enabled, unauthorized network with no credentials.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        network_type_id: NetworkTypeId,
        protocol_id: ProtocolId,
    ) -> Self {
        Self {
            id: NetworkId::new(),
            name: name.into(),
            base_url: base_url.into(),
            enabled: true,
            network_type_id,
            protocol_id,
            security_data: None,
            authorized: false,
        }
    }
}
