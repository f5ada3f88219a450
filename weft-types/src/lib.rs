//! Core type definitions for Weft.
//!
//! This crate defines the fundamental, backend-agnostic types used throughout
//! the reconciliation engine:
//! - Network, resource and deployment identifiers (UUID v7)
//! - Catalog records (Network, NetworkType, Application, Device, DeviceProfile)
//! - The Deployment record and its status machine
//!
//! Anything specific to one remote network technology belongs in that
//! network's protocol handler, not here.

mod deployment;
mod ids;
mod network;
mod resource;

pub use deployment::{Deployment, ResourceKind, ResourceRef, SyncStatus, META_ORIGIN, META_REMOTE_ID};
pub use ids::{ApplicationId, DeploymentId, DeviceId, DeviceProfileId, NetworkId, NetworkTypeId, ProtocolId};
pub use network::{Network, NetworkType};
pub use resource::{Application, Device, DeviceProfile};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("unknown sync status: {0}")]
    UnknownStatus(String),

    #[error("unknown resource kind: {0}")]
    UnknownKind(String),
}
