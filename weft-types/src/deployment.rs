//! The Deployment record: per-(resource, network) reconciliation state.

use crate::ids::{ApplicationId, DeploymentId, DeviceId, DeviceProfileId, NetworkId};
use crate::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Meta key under which handlers record the resource's remote identifier.
pub const META_REMOTE_ID: &str = "remoteId";

/// Meta key marking the network a pulled change originated from.
///
/// Flagging operations skip the origin network's own deployment so an echoed
/// change does not loop straight back (one-hop rule only).
pub const META_ORIGIN: &str = "origin";

/// Where a deployment record sits relative to its remote counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    /// The resource exists locally and has never converged remotely.
    Created,
    /// The resource changed locally since it last converged.
    Updated,
    /// Local and remote representations match. Steady state.
    Synced,
    /// The resource was removed locally; the remote copy is pending teardown.
    Removed,
}

impl SyncStatus {
    /// Stable text form, used for persistence.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Updated => "UPDATED",
            Self::Synced => "SYNCED",
            Self::Removed => "REMOVED",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED" => Ok(Self::Created),
            "UPDATED" => Ok(Self::Updated),
            "SYNCED" => Ok(Self::Synced),
            "REMOVED" => Ok(Self::Removed),
            other => Err(Error::UnknownStatus(other.to_string())),
        }
    }
}

/// The kind of catalog resource a deployment tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    Application,
    Device,
    DeviceProfile,
}

impl ResourceKind {
    /// Stable text form, used for persistence.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "APPLICATION",
            Self::Device => "DEVICE",
            Self::DeviceProfile => "DEVICE_PROFILE",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APPLICATION" => Ok(Self::Application),
            "DEVICE" => Ok(Self::Device),
            "DEVICE_PROFILE" => Ok(Self::DeviceProfile),
            other => Err(Error::UnknownKind(other.to_string())),
        }
    }
}

/// Typed reference to the one catalog resource a deployment tracks.
///
/// A deployment points at exactly one of application, device or device
/// profile; the enum makes that invariant structural instead of three
/// nullable foreign keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceRef {
    Application(ApplicationId),
    Device(DeviceId),
    DeviceProfile(DeviceProfileId),
}

impl ResourceRef {
    /// The kind of resource referenced.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Application(_) => ResourceKind::Application,
            Self::Device(_) => ResourceKind::Device,
            Self::DeviceProfile(_) => ResourceKind::DeviceProfile,
        }
    }

    /// The referenced resource id as its UUID string (persistence form).
    #[must_use]
    pub fn id_string(&self) -> String {
        match self {
            Self::Application(id) => id.to_string(),
            Self::Device(id) => id.to_string(),
            Self::DeviceProfile(id) => id.to_string(),
        }
    }

    /// Rebuilds a reference from its persisted (kind, id) form.
    pub fn from_parts(kind: ResourceKind, id: &str) -> Result<Self, Error> {
        Ok(match kind {
            ResourceKind::Application => Self::Application(ApplicationId::parse(id)?),
            ResourceKind::Device => Self::Device(DeviceId::parse(id)?),
            ResourceKind::DeviceProfile => Self::DeviceProfile(DeviceProfileId::parse(id)?),
        })
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id_string())
    }
}

/// Reconciliation state for one (resource, network) pair.
///
/// At most one deployment exists per pair. The record is the pending-work
/// marker: a non-`Synced` status means the pair has not converged, and `logs`
/// carries one entry per failed attempt since the last convergence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: DeploymentId,
    pub status: SyncStatus,
    /// Sticky failure flag: set on a failed attempt, cleared on convergence.
    pub sync_failed: bool,
    /// Opaque handler bookkeeping (remote ids, origin flag, session hints).
    pub meta: Map<String, Value>,
    /// One error string per failed attempt, oldest first.
    pub logs: Vec<String>,
    pub resource: ResourceRef,
    pub network_id: NetworkId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deployment {
    /// Creates a fresh record in the given status with empty bookkeeping.
    pub fn new(resource: ResourceRef, network_id: NetworkId, status: SyncStatus) -> Self {
        let now = Utc::now();
        Self {
            id: DeploymentId::new(),
            status,
            sync_failed: false,
            meta: Map::new(),
            logs: Vec::new(),
            resource,
            network_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// The kind of resource this deployment tracks.
    #[must_use]
    pub fn resource_kind(&self) -> ResourceKind {
        self.resource.kind()
    }

    /// The remote identifier recorded by the handler, if any.
    #[must_use]
    pub fn remote_id(&self) -> Option<&str> {
        self.meta.get(META_REMOTE_ID).and_then(Value::as_str)
    }

    /// The origin network recorded on a pulled change, if any.
    #[must_use]
    pub fn origin_network(&self) -> Option<NetworkId> {
        self.meta
            .get(META_ORIGIN)
            .and_then(Value::as_str)
            .and_then(|s| NetworkId::parse(s).ok())
    }
}
