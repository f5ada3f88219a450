//! Local catalog resources: applications, devices, device profiles.
//!
//! These records are owned by the platform's resource layer; the engine only
//! reads them (through the catalog capability) to decide what to deploy where.

use crate::ids::{ApplicationId, DeviceId, DeviceProfileId, NetworkTypeId};
use serde::{Deserialize, Serialize};

/// An application grouping devices, linked to one network type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub name: String,
    pub network_type_id: NetworkTypeId,
}

impl Application {
    pub fn new(name: impl Into<String>, network_type_id: NetworkTypeId) -> Self {
        Self {
            id: ApplicationId::new(),
            name: name.into(),
            network_type_id,
        }
    }
}

/// A device profile describing a class of devices, linked to one network type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub id: DeviceProfileId,
    pub name: String,
    pub network_type_id: NetworkTypeId,
}

impl DeviceProfile {
    pub fn new(name: impl Into<String>, network_type_id: NetworkTypeId) -> Self {
        Self {
            id: DeviceProfileId::new(),
            name: name.into(),
            network_type_id,
        }
    }
}

/// A device, owned by an application and described by a device profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub application_id: ApplicationId,
    pub device_profile_id: DeviceProfileId,
}

impl Device {
    pub fn new(
        name: impl Into<String>,
        application_id: ApplicationId,
        device_profile_id: DeviceProfileId,
    ) -> Self {
        Self {
            id: DeviceId::new(),
            name: name.into(),
            application_id,
            device_profile_id,
        }
    }
}
