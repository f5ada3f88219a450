//! Catalog capability — the resource CRUD layer consumed as a collaborator.
//!
//! The engine never owns application/device/profile/network persistence; it
//! reads the catalog to decide what to deploy where, and writes networks only
//! to persist sealed credentials and the authorized flag. `MemoryCatalog`
//! ships as the embeddable implementation for tests and small hosts.

use crate::error::{SyncError, SyncResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use weft_types::{
    Application, ApplicationId, Device, DeviceId, DeviceProfile, DeviceProfileId, Network,
    NetworkId, NetworkTypeId,
};

/// A window into a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

impl PageRequest {
    /// The first page with the given size.
    #[must_use]
    pub fn first(limit: usize) -> Self {
        Self { limit, offset: 0 }
    }

    /// The page after this one.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset + self.limit,
        }
    }
}

/// One page of results plus the total count across all pages.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Page<T> {
    /// Whether this page is the last one for the given request.
    #[must_use]
    pub fn is_last(&self, request: &PageRequest) -> bool {
        self.items.is_empty() || request.offset + self.items.len() >= self.total
    }
}

/// Resource CRUD consumed by the engine.
///
/// Listing order must be stable across calls so pagination does not skip or
/// repeat items while a walk is in progress.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Loads a network record (credentials sealed).
    async fn load_network(&self, id: &NetworkId) -> SyncResult<Network>;

    /// Lists every network of a type, enabled or not.
    async fn list_networks_by_type(
        &self,
        network_type_id: &NetworkTypeId,
    ) -> SyncResult<Vec<Network>>;

    /// Persists a new network record.
    async fn insert_network(&self, network: &Network) -> SyncResult<()>;

    /// Replaces an existing network record.
    async fn update_network(&self, network: &Network) -> SyncResult<()>;

    /// Deletes a network record.
    async fn delete_network(&self, id: &NetworkId) -> SyncResult<()>;

    async fn load_application(&self, id: &ApplicationId) -> SyncResult<Application>;

    async fn load_device(&self, id: &DeviceId) -> SyncResult<Device>;

    async fn load_device_profile(&self, id: &DeviceProfileId) -> SyncResult<DeviceProfile>;

    /// Applications linked to a network type, paginated.
    async fn list_applications(
        &self,
        network_type_id: &NetworkTypeId,
        page: PageRequest,
    ) -> SyncResult<Page<Application>>;

    /// Device profiles linked to a network type, paginated.
    async fn list_device_profiles(
        &self,
        network_type_id: &NetworkTypeId,
        page: PageRequest,
    ) -> SyncResult<Page<DeviceProfile>>;

    /// Devices owned by an application, paginated.
    async fn list_devices_by_application(
        &self,
        application_id: &ApplicationId,
        page: PageRequest,
    ) -> SyncResult<Page<Device>>;

    /// Devices described by a device profile, paginated.
    async fn list_devices_by_profile(
        &self,
        device_profile_id: &DeviceProfileId,
        page: PageRequest,
    ) -> SyncResult<Page<Device>>;
}

/// In-memory catalog backed by ordered maps.
///
/// BTreeMaps give the stable iteration order the pagination contract needs.
#[derive(Default)]
pub struct MemoryCatalog {
    networks: RwLock<BTreeMap<NetworkId, Network>>,
    applications: RwLock<BTreeMap<ApplicationId, Application>>,
    devices: RwLock<BTreeMap<DeviceId, Device>>,
    device_profiles: RwLock<BTreeMap<DeviceProfileId, DeviceProfile>>,
}

impl MemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an application to the catalog.
    pub async fn insert_application(&self, application: Application) {
        self.applications
            .write()
            .await
            .insert(application.id, application);
    }

    /// Adds a device to the catalog.
    pub async fn insert_device(&self, device: Device) {
        self.devices.write().await.insert(device.id, device);
    }

    /// Adds a device profile to the catalog.
    pub async fn insert_device_profile(&self, profile: DeviceProfile) {
        self.device_profiles
            .write()
            .await
            .insert(profile.id, profile);
    }

    /// Removes an application from the catalog.
    pub async fn remove_application(&self, id: &ApplicationId) {
        self.applications.write().await.remove(id);
    }

    /// Removes a device from the catalog.
    pub async fn remove_device(&self, id: &DeviceId) {
        self.devices.write().await.remove(id);
    }

    /// Removes a device profile from the catalog.
    pub async fn remove_device_profile(&self, id: &DeviceProfileId) {
        self.device_profiles.write().await.remove(id);
    }
}

fn paginate<T: Clone>(matching: Vec<&T>, page: PageRequest) -> Page<T> {
    let total = matching.len();
    let items = matching
        .into_iter()
        .skip(page.offset)
        .take(page.limit)
        .cloned()
        .collect();
    Page { items, total }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn load_network(&self, id: &NetworkId) -> SyncResult<Network> {
        self.networks
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SyncError::NotFound(format!("network: {id}")))
    }

    async fn list_networks_by_type(
        &self,
        network_type_id: &NetworkTypeId,
    ) -> SyncResult<Vec<Network>> {
        Ok(self
            .networks
            .read()
            .await
            .values()
            .filter(|n| n.network_type_id == *network_type_id)
            .cloned()
            .collect())
    }

    async fn insert_network(&self, network: &Network) -> SyncResult<()> {
        let mut networks = self.networks.write().await;
        if networks.contains_key(&network.id) {
            return Err(SyncError::Conflict(format!("network: {}", network.id)));
        }
        networks.insert(network.id, network.clone());
        Ok(())
    }

    async fn update_network(&self, network: &Network) -> SyncResult<()> {
        let mut networks = self.networks.write().await;
        if !networks.contains_key(&network.id) {
            return Err(SyncError::NotFound(format!("network: {}", network.id)));
        }
        networks.insert(network.id, network.clone());
        Ok(())
    }

    async fn delete_network(&self, id: &NetworkId) -> SyncResult<()> {
        self.networks
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| SyncError::NotFound(format!("network: {id}")))
    }

    async fn load_application(&self, id: &ApplicationId) -> SyncResult<Application> {
        self.applications
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SyncError::NotFound(format!("application: {id}")))
    }

    async fn load_device(&self, id: &DeviceId) -> SyncResult<Device> {
        self.devices
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SyncError::NotFound(format!("device: {id}")))
    }

    async fn load_device_profile(&self, id: &DeviceProfileId) -> SyncResult<DeviceProfile> {
        self.device_profiles
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SyncError::NotFound(format!("device profile: {id}")))
    }

    async fn list_applications(
        &self,
        network_type_id: &NetworkTypeId,
        page: PageRequest,
    ) -> SyncResult<Page<Application>> {
        let applications = self.applications.read().await;
        let matching: Vec<&Application> = applications
            .values()
            .filter(|a| a.network_type_id == *network_type_id)
            .collect();
        Ok(paginate(matching, page))
    }

    async fn list_device_profiles(
        &self,
        network_type_id: &NetworkTypeId,
        page: PageRequest,
    ) -> SyncResult<Page<DeviceProfile>> {
        let profiles = self.device_profiles.read().await;
        let matching: Vec<&DeviceProfile> = profiles
            .values()
            .filter(|p| p.network_type_id == *network_type_id)
            .collect();
        Ok(paginate(matching, page))
    }

    async fn list_devices_by_application(
        &self,
        application_id: &ApplicationId,
        page: PageRequest,
    ) -> SyncResult<Page<Device>> {
        let devices = self.devices.read().await;
        let matching: Vec<&Device> = devices
            .values()
            .filter(|d| d.application_id == *application_id)
            .collect();
        Ok(paginate(matching, page))
    }

    async fn list_devices_by_profile(
        &self,
        device_profile_id: &DeviceProfileId,
        page: PageRequest,
    ) -> SyncResult<Page<Device>> {
        let devices = self.devices.read().await;
        let matching: Vec<&Device> = devices
            .values()
            .filter(|d| d.device_profile_id == *device_profile_id)
            .collect();
        Ok(paginate(matching, page))
    }
}
