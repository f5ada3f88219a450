//! Bulk-push orchestrator: the drift-repair sweep for one network.
//!
//! Walks the full paginated catalog set for the network's type and makes
//! sure every resource has exactly one deployment against the network:
//! missing → `Created`; existing and not `Synced` → forced `Updated` so the
//! next reconciliation pass retries. Run typically right after a network
//! transitions from unauthorized to authorized.
//!
//! Flag-only: reconciliation of the flagged records is driven by the callers
//! and the periodic sweep.

use crate::catalog::PageRequest;
use crate::engine::SyncEngine;
use crate::error::{SyncError, SyncResult};
use tracing::{debug, info};
use weft_types::{
    ApplicationId, Deployment, DeploymentId, Device, DeviceProfileId, Network, NetworkId,
    ResourceRef, SyncStatus,
};

impl SyncEngine {
    /// Pushes the network's whole share of the catalog: all applications
    /// (with their devices) and all device profiles (with theirs).
    pub async fn push_network(&self, network: &Network) -> SyncResult<()> {
        let (applications, profiles) = tokio::join!(
            self.push_applications(network),
            self.push_device_profiles(network),
        );
        applications?;
        profiles?;
        info!("bulk push complete for network {}", network.name);
        Ok(())
    }

    /// Flags every application of the network's type, cascading to devices.
    pub async fn push_applications(&self, network: &Network) -> SyncResult<()> {
        let mut page = PageRequest::first(self.config.page_size);
        loop {
            let batch = self
                .catalog
                .list_applications(&network.network_type_id, page)
                .await?;
            for application in &batch.items {
                self.ensure_deployment(ResourceRef::Application(application.id), network.id)?;
                self.push_application_devices(network, &application.id).await?;
            }
            if batch.is_last(&page) {
                return Ok(());
            }
            page = page.next();
        }
    }

    /// Flags every device profile of the network's type, cascading to devices.
    pub async fn push_device_profiles(&self, network: &Network) -> SyncResult<()> {
        let mut page = PageRequest::first(self.config.page_size);
        loop {
            let batch = self
                .catalog
                .list_device_profiles(&network.network_type_id, page)
                .await?;
            for profile in &batch.items {
                self.ensure_deployment(ResourceRef::DeviceProfile(profile.id), network.id)?;
                self.push_device_profile_devices(network, &profile.id).await?;
            }
            if batch.is_last(&page) {
                return Ok(());
            }
            page = page.next();
        }
    }

    /// Flags every device owned by an application.
    pub async fn push_application_devices(
        &self,
        network: &Network,
        application_id: &ApplicationId,
    ) -> SyncResult<()> {
        let mut page = PageRequest::first(self.config.page_size);
        loop {
            let batch = self
                .catalog
                .list_devices_by_application(application_id, page)
                .await?;
            for device in &batch.items {
                self.push_device(network, device)?;
            }
            if batch.is_last(&page) {
                return Ok(());
            }
            page = page.next();
        }
    }

    /// Flags every device described by a device profile.
    pub async fn push_device_profile_devices(
        &self,
        network: &Network,
        device_profile_id: &DeviceProfileId,
    ) -> SyncResult<()> {
        let mut page = PageRequest::first(self.config.page_size);
        loop {
            let batch = self
                .catalog
                .list_devices_by_profile(device_profile_id, page)
                .await?;
            for device in &batch.items {
                self.push_device(network, device)?;
            }
            if batch.is_last(&page) {
                return Ok(());
            }
            page = page.next();
        }
    }

    /// Flags one device against the network.
    pub fn push_device(&self, network: &Network, device: &Device) -> SyncResult<DeploymentId> {
        self.ensure_deployment(ResourceRef::Device(device.id), network.id)
    }

    /// Ensures exactly one deployment exists for the pair, with the push
    /// sweep's semantics: a record that already converged is left alone, a
    /// pending one is forced back to `Updated` so the next pass retries it.
    pub(crate) fn ensure_deployment(
        &self,
        resource: ResourceRef,
        network_id: NetworkId,
    ) -> SyncResult<DeploymentId> {
        if let Some(existing) = self
            .deployments
            .find_by_resource_and_network(&resource, &network_id)?
        {
            if existing.status != SyncStatus::Synced && existing.status != SyncStatus::Updated {
                let mut next = existing.clone();
                next.status = SyncStatus::Updated;
                if !self.deployments.try_transition(&next, existing.status)? {
                    debug!(
                        "deployment {} changed concurrently during push, left as-is",
                        existing.id
                    );
                }
            }
            return Ok(existing.id);
        }

        let deployment = Deployment::new(resource, network_id, SyncStatus::Created);
        let id = deployment.id;
        match self.deployments.insert(&deployment) {
            Ok(()) => Ok(id),
            // Lost a create race; the winner's record is the one true pair.
            Err(SyncError::Conflict(_)) => self
                .deployments
                .find_by_resource_and_network(&resource, &network_id)?
                .map(|d| d.id)
                .ok_or_else(|| {
                    SyncError::NotFound(format!("deployment for {resource} on {network_id}"))
                }),
            Err(e) => Err(e),
        }
    }
}
