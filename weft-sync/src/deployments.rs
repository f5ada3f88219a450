//! The deployment capability exposed to the resource-model layer.
//!
//! CRUD over deployment records (with the link-target immutability guard)
//! plus the mutation entry points: flagging a changed resource across its
//! network type and tearing down a removed one. Flagging reconciles
//! synchronously within the triggering call, so callers observe every target
//! network's outcome (success or recorded failure) before returning.

use crate::catalog::{Page, PageRequest};
use crate::engine::SyncEngine;
use crate::error::{SyncError, SyncResult};
use crate::fanout::NetworkOutcome;
use serde_json::{Map, Value};
use tracing::debug;
use weft_types::{
    Deployment, DeploymentId, NetworkId, NetworkTypeId, ResourceRef, SyncStatus,
};

/// Mutable fields accepted by [`SyncEngine::update_deployment`].
///
/// The link targets (resource, network) are immutable once a record exists;
/// supplying either is rejected with `Forbidden`.
#[derive(Debug, Default, Clone)]
pub struct DeploymentUpdate {
    pub status: Option<SyncStatus>,
    pub sync_failed: Option<bool>,
    pub meta: Option<Map<String, Value>>,
    pub logs: Option<Vec<String>>,
    pub resource: Option<ResourceRef>,
    pub network_id: Option<NetworkId>,
}

impl SyncEngine {
    // ── CRUD surface ─────────────────────────────────────────────

    /// Creates a deployment record. `Conflict` if the pair already has one.
    pub fn create_deployment(
        &self,
        resource: ResourceRef,
        network_id: NetworkId,
        status: SyncStatus,
    ) -> SyncResult<Deployment> {
        let deployment = Deployment::new(resource, network_id, status);
        self.deployments.insert(&deployment)?;
        Ok(deployment)
    }

    /// Loads a deployment record by id.
    pub fn load_deployment(&self, id: &DeploymentId) -> SyncResult<Deployment> {
        self.deployments.load(id)
    }

    /// Finds the record for a (resource, network) pair.
    pub fn find_deployment(
        &self,
        resource: &ResourceRef,
        network_id: &NetworkId,
    ) -> SyncResult<Option<Deployment>> {
        self.deployments.find_by_resource_and_network(resource, network_id)
    }

    /// Lists one page of deployment records.
    pub fn list_deployments(&self, page: PageRequest) -> SyncResult<Page<Deployment>> {
        self.deployments.list(page)
    }

    /// Lists every deployment record.
    pub fn list_all_deployments(&self) -> SyncResult<Vec<Deployment>> {
        self.deployments.list_all()
    }

    /// Lists every deployment record for a network.
    pub fn list_network_deployments(&self, network_id: &NetworkId) -> SyncResult<Vec<Deployment>> {
        self.deployments.list_by_network(network_id)
    }

    /// Lists every deployment record for a resource, across networks.
    pub fn list_resource_deployments(&self, resource: &ResourceRef) -> SyncResult<Vec<Deployment>> {
        self.deployments.list_by_resource(resource)
    }

    /// Applies an update to one record. Link targets are immutable: a
    /// request naming a different resource or network fails `Forbidden`.
    pub fn update_deployment(
        &self,
        id: &DeploymentId,
        update: DeploymentUpdate,
    ) -> SyncResult<Deployment> {
        let mut deployment = self.deployments.load(id)?;

        if let Some(resource) = update.resource {
            if resource != deployment.resource {
                return Err(SyncError::Forbidden(
                    "deployment resource link is immutable".to_string(),
                ));
            }
        }
        if let Some(network_id) = update.network_id {
            if network_id != deployment.network_id {
                return Err(SyncError::Forbidden(
                    "deployment network link is immutable".to_string(),
                ));
            }
        }

        if let Some(status) = update.status {
            deployment.status = status;
        }
        if let Some(sync_failed) = update.sync_failed {
            deployment.sync_failed = sync_failed;
        }
        if let Some(meta) = update.meta {
            deployment.meta = meta;
        }
        if let Some(logs) = update.logs {
            deployment.logs = logs;
        }

        self.deployments.update(&deployment)?;
        Ok(deployment)
    }

    /// Applies one update to every record of a resource. Returns the number
    /// of records updated.
    pub fn update_resource_deployments(
        &self,
        resource: &ResourceRef,
        update: &DeploymentUpdate,
    ) -> SyncResult<usize> {
        let records = self.deployments.list_by_resource(resource)?;
        let mut updated = 0;
        for record in &records {
            self.update_deployment(&record.id, update.clone())?;
            updated += 1;
        }
        Ok(updated)
    }

    /// Removes one deployment record.
    pub fn remove_deployment(&self, id: &DeploymentId) -> SyncResult<()> {
        self.deployments.remove(id)
    }

    /// Removes every deployment record of a resource. Returns the count.
    pub fn remove_resource_deployments(&self, resource: &ResourceRef) -> SyncResult<usize> {
        self.deployments.remove_many(resource)
    }

    // ── Mutation entry points ────────────────────────────────────

    /// Flags a changed resource across every enabled network of its type and
    /// reconciles each pair before returning.
    ///
    /// `origin` names the network a pulled change came from; that network's
    /// own deployment is skipped so the echo does not loop straight back.
    /// This is a one-hop rule; longer cycles are not detected.
    pub async fn flag_resource(
        &self,
        resource: ResourceRef,
        network_type_id: &NetworkTypeId,
        origin: Option<NetworkId>,
    ) -> SyncResult<Vec<NetworkOutcome<()>>> {
        self.for_all_networks(network_type_id, |network| async move {
            if origin == Some(network.id) {
                debug!(
                    "skipping origin network {} for {resource}",
                    network.name
                );
                return Ok(());
            }
            let id = self.mark_changed(resource, network.id)?;
            self.sync_network_deployment(&id).await
        })
        .await
    }

    /// Flags every deployment of a removed resource to `Removed` and
    /// reconciles each; converged records are deleted outright. Returns the
    /// number of records flagged.
    pub async fn flag_resource_removed(&self, resource: ResourceRef) -> SyncResult<usize> {
        let records = self.deployments.list_by_resource(&resource)?;
        let flagged = records.len();
        for record in records {
            let mut next = record.clone();
            next.status = SyncStatus::Removed;
            if !self.deployments.try_transition(&next, record.status)? {
                debug!(
                    "deployment {} changed concurrently while flagging removal",
                    record.id
                );
            }
            self.sync_network_deployment(&record.id).await?;
        }
        Ok(flagged)
    }

    /// Marks a (resource, network) pair as changed: a missing record is
    /// created in `Created`; an existing one, whatever its status, is forced
    /// to `Updated`, since the local mutation makes the remote copy stale
    /// either way.
    fn mark_changed(&self, resource: ResourceRef, network_id: NetworkId) -> SyncResult<DeploymentId> {
        if let Some(existing) = self
            .deployments
            .find_by_resource_and_network(&resource, &network_id)?
        {
            if existing.status != SyncStatus::Updated {
                let mut next = existing.clone();
                next.status = SyncStatus::Updated;
                if !self.deployments.try_transition(&next, existing.status)? {
                    debug!(
                        "deployment {} changed concurrently while flagging update",
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
