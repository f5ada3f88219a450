//! The reconciler: drives one deployment record toward convergence.
//!
//! State machine per record:
//! - `Created`/`Updated` → `Synced` on handler success.
//! - `Removed` → record deleted on handler success.
//! - Any failure: status unchanged, `sync_failed` set, error appended to
//!   `logs`. The record itself is the pending-work marker; there is no
//!   internal retry scheduling, the next mutation or sweep re-invokes.
//! - `Synced` is steady: reconciling it is a no-op (no handler call, no
//!   write).
//!
//! This module and the bulk-push sweep are the only writers of `status`,
//! `sync_failed`, `logs` and `meta`.

use crate::engine::SyncEngine;
use crate::error::SyncResult;
use crate::handler::HandlerMeta;
use tracing::{debug, info, warn};
use weft_types::{Deployment, DeploymentId, ResourceKind, SyncStatus};

enum Reconciled {
    /// The handler converged the pair; bookkeeping to persist.
    Converged(HandlerMeta),
    /// The record was deleted locally without a handler call (nothing was
    /// ever pushed, nothing to undo).
    Deleted,
}

impl SyncEngine {
    /// Reconciles one deployment record.
    ///
    /// Handler and authorization failures are recorded on the record and
    /// swallowed, so the triggering caller still succeeds. Only structural
    /// errors (unknown record, storage faults) propagate.
    pub async fn sync_network_deployment(&self, deployment_id: &DeploymentId) -> SyncResult<()> {
        let deployment = self.deployments.load(deployment_id)?;

        if deployment.status == SyncStatus::Synced {
            debug!("deployment {} already synced, skipping", deployment.id);
            return Ok(());
        }

        match self.reconcile(&deployment).await {
            Ok(Reconciled::Deleted) => Ok(()),
            Ok(Reconciled::Converged(meta)) => {
                if deployment.status == SyncStatus::Removed {
                    // Remote teardown done; the local record goes with it.
                    self.deployments.remove(&deployment.id)?;
                    info!("deployment {} removed after remote teardown", deployment.id);
                    return Ok(());
                }
                let mut next = deployment.clone();
                next.status = SyncStatus::Synced;
                next.sync_failed = false;
                next.logs.clear();
                next.meta = meta;
                if self.deployments.try_transition(&next, deployment.status)? {
                    info!(
                        "deployment {} synced ({} on network {})",
                        deployment.id, deployment.resource, deployment.network_id
                    );
                } else {
                    debug!(
                        "deployment {} changed concurrently, dropping converged write",
                        deployment.id
                    );
                }
                Ok(())
            }
            Err(e) => {
                let mut next = deployment.clone();
                next.sync_failed = true;
                next.logs.push(e.to_string());
                if !self.deployments.try_transition(&next, deployment.status)? {
                    debug!(
                        "deployment {} changed concurrently, dropping failure record",
                        deployment.id
                    );
                }
                warn!(
                    "deployment {} failed to sync on network {}: {e}",
                    deployment.id, deployment.network_id
                );
                Ok(())
            }
        }
    }

    async fn reconcile(&self, deployment: &Deployment) -> SyncResult<Reconciled> {
        let mut network = self.load_network(&deployment.network_id).await?;

        if !network.authorized {
            if network.security_data.is_none()
                && deployment.status == SyncStatus::Removed
                && deployment.remote_id().is_none()
            {
                // Nothing was ever pushed to this network, nothing to undo.
                self.deployments.remove(&deployment.id)?;
                debug!(
                    "deployment {} never reached network {}, deleted locally",
                    deployment.id, network.name
                );
                return Ok(Reconciled::Deleted);
            }
            self.authorize_network(&mut network).await?;
        }

        let handler = self.handlers.resolve(&network.protocol_id)?;
        let meta = match deployment.resource_kind() {
            ResourceKind::Application => handler.sync_application(&network, deployment).await?,
            ResourceKind::Device => handler.sync_device(&network, deployment).await?,
            ResourceKind::DeviceProfile => {
                handler.sync_device_profile(&network, deployment).await?
            }
        };
        Ok(Reconciled::Converged(meta))
    }
}
