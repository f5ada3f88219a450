//! Periodic sweep: reconcile every non-synced deployment.
//!
//! The record-is-the-queue design means a failed record just sits there until
//! something re-triggers it. The sweep is that explicit trigger, so retries
//! do not depend on incidental resource mutations.

use crate::engine::SyncEngine;
use crate::error::SyncResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Counts from one sweep pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    /// Pending records a reconciliation was attempted for.
    pub swept: usize,
    /// Records skipped on a structural error (e.g. deleted mid-sweep).
    pub skipped: usize,
}

impl SyncEngine {
    /// Reconciles every non-synced deployment once, isolating per-record
    /// failures. Handler failures land on the records themselves; only the
    /// initial pending-list query can fail this call.
    pub async fn sweep_once(&self) -> SyncResult<SweepStats> {
        let pending = self.deployments.list_pending(None)?;
        let mut stats = SweepStats::default();
        for deployment in pending {
            stats.swept += 1;
            if let Err(e) = self.sync_network_deployment(&deployment.id).await {
                debug!("sweep skipped deployment {}: {e}", deployment.id);
                stats.skipped += 1;
            }
        }
        Ok(stats)
    }
}

/// Spawns the periodic sweep task. The task runs until the returned handle
/// is aborted or dropped by the host at shutdown.
pub fn spawn_sweep(engine: Arc<SyncEngine>) -> JoinHandle<()> {
    let period = Duration::from_secs(engine.config().sweep_interval_secs);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so the sweep starts
        // one full period after startup.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match engine.sweep_once().await {
                Ok(stats) if stats.swept > 0 => {
                    info!(
                        "sweep attempted {} pending deployments ({} skipped)",
                        stats.swept, stats.skipped
                    );
                }
                Ok(_) => {}
                Err(e) => warn!("sweep pass failed: {e}"),
            }
        }
    })
}
