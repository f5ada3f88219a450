//! Fan-out dispatcher: apply one operation to every network of a type.
//!
//! This is the sole mechanism for "do X to every backend". Failure of one
//! network is downgraded to a per-network error entry and never aborts the
//! others; aggregation is the caller's responsibility.

use crate::engine::SyncEngine;
use crate::error::SyncResult;
use futures::future::join_all;
use std::future::Future;
use tracing::warn;
use weft_types::{Network, NetworkId, NetworkTypeId};

/// Settled result of a fan-out operation against one network.
#[derive(Debug)]
pub struct NetworkOutcome<T> {
    pub network_id: NetworkId,
    pub network_name: String,
    /// The op's value, or its failure rendered to a string.
    pub outcome: Result<T, String>,
}

impl<T> NetworkOutcome<T> {
    /// Whether the op failed for this network.
    #[must_use]
    pub fn is_err(&self) -> bool {
        self.outcome.is_err()
    }
}

impl SyncEngine {
    /// Runs `op` concurrently against every enabled network of the type.
    ///
    /// Returns one settled entry per network. Only a failure to list the
    /// networks themselves is propagated; op failures are captured per entry.
    pub async fn for_all_networks<T, F, Fut>(
        &self,
        network_type_id: &NetworkTypeId,
        op: F,
    ) -> SyncResult<Vec<NetworkOutcome<T>>>
    where
        F: Fn(Network) -> Fut,
        Fut: Future<Output = SyncResult<T>>,
    {
        let networks = self.catalog.list_networks_by_type(network_type_id).await?;

        let tasks = networks
            .into_iter()
            .filter(|network| network.enabled)
            .map(|network| {
                let network_id = network.id;
                let network_name = network.name.clone();
                let fut = op(network);
                async move {
                    match fut.await {
                        Ok(value) => NetworkOutcome {
                            network_id,
                            network_name,
                            outcome: Ok(value),
                        },
                        Err(e) => {
                            warn!("fan-out op failed for network {network_name}: {e}");
                            NetworkOutcome {
                                network_id,
                                network_name,
                                outcome: Err(e.to_string()),
                            }
                        }
                    }
                }
            });

        Ok(join_all(tasks).await)
    }
}
