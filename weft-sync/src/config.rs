//! Configuration for the sync engine.

/// Tunables for reconciliation and the bulk-push sweep.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Page size for catalog walks during bulk push.
    pub page_size: usize,
    /// Interval between periodic sweeps of non-synced deployments.
    pub sweep_interval_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            sweep_interval_secs: 300,
        }
    }
}
