//! Multi-network reconciliation engine for Weft.
//!
//! Keeps local catalog resources (applications, devices, device profiles)
//! consistent across any number of independently-administered remote backend
//! networks, each reached through a pluggable protocol handler.
//!
//! # Architecture
//!
//! - **Deployment**: one record per (resource, network) pair tracking whether
//!   that pair has converged; the record doubles as the retry queue.
//! - **Reconciler**: drives one record to `Synced`, recording sticky
//!   failures on the record instead of failing the caller.
//! - **Fan-out**: applies an operation to every enabled network of a type,
//!   isolating per-network failures.
//! - **Bulk push**: walks the whole catalog against one network to repair
//!   drift, typically after (re)authorization.
//! - **Vault**: per-network credential keys and handler bookkeeping
//!   (`weft-vault`); credentials are ciphertext everywhere except transient
//!   in-memory copies.
//!
//! Delivery is at-least-once and eventually convergent; there is no
//! cross-network transactionality.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use weft_sync::{DeploymentStore, HandlerRegistry, MemoryCatalog, SyncEngine};
//! use weft_vault::VaultStore;
//!
//! let engine = SyncEngine::new(
//!     Arc::new(MemoryCatalog::new()),
//!     Arc::new(DeploymentStore::open_in_memory().unwrap()),
//!     Arc::new(VaultStore::open_in_memory().unwrap()),
//!     Arc::new(HandlerRegistry::new()),
//! );
//! # let _ = engine;
//! ```

mod catalog;
mod config;
mod deployment_store;
mod deployments;
mod engine;
mod error;
mod fanout;
mod handler;
mod networks;
mod push;
mod reconciler;
mod sweep;

pub use catalog::{CatalogStore, MemoryCatalog, Page, PageRequest};
pub use config::SyncConfig;
pub use deployment_store::DeploymentStore;
pub use deployments::DeploymentUpdate;
pub use engine::SyncEngine;
pub use error::{SyncError, SyncResult};
pub use fanout::NetworkOutcome;
pub use handler::{HandlerMeta, HandlerRegistry, ProtocolHandler};
pub use sweep::{spawn_sweep, SweepStats};
