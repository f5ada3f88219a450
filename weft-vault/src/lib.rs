//! Encrypted keyed store for per-network secrets and handler state.
//!
//! One storage mechanism, two capabilities:
//! - [`VaultStore`] — the raw keyed store: (network, protocol, identifier) →
//!   value, used by protocol handlers for session and bookkeeping values.
//! - [`NetworkKeyring`] — network credential sealing built on top: issues the
//!   per-network symmetric key, seals/opens `security_data`, and purges
//!   everything for a network when it is deleted.

mod error;
mod keyring;
mod store;

pub use error::{VaultError, VaultResult};
pub use keyring::{NetworkKeyring, NETWORK_KEY_PREFIX};
pub use store::VaultStore;
