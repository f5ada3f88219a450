//! The raw keyed vault store.
//!
//! Backed by a small SQLite table so vault data survives restarts and stays
//! isolated from the catalog and deployment stores.

use crate::error::{VaultError, VaultResult};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use weft_types::{NetworkId, ProtocolId};

/// Keyed store for per-network values.
///
/// Entries are keyed by (network, protocol, identifier). Values are opaque
/// strings: base64 key material for the keyring, whatever a protocol handler
/// chooses to stash for itself otherwise.
pub struct VaultStore {
    conn: Arc<Mutex<Connection>>,
}

impl VaultStore {
    /// Opens (or creates) a vault store at the given path.
    pub fn open(path: impl AsRef<Path>) -> VaultResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| VaultError::Storage(format!("failed to open vault store: {e}")))?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Opens an in-memory vault store (for testing).
    pub fn open_in_memory() -> VaultResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| VaultError::Storage(format!("failed to open in-memory vault store: {e}")))?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> VaultResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS vault_entries (
                network_id TEXT NOT NULL,
                protocol_id TEXT NOT NULL,
                identifier TEXT NOT NULL,
                value TEXT NOT NULL,
                UNIQUE(network_id, protocol_id, identifier)
            );
            ",
        )
        .map_err(|e| VaultError::Storage(format!("failed to init vault schema: {e}")))?;
        Ok(())
    }

    /// Loads the value stored under the composite key.
    pub fn load_value(
        &self,
        network_id: &NetworkId,
        protocol_id: &ProtocolId,
        identifier: &str,
    ) -> VaultResult<String> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT value FROM vault_entries
             WHERE network_id = ?1 AND protocol_id = ?2 AND identifier = ?3",
            params![network_id.to_string(), protocol_id.as_str(), identifier],
            |row| row.get(0),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => VaultError::NotFound(format!(
                "{network_id}/{protocol_id}/{identifier}"
            )),
            other => VaultError::Storage(format!("failed to load vault entry: {other}")),
        })
    }

    /// Creates or replaces the value under the composite key.
    pub fn upsert(
        &self,
        network_id: &NetworkId,
        protocol_id: &ProtocolId,
        identifier: &str,
        value: &str,
    ) -> VaultResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO vault_entries (network_id, protocol_id, identifier, value)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(network_id, protocol_id, identifier) DO UPDATE SET value = excluded.value",
            params![network_id.to_string(), protocol_id.as_str(), identifier, value],
        )
        .map_err(|e| VaultError::Storage(format!("failed to upsert vault entry: {e}")))?;
        Ok(())
    }

    /// Deletes every entry for the network whose identifier starts with
    /// `prefix`. An empty prefix clears all of the network's entries.
    /// Returns the number of entries removed.
    pub fn clear_by_prefix(
        &self,
        network_id: &NetworkId,
        protocol_id: &ProtocolId,
        prefix: &str,
    ) -> VaultResult<usize> {
        let pattern = format!(
            "{}%",
            prefix
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_")
        );
        let conn = self.conn.lock().unwrap();
        let removed = conn
            .execute(
                "DELETE FROM vault_entries
                 WHERE network_id = ?1 AND protocol_id = ?2 AND identifier LIKE ?3 ESCAPE '\\'",
                params![network_id.to_string(), protocol_id.as_str(), pattern],
            )
            .map_err(|e| VaultError::Storage(format!("failed to clear vault entries: {e}")))?;
        Ok(removed)
    }

    /// Returns the identifiers stored for a network, sorted. Mostly useful in
    /// tests and diagnostics.
    pub fn identifiers(
        &self,
        network_id: &NetworkId,
        protocol_id: &ProtocolId,
    ) -> VaultResult<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT identifier FROM vault_entries
                 WHERE network_id = ?1 AND protocol_id = ?2 ORDER BY identifier",
            )
            .map_err(|e| VaultError::Storage(format!("failed to list vault entries: {e}")))?;
        let rows = stmt
            .query_map(
                params![network_id.to_string(), protocol_id.as_str()],
                |row| row.get(0),
            )
            .map_err(|e| VaultError::Storage(format!("failed to list vault entries: {e}")))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| VaultError::Storage(format!("failed to read vault row: {e}")))?);
        }
        Ok(out)
    }
}
