//! Persistent storage for deployment records.
//!
//! Uses a separate SQLite file so reconciliation state is isolated from the
//! catalog and the vault. The UNIQUE(resource, network) constraint is what
//! enforces the one-deployment-per-pair invariant.

use crate::catalog::{Page, PageRequest};
use crate::error::{SyncError, SyncResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use weft_types::{Deployment, DeploymentId, NetworkId, ResourceKind, ResourceRef, SyncStatus};

/// Persistent store for deployment records backed by SQLite.
pub struct DeploymentStore {
    conn: Arc<Mutex<Connection>>,
}

const COLUMNS: &str = "id, status, sync_failed, meta, logs, resource_kind, resource_id, network_id, created_at, updated_at";

impl DeploymentStore {
    /// Opens (or creates) a deployment store at the given path.
    pub fn open(path: impl AsRef<Path>) -> SyncResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| SyncError::Storage(format!("failed to open deployment store: {e}")))?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Opens an in-memory deployment store (for testing).
    pub fn open_in_memory() -> SyncResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            SyncError::Storage(format!("failed to open in-memory deployment store: {e}"))
        })?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> SyncResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS deployments (
                id TEXT PRIMARY KEY,
                status TEXT NOT NULL,
                sync_failed INTEGER NOT NULL DEFAULT 0,
                meta TEXT NOT NULL DEFAULT '{}',
                logs TEXT NOT NULL DEFAULT '[]',
                resource_kind TEXT NOT NULL,
                resource_id TEXT NOT NULL,
                network_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(resource_id, network_id)
            );

            CREATE INDEX IF NOT EXISTS idx_deployments_network
                ON deployments(network_id);
            CREATE INDEX IF NOT EXISTS idx_deployments_status
                ON deployments(status);
            ",
        )
        .map_err(|e| SyncError::Storage(format!("failed to init deployment schema: {e}")))?;
        Ok(())
    }

    // ── Writes ───────────────────────────────────────────────────

    /// Inserts a new record. Fails with `Conflict` if the (resource, network)
    /// pair already has one.
    pub fn insert(&self, deployment: &Deployment) -> SyncResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO deployments
             (id, status, sync_failed, meta, logs, resource_kind, resource_id, network_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                deployment.id.to_string(),
                deployment.status.as_str(),
                deployment.sync_failed,
                serde_json::to_string(&deployment.meta)?,
                serde_json::to_string(&deployment.logs)?,
                deployment.resource_kind().as_str(),
                deployment.resource.id_string(),
                deployment.network_id.to_string(),
                deployment.created_at.to_rfc3339(),
                deployment.updated_at.to_rfc3339(),
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                SyncError::Conflict(format!(
                    "deployment exists for {} on network {}",
                    deployment.resource, deployment.network_id
                ))
            }
            other => SyncError::Storage(format!("failed to insert deployment: {other}")),
        })?;
        Ok(())
    }

    fn write_state(&self, deployment: &Deployment, expected: Option<SyncStatus>) -> SyncResult<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = match expected {
            Some(expected) => conn.execute(
                "UPDATE deployments
                 SET status = ?2, sync_failed = ?3, meta = ?4, logs = ?5, updated_at = ?6
                 WHERE id = ?1 AND status = ?7",
                params![
                    deployment.id.to_string(),
                    deployment.status.as_str(),
                    deployment.sync_failed,
                    serde_json::to_string(&deployment.meta)?,
                    serde_json::to_string(&deployment.logs)?,
                    Utc::now().to_rfc3339(),
                    expected.as_str(),
                ],
            ),
            None => conn.execute(
                "UPDATE deployments
                 SET status = ?2, sync_failed = ?3, meta = ?4, logs = ?5, updated_at = ?6
                 WHERE id = ?1",
                params![
                    deployment.id.to_string(),
                    deployment.status.as_str(),
                    deployment.sync_failed,
                    serde_json::to_string(&deployment.meta)?,
                    serde_json::to_string(&deployment.logs)?,
                    Utc::now().to_rfc3339(),
                ],
            ),
        }
        .map_err(|e| SyncError::Storage(format!("failed to update deployment: {e}")))?;
        Ok(changed == 1)
    }

    /// Writes the record's mutable state unconditionally.
    pub fn update(&self, deployment: &Deployment) -> SyncResult<()> {
        if self.write_state(deployment, None)? {
            Ok(())
        } else {
            Err(SyncError::NotFound(format!(
                "deployment: {}",
                deployment.id
            )))
        }
    }

    /// Compare-and-swap state write: applies only if the stored status still
    /// equals `expected`. Returns false (without writing) when another writer
    /// got there first or the record is gone.
    pub fn try_transition(
        &self,
        deployment: &Deployment,
        expected: SyncStatus,
    ) -> SyncResult<bool> {
        self.write_state(deployment, Some(expected))
    }

    /// Removes a record.
    pub fn remove(&self, id: &DeploymentId) -> SyncResult<()> {
        let conn = self.conn.lock().unwrap();
        let removed = conn
            .execute(
                "DELETE FROM deployments WHERE id = ?1",
                params![id.to_string()],
            )
            .map_err(|e| SyncError::Storage(format!("failed to remove deployment: {e}")))?;
        if removed == 1 {
            Ok(())
        } else {
            Err(SyncError::NotFound(format!("deployment: {id}")))
        }
    }

    /// Removes every record of a resource (all networks). Returns the count.
    pub fn remove_many(&self, resource: &ResourceRef) -> SyncResult<usize> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "DELETE FROM deployments WHERE resource_kind = ?1 AND resource_id = ?2",
            params![resource.kind().as_str(), resource.id_string()],
        )
        .map_err(|e| SyncError::Storage(format!("failed to remove deployments: {e}")))
    }

    // ── Reads ────────────────────────────────────────────────────

    /// Loads a record by id.
    pub fn load(&self, id: &DeploymentId) -> SyncResult<Deployment> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM deployments WHERE id = ?1"),
            params![id.to_string()],
            row_to_deployment,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => {
                SyncError::NotFound(format!("deployment: {id}"))
            }
            other => SyncError::Storage(format!("failed to load deployment: {other}")),
        })
    }

    /// Finds the record for a (resource, network) pair, if any.
    pub fn find_by_resource_and_network(
        &self,
        resource: &ResourceRef,
        network_id: &NetworkId,
    ) -> SyncResult<Option<Deployment>> {
        let conn = self.conn.lock().unwrap();
        match conn.query_row(
            &format!(
                "SELECT {COLUMNS} FROM deployments
                 WHERE resource_kind = ?1 AND resource_id = ?2 AND network_id = ?3"
            ),
            params![
                resource.kind().as_str(),
                resource.id_string(),
                network_id.to_string()
            ],
            row_to_deployment,
        ) {
            Ok(deployment) => Ok(Some(deployment)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(SyncError::Storage(format!(
                "failed to find deployment: {e}"
            ))),
        }
    }

    /// Lists one page of records, ordered by id.
    pub fn list(&self, page: PageRequest) -> SyncResult<Page<Deployment>> {
        let conn = self.conn.lock().unwrap();
        let total: i64 = conn
            .query_row("SELECT COUNT(*) FROM deployments", [], |row| row.get(0))
            .map_err(|e| SyncError::Storage(format!("failed to count deployments: {e}")))?;
        let items = query_many(
            &conn,
            &format!("SELECT {COLUMNS} FROM deployments ORDER BY id LIMIT ?1 OFFSET ?2"),
            params![page.limit as i64, page.offset as i64],
        )?;
        Ok(Page {
            items,
            total: total as usize,
        })
    }

    /// Lists every record.
    pub fn list_all(&self) -> SyncResult<Vec<Deployment>> {
        let conn = self.conn.lock().unwrap();
        query_many(
            &conn,
            &format!("SELECT {COLUMNS} FROM deployments ORDER BY id"),
            params![],
        )
    }

    /// Lists every record for a network.
    pub fn list_by_network(&self, network_id: &NetworkId) -> SyncResult<Vec<Deployment>> {
        let conn = self.conn.lock().unwrap();
        query_many(
            &conn,
            &format!("SELECT {COLUMNS} FROM deployments WHERE network_id = ?1 ORDER BY id"),
            params![network_id.to_string()],
        )
    }

    /// Lists every record for a resource (across networks).
    pub fn list_by_resource(&self, resource: &ResourceRef) -> SyncResult<Vec<Deployment>> {
        let conn = self.conn.lock().unwrap();
        query_many(
            &conn,
            &format!(
                "SELECT {COLUMNS} FROM deployments
                 WHERE resource_kind = ?1 AND resource_id = ?2 ORDER BY id"
            ),
            params![resource.kind().as_str(), resource.id_string()],
        )
    }

    /// Lists every non-synced record, optionally scoped to one network.
    pub fn list_pending(&self, network_id: Option<&NetworkId>) -> SyncResult<Vec<Deployment>> {
        let conn = self.conn.lock().unwrap();
        match network_id {
            Some(network_id) => query_many(
                &conn,
                &format!(
                    "SELECT {COLUMNS} FROM deployments
                     WHERE status != ?1 AND network_id = ?2 ORDER BY id"
                ),
                params![SyncStatus::Synced.as_str(), network_id.to_string()],
            ),
            None => query_many(
                &conn,
                &format!("SELECT {COLUMNS} FROM deployments WHERE status != ?1 ORDER BY id"),
                params![SyncStatus::Synced.as_str()],
            ),
        }
    }
}

fn query_many(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> SyncResult<Vec<Deployment>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| SyncError::Storage(format!("failed to query deployments: {e}")))?;
    let rows = stmt
        .query_map(params, row_to_deployment)
        .map_err(|e| SyncError::Storage(format!("failed to query deployments: {e}")))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| SyncError::Storage(format!("failed to read deployment row: {e}")))?);
    }
    Ok(out)
}

fn row_to_deployment(row: &Row<'_>) -> rusqlite::Result<Deployment> {
    let id: String = row.get(0)?;
    let status: String = row.get(1)?;
    let sync_failed: bool = row.get(2)?;
    let meta: String = row.get(3)?;
    let logs: String = row.get(4)?;
    let resource_kind: String = row.get(5)?;
    let resource_id: String = row.get(6)?;
    let network_id: String = row.get(7)?;
    let created_at: String = row.get(8)?;
    let updated_at: String = row.get(9)?;

    let kind = ResourceKind::from_str(&resource_kind).map_err(invalid(5))?;
    Ok(Deployment {
        id: DeploymentId::parse(&id).map_err(invalid(0))?,
        status: SyncStatus::from_str(&status).map_err(invalid(1))?,
        sync_failed,
        meta: serde_json::from_str(&meta).map_err(invalid(3))?,
        logs: serde_json::from_str(&logs).map_err(invalid(4))?,
        resource: ResourceRef::from_parts(kind, &resource_id).map_err(invalid(6))?,
        network_id: NetworkId::parse(&network_id).map_err(invalid(7))?,
        created_at: parse_timestamp(&created_at).map_err(invalid(8))?,
        updated_at: parse_timestamp(&updated_at).map_err(invalid(9))?,
    })
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    Ok(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc))
}

fn invalid<E>(column: usize) -> impl FnOnce(E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    move |e| {
        rusqlite::Error::FromSqlConversionFailure(
            column,
            rusqlite::types::Type::Text,
            Box::new(e),
        )
    }
}
