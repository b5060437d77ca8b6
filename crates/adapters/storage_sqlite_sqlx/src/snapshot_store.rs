//! `SQLite` implementation of [`SnapshotStore`].
//!
//! Snapshots are kept as named blobs; the registry uses a single row that is
//! overwritten on every save.

use std::future::Future;

use sqlx::SqlitePool;

use meshbridge_app::ports::SnapshotStore;
use meshbridge_domain::error::GatewayError;

use crate::error::StorageError;

/// Row name used for the device registry.
pub const REGISTRY_SNAPSHOT: &str = "devices";

const SELECT_BY_NAME: &str = "SELECT data FROM registry_snapshots WHERE name = ?";
const UPSERT: &str = "INSERT INTO registry_snapshots (name, data, updated_at) VALUES (?, ?, ?) \
     ON CONFLICT(name) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at";

/// `SQLite`-backed snapshot store.
pub struct SqliteSnapshotStore {
    pool: SqlitePool,
    name: String,
}

impl SqliteSnapshotStore {
    /// Create a store for the device registry row.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self::named(pool, REGISTRY_SNAPSHOT)
    }

    /// Create a store for an arbitrary snapshot row.
    #[must_use]
    pub fn named(pool: SqlitePool, name: impl Into<String>) -> Self {
        Self {
            pool,
            name: name.into(),
        }
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn load(&self) -> impl Future<Output = Result<Option<Vec<u8>>, GatewayError>> + Send {
        let pool = self.pool.clone();
        let name = self.name.clone();
        async move {
            let row: Option<(Vec<u8>,)> = sqlx::query_as(SELECT_BY_NAME)
                .bind(&name)
                .fetch_optional(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|(data,)| data))
        }
    }

    fn save(&self, bytes: Vec<u8>) -> impl Future<Output = Result<(), GatewayError>> + Send {
        let pool = self.pool.clone();
        let name = self.name.clone();
        async move {
            sqlx::query(UPSERT)
                .bind(&name)
                .bind(bytes)
                .bind(chrono::Utc::now().to_rfc3339())
                .execute(&pool)
                .await
                .map_err(StorageError::from)?;

            Ok(())
        }
    }
}
