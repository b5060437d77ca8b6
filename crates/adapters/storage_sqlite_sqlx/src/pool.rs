//! `SQLite` database holding the registry snapshot.
//!
//! The gateway writes one small row per registration and reads it once at
//! startup, so a single connection serves every query. It also keeps a
//! `sqlite::memory:` database alive and shared for the pool's lifetime.

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use crate::error::StorageError;

/// Open `SQLite` database with migrations applied.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database at `database_url` (e.g. `sqlite:meshbridge.db` or
    /// `sqlite::memory:`), creating the file if missing, and run all pending
    /// migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the URL is invalid, the connection fails
    /// or a migration fails.
    pub async fn open(database_url: &str) -> Result<Self, StorageError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::debug!(url = %database_url, "snapshot database ready");
        Ok(Self { pool })
    }

    /// Borrow the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Wait for in-flight queries and close the connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use meshbridge_app::ports::SnapshotStore;

    use super::*;
    use crate::snapshot_store::SqliteSnapshotStore;

    #[tokio::test]
    async fn should_run_migrations_when_using_memory_db() {
        let db = Database::open("sqlite::memory:").await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' AND name != '_sqlx_migrations' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|row| row.0.as_str()).collect();
        assert_eq!(names, vec!["registry_snapshots"]);
    }

    #[tokio::test]
    async fn should_use_a_single_connection() {
        let db = Database::open("sqlite::memory:").await.unwrap();
        assert_eq!(db.pool().options().get_max_connections(), 1);
    }

    #[tokio::test]
    async fn should_fail_when_directory_is_missing() {
        let result = Database::open("sqlite:/nonexistent-meshbridge-dir/meshbridge.db").await;
        assert!(matches!(result, Err(StorageError::Database(_))));
    }

    #[tokio::test]
    async fn should_keep_snapshot_across_reopen() {
        let path = std::env::temp_dir().join(format!(
            "meshbridge-pool-test-{}.db",
            std::process::id()
        ));
        let url = format!("sqlite:{}", path.display());

        let db = Database::open(&url).await.unwrap();
        SqliteSnapshotStore::new(db.pool().clone())
            .save(vec![7, 8, 9])
            .await
            .unwrap();
        db.close().await;

        let db = Database::open(&url).await.unwrap();
        let loaded = SqliteSnapshotStore::new(db.pool().clone())
            .load()
            .await
            .unwrap();
        db.close().await;

        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }
        assert_eq!(loaded, Some(vec![7, 8, 9]));
    }
}
