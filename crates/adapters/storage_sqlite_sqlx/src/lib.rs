//! # meshbridge-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the [`SnapshotStore`](meshbridge_app::ports::SnapshotStore) port
//! - Open the single-connection `SQLite` pool and close it on shutdown
//! - Run database migrations (using sqlx embedded migrations)
//!
//! ## Dependency rule
//! Depends on `meshbridge-app` (for port traits) and `meshbridge-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod error;
pub mod pool;
pub mod snapshot_store;

pub use self::pool::Database;
pub use self::snapshot_store::SqliteSnapshotStore;
