//! Snapshot store port: durable storage for the registry snapshot.

use std::future::Future;
use std::sync::Arc;

use meshbridge_domain::error::GatewayError;

/// Durable key-less blob storage for the registry snapshot.
///
/// The store never interprets the bytes; encoding lives in
/// [`RegistrySnapshot`](meshbridge_domain::snapshot::RegistrySnapshot).
pub trait SnapshotStore {
    /// Read the last saved snapshot, or `None` if nothing was ever saved.
    fn load(&self) -> impl Future<Output = Result<Option<Vec<u8>>, GatewayError>> + Send;

    /// Replace the saved snapshot.
    fn save(&self, bytes: Vec<u8>) -> impl Future<Output = Result<(), GatewayError>> + Send;
}

impl<T: SnapshotStore + Send + Sync> SnapshotStore for Arc<T> {
    fn load(&self) -> impl Future<Output = Result<Option<Vec<u8>>, GatewayError>> + Send {
        (**self).load()
    }

    fn save(&self, bytes: Vec<u8>) -> impl Future<Output = Result<(), GatewayError>> + Send {
        (**self).save(bytes)
    }
}
