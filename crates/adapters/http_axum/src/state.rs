//! Shared application state for axum handlers.

use std::sync::Arc;

use meshbridge_app::bridge::Bridge;
use meshbridge_app::ports::{CloudBus, MeshTransport, SnapshotStore};

/// Application state shared across all axum handlers.
///
/// Generic over the port implementations to avoid dynamic dispatch.
/// `Clone` is implemented manually so the port types themselves do not need
/// to be `Clone`; only the `Arc` is cloned.
pub struct AppState<M, B, S> {
    /// The bridge, shared with the inbound loop.
    pub bridge: Arc<Bridge<M, B, S>>,
}

impl<M, B, S> Clone for AppState<M, B, S> {
    fn clone(&self) -> Self {
        Self {
            bridge: Arc::clone(&self.bridge),
        }
    }
}

impl<M, B, S> AppState<M, B, S>
where
    M: MeshTransport + Send + Sync + 'static,
    B: CloudBus + Send + Sync + 'static,
    S: SnapshotStore + Send + Sync + 'static,
{
    /// Create the state around a bridge already shared with background tasks.
    pub fn new(bridge: Arc<Bridge<M, B, S>>) -> Self {
        Self { bridge }
    }
}
