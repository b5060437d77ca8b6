//! JSON admin API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod devices;
#[allow(clippy::missing_errors_doc)]
pub mod stats;

use axum::Router;
use axum::routing::get;

use meshbridge_app::ports::{CloudBus, MeshTransport, SnapshotStore};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<M, B, S>() -> Router<AppState<M, B, S>>
where
    M: MeshTransport + Send + Sync + 'static,
    B: CloudBus + Send + Sync + 'static,
    S: SnapshotStore + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/devices",
            get(devices::list::<M, B, S>).post(devices::create::<M, B, S>),
        )
        .route("/devices/{mac}", get(devices::get::<M, B, S>))
        .route("/stats", get(stats::get::<M, B, S>))
}
