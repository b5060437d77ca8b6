//! JSON handler for runtime counters.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use meshbridge_app::ports::{CloudBus, MeshTransport, SnapshotStore};
use meshbridge_app::stats::StatsSnapshot;

use crate::state::AppState;

/// Bridge counters plus registry occupancy.
#[derive(Serialize)]
pub struct StatsBody {
    #[serde(flatten)]
    pub counters: StatsSnapshot,
    pub devices: usize,
    pub capacity: usize,
}

/// Possible responses from the stats endpoint.
pub enum GetResponse {
    Ok(Json<StatsBody>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/stats`
pub async fn get<M, B, S>(State(state): State<AppState<M, B, S>>) -> GetResponse
where
    M: MeshTransport + Send + Sync + 'static,
    B: CloudBus + Send + Sync + 'static,
    S: SnapshotStore + Send + Sync + 'static,
{
    let registry = state.bridge.registry();
    GetResponse::Ok(Json(StatsBody {
        counters: state.bridge.stats(),
        devices: registry.len().await,
        capacity: registry.capacity(),
    }))
}
