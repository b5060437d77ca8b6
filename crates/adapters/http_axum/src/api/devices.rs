//! JSON handlers for the device registry.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use meshbridge_app::ports::{CloudBus, MeshTransport, SnapshotStore};
use meshbridge_domain::address::PhysicalAddress;
use meshbridge_domain::device::{DeviceClass, DeviceIdentity};
use meshbridge_domain::error::{GatewayError, NotFoundError};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for registering a device.
#[derive(Deserialize)]
pub struct RegisterDeviceRequest {
    pub mac: String,
    pub class: u8,
    pub id: u8,
}

impl RegisterDeviceRequest {
    fn into_identity(self) -> Result<DeviceIdentity, ApiError> {
        let address = self
            .mac
            .parse::<PhysicalAddress>()
            .map_err(ApiError::bad_request)?;
        let device_class = DeviceClass::try_from(self.class).map_err(ApiError::bad_request)?;
        Ok(DeviceIdentity::new(address, device_class, self.id))
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<DeviceIdentity>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<DeviceIdentity>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<DeviceIdentity>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// `GET /api/devices`
pub async fn list<M, B, S>(State(state): State<AppState<M, B, S>>) -> ListResponse
where
    M: MeshTransport + Send + Sync + 'static,
    B: CloudBus + Send + Sync + 'static,
    S: SnapshotStore + Send + Sync + 'static,
{
    let devices = state.bridge.registry().devices().await;
    ListResponse::Ok(Json(devices))
}

/// `GET /api/devices/{mac}`
pub async fn get<M, B, S>(
    State(state): State<AppState<M, B, S>>,
    Path(mac): Path<String>,
) -> Result<GetResponse, ApiError>
where
    M: MeshTransport + Send + Sync + 'static,
    B: CloudBus + Send + Sync + 'static,
    S: SnapshotStore + Send + Sync + 'static,
{
    let address = mac
        .parse::<PhysicalAddress>()
        .map_err(ApiError::bad_request)?;
    let device = state
        .bridge
        .registry()
        .find_by_address(address)
        .await
        .ok_or_else(|| {
            GatewayError::from(NotFoundError {
                entity: "Device",
                id: address.to_string(),
            })
        })?;
    Ok(GetResponse::Ok(Json(device)))
}

/// `POST /api/devices`
pub async fn create<M, B, S>(
    State(state): State<AppState<M, B, S>>,
    body: Result<Json<RegisterDeviceRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    M: MeshTransport + Send + Sync + 'static,
    B: CloudBus + Send + Sync + 'static,
    S: SnapshotStore + Send + Sync + 'static,
{
    let Json(req) = body.map_err(ApiError::bad_request)?;
    let identity = req.into_identity()?;
    state.bridge.register(identity).await?;
    Ok(CreateResponse::Created(Json(identity)))
}
