//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use meshbridge_domain::error::{GatewayError, RegistryError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps request and [`GatewayError`] failures to HTTP responses.
pub enum ApiError {
    /// The request itself is unusable.
    BadRequest(String),
    /// The bridge refused or failed the operation.
    Gateway(GatewayError),
}

impl ApiError {
    /// Build a `400 Bad Request` from anything displayable.
    pub fn bad_request(err: impl std::fmt::Display) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self::Gateway(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::Gateway(GatewayError::Registry(err)) => {
                let status = match err {
                    RegistryError::AlreadyExists(_) => StatusCode::CONFLICT,
                    RegistryError::Full { .. } => StatusCode::INSUFFICIENT_STORAGE,
                };
                (status, err.to_string())
            }
            Self::Gateway(GatewayError::NotFound(err)) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::Gateway(GatewayError::Decode(err)) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::Gateway(GatewayError::Parse(err)) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::Gateway(err @ (GatewayError::Transport(_) | GatewayError::Storage(_))) => {
                tracing::error!(error = %err, "gateway error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
