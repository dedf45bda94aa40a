use std::time::Duration;

use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

/// Why a single road-routing call did not produce a usable path.
///
/// These never reach the API caller: the route falls back to its
/// straight-line candidate.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("road router request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("road router answered with code {code}: {message}")]
    Status { code: String, message: String },
    #[error("road router returned no route")]
    NoRoute,
    #[error("road router did not answer within {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoder request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoder returned an unparsable coordinate: {0}")]
    InvalidCoordinate(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to build GPX document: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
    #[error("route has no points to export")]
    EmptyRoute,
}

/// Errors surfaced to HTTP callers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("upstream service failed: {0}")]
    Upstream(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GeocodeError> for ApiError {
    fn from(err: GeocodeError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::EmptyRoute => ApiError::Validation(err.to_string()),
            ExportError::Gpx(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        } else {
            tracing::debug!("rejected request: {self}");
        }
        let body = shared::ApiError {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
