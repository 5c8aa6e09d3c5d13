use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;

use emotune_core::detector::DetectError;
use emotune_types::api::ErrorResponse;

/// Failures of the JSON recommendation endpoints, always reported as `{"error": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    BadJson(#[from] JsonRejection),

    #[error(transparent)]
    Detect(#[from] DetectError),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Detect(DetectError::Classifier(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Detect(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!("Recommendation request failed: {}", self);
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (self.status(), body).into_response()
    }
}
