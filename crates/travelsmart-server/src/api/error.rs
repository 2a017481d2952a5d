//! API error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use travelsmart_core::CoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Itinerary(#[from] CoreError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Itinerary(CoreError::UnknownDestination(_)) => StatusCode::NOT_FOUND,
            ApiError::Itinerary(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(%status, error = %self, "Rejected itinerary request");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
