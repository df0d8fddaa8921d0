//! API error responses
//!
//! Load failures block the whole dashboard: the UI shows the message and no
//! partial figures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors returned by the dashboard endpoints
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed filter or page parameter
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Dataset could not be loaded or exported
    #[error(transparent)]
    Pipeline(#[from] logdash_common::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(logdash_common::Error::Schema(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() || status == StatusCode::UNPROCESSABLE_ENTITY {
            error!("{}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
