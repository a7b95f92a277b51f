//! Error types for the RTT API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rtt_core::RttError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Analysis(#[from] RttError),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Analysis(RttError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Analysis(e) if e.is_user_error() => StatusCode::BAD_REQUEST,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Analysis(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = if status.is_server_error() {
            tracing::error!("Internal error: {}", self);
            format!("An internal server error occurred: {}", self)
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "detail": detail,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
