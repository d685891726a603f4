use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::services::heygen::HeyGenError;

/// Error returned by route handlers, rendered as `{"error": {"message": ...}}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    HeyGen(#[from] HeyGenError),

    #[error("{0}")]
    BadRequest(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = rejection.status().as_u16(), "Rejected request body");
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::HeyGen(HeyGenError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::HeyGen(HeyGenError::Upstream {
                status_code,
                message,
            }) => {
                // Upstream answered 2xx with something unusable: that is our gateway failing.
                let status = StatusCode::from_u16(*status_code)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (status, message.clone())
            }
            AppError::HeyGen(e @ (HeyGenError::Http(_) | HeyGenError::Decode(_))) => {
                tracing::error!(error = %e, "Upstream transport error");
                (StatusCode::BAD_GATEWAY, e.to_string())
            }
        };

        (status, Json(json!({ "error": { "message": message } }))).into_response()
    }
}
