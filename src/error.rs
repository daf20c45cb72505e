use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::scheduling::ValidationErrors;

/// Machine-readable code sent with time-off overlap rejections.
pub const TIME_OFF_CONFLICT_CODE: &str = "TIME_OFF_CONFLICT";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    TimeOffConflict(String),

    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("Upstream: {0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "error": msg })),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::TimeOffConflict(msg) => (
                StatusCode::CONFLICT,
                json!({ "error": msg, "code": TIME_OFF_CONFLICT_CODE }),
            ),
            AppError::Validation(errors) => {
                let first = errors.first();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    json!({
                        "error": first.map(|e| e.message.clone()).unwrap_or_default(),
                        "field": first.map(|e| e.field.clone()),
                        "errors": errors.errors,
                    }),
                )
            }
            AppError::Upstream(msg) => {
                tracing::error!(error = %msg, "Upstream API failure");
                (StatusCode::BAD_GATEWAY, json!({ "error": msg }))
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
