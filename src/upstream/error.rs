use reqwest::StatusCode;
use serde::Deserialize;

use crate::AppError;

/// Error codes the workforce API attaches to failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    TimeOffConflict,
    NotFound,
    ValidationError,
    Forbidden,
    Unauthorized,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default, alias = "message")]
    error: Option<String>,
    #[serde(default)]
    code: Option<ApiErrorCode>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UpstreamError {
    #[error("request to workforce API failed: {0}")]
    Transport(String),

    #[error("workforce API returned {status}: {message}")]
    Api {
        status: u16,
        code: Option<ApiErrorCode>,
        message: String,
    },

    #[error("unexpected workforce API response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            UpstreamError::Decode(e.to_string())
        } else {
            UpstreamError::Transport(e.to_string())
        }
    }
}

/// Builds an error from a non-success response. The `code` field decides the
/// kind; the message text is carried for display only.
pub fn classify(status: StatusCode, body: &str) -> UpstreamError {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();

    let code = parsed.as_ref().and_then(|b| b.code);
    let message = parsed
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    UpstreamError::Api {
        status: status.as_u16(),
        code,
        message,
    }
}

impl From<UpstreamError> for AppError {
    fn from(e: UpstreamError) -> Self {
        match e {
            UpstreamError::Api {
                code: Some(ApiErrorCode::TimeOffConflict),
                message,
                ..
            } => AppError::TimeOffConflict(message),
            UpstreamError::Api {
                code: Some(ApiErrorCode::NotFound),
                message,
                ..
            }
            | UpstreamError::Api {
                status: 404, message, ..
            } => AppError::NotFound(message),
            UpstreamError::Api {
                code: Some(ApiErrorCode::ValidationError),
                message,
                ..
            }
            | UpstreamError::Api {
                status: 400 | 422,
                message,
                ..
            } => AppError::BadRequest(message),
            UpstreamError::Api {
                code: Some(ApiErrorCode::Forbidden),
                message,
                ..
            }
            | UpstreamError::Api {
                status: 403, message, ..
            } => AppError::Forbidden(message),
            UpstreamError::Api {
                code: Some(ApiErrorCode::Unauthorized),
                message,
                ..
            }
            | UpstreamError::Api {
                status: 401, message, ..
            } => AppError::Unauthorized(message),
            other => AppError::Upstream(other.to_string()),
        }
    }
}
