use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::AppError;

/// Session token from the `__session` cookie (dashboard) or a Bearer
/// `Authorization` header (scripts, tests).
fn extract_token_from_request(parts: &Parts) -> Option<String> {
    if let Some(cookie_header) = parts.headers.get(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                if let Some(value) = cookie.trim().strip_prefix("__session=") {
                    if !value.is_empty() {
                        return Some(value.to_string());
                    }
                }
            }
        }
    }

    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Caller credentials, forwarded unchanged to the workforce API which owns
/// identity and permissions.
#[derive(Debug, Clone)]
pub struct CallerToken(pub String);

impl CallerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CallerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_token_from_request(parts).map(CallerToken).ok_or_else(|| {
            tracing::debug!(path = %parts.uri.path(), "Request without session token");
            AppError::Unauthorized(
                "Missing authentication: no __session cookie or Authorization header".to_string(),
            )
        })
    }
}
