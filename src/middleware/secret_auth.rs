use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

use crate::AppState;

/// Requires a matching `X-Debug-Key` header. Without a configured key the
/// guarded routes are disabled.
pub async fn require_debug_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected_key) = state.config.debug_key.as_deref() else {
        tracing::debug!(path = %request.uri().path(), "Debug key not configured, route disabled");
        return Err(StatusCode::NOT_FOUND);
    };

    let provided_key = request
        .headers()
        .get("X-Debug-Key")
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // Constant-time comparison
    if expected_key.as_bytes().ct_eq(provided_key.as_bytes()).into() {
        Ok(next.run(request).await)
    } else {
        tracing::warn!("Unauthorized metrics access attempt");
        Err(StatusCode::UNAUTHORIZED)
    }
}
