use axum::{
    http::{header, HeaderName, Method},
    middleware,
    response::Html,
    routing::{delete, get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;

use crate::{
    handlers,
    middleware::{metrics_middleware, request_id_middleware, require_debug_key},
    openapi::ApiDoc,
    AppState,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(state.config.cors_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([HeaderName::from_static("x-request-id")])
        .allow_credentials(true);

    // Time-off routes; static segments before /{id}
    let time_off_routes = Router::new()
        .route(
            "/",
            get(handlers::time_off_handler::get_time_off).post(handlers::time_off_handler::create_time_off),
        )
        .route("/urgent", get(handlers::time_off_handler::get_urgent_time_off))
        .route("/validate", post(handlers::time_off_handler::validate_time_off))
        .route("/bulk-delete", post(handlers::time_off_handler::bulk_delete_time_off))
        .route("/{id}/approve", put(handlers::time_off_handler::approve_time_off))
        .route("/{id}/reject", put(handlers::time_off_handler::reject_time_off))
        .route("/{id}", delete(handlers::time_off_handler::delete_own_time_off));

    // Admin routes
    let admin_routes = Router::new().route(
        "/time-off/{id}",
        delete(handlers::time_off_handler::admin_delete_time_off),
    );

    // Worker availability routes
    let worker_routes = Router::new()
        .route(
            "/{id}/disabled-dates",
            get(handlers::availability_handler::get_disabled_dates),
        )
        .route(
            "/{id}/disabled-dates/check",
            get(handlers::availability_handler::check_date),
        );

    // Job routes
    let job_routes = Router::new().route("/", get(handlers::jobs_handler::get_jobs));

    // Metrics, only served when DEBUG_KEY is set
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_debug_key));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(metrics_routes)
        .nest("/api/time-off", time_off_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/workers", worker_routes)
        .nest("/api/jobs", job_routes)
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/swagger-ui", get(swagger_ui))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state)
}

async fn swagger_ui() -> Html<&'static str> {
    Html(r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Crewrota API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: '/api-docs/openapi.json',
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout"
            });
        };
    </script>
</body>
</html>
    "#)
}
