use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crewrota_axum::{
    handlers, startup,
    upstream::{CachedWorkforceApi, HttpWorkforceApi},
    AppConfig, AppState, SystemClock,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with conditional JSON/text output
    let use_json = std::env::var("LOG_FORMAT")
        .unwrap_or_else(|_| "text".to_string()) == "json";

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,crewrota_axum=debug,tower_http=debug".into());

    if use_json {
        // Structured JSON logging for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Human-readable for development
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration error: {}", e);
        e
    })?;

    // Workforce API client behind a per-caller query cache
    let http = HttpWorkforceApi::new(config.upstream_api_url.clone(), config.upstream_timeout).map_err(|e| {
        tracing::error!("Failed to build workforce API client: {}", e);
        e
    })?;
    let api = Arc::new(CachedWorkforceApi::new(http, config.cache_ttl));
    tracing::info!(
        upstream = %config.upstream_api_url,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "Workforce API client ready"
    );

    // Initialize metrics recorder
    let metrics_state = Arc::new(handlers::setup_metrics_recorder()?);
    tracing::info!("Metrics recorder initialized");

    if config.debug_key.is_none() {
        tracing::warn!("DEBUG_KEY not set, /metrics is disabled");
    }

    let bind_addr = config.bind_addr.clone();

    // Create application state
    let state = Arc::new(AppState::new(api, Arc::new(SystemClock), config, metrics_state));

    // Build router
    let app = startup::build_router(state);

    // Start server
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
