use axum::http::HeaderValue;
use std::env;
use std::time::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_CACHE_TTL_SECS: u64 = 30;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub upstream_api_url: String,
    pub bind_addr: String,
    pub cors_origin: HeaderValue,
    pub cache_ttl: Duration,
    pub upstream_timeout: Duration,
    /// Guards `/metrics` when set.
    pub debug_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let upstream_api_url = env::var("UPSTREAM_API_URL")
            .map_err(|_| "UPSTREAM_API_URL must be set".to_string())?;
        let upstream_api_url = normalize_base_url(&upstream_api_url)?;

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let cors_origin = env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string())
            .parse::<HeaderValue>()
            .map_err(|e| format!("Invalid CORS_ORIGIN: {}", e))?;

        let cache_ttl = Duration::from_secs(parse_secs("CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?);
        let upstream_timeout = Duration::from_secs(parse_secs(
            "UPSTREAM_TIMEOUT_SECS",
            DEFAULT_UPSTREAM_TIMEOUT_SECS,
        )?);

        let debug_key = env::var("DEBUG_KEY").ok().filter(|k| !k.is_empty());

        Ok(Self {
            upstream_api_url,
            bind_addr,
            cors_origin,
            cache_ttl,
            upstream_timeout,
            debug_key,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            upstream_api_url: "http://upstream.test/api".to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            cors_origin: HeaderValue::from_static(DEFAULT_CORS_ORIGIN),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            debug_key: None,
        }
    }
}

fn parse_secs(var: &str, default: u64) -> Result<u64, String> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("{} must be a whole number of seconds", var)),
        Err(_) => Ok(default),
    }
}

fn normalize_base_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(format!("UPSTREAM_API_URL must be an http(s) URL, got '{}'", raw));
    }
    Ok(trimmed.to_string())
}
