//! Router harness for handler tests: a fake workforce API and a fixed clock.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use crate::{startup, upstream::fake::FakeWorkforceApi, AppConfig, AppState, FixedClock, MetricsState};

pub const TEST_TOKEN: &str = "test-token";

pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub struct TestApp {
    pub fake: Arc<FakeWorkforceApi>,
    pub router: Router,
}

impl TestApp {
    /// Today is 2026-10-19, so the earliest requestable start is 2026-11-02.
    pub fn new() -> Self {
        Self::with_config(AppConfig::for_tests())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let fake = Arc::new(FakeWorkforceApi::default());
        let state = Arc::new(AppState::new(
            fake.clone(),
            Arc::new(FixedClock(day("2026-10-19"))),
            config,
            Arc::new(MetricsState::detached()),
        ));

        Self {
            fake,
            router: startup::build_router(state),
        }
    }

    pub async fn request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    pub async fn request_without_token(&self, method: Method, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.request(request).await
    }
}

pub async fn get(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", TEST_TOKEN))
        .body(Body::empty())
        .unwrap();
    app.request(request).await
}

/// Sends `body` as JSON; `Value::Null` sends no body.
pub async fn send(app: &TestApp, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", TEST_TOKEN));

    let request = if body.is_null() {
        builder.body(Body::empty()).unwrap()
    } else {
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    };
    app.request(request).await
}
