use async_trait::async_trait;
use metrics::counter;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::{error::classify, DeleteScope, UpstreamError, UpstreamResult, WorkforceApi};
use crate::models::{
    AdminDecisionPayload, ConflictCheckRequest, ConflictCheckResponse, CreateTimeOffInput, Equipment, Job,
    JobAssignment, TimeOffRequest, Vehicle, Worker,
};

/// `WorkforceApi` over the REST endpoints of the workforce service.
#[derive(Clone)]
pub struct HttpWorkforceApi {
    client: Client,
    base_url: String,
}

impl HttpWorkforceApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .bearer_auth(token)
            .header("Accept", "application/json")
    }

    async fn send(&self, operation: &'static str, builder: RequestBuilder) -> UpstreamResult<Response> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!(error = %e, operation, "Failed to call workforce API");
            counter!("upstream_requests_total", "operation" => operation, "outcome" => "transport_error")
                .increment(1);
            UpstreamError::from(e)
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body, operation, "Workforce API returned error");
            counter!("upstream_requests_total", "operation" => operation, "outcome" => "api_error").increment(1);
            return Err(classify(status, &body));
        }

        counter!("upstream_requests_total", "operation" => operation, "outcome" => "ok").increment(1);
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(&self, operation: &'static str, builder: RequestBuilder) -> UpstreamResult<T> {
        let response = self.send(operation, builder).await?;
        response.json::<T>().await.map_err(|e| {
            tracing::error!(error = %e, operation, "Failed to parse workforce API response");
            UpstreamError::Decode(e.to_string())
        })
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        token: &str,
        worker_id: Option<i32>,
    ) -> UpstreamResult<Vec<T>> {
        let mut builder = self.request(Method::GET, path, token);
        if let Some(worker_id) = worker_id {
            builder = builder.query(&[("worker_id", worker_id)]);
        }
        let items: Vec<T> = self.json(operation, builder).await?;
        tracing::debug!(operation, count = items.len(), "Fetched collection");
        Ok(items)
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        token: &str,
        body: &B,
    ) -> UpstreamResult<T> {
        self.json(operation, self.request(method, path, token).json(body)).await
    }
}

#[async_trait]
impl WorkforceApi for HttpWorkforceApi {
    async fn list_time_off(&self, token: &str, worker_id: Option<i32>) -> UpstreamResult<Vec<TimeOffRequest>> {
        self.get_list("list_time_off", "time-off", token, worker_id).await
    }

    async fn list_job_assignments(&self, token: &str, worker_id: Option<i32>) -> UpstreamResult<Vec<JobAssignment>> {
        self.get_list("list_job_assignments", "job-assignments", token, worker_id)
            .await
    }

    async fn list_jobs(&self, token: &str) -> UpstreamResult<Vec<Job>> {
        self.get_list("list_jobs", "jobs", token, None).await
    }

    async fn list_workers(&self, token: &str) -> UpstreamResult<Vec<Worker>> {
        self.get_list("list_workers", "workers", token, None).await
    }

    async fn list_vehicles(&self, token: &str) -> UpstreamResult<Vec<Vehicle>> {
        self.get_list("list_vehicles", "vehicles", token, None).await
    }

    async fn list_equipment(&self, token: &str) -> UpstreamResult<Vec<Equipment>> {
        self.get_list("list_equipment", "equipment", token, None).await
    }

    async fn create_time_off(&self, token: &str, input: &CreateTimeOffInput) -> UpstreamResult<TimeOffRequest> {
        self.send_json("create_time_off", Method::POST, "time-off", token, input)
            .await
    }

    async fn check_time_off_conflict(
        &self,
        token: &str,
        request: &ConflictCheckRequest,
    ) -> UpstreamResult<ConflictCheckResponse> {
        self.send_json(
            "check_time_off_conflict",
            Method::POST,
            "time-off/check-conflict",
            token,
            request,
        )
        .await
    }

    async fn approve_time_off(&self, token: &str, id: i32, admin_notes: Option<String>) -> UpstreamResult<TimeOffRequest> {
        let payload = AdminDecisionPayload { id, admin_notes };
        self.send_json(
            "approve_time_off",
            Method::PUT,
            &format!("time-off/{}/approve", id),
            token,
            &payload,
        )
        .await
    }

    async fn reject_time_off(&self, token: &str, id: i32, admin_notes: Option<String>) -> UpstreamResult<TimeOffRequest> {
        let payload = AdminDecisionPayload { id, admin_notes };
        self.send_json(
            "reject_time_off",
            Method::PUT,
            &format!("time-off/{}/reject", id),
            token,
            &payload,
        )
        .await
    }

    async fn delete_time_off(&self, token: &str, id: i32, scope: DeleteScope) -> UpstreamResult<()> {
        let path = delete_path(id, scope);
        self.send("delete_time_off", self.request(Method::DELETE, &path, token))
            .await?;
        Ok(())
    }
}

fn delete_path(id: i32, scope: DeleteScope) -> String {
    match scope {
        DeleteScope::Own => format!("time-off/{}", id),
        DeleteScope::Admin => format!("admin/time-off/{}", id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let api = HttpWorkforceApi::new("https://api.example.com/v1/", Duration::from_secs(5)).unwrap();
        assert_eq!(api.url("/time-off"), "https://api.example.com/v1/time-off");
        assert_eq!(api.url("jobs"), "https://api.example.com/v1/jobs");
    }

    #[test]
    fn test_delete_scopes_use_distinct_endpoints() {
        assert_eq!(delete_path(4, DeleteScope::Own), "time-off/4");
        assert_eq!(delete_path(4, DeleteScope::Admin), "admin/time-off/4");
    }

    #[tokio::test]
    #[ignore] // Needs a running workforce API and UPSTREAM_API_URL / UPSTREAM_API_TOKEN
    async fn test_list_time_off_against_live_api() {
        let base = std::env::var("UPSTREAM_API_URL").unwrap();
        let token = std::env::var("UPSTREAM_API_TOKEN").unwrap();
        let api = HttpWorkforceApi::new(base, Duration::from_secs(10)).unwrap();

        let result = api.list_time_off(&token, None).await;
        assert!(result.is_ok());
    }
}
