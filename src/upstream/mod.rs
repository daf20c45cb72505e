pub mod cache;
pub mod error;
#[cfg(test)]
pub mod fake;
pub mod http;

use async_trait::async_trait;

use crate::models::{
    ConflictCheckRequest, ConflictCheckResponse, CreateTimeOffInput, Equipment, Job, JobAssignment,
    TimeOffRequest, Vehicle, Worker,
};

pub use cache::CachedWorkforceApi;
pub use error::{ApiErrorCode, UpstreamError};
pub use http::HttpWorkforceApi;

pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Which delete endpoint to call: workers remove their own pending requests,
/// admins can remove any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeleteScope {
    Own,
    Admin,
}

/// The remote workforce API. Every call forwards the caller's bearer token.
#[async_trait]
pub trait WorkforceApi: Send + Sync {
    async fn list_time_off(&self, token: &str, worker_id: Option<i32>) -> UpstreamResult<Vec<TimeOffRequest>>;

    async fn list_job_assignments(&self, token: &str, worker_id: Option<i32>) -> UpstreamResult<Vec<JobAssignment>>;

    async fn list_jobs(&self, token: &str) -> UpstreamResult<Vec<Job>>;

    async fn list_workers(&self, token: &str) -> UpstreamResult<Vec<Worker>>;

    async fn list_vehicles(&self, token: &str) -> UpstreamResult<Vec<Vehicle>>;

    async fn list_equipment(&self, token: &str) -> UpstreamResult<Vec<Equipment>>;

    async fn create_time_off(&self, token: &str, input: &CreateTimeOffInput) -> UpstreamResult<TimeOffRequest>;

    /// Authoritative overlap check for the caller's own schedule.
    async fn check_time_off_conflict(
        &self,
        token: &str,
        request: &ConflictCheckRequest,
    ) -> UpstreamResult<ConflictCheckResponse>;

    async fn approve_time_off(&self, token: &str, id: i32, admin_notes: Option<String>) -> UpstreamResult<TimeOffRequest>;

    async fn reject_time_off(&self, token: &str, id: i32, admin_notes: Option<String>) -> UpstreamResult<TimeOffRequest>;

    async fn delete_time_off(&self, token: &str, id: i32, scope: DeleteScope) -> UpstreamResult<()>;
}
