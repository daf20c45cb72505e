use async_trait::async_trait;
use moka::future::Cache;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{DeleteScope, UpstreamResult, WorkforceApi};
use crate::models::{
    ConflictCheckRequest, ConflictCheckResponse, CreateTimeOffInput, Equipment, Job, JobAssignment,
    TimeOffRequest, Vehicle, Worker,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Query {
    TimeOff(Option<i32>),
    JobAssignments(Option<i32>),
    Jobs,
    Workers,
    Vehicles,
    Equipment,
}

/// Results are cached per caller, since the API scopes data by token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct QueryKey {
    token: String,
    query: Query,
}

impl QueryKey {
    fn new(token: &str, query: Query) -> Self {
        Self {
            token: token.to_string(),
            query,
        }
    }
}

#[derive(Clone)]
enum Cached {
    TimeOff(Arc<Vec<TimeOffRequest>>),
    JobAssignments(Arc<Vec<JobAssignment>>),
    Jobs(Arc<Vec<Job>>),
    Workers(Arc<Vec<Worker>>),
    Vehicles(Arc<Vec<Vehicle>>),
    Equipment(Arc<Vec<Equipment>>),
}

/// A query cache plus a generation bumped on every invalidation. A fetch
/// that started under an older generation must not populate the cache.
struct QueryCache {
    entries: Cache<QueryKey, Cached>,
    generation: AtomicU64,
}

impl QueryCache {
    fn new(ttl: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(10_000)
                .build(),
            generation: AtomicU64::new(0),
        }
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn invalidate_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.entries.invalidate_all();
    }

    async fn get_or_fetch<T, Fut>(
        &self,
        key: QueryKey,
        wrap: fn(Arc<Vec<T>>) -> Cached,
        unwrap: fn(Cached) -> Option<Arc<Vec<T>>>,
        fetch: Fut,
    ) -> UpstreamResult<Vec<T>>
    where
        T: Clone,
        Fut: Future<Output = UpstreamResult<Vec<T>>>,
    {
        if let Some(hit) = self.entries.get(&key).await.and_then(unwrap) {
            tracing::debug!(query = ?key.query, "Query cache hit");
            return Ok(hit.as_ref().clone());
        }

        let started = self.generation();
        let items = Arc::new(fetch.await?);

        if self.generation() != started {
            tracing::debug!(query = ?key.query, "Invalidated during fetch, not caching");
            return Ok(items.as_ref().clone());
        }

        self.entries.insert(key.clone(), wrap(items.clone())).await;

        // An invalidation between the check and the insert may have missed this entry.
        if self.generation() != started {
            self.entries.invalidate(&key).await;
        }

        Ok(items.as_ref().clone())
    }
}

/// Read-through cache in front of another `WorkforceApi`.
///
/// Schedule data (time off, job assignments) and reference data (jobs,
/// workers, vehicles, equipment) live in separate caches so that time-off
/// mutations only drop the former.
pub struct CachedWorkforceApi<A> {
    inner: A,
    schedule: QueryCache,
    reference: QueryCache,
}

impl<A: WorkforceApi> CachedWorkforceApi<A> {
    pub fn new(inner: A, ttl: Duration) -> Self {
        Self {
            inner,
            schedule: QueryCache::new(ttl),
            reference: QueryCache::new(ttl),
        }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    fn invalidate_schedule(&self) {
        self.schedule.invalidate_all();
    }
}

#[async_trait]
impl<A: WorkforceApi> WorkforceApi for CachedWorkforceApi<A> {
    async fn list_time_off(&self, token: &str, worker_id: Option<i32>) -> UpstreamResult<Vec<TimeOffRequest>> {
        self.schedule
            .get_or_fetch(
                QueryKey::new(token, Query::TimeOff(worker_id)),
                Cached::TimeOff,
                |c| match c {
                    Cached::TimeOff(v) => Some(v),
                    _ => None,
                },
                self.inner.list_time_off(token, worker_id),
            )
            .await
    }

    async fn list_job_assignments(&self, token: &str, worker_id: Option<i32>) -> UpstreamResult<Vec<JobAssignment>> {
        self.schedule
            .get_or_fetch(
                QueryKey::new(token, Query::JobAssignments(worker_id)),
                Cached::JobAssignments,
                |c| match c {
                    Cached::JobAssignments(v) => Some(v),
                    _ => None,
                },
                self.inner.list_job_assignments(token, worker_id),
            )
            .await
    }

    async fn list_jobs(&self, token: &str) -> UpstreamResult<Vec<Job>> {
        self.reference
            .get_or_fetch(
                QueryKey::new(token, Query::Jobs),
                Cached::Jobs,
                |c| match c {
                    Cached::Jobs(v) => Some(v),
                    _ => None,
                },
                self.inner.list_jobs(token),
            )
            .await
    }

    async fn list_workers(&self, token: &str) -> UpstreamResult<Vec<Worker>> {
        self.reference
            .get_or_fetch(
                QueryKey::new(token, Query::Workers),
                Cached::Workers,
                |c| match c {
                    Cached::Workers(v) => Some(v),
                    _ => None,
                },
                self.inner.list_workers(token),
            )
            .await
    }

    async fn list_vehicles(&self, token: &str) -> UpstreamResult<Vec<Vehicle>> {
        self.reference
            .get_or_fetch(
                QueryKey::new(token, Query::Vehicles),
                Cached::Vehicles,
                |c| match c {
                    Cached::Vehicles(v) => Some(v),
                    _ => None,
                },
                self.inner.list_vehicles(token),
            )
            .await
    }

    async fn list_equipment(&self, token: &str) -> UpstreamResult<Vec<Equipment>> {
        self.reference
            .get_or_fetch(
                QueryKey::new(token, Query::Equipment),
                Cached::Equipment,
                |c| match c {
                    Cached::Equipment(v) => Some(v),
                    _ => None,
                },
                self.inner.list_equipment(token),
            )
            .await
    }

    async fn create_time_off(&self, token: &str, input: &CreateTimeOffInput) -> UpstreamResult<TimeOffRequest> {
        let created = self.inner.create_time_off(token, input).await?;
        self.invalidate_schedule();
        Ok(created)
    }

    async fn check_time_off_conflict(
        &self,
        token: &str,
        request: &ConflictCheckRequest,
    ) -> UpstreamResult<ConflictCheckResponse> {
        self.inner.check_time_off_conflict(token, request).await
    }

    async fn approve_time_off(&self, token: &str, id: i32, admin_notes: Option<String>) -> UpstreamResult<TimeOffRequest> {
        let updated = self.inner.approve_time_off(token, id, admin_notes).await?;
        self.invalidate_schedule();
        Ok(updated)
    }

    async fn reject_time_off(&self, token: &str, id: i32, admin_notes: Option<String>) -> UpstreamResult<TimeOffRequest> {
        let updated = self.inner.reject_time_off(token, id, admin_notes).await?;
        self.invalidate_schedule();
        Ok(updated)
    }

    async fn delete_time_off(&self, token: &str, id: i32, scope: DeleteScope) -> UpstreamResult<()> {
        // A failed delete may still have landed upstream.
        let result = self.inner.delete_time_off(token, id, scope).await;
        self.invalidate_schedule();
        result
    }
}
