//! In-memory `WorkforceApi` for tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use super::{ApiErrorCode, DeleteScope, UpstreamError, UpstreamResult, WorkforceApi};
use crate::models::{
    ConflictCheckRequest, ConflictCheckResponse, CreateTimeOffInput, Equipment, Job, JobAssignment,
    TimeOffRequest, TimeOffStatus, TimeOffType, Vehicle, Worker,
};

pub fn sample_request(id: i32, status: TimeOffStatus) -> TimeOffRequest {
    let date = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
    TimeOffRequest {
        id,
        worker_id: 1,
        request_type: TimeOffType::Vacation,
        start_date: date,
        end_date: date,
        status,
        reason: "family".to_string(),
        admin_notes: None,
        confirmed_by: None,
        created_at: None,
    }
}

#[derive(Default)]
struct State {
    time_off: Vec<TimeOffRequest>,
    assignments: Vec<JobAssignment>,
    jobs: Vec<Job>,
    workers: Vec<Worker>,
    vehicles: Vec<Vehicle>,
    equipment: Vec<Equipment>,
    conflict: bool,
    fail_assignments: bool,
    fail_deletes: HashSet<i32>,
    deleted: Vec<(i32, DeleteScope)>,
    conflict_checks: Vec<ConflictCheckRequest>,
    calls: HashMap<&'static str, usize>,
    next_id: i32,
}

#[derive(Default)]
pub struct FakeWorkforceApi {
    state: Mutex<State>,
}

impl FakeWorkforceApi {
    fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    fn record(&self, operation: &'static str) {
        self.with(|s| *s.calls.entry(operation).or_default() += 1);
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.with(|s| s.calls.get(operation).copied().unwrap_or(0))
    }

    pub fn push_time_off(&self, request: TimeOffRequest) {
        self.with(|s| s.time_off.push(request));
    }

    pub fn push_assignment(&self, assignment: JobAssignment) {
        self.with(|s| s.assignments.push(assignment));
    }

    pub fn push_job(&self, job: Job) {
        self.with(|s| s.jobs.push(job));
    }

    pub fn push_worker(&self, worker: Worker) {
        self.with(|s| s.workers.push(worker));
    }

    pub fn push_vehicle(&self, vehicle: Vehicle) {
        self.with(|s| s.vehicles.push(vehicle));
    }

    pub fn push_equipment(&self, equipment: Equipment) {
        self.with(|s| s.equipment.push(equipment));
    }

    pub fn set_conflict(&self, conflict: bool) {
        self.with(|s| s.conflict = conflict);
    }

    pub fn fail_assignments(&self) {
        self.with(|s| s.fail_assignments = true);
    }

    pub fn fail_delete(&self, id: i32) {
        self.with(|s| {
            s.fail_deletes.insert(id);
        });
    }

    pub fn deleted(&self) -> Vec<(i32, DeleteScope)> {
        self.with(|s| s.deleted.clone())
    }

    pub fn time_off_ids(&self) -> Vec<i32> {
        self.with(|s| s.time_off.iter().map(|r| r.id).collect())
    }

    pub fn conflict_checks(&self) -> Vec<ConflictCheckRequest> {
        self.with(|s| s.conflict_checks.clone())
    }

    fn decide(&self, id: i32, status: TimeOffStatus, admin_notes: Option<String>) -> UpstreamResult<TimeOffRequest> {
        self.with(|s| -> UpstreamResult<TimeOffRequest> {
            let request = s
                .time_off
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| not_found(id))?;
            request.status = status;
            request.admin_notes = admin_notes;
            Ok(request.clone())
        })
    }
}

fn not_found(id: i32) -> UpstreamError {
    UpstreamError::Api {
        status: 404,
        code: Some(ApiErrorCode::NotFound),
        message: format!("Time off request {} not found", id),
    }
}

#[async_trait]
impl WorkforceApi for FakeWorkforceApi {
    async fn list_time_off(&self, _token: &str, worker_id: Option<i32>) -> UpstreamResult<Vec<TimeOffRequest>> {
        self.record("list_time_off");
        Ok(self.with(|s| {
            s.time_off
                .iter()
                .filter(|r| worker_id.map_or(true, |w| r.worker_id == w))
                .cloned()
                .collect()
        }))
    }

    async fn list_job_assignments(&self, _token: &str, worker_id: Option<i32>) -> UpstreamResult<Vec<JobAssignment>> {
        self.record("list_job_assignments");
        self.with(|s| {
            if s.fail_assignments {
                return Err(UpstreamError::Transport("connection refused".to_string()));
            }
            Ok(s.assignments
                .iter()
                .filter(|a| worker_id.map_or(true, |w| a.worker_id == w))
                .cloned()
                .collect())
        })
    }

    async fn list_jobs(&self, _token: &str) -> UpstreamResult<Vec<Job>> {
        self.record("list_jobs");
        Ok(self.with(|s| s.jobs.clone()))
    }

    async fn list_workers(&self, _token: &str) -> UpstreamResult<Vec<Worker>> {
        self.record("list_workers");
        Ok(self.with(|s| s.workers.clone()))
    }

    async fn list_vehicles(&self, _token: &str) -> UpstreamResult<Vec<Vehicle>> {
        self.record("list_vehicles");
        Ok(self.with(|s| s.vehicles.clone()))
    }

    async fn list_equipment(&self, _token: &str) -> UpstreamResult<Vec<Equipment>> {
        self.record("list_equipment");
        Ok(self.with(|s| s.equipment.clone()))
    }

    async fn create_time_off(&self, _token: &str, input: &CreateTimeOffInput) -> UpstreamResult<TimeOffRequest> {
        self.record("create_time_off");
        Ok(self.with(|s| {
            s.next_id += 1;
            let request = TimeOffRequest {
                id: 1000 + s.next_id,
                worker_id: 1,
                request_type: input.request_type,
                start_date: input.start_date,
                end_date: input.end_date,
                status: TimeOffStatus::Pending,
                reason: input.reason.clone(),
                admin_notes: None,
                confirmed_by: None,
                created_at: None,
            };
            s.time_off.push(request.clone());
            request
        }))
    }

    async fn check_time_off_conflict(
        &self,
        _token: &str,
        request: &ConflictCheckRequest,
    ) -> UpstreamResult<ConflictCheckResponse> {
        self.record("check_time_off_conflict");
        Ok(self.with(|s| {
            s.conflict_checks.push(request.clone());
            ConflictCheckResponse {
                has_conflict: s.conflict,
            }
        }))
    }

    async fn approve_time_off(&self, _token: &str, id: i32, admin_notes: Option<String>) -> UpstreamResult<TimeOffRequest> {
        self.record("approve_time_off");
        self.decide(id, TimeOffStatus::Approved, admin_notes)
    }

    async fn reject_time_off(&self, _token: &str, id: i32, admin_notes: Option<String>) -> UpstreamResult<TimeOffRequest> {
        self.record("reject_time_off");
        self.decide(id, TimeOffStatus::Rejected, admin_notes)
    }

    async fn delete_time_off(&self, _token: &str, id: i32, scope: DeleteScope) -> UpstreamResult<()> {
        self.record("delete_time_off");
        self.with(|s| {
            if s.fail_deletes.contains(&id) {
                return Err(UpstreamError::Api {
                    status: 500,
                    code: None,
                    message: "delete failed".to_string(),
                });
            }
            let before = s.time_off.len();
            s.time_off.retain(|r| r.id != id);
            if s.time_off.len() == before {
                return Err(not_found(id));
            }
            s.deleted.push((id, scope));
            Ok(())
        })
    }
}
