use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use super::urgency::{urgency_for, UrgencyClassification};
use crate::models::{Equipment, Job, JobStatus, TimeOffRequest, Vehicle, Worker};

/// Dispatch-table row: a job with its crew, vehicles and equipment resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JobRow {
    pub id: i32,
    pub name: String,
    pub client: Option<String>,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: JobStatus,
    pub workers: Vec<String>,
    pub vehicles: Vec<String>,
    pub equipment: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TimeOffRow {
    #[serde(flatten)]
    pub request: TimeOffRequest,
    pub worker_name: String,
    pub duration_days: i64,
    pub urgency: Option<UrgencyClassification>,
}

fn unknown(id: i32) -> String {
    format!("Unknown (#{})", id)
}

fn resolve(ids: &[i32], names: &HashMap<i32, String>) -> Vec<String> {
    ids.iter()
        .map(|id| names.get(id).cloned().unwrap_or_else(|| unknown(*id)))
        .collect()
}

fn worker_names(workers: &[Worker]) -> HashMap<i32, String> {
    workers.iter().map(|w| (w.id, w.full_name())).collect()
}

pub fn assemble_job_rows(
    jobs: Vec<Job>,
    workers: &[Worker],
    vehicles: &[Vehicle],
    equipment: &[Equipment],
) -> Vec<JobRow> {
    let worker_names = worker_names(workers);
    let vehicle_names: HashMap<i32, String> = vehicles.iter().map(|v| (v.id, v.display_name())).collect();
    let equipment_names: HashMap<i32, String> = equipment.iter().map(|e| (e.id, e.name.clone())).collect();

    jobs.into_iter()
        .map(|job| JobRow {
            workers: resolve(&job.worker_ids, &worker_names),
            vehicles: resolve(&job.vehicle_ids, &vehicle_names),
            equipment: resolve(&job.equipment_ids, &equipment_names),
            id: job.id,
            name: job.name,
            client: job.client,
            location: job.location,
            start_date: job.start_date,
            end_date: job.end_date,
            status: job.status,
        })
        .collect()
}

pub fn assemble_time_off_rows(
    requests: Vec<TimeOffRequest>,
    workers: &[Worker],
    today: NaiveDate,
) -> Vec<TimeOffRow> {
    let names = worker_names(workers);

    requests
        .into_iter()
        .map(|request| TimeOffRow {
            worker_name: names
                .get(&request.worker_id)
                .cloned()
                .unwrap_or_else(|| unknown(request.worker_id)),
            duration_days: request.duration_days(),
            urgency: urgency_for(&request, today),
            request,
        })
        .collect()
}
