use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::{
    extractors::CallerToken,
    models::JobStatus,
    scheduling::{assemble_job_rows, sort_rows, text_matches, Filter, JobRow, SortOrder},
    AppResult, AppState,
};

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobSortKey {
    #[default]
    StartDate,
    Name,
    Client,
    Status,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct GetJobsQuery {
    pub status: Option<JobStatus>,
    pub search: Option<String>,
    pub sort: Option<JobSortKey>,
    pub order: Option<SortOrder>,
}

fn job_filter(query: &GetJobsQuery) -> Filter<JobRow> {
    Filter::new()
        .and_if(query.status, |row: &JobRow, status: &JobStatus| row.status == *status)
        .and_if(
            query.search.clone().filter(|s| !s.trim().is_empty()),
            |row: &JobRow, needle: &String| {
                let mut columns = vec![
                    row.name.clone(),
                    row.client.clone().unwrap_or_default(),
                    row.location.clone().unwrap_or_default(),
                ];
                columns.extend(row.workers.iter().cloned());
                columns.extend(row.vehicles.iter().cloned());
                columns.extend(row.equipment.iter().cloned());
                text_matches(needle, &columns)
            },
        )
}

/// GET /api/jobs?status=&search=&sort=&order=
#[utoipa::path(
    get,
    path = "/api/jobs",
    params(GetJobsQuery),
    responses(
        (status = 200, description = "Jobs with crew, vehicle and equipment names resolved", body = Vec<JobRow>)
    ),
    tag = "jobs",
    security(("cookie_auth" = []))
)]
pub async fn get_jobs(
    State(state): State<Arc<AppState>>,
    token: CallerToken,
    Query(query): Query<GetJobsQuery>,
) -> AppResult<Json<Vec<JobRow>>> {
    let token = token.as_str();
    let (jobs, workers, vehicles, equipment) = tokio::try_join!(
        state.api.list_jobs(token),
        state.api.list_workers(token),
        state.api.list_vehicles(token),
        state.api.list_equipment(token),
    )?;

    let rows = assemble_job_rows(jobs, &workers, &vehicles, &equipment);
    let mut rows = job_filter(&query).apply(rows);

    let order = query.order.unwrap_or_default();
    match query.sort.unwrap_or_default() {
        JobSortKey::StartDate => sort_rows(&mut rows, order, |r| r.start_date),
        JobSortKey::Name => sort_rows(&mut rows, order, |r| r.name.to_lowercase()),
        JobSortKey::Client => sort_rows(&mut rows, order, |r| r.client.as_deref().map(str::to_lowercase)),
        JobSortKey::Status => sort_rows(&mut rows, order, |r| r.status as u8),
    }

    Ok(Json(rows))
}
