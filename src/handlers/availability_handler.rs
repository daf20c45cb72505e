use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::{
    extractors::CallerToken,
    scheduling::{
        disabled_dates, earliest_start, BlockReason, DateWindow, DisabledDate, DisabledDates, MAX_WINDOW_DAYS,
    },
    AppError, AppResult, AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct DisabledDatesQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DateCheckQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DisabledDatesResponse {
    pub worker_id: i32,
    pub earliest_start: NaiveDate,
    pub dates: Vec<DisabledDate>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DateCheckResponse {
    pub date: NaiveDate,
    pub disabled: bool,
    pub within_lead_time: bool,
    pub reasons: Vec<BlockReason>,
}

/// Builds the worker's blocked dates inside `window`. The result is advisory
/// (the API's conflict check is authoritative), so a failed job-assignment
/// fetch only narrows it.
async fn load_disabled_dates(
    state: &AppState,
    token: &CallerToken,
    worker_id: i32,
    window: DateWindow,
) -> AppResult<DisabledDates> {
    let (time_off, assignments) = tokio::join!(
        state.api.list_time_off(token.as_str(), Some(worker_id)),
        state.api.list_job_assignments(token.as_str(), Some(worker_id)),
    );

    let time_off = time_off?;
    let assignments = assignments.unwrap_or_else(|e| {
        tracing::warn!(error = %e, worker_id, "Job assignments unavailable, disabled dates cover time off only");
        Vec::new()
    });

    Ok(disabled_dates(&time_off, &assignments, window))
}

/// `from` defaults to today, `to` to a year after `from`.
fn requested_window(query: &DisabledDatesQuery, today: NaiveDate) -> AppResult<DateWindow> {
    let from = query.from.unwrap_or(today);
    let window = match query.to {
        Some(to) => DateWindow::new(from, to).ok_or_else(|| {
            AppError::BadRequest(format!("Window end {} is before window start {}", to, from))
        })?,
        None => DateWindow::from_horizon(from),
    };

    if window.num_days() > MAX_WINDOW_DAYS {
        return Err(AppError::BadRequest(format!(
            "Window spans {} days; at most {} are allowed",
            window.num_days(),
            MAX_WINDOW_DAYS
        )));
    }

    Ok(window)
}

/// GET /api/workers/{id}/disabled-dates?from=&to=
#[utoipa::path(
    get,
    path = "/api/workers/{id}/disabled-dates",
    params(
        ("id" = i32, Path, description = "Worker ID"),
        DisabledDatesQuery
    ),
    responses(
        (status = 200, description = "Dates unavailable for a new time-off request, with what blocks them", body = DisabledDatesResponse),
        (status = 400, description = "Window end before window start, or window too wide")
    ),
    tag = "availability",
    security(("cookie_auth" = []))
)]
pub async fn get_disabled_dates(
    State(state): State<Arc<AppState>>,
    token: CallerToken,
    Path(worker_id): Path<i32>,
    Query(query): Query<DisabledDatesQuery>,
) -> AppResult<Json<DisabledDatesResponse>> {
    let today = state.today();
    let window = requested_window(&query, today)?;

    let dates = load_disabled_dates(&state, &token, worker_id, window)
        .await?
        .entries();

    tracing::debug!(worker_id, count = dates.len(), "Returning disabled dates");

    Ok(Json(DisabledDatesResponse {
        worker_id,
        earliest_start: earliest_start(today),
        dates,
    }))
}

/// GET /api/workers/{id}/disabled-dates/check?date=
#[utoipa::path(
    get,
    path = "/api/workers/{id}/disabled-dates/check",
    params(
        ("id" = i32, Path, description = "Worker ID"),
        DateCheckQuery
    ),
    responses(
        (status = 200, description = "Whether the date picker should disable this date", body = DateCheckResponse)
    ),
    tag = "availability",
    security(("cookie_auth" = []))
)]
pub async fn check_date(
    State(state): State<Arc<AppState>>,
    token: CallerToken,
    Path(worker_id): Path<i32>,
    Query(query): Query<DateCheckQuery>,
) -> AppResult<Json<DateCheckResponse>> {
    let today = state.today();
    let disabled = load_disabled_dates(&state, &token, worker_id, DateWindow::single(query.date)).await?;

    Ok(Json(DateCheckResponse {
        date: query.date,
        disabled: disabled.should_disable(query.date, today),
        within_lead_time: query.date < earliest_start(today),
        reasons: disabled.reasons(query.date).to_vec(),
    }))
}
