use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::{
    extractors::CallerToken,
    models::{
        AdminDecisionInput, BulkDeleteInput, BulkDeleteResponse, ConflictCheckRequest, CreateTimeOffInput,
        TimeOffMutationResponse, TimeOffRequest, TimeOffStatus, TimeOffType, ValidateTimeOffInput,
        ValidateTimeOffResponse,
    },
    scheduling::{
        assemble_time_off_rows, earliest_start, plan_delete, run_sequential, sort_rows, text_matches,
        validate_request_range, Filter, SortOrder, TimeOffRow, ValidationErrors,
    },
    upstream::DeleteScope,
    AppError, AppResult, AppState,
};

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeOffSortKey {
    #[default]
    StartDate,
    EndDate,
    CreatedAt,
    Worker,
    Status,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct GetTimeOffQuery {
    pub status: Option<TimeOffStatus>,
    #[serde(rename = "type")]
    pub request_type: Option<TimeOffType>,
    #[serde(rename = "workerId")]
    pub worker_id: Option<i32>,
    pub search: Option<String>,
    pub sort: Option<TimeOffSortKey>,
    pub order: Option<SortOrder>,
}

fn status_rank(status: TimeOffStatus) -> u8 {
    match status {
        TimeOffStatus::Pending => 0,
        TimeOffStatus::Approved => 1,
        TimeOffStatus::Rejected => 2,
    }
}

fn time_off_filter(query: &GetTimeOffQuery) -> Filter<TimeOffRow> {
    Filter::new()
        .and_if(query.status, |row: &TimeOffRow, status: &TimeOffStatus| {
            row.request.status == *status
        })
        .and_if(query.request_type, |row: &TimeOffRow, t: &TimeOffType| {
            row.request.request_type == *t
        })
        .and_if(
            query.search.clone().filter(|s| !s.trim().is_empty()),
            |row: &TimeOffRow, needle: &String| {
                text_matches(
                    needle,
                    &[
                        row.worker_name.as_str(),
                        row.request.reason.as_str(),
                        row.request.request_type.label(),
                    ],
                )
            },
        )
}

fn sort_time_off(rows: &mut [TimeOffRow], key: TimeOffSortKey, order: SortOrder) {
    match key {
        TimeOffSortKey::StartDate => sort_rows(rows, order, |r| r.request.start_date),
        TimeOffSortKey::EndDate => sort_rows(rows, order, |r| r.request.end_date),
        TimeOffSortKey::CreatedAt => sort_rows(rows, order, |r| r.request.created_at),
        TimeOffSortKey::Worker => sort_rows(rows, order, |r| r.worker_name.to_lowercase()),
        TimeOffSortKey::Status => sort_rows(rows, order, |r| status_rank(r.request.status)),
    }
}

async fn load_rows(state: &AppState, token: &CallerToken, worker_id: Option<i32>) -> AppResult<Vec<TimeOffRow>> {
    let (requests, workers) = tokio::try_join!(
        state.api.list_time_off(token.as_str(), worker_id),
        state.api.list_workers(token.as_str()),
    )?;

    Ok(assemble_time_off_rows(requests, &workers, state.today()))
}

/// GET /api/time-off?status=&type=&workerId=&search=&sort=&order=
#[utoipa::path(
    get,
    path = "/api/time-off",
    params(GetTimeOffQuery),
    responses(
        (status = 200, description = "Time-off table rows, pending rows carry their urgency", body = Vec<TimeOffRow>)
    ),
    tag = "time-off",
    security(("cookie_auth" = []))
)]
pub async fn get_time_off(
    State(state): State<Arc<AppState>>,
    token: CallerToken,
    Query(query): Query<GetTimeOffQuery>,
) -> AppResult<Json<Vec<TimeOffRow>>> {
    let rows = load_rows(&state, &token, query.worker_id).await?;
    let mut rows = time_off_filter(&query).apply(rows);
    sort_time_off(
        &mut rows,
        query.sort.unwrap_or_default(),
        query.order.unwrap_or_default(),
    );

    tracing::debug!(count = rows.len(), "Returning time-off rows");
    Ok(Json(rows))
}

/// GET /api/time-off/urgent
#[utoipa::path(
    get,
    path = "/api/time-off/urgent",
    responses(
        (status = 200, description = "Pending requests close enough to start to need a decision, soonest first", body = Vec<TimeOffRow>)
    ),
    tag = "time-off",
    security(("cookie_auth" = []))
)]
pub async fn get_urgent_time_off(
    State(state): State<Arc<AppState>>,
    token: CallerToken,
) -> AppResult<Json<Vec<TimeOffRow>>> {
    let rows = load_rows(&state, &token, None).await?;

    let mut urgent = Filter::new()
        .and(|row: &TimeOffRow| row.urgency.as_ref().is_some_and(|u| u.is_urgent))
        .apply(rows);
    sort_rows(&mut urgent, SortOrder::Asc, |r| {
        r.urgency.as_ref().map(|u| u.days_remaining).unwrap_or(i64::MAX)
    });

    Ok(Json(urgent))
}

/// POST /api/time-off/validate
#[utoipa::path(
    post,
    path = "/api/time-off/validate",
    request_body = ValidateTimeOffInput,
    responses(
        (status = 200, description = "Dates satisfy lead time and ordering", body = ValidateTimeOffResponse),
        (status = 422, description = "Field-attributed validation errors")
    ),
    tag = "time-off"
)]
pub async fn validate_time_off(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ValidateTimeOffInput>,
) -> AppResult<Json<ValidateTimeOffResponse>> {
    let today = state.today();
    validate_request_range(input.start_date, input.end_date, today)?;

    Ok(Json(ValidateTimeOffResponse {
        valid: true,
        earliest_start: earliest_start(today),
    }))
}

fn validate_submission(input: &CreateTimeOffInput, today: chrono::NaiveDate) -> Result<(), ValidationErrors> {
    let mut errors = validate_request_range(input.start_date, input.end_date, today)
        .err()
        .unwrap_or_default();
    if input.reason.trim().is_empty() {
        errors.push("reason", "Reason is required");
    }
    errors.into_result()
}

/// POST /api/time-off - Submit a time-off request
#[utoipa::path(
    post,
    path = "/api/time-off",
    request_body = CreateTimeOffInput,
    responses(
        (status = 201, description = "Request created", body = TimeOffRequest),
        (status = 409, description = "Dates overlap existing time off or a job assignment"),
        (status = 422, description = "Field-attributed validation errors")
    ),
    tag = "time-off",
    security(("cookie_auth" = []))
)]
pub async fn create_time_off(
    State(state): State<Arc<AppState>>,
    token: CallerToken,
    Json(input): Json<CreateTimeOffInput>,
) -> AppResult<(StatusCode, Json<TimeOffRequest>)> {
    validate_submission(&input, state.today())?;

    let check = state
        .api
        .check_time_off_conflict(
            token.as_str(),
            &ConflictCheckRequest {
                start_date: input.start_date,
                end_date: input.end_date,
            },
        )
        .await?;

    if check.has_conflict {
        tracing::info!(start = %input.start_date, end = %input.end_date, "Time-off submission conflicts");
        return Err(AppError::TimeOffConflict(
            "The selected dates overlap an existing time off request or job assignment".to_string(),
        ));
    }

    let created = state.api.create_time_off(token.as_str(), &input).await?;
    tracing::info!(id = created.id, worker_id = created.worker_id, "Time-off request created");

    Ok((StatusCode::CREATED, Json(created)))
}

fn clean_notes(input: AdminDecisionInput) -> Option<String> {
    input
        .admin_notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

/// PUT /api/time-off/{id}/approve
#[utoipa::path(
    put,
    path = "/api/time-off/{id}/approve",
    params(("id" = i32, Path, description = "Time-off request ID")),
    request_body = AdminDecisionInput,
    responses(
        (status = 200, description = "Request approved", body = TimeOffRequest),
        (status = 404, description = "Request not found")
    ),
    tag = "time-off",
    security(("cookie_auth" = []))
)]
pub async fn approve_time_off(
    State(state): State<Arc<AppState>>,
    token: CallerToken,
    Path(id): Path<i32>,
    Json(input): Json<AdminDecisionInput>,
) -> AppResult<Json<TimeOffRequest>> {
    let updated = state
        .api
        .approve_time_off(token.as_str(), id, clean_notes(input))
        .await?;
    tracing::info!(id, "Time-off request approved");
    Ok(Json(updated))
}

/// PUT /api/time-off/{id}/reject
#[utoipa::path(
    put,
    path = "/api/time-off/{id}/reject",
    params(("id" = i32, Path, description = "Time-off request ID")),
    request_body = AdminDecisionInput,
    responses(
        (status = 200, description = "Request rejected", body = TimeOffRequest),
        (status = 404, description = "Request not found")
    ),
    tag = "time-off",
    security(("cookie_auth" = []))
)]
pub async fn reject_time_off(
    State(state): State<Arc<AppState>>,
    token: CallerToken,
    Path(id): Path<i32>,
    Json(input): Json<AdminDecisionInput>,
) -> AppResult<Json<TimeOffRequest>> {
    let updated = state
        .api
        .reject_time_off(token.as_str(), id, clean_notes(input))
        .await?;
    tracing::info!(id, "Time-off request rejected");
    Ok(Json(updated))
}

/// DELETE /api/time-off/{id} - Withdraw one of the caller's own pending requests
#[utoipa::path(
    delete,
    path = "/api/time-off/{id}",
    params(("id" = i32, Path, description = "Time-off request ID")),
    responses(
        (status = 200, description = "Request deleted", body = TimeOffMutationResponse),
        (status = 400, description = "Request is no longer pending"),
        (status = 404, description = "Request not found")
    ),
    tag = "time-off",
    security(("cookie_auth" = []))
)]
pub async fn delete_own_time_off(
    State(state): State<Arc<AppState>>,
    token: CallerToken,
    Path(id): Path<i32>,
) -> AppResult<Json<TimeOffMutationResponse>> {
    let requests = state.api.list_time_off(token.as_str(), None).await?;
    let request = requests
        .iter()
        .find(|r| r.id == id)
        .ok_or_else(|| AppError::NotFound(format!("Time off request {} not found", id)))?;

    if !request.is_pending() {
        return Err(AppError::BadRequest(
            "Only pending requests can be deleted".to_string(),
        ));
    }

    state
        .api
        .delete_time_off(token.as_str(), id, DeleteScope::Own)
        .await?;

    Ok(Json(TimeOffMutationResponse {
        success: true,
        message: Some("Time off request deleted successfully".to_string()),
    }))
}

/// DELETE /api/admin/time-off/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/time-off/{id}",
    params(("id" = i32, Path, description = "Time-off request ID")),
    responses(
        (status = 200, description = "Request deleted", body = TimeOffMutationResponse),
        (status = 404, description = "Request not found")
    ),
    tag = "time-off",
    security(("cookie_auth" = []))
)]
pub async fn admin_delete_time_off(
    State(state): State<Arc<AppState>>,
    token: CallerToken,
    Path(id): Path<i32>,
) -> AppResult<Json<TimeOffMutationResponse>> {
    state
        .api
        .delete_time_off(token.as_str(), id, DeleteScope::Admin)
        .await?;
    tracing::info!(id, "Time-off request deleted by admin");

    Ok(Json(TimeOffMutationResponse {
        success: true,
        message: Some("Time off request deleted successfully".to_string()),
    }))
}

/// POST /api/time-off/bulk-delete
///
/// The run is spawned so it completes even if the caller goes away.
#[utoipa::path(
    post,
    path = "/api/time-off/bulk-delete",
    request_body = BulkDeleteInput,
    responses(
        (status = 200, description = "Per-item outcome counts", body = BulkDeleteResponse),
        (status = 400, description = "Selection includes non-pending requests or none at all")
    ),
    tag = "time-off",
    security(("cookie_auth" = []))
)]
pub async fn bulk_delete_time_off(
    State(state): State<Arc<AppState>>,
    token: CallerToken,
    Json(input): Json<BulkDeleteInput>,
) -> AppResult<Json<BulkDeleteResponse>> {
    let requests = state.api.list_time_off(token.as_str(), None).await?;
    let ids = plan_delete(&input.ids, &requests).map_err(|e| {
        tracing::warn!(selected = input.ids.len(), reason = %e, "Bulk delete refused");
        AppError::BadRequest(e.to_string())
    })?;

    let api = state.api.clone();
    let token = token.0;
    let outcome = tokio::spawn(async move {
        run_sequential(ids, |id| {
            let api = api.clone();
            let token = token.clone();
            async move { api.delete_time_off(&token, id, DeleteScope::Admin).await }
        })
        .await
    })
    .await
    .map_err(|e| AppError::Internal(format!("Bulk delete task failed: {}", e)))?;

    Ok(Json(BulkDeleteResponse {
        message: outcome.message(),
        success_count: outcome.success_count,
        error_count: outcome.error_count,
        deleted_ids: outcome.deleted_ids,
        failed_ids: outcome.failed_ids,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{day, get, send, TestApp};
    use crate::models::Worker;
    use crate::upstream::fake::sample_request;
    use axum::http::Method;
    use serde_json::json;

    fn pending_on(id: i32, start: &str) -> TimeOffRequest {
        let mut r = sample_request(id, TimeOffStatus::Pending);
        r.start_date = day(start);
        r.end_date = day(start);
        r
    }

    #[tokio::test]
    async fn test_create_at_thirteen_days_fails_on_start_date() {
        let app = TestApp::new();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/time-off",
            json!({"type": "vacation", "start_date": "2026-11-01", "end_date": "2026-11-01", "reason": "trip"}),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "start_date");
        assert_eq!(app.fake.calls("check_time_off_conflict"), 0);
        assert_eq!(app.fake.calls("create_time_off"), 0);
    }

    #[tokio::test]
    async fn test_create_at_fourteen_days_checks_conflict_then_creates() {
        let app = TestApp::new();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/time-off",
            json!({"type": "day_off", "start_date": "2026-11-02", "end_date": "2026-11-03", "reason": "move"}),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "pending");
        assert_eq!(
            app.fake.conflict_checks(),
            vec![ConflictCheckRequest {
                start_date: day("2026-11-02"),
                end_date: day("2026-11-03"),
            }]
        );
    }

    #[tokio::test]
    async fn test_create_with_end_before_start_fails() {
        let app = TestApp::new();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/time-off",
            json!({"type": "vacation", "start_date": "2027-01-10", "end_date": "2027-01-09", "reason": "trip"}),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "end_date");
    }

    #[tokio::test]
    async fn test_create_requires_reason() {
        let app = TestApp::new();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/time-off",
            json!({"type": "vacation", "start_date": "2027-01-10", "end_date": "2027-01-10", "reason": "  "}),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["field"], "reason");
    }

    #[tokio::test]
    async fn test_server_conflict_short_circuits_with_code() {
        let app = TestApp::new();
        app.fake.set_conflict(true);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/time-off",
            json!({"type": "vacation", "start_date": "2027-01-10", "end_date": "2027-01-12", "reason": "trip"}),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "TIME_OFF_CONFLICT");
        assert_eq!(app.fake.calls("create_time_off"), 0);
    }

    #[tokio::test]
    async fn test_validate_endpoint_reports_earliest_start() {
        let app = TestApp::new();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/time-off/validate",
            json!({"start_date": "2026-11-02", "end_date": "2026-11-02"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["earliest_start"], "2026-11-02");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let app = TestApp::new();

        let (status, _) = app.request_without_token(Method::GET, "/api/time-off").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bulk_delete_with_non_pending_deletes_nothing() {
        let app = TestApp::new();
        app.fake.push_time_off(sample_request(1, TimeOffStatus::Pending));
        app.fake.push_time_off(sample_request(2, TimeOffStatus::Approved));

        let (status, body) = send(&app, Method::POST, "/api/time-off/bulk-delete", json!({"ids": [1, 2]})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "1 selected request is not pending and cannot be deleted");
        assert_eq!(app.fake.calls("delete_time_off"), 0);
    }

    #[tokio::test]
    async fn test_bulk_delete_partial_failure_reports_counts() {
        let app = TestApp::new();
        app.fake.push_time_off(sample_request(1, TimeOffStatus::Pending));
        app.fake.push_time_off(sample_request(2, TimeOffStatus::Pending));
        app.fake.fail_delete(2);

        let (status, body) = send(&app, Method::POST, "/api/time-off/bulk-delete", json!({"ids": [1, 2]})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success_count"], 1);
        assert_eq!(body["error_count"], 1);
        assert_eq!(body["failed_ids"], json!([2]));
        assert_eq!(app.fake.time_off_ids(), vec![2]);

        let (_, rows) = get(&app, "/api/time-off").await;
        let ids: Vec<i64> = rows
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn test_self_delete_only_for_pending() {
        let app = TestApp::new();
        app.fake.push_time_off(sample_request(1, TimeOffStatus::Approved));
        app.fake.push_time_off(sample_request(2, TimeOffStatus::Pending));

        let (status, _) = send(&app, Method::DELETE, "/api/time-off/1", json!(null)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::DELETE, "/api/time-off/2", json!(null)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(app.fake.deleted(), vec![(2, DeleteScope::Own)]);

        let (status, _) = send(&app, Method::DELETE, "/api/time-off/99", json!(null)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_admin_delete_and_decisions_accept_any_status() {
        let app = TestApp::new();
        app.fake.push_time_off(sample_request(1, TimeOffStatus::Approved));
        app.fake.push_time_off(sample_request(2, TimeOffStatus::Rejected));

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/time-off/2/approve",
            json!({"admin_notes": "  covered by Ana "}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "approved");
        assert_eq!(body["admin_notes"], "covered by Ana");

        let (status, body) = send(&app, Method::PUT, "/api/time-off/2/reject", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "rejected");

        let (status, _) = send(&app, Method::DELETE, "/api/admin/time-off/1", json!(null)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(app.fake.deleted(), vec![(1, DeleteScope::Admin)]);

        let (status, _) = send(&app, Method::PUT, "/api/time-off/42/approve", json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_listing_filters_sorts_and_flags_urgency() {
        let app = TestApp::new();
        app.fake.push_worker(Worker {
            id: 1,
            first_name: "Ana".to_string(),
            last_name: "Ruiz".to_string(),
            phone: None,
            is_active: true,
        });
        app.fake.push_time_off(pending_on(1, "2026-11-20"));
        app.fake.push_time_off(pending_on(2, "2026-10-22"));
        app.fake.push_time_off(pending_on(3, "2026-10-29"));
        let mut approved = pending_on(4, "2026-10-20");
        approved.status = TimeOffStatus::Approved;
        app.fake.push_time_off(approved);

        let (_, rows) = get(&app, "/api/time-off?status=pending&sort=start_date&order=desc&search=ana").await;
        let ids: Vec<i64> = rows
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 3, 2]);
        assert_eq!(rows[0]["worker_name"], "Ana Ruiz");
        assert_eq!(rows[0]["urgency"]["is_urgent"], false);

        let (_, urgent) = get(&app, "/api/time-off/urgent").await;
        let urgent = urgent.as_array().unwrap();
        assert_eq!(urgent.len(), 2);
        assert_eq!(urgent[0]["id"], 2);
        assert_eq!(urgent[0]["urgency"]["color"], "error");
        assert_eq!(urgent[1]["id"], 3);
        assert_eq!(urgent[1]["urgency"]["color"], "warning");
    }
}
