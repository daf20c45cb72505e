use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::time_off::TimeOffType;

/// Input for submitting a new time-off request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTimeOffInput {
    #[serde(rename = "type")]
    pub request_type: TimeOffType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: String,
}

/// Date pair checked by `/api/time-off/validate`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidateTimeOffInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidateTimeOffResponse {
    pub valid: bool,
    pub earliest_start: NaiveDate,
}

/// Body of the upstream conflict check (camelCase on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCheckRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCheckResponse {
    pub has_conflict: bool,
}

/// Admin approve/reject decision
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AdminDecisionInput {
    #[serde(default)]
    pub admin_notes: Option<String>,
}

/// Payload forwarded upstream for approve/reject
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminDecisionPayload {
    pub id: i32,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkDeleteInput {
    pub ids: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkDeleteResponse {
    pub success_count: usize,
    pub error_count: usize,
    pub deleted_ids: Vec<i32>,
    pub failed_ids: Vec<i32>,
    pub message: String,
}

/// Response for time-off mutations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimeOffMutationResponse {
    pub success: bool,
    pub message: Option<String>,
}
