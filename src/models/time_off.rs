use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeOffType {
    Vacation,
    DayOff,
    SickLeave,
    PersonalLeave,
}

impl TimeOffType {
    pub fn label(self) -> &'static str {
        match self {
            TimeOffType::Vacation => "Vacation",
            TimeOffType::DayOff => "Day Off",
            TimeOffType::SickLeave => "Sick Leave",
            TimeOffType::PersonalLeave => "Personal Leave",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeOffStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TimeOffRequest {
    pub id: i32,
    pub worker_id: i32,
    #[serde(rename = "type")]
    pub request_type: TimeOffType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TimeOffStatus,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub admin_notes: Option<String>,
    #[serde(default)]
    pub confirmed_by: Option<i32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl TimeOffRequest {
    pub fn is_pending(&self) -> bool {
        self.status == TimeOffStatus::Pending
    }

    /// Inclusive length in calendar days; zero for a malformed range.
    pub fn duration_days(&self) -> i64 {
        let days = (self.end_date - self.start_date).num_days();
        if days < 0 {
            0
        } else {
            days + 1
        }
    }
}
