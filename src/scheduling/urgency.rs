use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::TimeOffRequest;

pub const CRITICAL_WINDOW_DAYS: i64 = 7;
pub const URGENT_WINDOW_DAYS: i64 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyColor {
    Error,
    Warning,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UrgencyClassification {
    pub is_urgent: bool,
    pub is_critical: bool,
    pub days_remaining: i64,
    pub color: UrgencyColor,
    pub message: Option<String>,
}

fn day_word(count: i64) -> &'static str {
    if count == 1 {
        "day"
    } else {
        "days"
    }
}

fn auto_rejection_message(days: i64) -> String {
    let unit = day_word(days);
    format!(
        "This request starts in {days} {unit}. It will be automatically rejected if no action is taken within {days} {unit}."
    )
}

/// Tier of a pending request by how close its start date is.
///
/// A start date already in the past is not flagged: those requests are
/// expected to have been auto-rejected elsewhere.
pub fn classify_urgency(start_date: NaiveDate, today: NaiveDate) -> UrgencyClassification {
    let days = (start_date - today).num_days();

    let (is_urgent, is_critical, color) = if days < 0 {
        (false, false, UrgencyColor::Default)
    } else if days <= CRITICAL_WINDOW_DAYS {
        (true, true, UrgencyColor::Error)
    } else if days <= URGENT_WINDOW_DAYS {
        (true, false, UrgencyColor::Warning)
    } else {
        (false, false, UrgencyColor::Default)
    };

    UrgencyClassification {
        is_urgent,
        is_critical,
        days_remaining: days,
        color,
        message: is_urgent.then(|| auto_rejection_message(days)),
    }
}

/// Urgency for pending requests only.
pub fn urgency_for(request: &TimeOffRequest, today: NaiveDate) -> Option<UrgencyClassification> {
    request
        .is_pending()
        .then(|| classify_urgency(request.start_date, today))
}
