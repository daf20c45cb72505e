use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Minimum number of days between submission and the requested start.
pub const MIN_LEAD_DAYS: u64 = 14;

pub fn earliest_start(today: NaiveDate) -> NaiveDate {
    today
        .checked_add_days(Days::new(MIN_LEAD_DAYS))
        .unwrap_or(NaiveDate::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Field-attributed validation failures, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(field, message)],
        }
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Checks a candidate range against the lead time and ordering rules.
/// Both rules are evaluated; the lead-time failure is listed first.
pub fn validate_request_range(
    start_date: NaiveDate,
    end_date: NaiveDate,
    today: NaiveDate,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let earliest = earliest_start(today);
    if start_date < earliest {
        errors.push(
            "start_date",
            format!(
                "Time off must be requested at least {} days in advance (earliest start date is {})",
                MIN_LEAD_DAYS, earliest
            ),
        );
    }

    if end_date < start_date {
        errors.push("end_date", "End date cannot be before start date");
    }

    errors.into_result()
}
