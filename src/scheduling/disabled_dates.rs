use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use super::lead_time::earliest_start;
use crate::models::{JobAssignment, TimeOffRequest};

/// Default span of a disabled-date window when the caller gives no end.
pub const DEFAULT_HORIZON_DAYS: u64 = 365;

/// Widest window a single computation may cover.
pub const MAX_WINDOW_DAYS: i64 = 732;

/// Which record made a date unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(tag = "source", content = "id", rename_all = "snake_case")]
pub enum BlockReason {
    TimeOff(i32),
    JobAssignment(i32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DisabledDate {
    pub date: NaiveDate,
    pub reasons: Vec<BlockReason>,
}

/// Inclusive range of dates a computation is limited to. Records are
/// clamped to it before their days are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateWindow {
    /// `None` when `to` is before `from`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Option<Self> {
        (from <= to).then_some(Self { from, to })
    }

    /// `from` plus the default horizon, saturating at the last representable date.
    pub fn from_horizon(from: NaiveDate) -> Self {
        Self {
            from,
            to: from.checked_add_days(Days::new(DEFAULT_HORIZON_DAYS)).unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn single(date: NaiveDate) -> Self {
        Self { from: date, to: date }
    }

    pub fn start(&self) -> NaiveDate {
        self.from
    }

    pub fn end(&self) -> NaiveDate {
        self.to
    }

    pub fn num_days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    fn clamp(&self, start: NaiveDate, end: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let start = start.max(self.from);
        let end = end.min(self.to);
        (start <= end).then_some((start, end))
    }
}

/// Dates a worker cannot request off, keyed by date with their provenance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisabledDates {
    by_date: BTreeMap<NaiveDate, Vec<BlockReason>>,
}

impl DisabledDates {
    fn block(&mut self, date: NaiveDate, reason: BlockReason) {
        let reasons = self.by_date.entry(date).or_default();
        if !reasons.contains(&reason) {
            reasons.push(reason);
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.by_date.contains_key(&date)
    }

    pub fn reasons(&self, date: NaiveDate) -> &[BlockReason] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    /// Date-picker predicate: blocked by a record or inside the lead-time window.
    pub fn should_disable(&self, date: NaiveDate, today: NaiveDate) -> bool {
        self.contains(date) || date < earliest_start(today)
    }

    /// Entries in date order.
    pub fn entries(&self) -> Vec<DisabledDate> {
        self.by_date
            .iter()
            .map(|(date, reasons)| DisabledDate {
                date: *date,
                reasons: reasons.clone(),
            })
            .collect()
    }
}

fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// Union of the dates inside `window` covered by the given time-off requests
/// and job assignments. Requests of every status are included.
pub fn disabled_dates(
    time_off: &[TimeOffRequest],
    assignments: &[JobAssignment],
    window: DateWindow,
) -> DisabledDates {
    let mut disabled = DisabledDates::default();

    for request in time_off {
        if request.end_date < request.start_date {
            tracing::warn!(
                request_id = request.id,
                start = %request.start_date,
                end = %request.end_date,
                "Skipping time-off request with inverted range"
            );
            continue;
        }
        if let Some((start, end)) = window.clamp(request.start_date, request.end_date) {
            for date in days_inclusive(start, end) {
                disabled.block(date, BlockReason::TimeOff(request.id));
            }
        }
    }

    for assignment in assignments {
        let last = assignment.last_day();
        if last < assignment.start_date {
            tracing::warn!(
                assignment_id = assignment.id,
                "Skipping job assignment with inverted range"
            );
            continue;
        }
        if let Some((start, end)) = window.clamp(assignment.start_date, last) {
            for date in days_inclusive(start, end) {
                disabled.block(date, BlockReason::JobAssignment(assignment.id));
            }
        }
    }

    tracing::debug!(
        time_off = time_off.len(),
        assignments = assignments.len(),
        from = %window.from,
        to = %window.to,
        disabled = disabled.len(),
        "Computed disabled dates"
    );

    disabled
}
