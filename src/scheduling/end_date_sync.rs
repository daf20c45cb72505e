use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lead_time::{validate_request_range, ValidationErrors};

/// Whether the end date still follows the start date on the request form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndDateSync {
    #[default]
    Synced,
    Manual,
}

impl EndDateSync {
    /// New end date after the start date changes.
    pub fn on_start_changed(self, new_start: NaiveDate, current_end: Option<NaiveDate>) -> Option<NaiveDate> {
        match self {
            EndDateSync::Synced => Some(new_start),
            EndDateSync::Manual => current_end,
        }
    }

    /// A manual edit latches until the form is reset.
    pub fn on_end_edited(self) -> Self {
        EndDateSync::Manual
    }
}

/// Form state of a time-off request being filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeOffDraft {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub sync: EndDateSync,
}

impl TimeOffDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_start(&mut self, date: NaiveDate) {
        self.end_date = self.sync.on_start_changed(date, self.end_date);
        self.start_date = Some(date);
    }

    pub fn set_end(&mut self, date: NaiveDate) {
        self.sync = self.sync.on_end_edited();
        self.end_date = Some(date);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Validates the draft and returns the `(start, end)` pair to submit.
    pub fn submit(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), ValidationErrors> {
        let start = self
            .start_date
            .ok_or_else(|| ValidationErrors::single("start_date", "Start date is required"))?;
        let end = self
            .end_date
            .ok_or_else(|| ValidationErrors::single("end_date", "End date is required"))?;
        validate_request_range(start, end, today)?;
        Ok((start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_start_change_drags_untouched_end() {
        let mut draft = TimeOffDraft::new();
        draft.set_start(day("2026-11-10"));
        assert_eq!(draft.end_date, Some(day("2026-11-10")));

        draft.set_start(day("2026-11-12"));
        assert_eq!(draft.end_date, Some(day("2026-11-12")));
        assert_eq!(draft.sync, EndDateSync::Synced);
    }

    #[test]
    fn test_manual_end_edit_disables_sync_for_good() {
        let mut draft = TimeOffDraft::new();
        draft.set_start(day("2026-11-10"));
        draft.set_end(day("2026-11-15"));

        draft.set_start(day("2026-11-11"));
        assert_eq!(draft.end_date, Some(day("2026-11-15")));

        // Even setting end back to start keeps the latch.
        draft.set_end(day("2026-11-11"));
        draft.set_start(day("2026-11-13"));
        assert_eq!(draft.end_date, Some(day("2026-11-11")));
        assert_eq!(draft.sync, EndDateSync::Manual);
    }

    #[test]
    fn test_reset_restores_sync() {
        let mut draft = TimeOffDraft::new();
        draft.set_end(day("2026-11-15"));
        draft.reset();

        draft.set_start(day("2026-11-20"));
        assert_eq!(draft.end_date, Some(day("2026-11-20")));
    }

    #[test]
    fn test_submit_runs_range_validation() {
        let today = day("2026-10-19");
        let mut draft = TimeOffDraft::new();
        assert!(draft.submit(today).unwrap_err().has_field("start_date"));

        draft.set_start(day("2026-11-02"));
        assert_eq!(draft.submit(today).unwrap(), (day("2026-11-02"), day("2026-11-02")));

        draft.set_end(day("2026-11-01"));
        assert!(draft.submit(today).unwrap_err().has_field("end_date"));
    }
}
