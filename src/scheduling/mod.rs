//! Time-off and dispatch rules. Everything here is pure: callers pass
//! "today" in and get values back, no clock reads and no I/O.

pub mod assemble;
pub mod bulk;
pub mod disabled_dates;
pub mod end_date_sync;
pub mod lead_time;
pub mod table;
pub mod urgency;

pub use assemble::{assemble_job_rows, assemble_time_off_rows, JobRow, TimeOffRow};
pub use bulk::{partition_for_delete, plan_delete, run_sequential, BulkOutcome, BulkRejection, DeletePartition};
pub use disabled_dates::{
    disabled_dates, BlockReason, DateWindow, DisabledDate, DisabledDates, DEFAULT_HORIZON_DAYS, MAX_WINDOW_DAYS,
};
pub use end_date_sync::{EndDateSync, TimeOffDraft};
pub use lead_time::{earliest_start, validate_request_range, FieldError, ValidationErrors, MIN_LEAD_DAYS};
pub use table::{sort_rows, text_matches, Filter, SortOrder};
pub use urgency::{classify_urgency, urgency_for, UrgencyClassification, UrgencyColor};
