pub mod job;
pub mod time_off;
pub mod time_off_input;
pub mod worker;

pub use job::{Job, JobAssignment, JobStatus};
pub use time_off::{TimeOffRequest, TimeOffStatus, TimeOffType};
pub use time_off_input::{
    AdminDecisionInput, AdminDecisionPayload, BulkDeleteInput, BulkDeleteResponse, ConflictCheckRequest,
    ConflictCheckResponse, CreateTimeOffInput, TimeOffMutationResponse, ValidateTimeOffInput,
    ValidateTimeOffResponse,
};
pub use worker::{Equipment, Vehicle, Worker};
