use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::Modify;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Crewrota API",
        version = "1.0.0",
        description = "Scheduling service for crew time off and job dispatch, in front of the workforce API"
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // Health
        crate::handlers::health::health_check,

        // Time off
        crate::handlers::time_off_handler::get_time_off,
        crate::handlers::time_off_handler::get_urgent_time_off,
        crate::handlers::time_off_handler::validate_time_off,
        crate::handlers::time_off_handler::create_time_off,
        crate::handlers::time_off_handler::approve_time_off,
        crate::handlers::time_off_handler::reject_time_off,
        crate::handlers::time_off_handler::delete_own_time_off,
        crate::handlers::time_off_handler::admin_delete_time_off,
        crate::handlers::time_off_handler::bulk_delete_time_off,

        // Availability
        crate::handlers::availability_handler::get_disabled_dates,
        crate::handlers::availability_handler::check_date,

        // Jobs
        crate::handlers::jobs_handler::get_jobs,
    ),
    components(
        schemas(
            // Core models
            crate::models::TimeOffRequest,
            crate::models::TimeOffType,
            crate::models::TimeOffStatus,
            crate::models::Job,
            crate::models::JobStatus,
            crate::models::JobAssignment,
            crate::models::Worker,
            crate::models::Vehicle,
            crate::models::Equipment,

            // Input models
            crate::models::CreateTimeOffInput,
            crate::models::ValidateTimeOffInput,
            crate::models::ValidateTimeOffResponse,
            crate::models::AdminDecisionInput,
            crate::models::BulkDeleteInput,
            crate::models::BulkDeleteResponse,
            crate::models::TimeOffMutationResponse,

            // Computed views
            crate::scheduling::TimeOffRow,
            crate::scheduling::JobRow,
            crate::scheduling::UrgencyClassification,
            crate::scheduling::UrgencyColor,
            crate::scheduling::BlockReason,
            crate::scheduling::DisabledDate,
            crate::scheduling::FieldError,
            crate::scheduling::ValidationErrors,
            crate::scheduling::SortOrder,
            crate::handlers::availability_handler::DisabledDatesResponse,
            crate::handlers::availability_handler::DateCheckResponse,
            crate::handlers::time_off_handler::TimeOffSortKey,
            crate::handlers::jobs_handler::JobSortKey,
        )
    ),
    tags(
        (name = "health", description = "Health check"),
        (name = "time-off", description = "Time-off requests, review and bulk actions"),
        (name = "availability", description = "Dates a worker cannot request off"),
        (name = "jobs", description = "Job dispatch table"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("__session"))),
            );
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}
