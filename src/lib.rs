pub mod clock;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod scheduling;
pub mod startup;
pub mod upstream;

use std::sync::Arc;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use handlers::MetricsState;
pub use upstream::WorkforceApi;

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn WorkforceApi>,
    pub clock: Arc<dyn Clock>,
    pub config: AppConfig,
    pub metrics: Arc<MetricsState>,
}

impl AppState {
    pub fn new(
        api: Arc<dyn WorkforceApi>,
        clock: Arc<dyn Clock>,
        config: AppConfig,
        metrics: Arc<MetricsState>,
    ) -> Self {
        Self {
            api,
            clock,
            config,
            metrics,
        }
    }

    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today()
    }
}
