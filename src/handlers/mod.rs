pub mod availability_handler;
pub mod health;
pub mod jobs_handler;
pub mod metrics;
#[cfg(test)]
pub(crate) mod test_support;
pub mod time_off_handler;

pub use health::health_check;
pub use metrics::{metrics_handler, setup_metrics_recorder, MetricsState};
