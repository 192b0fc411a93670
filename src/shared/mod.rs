pub mod config;
pub mod error;
pub mod metrics;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use metrics::{SyncOutcomeMetrics, SyncOutcomeSnapshot};
