mod config;
mod error;

pub use config::{SchedulerConfig, SchedulerConfigExt, APP_NAME, CONFIG_NAME};
pub use error::ConfigError;
