//! Scheduler configuration
//!
//! This module re-exports the shared `SchedulerConfig` from horologe-types
//! and provides persistence: through confy under the platform config
//! directory, or to an explicit TOML path.

use std::path::{Path, PathBuf};

pub use horologe_types::SchedulerConfig;

use super::ConfigError;

pub const APP_NAME: &str = "horologe";
pub const CONFIG_NAME: &str = "config";

/// Extension trait for SchedulerConfig persistence
pub trait SchedulerConfigExt: Sized {
    /// Load from the platform config dir, falling back to defaults
    fn load() -> Self;
    fn save(&self) -> Result<(), ConfigError>;
    fn config_path() -> Result<PathBuf, ConfigError>;
    /// Load from an explicit TOML file. A missing file yields defaults.
    fn load_from(path: &Path) -> Result<Self, ConfigError>;
    fn save_to(&self, path: &Path) -> Result<(), ConfigError>;
}

impl SchedulerConfigExt for SchedulerConfig {
    fn load() -> Self {
        match confy::load(APP_NAME, CONFIG_NAME) {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!(%error, "failed to load configuration, using defaults");
                Self::default()
            }
        }
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)?)
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
