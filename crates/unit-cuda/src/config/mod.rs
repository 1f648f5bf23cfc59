//! Configuration for the driver glue.

mod sub_configs;


use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CudaError, CudaResult};

pub use sub_configs::{DeviceConfig, LoggingConfig};

/// Log formats accepted by [`LoggingConfig::format`].
pub const LOG_FORMATS: &[&str] = &["pretty", "compact", "full"];

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UnitCudaConfig {
    #[serde(default)]
    pub devices: DeviceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl UnitCudaConfig {
    /// Load configuration from files and environment.
    ///
    /// Configuration is loaded in order:
    /// 1. config/default.toml (base settings)
    /// 2. config/{UNIT_CUDA_ENV}.toml (environment-specific)
    /// 3. Environment variables with UNIT_CUDA__ prefix
    pub fn load() -> CudaResult<Self> {
        Self::load_from(Path::new("config"))
    }

    /// Same as [`load`](Self::load), reading files from `dir`.
    pub fn load_from(dir: &Path) -> CudaResult<Self> {
        let env = std::env::var("UNIT_CUDA_ENV").unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name(&dir.join("default").to_string_lossy()).required(false))
            .add_source(config::File::with_name(&dir.join(&env).to_string_lossy()).required(false))
            .add_source(config::Environment::with_prefix("UNIT_CUDA").separator("__"));

        let config: UnitCudaConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> CudaResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CudaError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: UnitCudaConfig = toml::from_str(&content)
            .map_err(|e| CudaError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `CudaError::InvalidConfig` if:
    /// - `devices.init_flags` is not 0
    /// - `devices.max_devices` is 0
    /// - `logging.format` is unknown
    /// - `logging.level` is empty
    pub fn validate(&self) -> CudaResult<()> {
        if self.devices.init_flags != 0 {
            return Err(CudaError::InvalidConfig(format!(
                "devices.init_flags must be 0, got {}",
                self.devices.init_flags
            )));
        }
        if self.devices.max_devices == Some(0) {
            return Err(CudaError::InvalidConfig(
                "devices.max_devices must be greater than 0 when set".into(),
            ));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(CudaError::InvalidConfig(format!(
                "logging.format must be one of {:?}, got '{}'",
                LOG_FORMATS, self.logging.format
            )));
        }
        if self.logging.level.trim().is_empty() {
            return Err(CudaError::InvalidConfig(
                "logging.level must not be empty".into(),
            ));
        }
        Ok(())
    }
}
