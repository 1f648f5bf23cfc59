//! Sub-configuration types.

use serde::{Deserialize, Serialize};

/// Device enumeration settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceConfig {
    /// Flags passed to `cuInit`. The driver requires 0.
    #[serde(default)]
    pub init_flags: u32,

    /// Register at most this many devices (default: all).
    #[serde(default)]
    pub max_devices: Option<usize>,

    /// Fail initialization when the driver reports zero devices.
    #[serde(default)]
    pub require_device: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            init_flags: 0,
            max_devices: None,
            require_device: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// One of `pretty`, `compact`, `full`.
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Include file and line in each event.
    #[serde(default)]
    pub include_location: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "full".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            include_location: false,
        }
    }
}
