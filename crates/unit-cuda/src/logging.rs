//! Tracing subscriber setup.
//!
//! Events go to stderr so the host's stdout stays untouched. `RUST_LOG`
//! takes precedence over [`LoggingConfig::level`].

use crate::config::LoggingConfig;
use crate::error::{CudaError, CudaResult};
use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Build the filter: `RUST_LOG` if set and valid, else `config.level`.
pub fn env_filter(config: &LoggingConfig) -> CudaResult<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.level).map_err(|e| {
            CudaError::InvalidConfig(format!("logging.level '{}': {}", config.level, e))
        }),
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// - `CudaError::InvalidConfig` if the level cannot be parsed
/// - `CudaError::LoggingInit` if a global subscriber is already installed
pub fn init_logging(config: &LoggingConfig) -> CudaResult<()> {
    let filter = env_filter(config)?;
    let builder = fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    let installed = match config.format.as_str() {
        "pretty" => builder.pretty().try_init(),
        "compact" => builder.compact().try_init(),
        _ => builder.try_init(),
    };

    installed.map_err(|e| CudaError::LoggingInit(e.to_string()))
}
