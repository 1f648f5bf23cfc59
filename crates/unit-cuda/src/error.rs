//! Error types for CUDA driver plumbing.

use crate::ffi::CUresult;
use crate::host::ErrorCategory;
use crate::sequence::{AssertionFailure, CallFailure};
use thiserror::Error;

/// Errors surfaced to the host runtime.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CudaError {
    /// A driver call returned a non-success status.
    ///
    /// Displays as `"{file} {function} {line}\n{call}: {status}"`.
    #[error("{0}")]
    Call(CallFailure),

    /// A caller-stated precondition did not hold.
    #[error("{0}")]
    Assertion(AssertionFailure),

    /// Device not available.
    #[error("No CUDA device available")]
    NoDevice,

    /// Device ordinal outside the registry.
    #[error("Invalid device ordinal {ordinal}: {count} device(s) registered")]
    InvalidDevice {
        /// Requested ordinal
        ordinal: usize,
        /// Number of registered devices
        count: usize,
    },

    /// Invalid configuration parameter.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The tracing subscriber could not be installed.
    #[error("Logging initialization failed: {0}")]
    LoggingInit(String),
}

impl CudaError {
    /// Host error category this failure is reported under.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Call(_) => ErrorCategory::Driver,
            Self::Assertion(_) => ErrorCategory::Assertion,
            Self::NoDevice | Self::InvalidDevice { .. } => ErrorCategory::Device,
            Self::InvalidConfig(_) | Self::ConfigError(_) | Self::LoggingInit(_) => {
                ErrorCategory::Config
            }
        }
    }

    /// Driver status code, for call failures.
    #[must_use]
    pub fn status(&self) -> Option<CUresult> {
        match self {
            Self::Call(failure) => Some(failure.status),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for CudaError {
    fn from(err: config::ConfigError) -> Self {
        CudaError::ConfigError(err.to_string())
    }
}

/// Result type for CUDA operations.
pub type CudaResult<T> = Result<T, CudaError>;
