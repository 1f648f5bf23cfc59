#![deny(deprecated)]

//! CUDA driver glue for native extensions.
//!
//! This crate provides:
//! - Structured propagation of driver result codes ([`cu_call!`], [`cu_assert!`],
//!   [`host_assert!`], [`sequence::finish`])
//! - A static table of driver result codes and descriptions ([`status`])
//! - Device descriptors and a read-only device registry ([`DeviceRegistry`])
//! - A host error channel ([`host::HostErrorSink`])
//!
//! # Feature Flags
//!
//! - `cuda`: link against libcuda and expose [`LinkedDriver`]
//! - `python`: Python bindings for the `unit_cuda` module
//! - `extension-module`: build the importable extension (implies `python`)
//!
//! # Example
//!
//! ```
//! use unit_cuda::sequence::CallSequence;
//! use unit_cuda::status::CUDA_ERROR_NOT_INITIALIZED;
//! use unit_cuda::{cu_call, CudaError, CudaResult};
//!
//! fn enumerate() -> CudaResult<()> {
//!     CallSequence::run("enumerate", |seq| {
//!         cu_call!(seq, CUDA_ERROR_NOT_INITIALIZED);
//!         Ok(())
//!     })
//! }
//!
//! let err = enumerate().unwrap_err();
//! assert!(matches!(err, CudaError::Call(_)));
//! assert!(err.to_string().contains("CUDA_ERROR_NOT_INITIALIZED"));
//! ```

pub mod config;
pub mod device;
pub mod driver;
pub mod error;
pub mod ffi;
pub mod host;
pub mod logging;
pub mod registry;
pub mod sequence;
pub mod status;

#[cfg(feature = "python")]
pub mod python;

#[cfg(test)]
pub mod stub;

pub use config::{DeviceConfig, LoggingConfig, UnitCudaConfig};
pub use device::{CudaDevice, DeviceName, DeviceProperties};
pub use driver::Driver;
#[cfg(feature = "cuda")]
pub use driver::LinkedDriver;
pub use error::{CudaError, CudaResult};
pub use host::{init_host, ErrorCategory, HostErrorSink, ThreadLocalSink};
pub use registry::DeviceRegistry;
pub use sequence::{finish, CallFailure, CallSequence, CallSite};
pub use status::{is_cuda_success, status_string};
