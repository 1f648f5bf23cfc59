//! Process-wide device registry.
//!
//! Built once by [`DeviceRegistry::initialize`], then shared read-only via
//! `Arc` and ended by [`DeviceRegistry::teardown`]. No method mutates a
//! registry after construction.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "cuda")]
//! # fn main() -> unit_cuda::CudaResult<()> {
//! use unit_cuda::{DeviceConfig, DeviceRegistry, LinkedDriver};
//!
//! let registry = DeviceRegistry::initialize(&LinkedDriver, &DeviceConfig::default())?.shared();
//! for device in registry.devices() {
//!     println!("{}: {}", device.ordinal(), device.name());
//! }
//! DeviceRegistry::teardown(registry);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "cuda"))]
//! # fn main() {}
//! ```

use crate::config::DeviceConfig;
use crate::device::CudaDevice;
use crate::driver::Driver;
use crate::error::{CudaError, CudaResult};
use crate::ffi::decode_driver_version;
use crate::sequence::CallSequence;
use crate::{cu_assert, cu_call};
use std::sync::Arc;
use tracing::{info, warn};

/// Driver version and the descriptors of every registered device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRegistry {
    driver_version: i32,
    devices: Vec<CudaDevice>,
}

impl DeviceRegistry {
    /// Initialize the driver and enumerate devices.
    ///
    /// Runs as one call sequence named `initialize`; the first failing
    /// driver call aborts it.
    ///
    /// # Errors
    ///
    /// - `CudaError::Call` for any failing driver call
    /// - `CudaError::Assertion` if the driver reports a negative count, or
    ///   zero devices while `config.require_device` is set
    pub fn initialize(driver: &dyn Driver, config: &DeviceConfig) -> CudaResult<Self> {
        CallSequence::run("initialize", |seq| {
            cu_call!(seq, driver.init(config.init_flags));

            let mut driver_version: i32 = 0;
            cu_call!(seq, driver.driver_version(&mut driver_version));

            let mut count: i32 = 0;
            cu_call!(seq, driver.device_count(&mut count));
            cu_assert!(seq, count >= 0, "driver reported {} devices", count);
            cu_assert!(seq, !config.require_device || count > 0, "no CUDA device present");

            let limit = config
                .max_devices
                .map_or(count, |max| count.min(i32::try_from(max).unwrap_or(i32::MAX)));

            let mut devices = Vec::with_capacity(limit as usize);
            for ordinal in 0..limit {
                devices.push(CudaDevice::query(seq, driver, ordinal)?);
            }

            let (major, minor) = decode_driver_version(driver_version);
            info!(
                target: "unit_cuda::registry",
                driver = format!("{}.{}", major, minor),
                reported = count,
                registered = devices.len(),
                "CUDA device registry initialized"
            );

            Ok(Self {
                driver_version,
                devices,
            })
        })
    }

    /// Move into shared ownership.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Release the registry.
    ///
    /// Other holders keep their clones alive; this only drops the caller's.
    pub fn teardown(registry: Arc<Self>) {
        let holders = Arc::strong_count(&registry);
        if holders > 1 {
            warn!(
                target: "unit_cuda::registry",
                remaining = holders - 1,
                "device registry torn down while still shared"
            );
        } else {
            info!(
                target: "unit_cuda::registry",
                devices = registry.devices.len(),
                "device registry torn down"
            );
        }
        drop(registry);
    }

    /// Driver version, encoded as `major * 1000 + minor * 10`.
    #[inline]
    pub fn driver_version(&self) -> i32 {
        self.driver_version
    }

    /// Driver version as (major, minor).
    #[inline]
    pub fn driver_version_parts(&self) -> (i32, i32) {
        decode_driver_version(self.driver_version)
    }

    #[inline]
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    #[inline]
    pub fn devices(&self) -> &[CudaDevice] {
        &self.devices
    }

    pub fn device(&self, ordinal: usize) -> Option<&CudaDevice> {
        self.devices.get(ordinal)
    }

    /// Device at `ordinal`, or why there is none.
    ///
    /// # Errors
    ///
    /// - `CudaError::NoDevice` if the registry is empty
    /// - `CudaError::InvalidDevice` if `ordinal` is out of range
    pub fn require_device(&self, ordinal: usize) -> CudaResult<&CudaDevice> {
        if self.devices.is_empty() {
            return Err(CudaError::NoDevice);
        }
        self.devices.get(ordinal).ok_or(CudaError::InvalidDevice {
            ordinal,
            count: self.devices.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{init_host, ErrorCategory, RecordingSink};
    use crate::status::{CUDA_ERROR_INVALID_VALUE, CUDA_ERROR_NOT_INITIALIZED, CUDA_ERROR_NO_DEVICE};
    use crate::stub::{StubDevice, StubDriver};

    fn two_gpus() -> StubDriver {
        StubDriver::with_devices(vec![
            StubDevice::named("NVIDIA A100-SXM4-40GB"),
            StubDevice::named("NVIDIA GeForce RTX 4090 with an extraordinarily long marketing name"),
        ])
    }

    #[test]
    fn test_initialize_enumerates_devices() {
        let driver = two_gpus();
        let registry = DeviceRegistry::initialize(&driver, &DeviceConfig::default()).unwrap();

        assert_eq!(registry.driver_version(), 12040);
        assert_eq!(registry.driver_version_parts(), (12, 4));
        assert_eq!(registry.device_count(), 2);
        assert_eq!(registry.device(0).unwrap().name().as_str(), "NVIDIA A100-SXM4-40GB");
        assert_eq!(registry.device(1).unwrap().ordinal(), 1);
        assert!(registry.device(2).is_none());
        assert_eq!(&driver.calls()[..3], &["init", "driver_version", "device_count"]);
    }

    #[test]
    fn test_long_names_are_bounded() {
        let registry = DeviceRegistry::initialize(&two_gpus(), &DeviceConfig::default()).unwrap();
        let name = registry.device(1).unwrap().name().as_str();
        assert_eq!(name.len(), crate::device::DEVICE_NAME_CAPACITY - 1);
        assert!(name.starts_with("NVIDIA GeForce RTX 4090"));
    }

    #[test]
    fn test_max_devices_limits_enumeration() {
        let config = DeviceConfig {
            max_devices: Some(1),
            ..DeviceConfig::default()
        };
        let registry = DeviceRegistry::initialize(&two_gpus(), &config).unwrap();
        assert_eq!(registry.device_count(), 1);
    }

    #[test]
    fn test_init_failure_stops_before_enumeration() {
        let driver = two_gpus().fail_on("init", CUDA_ERROR_NO_DEVICE);
        let err = DeviceRegistry::initialize(&driver, &DeviceConfig::default()).unwrap_err();

        assert_eq!(err.status(), Some(CUDA_ERROR_NO_DEVICE));
        assert_eq!(driver.calls(), vec!["init"]);
        let message = err.to_string();
        assert!(message.contains(" initialize "), "{}", message);
        assert!(message.contains("driver.init(config.init_flags): CUDA_ERROR_NO_DEVICE"));
    }

    #[test]
    fn test_nonzero_init_flags_rejected_by_driver() {
        let config = DeviceConfig {
            init_flags: 1,
            ..DeviceConfig::default()
        };
        let err = DeviceRegistry::initialize(&two_gpus(), &config).unwrap_err();
        assert_eq!(err.status(), Some(CUDA_ERROR_INVALID_VALUE));
    }

    #[test]
    fn test_failure_mid_enumeration_names_call() {
        let driver = two_gpus().fail_on("device_total_mem", CUDA_ERROR_NOT_INITIALIZED);
        let err = DeviceRegistry::initialize(&driver, &DeviceConfig::default()).unwrap_err();

        match &err {
            CudaError::Call(failure) => {
                assert_eq!(failure.function, "initialize");
                assert_eq!(
                    failure.site.call,
                    "driver.device_total_mem(&mut total_memory, handle)"
                );
                assert!(failure.site.file.ends_with("device.rs"));
            }
            other => panic!("expected call failure, got {:?}", other),
        }
        // Only the first device is queried before the abort.
        assert_eq!(driver.calls().iter().filter(|c| **c == "device_get").count(), 1);
    }

    #[test]
    fn test_require_device_on_empty_driver() {
        let config = DeviceConfig {
            require_device: true,
            ..DeviceConfig::default()
        };
        let err = DeviceRegistry::initialize(&StubDriver::with_devices(Vec::new()), &config)
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Assertion);
        assert!(err.to_string().starts_with("initialize: assertion"));
        assert!(err.to_string().ends_with("no CUDA device present"));
    }

    #[test]
    fn test_empty_registry_allowed_by_default() {
        let registry =
            DeviceRegistry::initialize(&StubDriver::with_devices(Vec::new()), &DeviceConfig::default())
                .unwrap();
        assert_eq!(registry.device_count(), 0);
        assert!(matches!(registry.require_device(0), Err(CudaError::NoDevice)));
    }

    #[test]
    fn test_require_device_out_of_range() {
        let registry = DeviceRegistry::initialize(&two_gpus(), &DeviceConfig::default()).unwrap();
        assert!(registry.require_device(1).is_ok());
        assert_eq!(
            registry.require_device(5).unwrap_err(),
            CudaError::InvalidDevice { ordinal: 5, count: 2 }
        );
    }

    #[test]
    fn test_shared_registry_across_threads() {
        let registry = DeviceRegistry::initialize(&two_gpus(), &DeviceConfig::default())
            .unwrap()
            .shared();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.device_count())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 2);
        }
        DeviceRegistry::teardown(registry);
    }

    #[test]
    fn test_init_host_success_and_failure() {
        let sink = RecordingSink::new();
        let registry = init_host(&two_gpus(), &DeviceConfig::default(), &sink);
        assert_eq!(registry.map(|r| r.device_count()), Some(2));
        assert!(sink.reports().is_empty());

        let failing = two_gpus().fail_on("device_count", CUDA_ERROR_NOT_INITIALIZED);
        assert!(init_host(&failing, &DeviceConfig::default(), &sink).is_none());
        let report = sink.last().unwrap();
        assert_eq!(report.category, ErrorCategory::Driver);
        assert!(report
            .message
            .contains("driver.device_count(&mut count): CUDA_ERROR_NOT_INITIALIZED"));
    }
}
