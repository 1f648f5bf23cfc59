//! The seam between this crate and the CUDA driver.
//!
//! [`Driver`] mirrors the driver's contract: every entry point writes its
//! outputs through out-parameters and returns a [`CUresult`]. Call sites
//! wrap each call in [`cu_call!`](crate::cu_call) so the status is inspected
//! in one place.

use crate::ffi::{CUdevice, CUdevice_attribute, CUdevprop, CUresult};

/// CUDA driver entry points used by the device registry.
pub trait Driver: Send + Sync {
    /// `cuInit`.
    fn init(&self, flags: u32) -> CUresult;

    /// `cuDriverGetVersion`.
    fn driver_version(&self, version: &mut i32) -> CUresult;

    /// `cuDeviceGetCount`.
    fn device_count(&self, count: &mut i32) -> CUresult;

    /// `cuDeviceGet`.
    fn device_get(&self, device: &mut CUdevice, ordinal: i32) -> CUresult;

    /// `cuDeviceGetName`. Writes a NUL-terminated name into `name`.
    fn device_name(&self, name: &mut [u8], device: CUdevice) -> CUresult;

    /// `cuDeviceGetProperties`.
    fn device_properties(&self, prop: &mut CUdevprop, device: CUdevice) -> CUresult;

    /// `cuDeviceTotalMem_v2`.
    fn device_total_mem(&self, bytes: &mut usize, device: CUdevice) -> CUresult;

    /// `cuDeviceGetAttribute`.
    fn device_attribute(
        &self,
        value: &mut i32,
        attribute: CUdevice_attribute,
        device: CUdevice,
    ) -> CUresult;
}

#[cfg(feature = "cuda")]
pub use linked::LinkedDriver;

#[cfg(feature = "cuda")]
mod linked {
    use super::Driver;
    use crate::ffi::cuda_driver::{
        cuDeviceGet, cuDeviceGetAttribute, cuDeviceGetCount, cuDeviceGetName,
        cuDeviceGetProperties, cuDeviceTotalMem_v2, cuDriverGetVersion, cuInit,
    };
    use crate::ffi::{CUdevice, CUdevice_attribute, CUdevprop, CUresult};
    use crate::status::CUDA_ERROR_INVALID_VALUE;
    use std::os::raw::c_int;

    /// [`Driver`] backed by libcuda.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LinkedDriver;

    impl Driver for LinkedDriver {
        fn init(&self, flags: u32) -> CUresult {
            // SAFETY: cuInit is thread-safe and idempotent
            unsafe { cuInit(flags) }
        }

        fn driver_version(&self, version: &mut i32) -> CUresult {
            // SAFETY: version is a valid pointer
            unsafe { cuDriverGetVersion(version) }
        }

        fn device_count(&self, count: &mut i32) -> CUresult {
            // SAFETY: count is a valid pointer
            unsafe { cuDeviceGetCount(count) }
        }

        fn device_get(&self, device: &mut CUdevice, ordinal: i32) -> CUresult {
            // SAFETY: device is a valid pointer
            unsafe { cuDeviceGet(device, ordinal) }
        }

        fn device_name(&self, name: &mut [u8], device: CUdevice) -> CUresult {
            let Ok(len) = c_int::try_from(name.len()) else {
                return CUDA_ERROR_INVALID_VALUE;
            };
            // SAFETY: buffer is valid for len bytes; the driver NUL-terminates
            unsafe { cuDeviceGetName(name.as_mut_ptr().cast(), len, device) }
        }

        fn device_properties(&self, prop: &mut CUdevprop, device: CUdevice) -> CUresult {
            // SAFETY: CUdevprop is repr(C) and matches CUdevprop_st
            unsafe { cuDeviceGetProperties(prop, device) }
        }

        fn device_total_mem(&self, bytes: &mut usize, device: CUdevice) -> CUresult {
            // SAFETY: bytes is a valid pointer
            unsafe { cuDeviceTotalMem_v2(bytes, device) }
        }

        fn device_attribute(
            &self,
            value: &mut i32,
            attribute: CUdevice_attribute,
            device: CUdevice,
        ) -> CUresult {
            // SAFETY: value is a valid pointer
            unsafe { cuDeviceGetAttribute(value, attribute, device) }
        }
    }
}
