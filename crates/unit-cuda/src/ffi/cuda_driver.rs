//! CUDA Driver API FFI bindings.
//!
//! Low-level bindings to libcuda. These are the only CUDA FFI declarations
//! in the crate; everything else goes through [`LinkedDriver`](crate::driver::LinkedDriver).

use super::{CUdevice, CUdevice_attribute, CUdevprop, CUresult};
use std::os::raw::{c_char, c_int, c_uint};

#[link(name = "cuda")]
extern "C" {
    /// Initialize the CUDA driver.
    ///
    /// MUST be called before any other CUDA driver function.
    /// `flags` must be 0.
    pub fn cuInit(flags: c_uint) -> CUresult;

    /// Get the CUDA driver version, encoded as (major * 1000 + minor * 10).
    pub fn cuDriverGetVersion(version: *mut c_int) -> CUresult;

    /// Get the number of CUDA devices.
    pub fn cuDeviceGetCount(count: *mut c_int) -> CUresult;

    /// Get a CUDA device handle by ordinal.
    ///
    /// Returns `CUDA_ERROR_INVALID_DEVICE` if ordinal out of range.
    pub fn cuDeviceGet(device: *mut CUdevice, ordinal: c_int) -> CUresult;

    /// Get the device name as a null-terminated string.
    ///
    /// `len` is the buffer size including the null terminator.
    pub fn cuDeviceGetName(name: *mut c_char, len: c_int, dev: CUdevice) -> CUresult;

    /// Fill the legacy property block for a device.
    pub fn cuDeviceGetProperties(prop: *mut CUdevprop, dev: CUdevice) -> CUresult;

    /// Get total memory on the device in bytes (versioned API).
    pub fn cuDeviceTotalMem_v2(bytes: *mut usize, dev: CUdevice) -> CUresult;

    /// Get a device attribute value.
    ///
    /// Much faster than cudaGetDeviceProperties (nanoseconds vs milliseconds).
    pub fn cuDeviceGetAttribute(
        pi: *mut c_int,
        attrib: CUdevice_attribute,
        dev: CUdevice,
    ) -> CUresult;
}
