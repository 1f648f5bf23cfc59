//! CUDA driver FFI types and bindings.
//!
//! The raw types here are always compiled so that the [`Driver`](crate::driver::Driver)
//! seam and the device registry can be built and tested without a GPU.
//! The `extern "C"` declarations live in [`cuda_driver`] and are only
//! compiled with the `cuda` feature.
//!
//! # Safety
//!
//! All functions in `cuda_driver` are unsafe FFI. Callers must ensure:
//! - cuInit() called before any other function
//! - Valid device ordinals passed to device functions
//! - Sufficient buffer sizes for string outputs
//!
//! # Feature Flags
//!
//! - `cuda`: link against libcuda and expose the extern declarations

#![allow(non_camel_case_types)]

use std::os::raw::c_int;

#[cfg(feature = "cuda")]
pub mod cuda_driver;

// =============================================================================
// TYPE ALIASES
// =============================================================================

/// CUDA result code. 0 = success, non-zero = error.
pub type CUresult = c_int;

/// CUDA device handle (ordinal-based).
pub type CUdevice = c_int;

/// CUDA device attribute enumeration.
pub type CUdevice_attribute = c_int;

// =============================================================================
// DEVICE ATTRIBUTE CONSTANTS
// =============================================================================

/// Maximum threads per block.
pub const CU_DEVICE_ATTRIBUTE_MAX_THREADS_PER_BLOCK: CUdevice_attribute = 1;

/// Warp size in threads.
pub const CU_DEVICE_ATTRIBUTE_WARP_SIZE: CUdevice_attribute = 10;

/// Number of multiprocessors on the device.
pub const CU_DEVICE_ATTRIBUTE_MULTIPROCESSOR_COUNT: CUdevice_attribute = 16;

/// Compute capability major version.
pub const CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MAJOR: CUdevice_attribute = 75;

/// Compute capability minor version.
pub const CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MINOR: CUdevice_attribute = 76;

// =============================================================================
// STRUCTS
// =============================================================================

/// Legacy device property block filled by `cuDeviceGetProperties`.
///
/// Layout matches `CUdevprop_st` in `cuda.h`.
#[repr(C)]
#[allow(non_snake_case)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CUdevprop {
    pub maxThreadsPerBlock: c_int,
    pub maxThreadsDim: [c_int; 3],
    pub maxGridSize: [c_int; 3],
    pub sharedMemPerBlock: c_int,
    pub totalConstantMemory: c_int,
    pub SIMDWidth: c_int,
    pub memPitch: c_int,
    pub regsPerBlock: c_int,
    pub clockRate: c_int,
    pub textureAlign: c_int,
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Decode CUDA driver version from encoded format.
///
/// # Arguments
///
/// * `encoded` - Version as (major * 1000 + minor * 10)
///
/// # Returns
///
/// Tuple of (major, minor) version numbers.
///
/// # Example
///
/// ```
/// use unit_cuda::ffi::decode_driver_version;
/// let (major, minor) = decode_driver_version(12040);
/// assert_eq!(major, 12);
/// assert_eq!(minor, 4);
/// ```
#[inline]
#[must_use]
pub const fn decode_driver_version(encoded: i32) -> (i32, i32) {
    let major = encoded / 1000;
    let minor = (encoded % 1000) / 10;
    (major, minor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_driver_version() {
        assert_eq!(decode_driver_version(13010), (13, 1));
        assert_eq!(decode_driver_version(12000), (12, 0));
        assert_eq!(decode_driver_version(4000), (4, 0));
    }

    #[test]
    fn test_decode_driver_version_edge_case_zero() {
        assert_eq!(decode_driver_version(0), (0, 0));
    }

    #[test]
    fn test_devprop_layout_is_fourteen_ints() {
        assert_eq!(
            std::mem::size_of::<CUdevprop>(),
            14 * std::mem::size_of::<c_int>()
        );
    }

    #[test]
    fn test_attribute_constants_match_cuda_header() {
        assert_eq!(CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MAJOR, 75);
        assert_eq!(CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MINOR, 76);
        assert_eq!(CU_DEVICE_ATTRIBUTE_MAX_THREADS_PER_BLOCK, 1);
        assert_eq!(CU_DEVICE_ATTRIBUTE_WARP_SIZE, 10);
        assert_eq!(CU_DEVICE_ATTRIBUTE_MULTIPROCESSOR_COUNT, 16);
    }
}
