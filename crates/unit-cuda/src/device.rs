//! Device descriptors.
//!
//! A [`CudaDevice`] is queried once per ordinal while the registry is built
//! and never changes afterwards.

use crate::driver::Driver;
use crate::error::CudaResult;
use crate::ffi::{
    CUdevice, CUdevprop, CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MAJOR,
    CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MINOR, CU_DEVICE_ATTRIBUTE_MULTIPROCESSOR_COUNT,
    CU_DEVICE_ATTRIBUTE_WARP_SIZE,
};
use crate::sequence::CallSequence;
use crate::{cu_assert, cu_call};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of the name buffer handed to the driver, NUL included.
pub const DEVICE_NAME_CAPACITY: usize = 56;

/// Device name bounded to `DEVICE_NAME_CAPACITY - 1` bytes.
///
/// Truncation never splits a UTF-8 character.
///
/// # Example
///
/// ```
/// use unit_cuda::device::{DeviceName, DEVICE_NAME_CAPACITY};
///
/// let name = DeviceName::new(&"x".repeat(100));
/// assert_eq!(name.as_str().len(), DEVICE_NAME_CAPACITY - 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct DeviceName(String);

impl DeviceName {
    pub fn new(name: &str) -> Self {
        let mut end = name.len().min(DEVICE_NAME_CAPACITY - 1);
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        Self(name[..end].to_owned())
    }

    /// Read a NUL-terminated name as written by `cuDeviceGetName`.
    ///
    /// A buffer without a NUL is read to its end. Invalid UTF-8 is replaced.
    pub fn from_c_buffer(buffer: &[u8]) -> Self {
        let len = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());
        Self::new(&String::from_utf8_lossy(&buffer[..len]))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for DeviceName {
    fn from(name: String) -> Self {
        Self::new(&name)
    }
}

impl From<DeviceName> for String {
    fn from(name: DeviceName) -> Self {
        name.0
    }
}

impl fmt::Display for DeviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability record from `cuDeviceGetProperties`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProperties {
    pub max_threads_per_block: u32,
    pub max_threads_dim: [u32; 3],
    pub max_grid_size: [u32; 3],
    /// Bytes.
    pub shared_mem_per_block: u32,
    /// Bytes.
    pub total_constant_memory: u32,
    /// Warp size in threads.
    pub simd_width: u32,
    /// Bytes.
    pub mem_pitch: u32,
    pub regs_per_block: u32,
    /// kHz.
    pub clock_rate_khz: u32,
    pub texture_align: u32,
}

// Negative driver values would indicate an error; saturate to 0 rather than wrap.
fn non_negative(value: i32) -> u32 {
    value.max(0) as u32
}

impl From<CUdevprop> for DeviceProperties {
    fn from(prop: CUdevprop) -> Self {
        Self {
            max_threads_per_block: non_negative(prop.maxThreadsPerBlock),
            max_threads_dim: prop.maxThreadsDim.map(non_negative),
            max_grid_size: prop.maxGridSize.map(non_negative),
            shared_mem_per_block: non_negative(prop.sharedMemPerBlock),
            total_constant_memory: non_negative(prop.totalConstantMemory),
            simd_width: non_negative(prop.SIMDWidth),
            mem_pitch: non_negative(prop.memPitch),
            regs_per_block: non_negative(prop.regsPerBlock),
            clock_rate_khz: non_negative(prop.clockRate),
            texture_align: non_negative(prop.textureAlign),
        }
    }
}

/// Identity and capabilities of one enumerated device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CudaDevice {
    ordinal: usize,
    handle: CUdevice,
    name: DeviceName,
    properties: DeviceProperties,
    total_memory: usize,
    compute_capability: (u32, u32),
    multiprocessor_count: u32,
    warp_size: u32,
}

impl CudaDevice {
    /// Query every descriptor field for `ordinal` inside `seq`.
    ///
    /// # Errors
    ///
    /// The first failing driver call aborts the query with `CudaError::Call`.
    pub fn query(seq: &CallSequence, driver: &dyn Driver, ordinal: i32) -> CudaResult<Self> {
        cu_assert!(seq, ordinal >= 0, "ordinal {}", ordinal);

        let mut handle: CUdevice = 0;
        cu_call!(seq, driver.device_get(&mut handle, ordinal));

        let mut name_buf = [0u8; DEVICE_NAME_CAPACITY];
        cu_call!(seq, driver.device_name(&mut name_buf, handle));

        let mut prop = CUdevprop::default();
        cu_call!(seq, driver.device_properties(&mut prop, handle));

        let mut total_memory: usize = 0;
        cu_call!(seq, driver.device_total_mem(&mut total_memory, handle));

        let mut major: i32 = 0;
        let mut minor: i32 = 0;
        cu_call!(
            seq,
            driver.device_attribute(&mut major, CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MAJOR, handle)
        );
        cu_call!(
            seq,
            driver.device_attribute(&mut minor, CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MINOR, handle)
        );

        let mut multiprocessors: i32 = 0;
        cu_call!(
            seq,
            driver.device_attribute(&mut multiprocessors, CU_DEVICE_ATTRIBUTE_MULTIPROCESSOR_COUNT, handle)
        );

        let mut warp_size: i32 = 0;
        cu_call!(
            seq,
            driver.device_attribute(&mut warp_size, CU_DEVICE_ATTRIBUTE_WARP_SIZE, handle)
        );

        Ok(Self {
            ordinal: ordinal as usize,
            handle,
            name: DeviceName::from_c_buffer(&name_buf),
            properties: prop.into(),
            total_memory,
            compute_capability: (non_negative(major), non_negative(minor)),
            multiprocessor_count: non_negative(multiprocessors),
            warp_size: non_negative(warp_size),
        })
    }

    #[inline]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Opaque driver handle.
    #[inline]
    pub fn handle(&self) -> CUdevice {
        self.handle
    }

    #[inline]
    pub fn name(&self) -> &DeviceName {
        &self.name
    }

    #[inline]
    pub fn properties(&self) -> &DeviceProperties {
        &self.properties
    }

    /// Total device memory in bytes.
    #[inline]
    pub fn total_memory(&self) -> usize {
        self.total_memory
    }

    /// Compute capability (major, minor).
    #[inline]
    pub fn compute_capability(&self) -> (u32, u32) {
        self.compute_capability
    }

    #[inline]
    pub fn multiprocessor_count(&self) -> u32 {
        self.multiprocessor_count
    }

    #[inline]
    pub fn warp_size(&self) -> u32 {
        self.warp_size
    }
}
