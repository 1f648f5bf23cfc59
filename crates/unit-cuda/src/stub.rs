//! Scripted driver for tests.
//!
//! # TEST ONLY
//!
//! Gated with `#[cfg(test)]` in `lib.rs`. Production code goes through
//! [`LinkedDriver`](crate::driver) when the `cuda` feature is enabled.

use crate::driver::Driver;
use crate::ffi::{
    CUdevice, CUdevice_attribute, CUdevprop, CUresult, CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MAJOR,
    CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MINOR, CU_DEVICE_ATTRIBUTE_MULTIPROCESSOR_COUNT,
    CU_DEVICE_ATTRIBUTE_WARP_SIZE,
};
use crate::status::{
    CUDA_ERROR_INVALID_DEVICE, CUDA_ERROR_INVALID_VALUE, CUDA_ERROR_NOT_INITIALIZED, CUDA_SUCCESS,
};
use parking_lot::Mutex;
use std::collections::HashMap;

/// One fake device.
#[derive(Debug, Clone)]
pub struct StubDevice {
    pub name: String,
    pub prop: CUdevprop,
    pub total_mem: usize,
    pub compute_capability: (i32, i32),
    pub multiprocessors: i32,
}

impl StubDevice {
    /// A100-like device with the given name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            prop: CUdevprop {
                maxThreadsPerBlock: 1024,
                maxThreadsDim: [1024, 1024, 64],
                maxGridSize: [2_147_483_647, 65_535, 65_535],
                sharedMemPerBlock: 49_152,
                totalConstantMemory: 65_536,
                SIMDWidth: 32,
                memPitch: 2_147_483_647,
                regsPerBlock: 65_536,
                clockRate: 1_410_000,
                textureAlign: 512,
            },
            total_mem: 40 << 30,
            compute_capability: (8, 0),
            multiprocessors: 108,
        }
    }
}

/// Driver that answers from a fixed device list.
///
/// `fail_on(entry_point, status)` makes the named entry point return
/// `status`; every entry point invoked is appended to the call log.
#[derive(Debug)]
pub struct StubDriver {
    version: i32,
    devices: Vec<StubDevice>,
    failures: HashMap<&'static str, CUresult>,
    calls: Mutex<Vec<&'static str>>,
    initialized: Mutex<bool>,
}

impl StubDriver {
    pub fn with_devices(devices: Vec<StubDevice>) -> Self {
        Self {
            version: 12040,
            devices,
            failures: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            initialized: Mutex::new(false),
        }
    }

    pub fn fail_on(mut self, entry_point: &'static str, status: CUresult) -> Self {
        self.failures.insert(entry_point, status);
        self
    }

    /// Entry points called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    fn enter(&self, entry_point: &'static str) -> Option<CUresult> {
        self.calls.lock().push(entry_point);
        if let Some(&status) = self.failures.get(entry_point) {
            return Some(status);
        }
        if entry_point != "init" && !*self.initialized.lock() {
            return Some(CUDA_ERROR_NOT_INITIALIZED);
        }
        None
    }

    fn device(&self, handle: CUdevice) -> Option<&StubDevice> {
        usize::try_from(handle).ok().and_then(|i| self.devices.get(i))
    }
}

impl Driver for StubDriver {
    fn init(&self, flags: u32) -> CUresult {
        if let Some(status) = self.enter("init") {
            return status;
        }
        if flags != 0 {
            return CUDA_ERROR_INVALID_VALUE;
        }
        *self.initialized.lock() = true;
        CUDA_SUCCESS
    }

    fn driver_version(&self, version: &mut i32) -> CUresult {
        if let Some(status) = self.enter("driver_version") {
            return status;
        }
        *version = self.version;
        CUDA_SUCCESS
    }

    fn device_count(&self, count: &mut i32) -> CUresult {
        if let Some(status) = self.enter("device_count") {
            return status;
        }
        *count = self.devices.len() as i32;
        CUDA_SUCCESS
    }

    fn device_get(&self, device: &mut CUdevice, ordinal: i32) -> CUresult {
        if let Some(status) = self.enter("device_get") {
            return status;
        }
        if self.device(ordinal).is_none() {
            return CUDA_ERROR_INVALID_DEVICE;
        }
        *device = ordinal;
        CUDA_SUCCESS
    }

    fn device_name(&self, name: &mut [u8], device: CUdevice) -> CUresult {
        if let Some(status) = self.enter("device_name") {
            return status;
        }
        let Some(stub) = self.device(device) else {
            return CUDA_ERROR_INVALID_DEVICE;
        };
        if name.is_empty() {
            return CUDA_ERROR_INVALID_VALUE;
        }
        // Same contract as the driver: truncate and NUL-terminate.
        let bytes = stub.name.as_bytes();
        let len = bytes.len().min(name.len() - 1);
        name[..len].copy_from_slice(&bytes[..len]);
        name[len] = 0;
        CUDA_SUCCESS
    }

    fn device_properties(&self, prop: &mut CUdevprop, device: CUdevice) -> CUresult {
        if let Some(status) = self.enter("device_properties") {
            return status;
        }
        match self.device(device) {
            Some(stub) => {
                *prop = stub.prop;
                CUDA_SUCCESS
            }
            None => CUDA_ERROR_INVALID_DEVICE,
        }
    }

    fn device_total_mem(&self, bytes: &mut usize, device: CUdevice) -> CUresult {
        if let Some(status) = self.enter("device_total_mem") {
            return status;
        }
        match self.device(device) {
            Some(stub) => {
                *bytes = stub.total_mem;
                CUDA_SUCCESS
            }
            None => CUDA_ERROR_INVALID_DEVICE,
        }
    }

    fn device_attribute(
        &self,
        value: &mut i32,
        attribute: CUdevice_attribute,
        device: CUdevice,
    ) -> CUresult {
        if let Some(status) = self.enter("device_attribute") {
            return status;
        }
        let Some(stub) = self.device(device) else {
            return CUDA_ERROR_INVALID_DEVICE;
        };
        *value = match attribute {
            CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MAJOR => stub.compute_capability.0,
            CU_DEVICE_ATTRIBUTE_COMPUTE_CAPABILITY_MINOR => stub.compute_capability.1,
            CU_DEVICE_ATTRIBUTE_MULTIPROCESSOR_COUNT => stub.multiprocessors,
            CU_DEVICE_ATTRIBUTE_WARP_SIZE => stub.prop.SIMDWidth,
            _ => return CUDA_ERROR_INVALID_VALUE,
        };
        CUDA_SUCCESS
    }
}
