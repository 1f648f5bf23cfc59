//! Python extension module.
//!
//! Importing `unit_cuda` initializes the driver, enumerates devices and
//! publishes `cuda_version`, `cuda_device_count` and `cuda_device` as module
//! attributes. Driver and assertion failures raise `unit_cuda.CudaError`.
//!
//! Failures reach Python the way the host expects: [`PyErrSink`] sets the
//! interpreter's pending error and the caller returns a sentinel, which the
//! module init turns back into an `Err`.

use crate::config::UnitCudaConfig;
use crate::device::CudaDevice;
use crate::driver::LinkedDriver;
use crate::error::CudaError as Error;
use crate::host::{init_host, ErrorCategory, HostErrorSink};
use crate::logging::init_logging;
use pyo3::prelude::*;
use tracing::debug;

pyo3::create_exception!(unit_cuda, CudaError, pyo3::exceptions::PyException);

impl From<Error> for PyErr {
    fn from(err: Error) -> Self {
        CudaError::new_err(err.to_string())
    }
}

/// Host sink that sets the interpreter's pending exception.
pub struct PyErrSink<'py> {
    py: Python<'py>,
}

impl<'py> PyErrSink<'py> {
    pub fn new(py: Python<'py>) -> Self {
        Self { py }
    }

    /// Take the pending exception, or a generic one if none was set.
    pub fn take(&self) -> PyErr {
        PyErr::take(self.py).unwrap_or_else(|| CudaError::new_err("unit_cuda: unknown failure"))
    }
}

impl HostErrorSink for PyErrSink<'_> {
    fn set_error(&self, _category: ErrorCategory, message: &str) {
        CudaError::new_err(message.to_string()).restore(self.py);
    }
}

/// Read-only view of a [`CudaDevice`].
#[pyclass(frozen, get_all, name = "Device", module = "unit_cuda")]
#[derive(Debug, Clone)]
pub struct PyDevice {
    ordinal: usize,
    handle: i32,
    name: String,
    total_memory: usize,
    compute_capability: (u32, u32),
    multiprocessor_count: u32,
    warp_size: u32,
    max_threads_per_block: u32,
    max_threads_dim: (u32, u32, u32),
    max_grid_size: (u32, u32, u32),
    shared_mem_per_block: u32,
    total_constant_memory: u32,
    regs_per_block: u32,
    clock_rate_khz: u32,
}

impl From<&CudaDevice> for PyDevice {
    fn from(device: &CudaDevice) -> Self {
        let props = device.properties();
        let [tx, ty, tz] = props.max_threads_dim;
        let [gx, gy, gz] = props.max_grid_size;
        Self {
            ordinal: device.ordinal(),
            handle: device.handle(),
            name: device.name().to_string(),
            total_memory: device.total_memory(),
            compute_capability: device.compute_capability(),
            multiprocessor_count: device.multiprocessor_count(),
            warp_size: device.warp_size(),
            max_threads_per_block: props.max_threads_per_block,
            max_threads_dim: (tx, ty, tz),
            max_grid_size: (gx, gy, gz),
            shared_mem_per_block: props.shared_mem_per_block,
            total_constant_memory: props.total_constant_memory,
            regs_per_block: props.regs_per_block,
            clock_rate_khz: props.clock_rate_khz,
        }
    }
}

#[pymethods]
impl PyDevice {
    fn __repr__(&self) -> String {
        format!(
            "Device(ordinal={}, name='{}', compute_capability={}.{})",
            self.ordinal, self.name, self.compute_capability.0, self.compute_capability.1
        )
    }
}

#[pymodule]
fn unit_cuda(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    m.add("CudaError", py.get_type_bound::<CudaError>())?;
    m.add_class::<PyDevice>()?;

    let config = UnitCudaConfig::load()?;
    if let Err(err) = init_logging(&config.logging) {
        // The embedding process may already own the global subscriber.
        debug!(target: "unit_cuda::python", "{}", err);
    }

    let sink = PyErrSink::new(py);
    let Some(registry) = init_host(&LinkedDriver, &config.devices, &sink) else {
        return Err(sink.take());
    };
    let devices: Vec<PyDevice> = registry.devices().iter().map(PyDevice::from).collect();

    m.add("cuda_version", registry.driver_version())?;
    m.add("cuda_device_count", registry.device_count())?;
    m.add("cuda_device", devices)?;
    Ok(())
}
