//! CUDA driver result codes and their descriptions.
//!
//! The table below is the single place where driver status codes are named.
//! Every code maps to a static `"NAME: description"` string; codes the table
//! does not list resolve to the `CUDA_ERROR_UNKNOWN` entry, so lookups are
//! total and never allocate.
//!
//! # Example
//!
//! ```
//! use unit_cuda::status::{status_string, CUDA_ERROR_NO_DEVICE};
//!
//! assert!(status_string(CUDA_ERROR_NO_DEVICE).starts_with("CUDA_ERROR_NO_DEVICE: "));
//! assert!(status_string(12345).starts_with("CUDA_ERROR_UNKNOWN: "));
//! ```

use crate::ffi::CUresult;

/// One row of the status table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusEntry {
    /// Numeric driver code.
    pub code: CUresult,
    /// Symbolic name as it appears in `cuda.h`.
    pub name: &'static str,
    /// Description without the name prefix.
    pub description: &'static str,
    /// `"NAME: description"`.
    pub message: &'static str,
}

macro_rules! status_codes {
    ($( $name:ident = $code:literal => $desc:literal, )*) => {
        $(
            #[doc = $desc]
            pub const $name: CUresult = $code;
        )*

        const STATUS_ENTRIES: &[StatusEntry] = &[
            $(
                StatusEntry {
                    code: $name,
                    name: stringify!($name),
                    description: $desc,
                    message: concat!(stringify!($name), ": ", $desc),
                },
            )*
        ];

        /// All documented status codes, sorted by code.
        pub static STATUS_TABLE: &[StatusEntry] = STATUS_ENTRIES;
    };
}

status_codes! {
    CUDA_SUCCESS = 0 => "The API call returned with no errors. In the case of query calls, this can also mean that the operation being queried is complete (see ::cuEventQuery() and ::cuStreamQuery()).",
    CUDA_ERROR_INVALID_VALUE = 1 => "This indicates that one or more of the parameters passed to the API call is not within an acceptable range of values.",
    CUDA_ERROR_OUT_OF_MEMORY = 2 => "The API call failed because it was unable to allocate enough memory to perform the requested operation.",
    CUDA_ERROR_NOT_INITIALIZED = 3 => "This indicates that the CUDA driver has not been initialized with ::cuInit() or that initialization has failed.",
    CUDA_ERROR_DEINITIALIZED = 4 => "This indicates that the CUDA driver is in the process of shutting down.",
    CUDA_ERROR_PROFILER_DISABLED = 5 => "This indicates profiling APIs are called while application is running in visual profiler mode.",
    CUDA_ERROR_PROFILER_NOT_INITIALIZED = 6 => "This indicates profiling has not been initialized for this context. Call cuProfilerInitialize() to resolve this.",
    CUDA_ERROR_PROFILER_ALREADY_STARTED = 7 => "This indicates profiler has already been started and probably cuProfilerStart() is incorrectly called.",
    CUDA_ERROR_PROFILER_ALREADY_STOPPED = 8 => "This indicates profiler has already been stopped and probably cuProfilerStop() is incorrectly called.",
    CUDA_ERROR_NO_DEVICE = 100 => "This indicates that no CUDA-capable devices were detected by the installed CUDA driver.",
    CUDA_ERROR_INVALID_DEVICE = 101 => "This indicates that the device ordinal supplied by the user does not correspond to a valid CUDA device.",
    CUDA_ERROR_INVALID_IMAGE = 200 => "This indicates that the device kernel image is invalid. This can also indicate an invalid CUDA module.",
    CUDA_ERROR_INVALID_CONTEXT = 201 => "This most frequently indicates that there is no context bound to the current thread. This can also be returned if the context passed to an API call is not a valid handle (such as a context that has had ::cuCtxDestroy() invoked on it). This can also be returned if a user mixes different API versions (i.e. 3010 context with 3020 API calls). See ::cuCtxGetApiVersion() for more details.",
    CUDA_ERROR_CONTEXT_ALREADY_CURRENT = 202 => "This indicated that the context being supplied as a parameter to the API call was already the active context. This error return is deprecated as of CUDA 3.2. It is no longer an error to attempt to push the active context via ::cuCtxPushCurrent().",
    CUDA_ERROR_MAP_FAILED = 205 => "This indicates that a map or register operation has failed.",
    CUDA_ERROR_UNMAP_FAILED = 206 => "This indicates that an unmap or unregister operation has failed.",
    CUDA_ERROR_ARRAY_IS_MAPPED = 207 => "This indicates that the specified array is currently mapped and thus cannot be destroyed.",
    CUDA_ERROR_ALREADY_MAPPED = 208 => "This indicates that the resource is already mapped.",
    CUDA_ERROR_NO_BINARY_FOR_GPU = 209 => "This indicates that there is no kernel image available that is suitable for the device. This can occur when a user specifies code generation options for a particular CUDA source file that do not include the corresponding device configuration.",
    CUDA_ERROR_ALREADY_ACQUIRED = 210 => "This indicates that a resource has already been acquired.",
    CUDA_ERROR_NOT_MAPPED = 211 => "This indicates that a resource is not mapped.",
    CUDA_ERROR_NOT_MAPPED_AS_ARRAY = 212 => "This indicates that a mapped resource is not available for access as an array.",
    CUDA_ERROR_NOT_MAPPED_AS_POINTER = 213 => "This indicates that a mapped resource is not available for access as a pointer.",
    CUDA_ERROR_ECC_UNCORRECTABLE = 214 => "This indicates that an uncorrectable ECC error was detected during execution.",
    CUDA_ERROR_UNSUPPORTED_LIMIT = 215 => "This indicates that the ::CUlimit passed to the API call is not supported by the active device.",
    CUDA_ERROR_CONTEXT_ALREADY_IN_USE = 216 => "This indicates that the ::CUcontext passed to the API call can only be bound to a single CPU thread at a time but is already bound to a CPU thread.",
    CUDA_ERROR_INVALID_SOURCE = 300 => "This indicates that the device kernel source is invalid.",
    CUDA_ERROR_FILE_NOT_FOUND = 301 => "This indicates that the file specified was not found.",
    CUDA_ERROR_SHARED_OBJECT_SYMBOL_NOT_FOUND = 302 => "This indicates that a link to a shared object failed to resolve.",
    CUDA_ERROR_SHARED_OBJECT_INIT_FAILED = 303 => "This indicates that initialization of a shared object failed.",
    CUDA_ERROR_OPERATING_SYSTEM = 304 => "This indicates that an OS call failed.",
    CUDA_ERROR_INVALID_HANDLE = 400 => "This indicates that a resource handle passed to the API call was not valid. Resource handles are opaque types like ::CUstream and ::CUevent.",
    CUDA_ERROR_NOT_FOUND = 500 => "This indicates that a named symbol was not found. Examples of symbols are global/constant variable names, texture names, and surface names.",
    CUDA_ERROR_NOT_READY = 600 => "This indicates that asynchronous operations issued previously have not completed yet. This result is not actually an error, but must be indicated differently than ::CUDA_SUCCESS (which indicates completion). Calls that may return this value include ::cuEventQuery() and ::cuStreamQuery().",
    CUDA_ERROR_LAUNCH_FAILED = 700 => "An exception occurred on the device while executing a kernel. Common causes include dereferencing an invalid device pointer and accessing out of bounds shared memory. The context cannot be used, so it must be destroyed (and a new one should be created). All existing device memory allocations from this context are invalid and must be reconstructed if the program is to continue using CUDA.",
    CUDA_ERROR_LAUNCH_OUT_OF_RESOURCES = 701 => "This indicates that a launch did not occur because it did not have appropriate resources. This error usually indicates that the user has attempted to pass too many arguments to the device kernel, or the kernel launch specifies too many threads for the kernel's register count. Passing arguments of the wrong size (i.e. a 64-bit pointer when a 32-bit int is expected) is equivalent to passing too many arguments and can also result in this error.",
    CUDA_ERROR_LAUNCH_TIMEOUT = 702 => "This indicates that the device kernel took too long to execute. This can only occur if timeouts are enabled - see the device attribute ::CU_DEVICE_ATTRIBUTE_KERNEL_EXEC_TIMEOUT for more information. The context cannot be used (and must be destroyed similar to ::CUDA_ERROR_LAUNCH_FAILED). All existing device memory allocations from this context are invalid and must be reconstructed if the program is to continue using CUDA.",
    CUDA_ERROR_LAUNCH_INCOMPATIBLE_TEXTURING = 703 => "This error indicates a kernel launch that uses an incompatible texturing mode.",
    CUDA_ERROR_PEER_ACCESS_ALREADY_ENABLED = 704 => "This error indicates that a call to ::cuCtxEnablePeerAccess() is trying to re-enable peer access to a context which has already had peer access to it enabled.",
    CUDA_ERROR_PEER_ACCESS_NOT_ENABLED = 705 => "This error indicates that ::cuCtxDisablePeerAccess() is trying to disable peer access which has not been enabled yet via ::cuCtxEnablePeerAccess(). ",
    CUDA_ERROR_PRIMARY_CONTEXT_ACTIVE = 708 => "This error indicates that the primary context for the specified device has already been initialized.",
    CUDA_ERROR_CONTEXT_IS_DESTROYED = 709 => "This error indicates that the context current to the calling thread has been destroyed using ::cuCtxDestroy, or is a primary context which has not yet been initialized.",
    CUDA_ERROR_UNKNOWN = 999 => "This indicates that an unknown internal error has occurred.",
}

/// Entry that every unlisted code resolves to; always the last row.
const UNKNOWN_ENTRY: StatusEntry = STATUS_ENTRIES[STATUS_ENTRIES.len() - 1];

const _: () = assert!(UNKNOWN_ENTRY.code == CUDA_ERROR_UNKNOWN);

/// Check if a CUDA result indicates success.
///
/// # Example
///
/// ```
/// use unit_cuda::status::{is_cuda_success, CUDA_SUCCESS};
/// assert!(is_cuda_success(CUDA_SUCCESS));
/// assert!(!is_cuda_success(101));
/// ```
#[inline]
#[must_use]
pub const fn is_cuda_success(result: CUresult) -> bool {
    result == CUDA_SUCCESS
}

/// Find the documented entry for `code`, if any.
#[must_use]
pub fn lookup(code: CUresult) -> Option<&'static StatusEntry> {
    STATUS_TABLE
        .binary_search_by_key(&code, |entry| entry.code)
        .ok()
        .map(|index| &STATUS_TABLE[index])
}

/// Entry for `code`, falling back to `CUDA_ERROR_UNKNOWN`.
#[must_use]
pub fn entry(code: CUresult) -> &'static StatusEntry {
    lookup(code).unwrap_or(&UNKNOWN_ENTRY)
}

/// Human-readable `"NAME: description"` string for a driver result code.
#[must_use]
pub fn status_string(code: CUresult) -> &'static str {
    entry(code).message
}

/// Symbolic name for a driver result code.
#[must_use]
pub fn status_name(code: CUresult) -> &'static str {
    entry(code).name
}

/// Description of a driver result code, without the name prefix.
#[must_use]
pub fn status_description(code: CUresult) -> &'static str {
    entry(code).description
}
