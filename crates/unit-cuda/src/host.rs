//! Host runtime error channel.
//!
//! A host runtime keeps one pending error per execution context and expects
//! the native call to return a sentinel after setting it. [`HostErrorSink`] is
//! that primitive; [`ThreadLocalSink`] implements it with one slot per thread.

use crate::config::DeviceConfig;
use crate::driver::Driver;
use crate::error::CudaError;
use crate::registry::DeviceRegistry;
use crate::sequence::finish;
use parking_lot::Mutex;
use std::cell::RefCell;
use std::sync::Arc;

/// Category a failure is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A driver call returned a failure status.
    Driver,
    /// A precondition did not hold.
    Assertion,
    /// Device lookup failed.
    Device,
    /// Configuration or logging setup failed.
    Config,
}

impl ErrorCategory {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::Assertion => "assertion",
            Self::Device => "device",
            Self::Config => "config",
        }
    }
}

/// The host's "set pending error" primitive.
pub trait HostErrorSink {
    /// Record `message` as the pending error for the current execution context.
    fn set_error(&self, category: ErrorCategory, message: &str);
}

/// Report `err` through `sink`.
pub fn report<S>(sink: &S, err: &CudaError)
where
    S: HostErrorSink + ?Sized,
{
    sink.set_error(err.category(), &err.to_string());
}

/// An error recorded by a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingError {
    pub category: ErrorCategory,
    pub message: String,
}

thread_local! {
    static PENDING: RefCell<Option<PendingError>> = const { RefCell::new(None) };
}

/// Sink that stores the pending error of the calling thread.
///
/// Setting an error replaces whatever was pending on that thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadLocalSink;

impl HostErrorSink for ThreadLocalSink {
    fn set_error(&self, category: ErrorCategory, message: &str) {
        PENDING.with(|slot| {
            *slot.borrow_mut() = Some(PendingError {
                category,
                message: message.to_owned(),
            });
        });
    }
}

/// Take and clear the calling thread's pending error.
pub fn take_pending_error() -> Option<PendingError> {
    PENDING.with(|slot| slot.borrow_mut().take())
}

/// Whether the calling thread has a pending error.
pub fn has_pending_error() -> bool {
    PENDING.with(|slot| slot.borrow().is_some())
}

/// Sink that keeps every report, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    reports: Mutex<Vec<PendingError>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all reports so far.
    pub fn reports(&self) -> Vec<PendingError> {
        self.reports.lock().clone()
    }

    /// Most recent report.
    pub fn last(&self) -> Option<PendingError> {
        self.reports.lock().last().cloned()
    }
}

impl HostErrorSink for RecordingSink {
    fn set_error(&self, category: ErrorCategory, message: &str) {
        self.reports.lock().push(PendingError {
            category,
            message: message.to_owned(),
        });
    }
}

/// Host entry point: build the device registry or report why it failed.
///
/// Returns `None` (the sentinel) after reporting through `sink` when
/// initialization fails.
pub fn init_host<S>(
    driver: &dyn Driver,
    config: &DeviceConfig,
    sink: &S,
) -> Option<Arc<DeviceRegistry>>
where
    S: HostErrorSink + ?Sized,
{
    let result = DeviceRegistry::initialize(driver, config).map(|registry| Some(registry.shared()));
    finish(result, sink, None, || {})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_local_last_error_wins() {
        assert!(take_pending_error().is_none());
        ThreadLocalSink.set_error(ErrorCategory::Driver, "first");
        ThreadLocalSink.set_error(ErrorCategory::Assertion, "second");
        assert!(has_pending_error());
        let pending = take_pending_error().unwrap();
        assert_eq!(pending.category, ErrorCategory::Assertion);
        assert_eq!(pending.message, "second");
        assert!(!has_pending_error());
    }

    #[test]
    fn test_thread_local_slots_are_per_thread() {
        ThreadLocalSink.set_error(ErrorCategory::Device, "main thread");
        let other = std::thread::spawn(take_pending_error).join().unwrap();
        assert!(other.is_none());
        assert_eq!(take_pending_error().unwrap().message, "main thread");
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        report(&sink, &CudaError::NoDevice);
        report(&sink, &CudaError::InvalidConfig("bad".into()));
        let reports = sink.reports();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].category, ErrorCategory::Device);
        assert_eq!(reports[0].message, "No CUDA device available");
        assert_eq!(sink.last().unwrap().category, ErrorCategory::Config);
    }

    #[test]
    fn test_category_names() {
        assert_eq!(ErrorCategory::Driver.as_str(), "driver");
        assert_eq!(ErrorCategory::Config.as_str(), "config");
    }
}
