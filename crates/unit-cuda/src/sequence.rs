//! Structured propagation of driver failures.
//!
//! A host-facing function is written as one call sequence: every driver call
//! goes through [`cu_call!`](crate::cu_call), which returns early on the first
//! non-success status with a [`CallFailure`] describing the call site. The
//! sequence ends in [`finish`], which converts the outcome into the value the
//! host expects: the success value, or a reported error plus a sentinel.
//!
//! # Example
//!
//! ```
//! use unit_cuda::host::{take_pending_error, ThreadLocalSink};
//! use unit_cuda::sequence::{finish, CallSequence};
//! use unit_cuda::status::{CUDA_ERROR_INVALID_VALUE, CUDA_SUCCESS};
//! use unit_cuda::{cu_call, CudaResult};
//!
//! fn first() -> i32 { CUDA_SUCCESS }
//! fn second() -> i32 { CUDA_ERROR_INVALID_VALUE }
//!
//! let result: CudaResult<i64> = CallSequence::run("example", |seq| {
//!     cu_call!(seq, first());
//!     cu_call!(seq, second());
//!     Ok(1)
//! });
//!
//! let value = finish(result, &ThreadLocalSink, -1, || {});
//! assert_eq!(value, -1);
//! let pending = take_pending_error().unwrap();
//! assert!(pending.message.contains("second(): CUDA_ERROR_INVALID_VALUE"));
//! ```

use crate::error::{CudaError, CudaResult};
use crate::ffi::CUresult;
use crate::host::{report, HostErrorSink};
use crate::status::{is_cuda_success, status_string};
use std::fmt;
use tracing::{debug, warn};

/// Source location and literal text of one driver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    /// `stringify!` of the call expression.
    pub call: &'static str,
    /// `file!()` of the call.
    pub file: &'static str,
    /// `line!()` of the call.
    pub line: u32,
}

/// Context of the call that aborted a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFailure {
    /// Name of the enclosing sequence.
    pub function: &'static str,
    /// Where the failing call was made.
    pub site: CallSite,
    /// Status the driver returned.
    pub status: CUresult,
}

impl CallFailure {
    /// Human-readable status string.
    #[must_use]
    pub fn description(&self) -> &'static str {
        status_string(self.status)
    }
}

impl fmt::Display for CallFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}\n{}: {}",
            self.site.file,
            self.function,
            self.site.line,
            self.site.call,
            self.description()
        )
    }
}

/// A precondition that did not hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    /// Enclosing sequence; `None` for [`host_assert!`](crate::host_assert).
    pub function: Option<&'static str>,
    /// `stringify!` of the condition.
    pub condition: &'static str,
    /// Optional formatted detail.
    pub detail: Option<String>,
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(function) = self.function {
            write!(f, "{}: ", function)?;
        }
        write!(f, "assertion {}", self.condition)?;
        if let Some(detail) = &self.detail {
            write!(f, ": {}", detail)?;
        }
        Ok(())
    }
}

/// Per-invocation context of a call sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSequence {
    function: &'static str,
}

impl CallSequence {
    /// Begin a sequence for `function`. No side effects.
    #[must_use]
    pub const fn begin(function: &'static str) -> Self {
        Self { function }
    }

    /// Run `body` as a sequence named `function`.
    pub fn run<T, F>(function: &'static str, body: F) -> CudaResult<T>
    where
        F: FnOnce(&CallSequence) -> CudaResult<T>,
    {
        body(&Self::begin(function))
    }

    /// Name of the enclosing function.
    #[inline]
    #[must_use]
    pub fn function(&self) -> &'static str {
        self.function
    }

    /// Turn a driver status into `Ok` or a [`CallFailure`] at `site`.
    ///
    /// Normally invoked through [`cu_call!`](crate::cu_call).
    pub fn check(&self, status: CUresult, site: CallSite) -> CudaResult<()> {
        if is_cuda_success(status) {
            return Ok(());
        }

        debug!(
            target: "unit_cuda::sequence",
            function = self.function,
            call = site.call,
            file = site.file,
            line = site.line,
            status,
            "driver call failed"
        );

        Err(CudaError::Call(CallFailure {
            function: self.function,
            site,
            status,
        }))
    }

    /// Turn a condition into `Ok` or an [`AssertionFailure`].
    ///
    /// Normally invoked through [`cu_assert!`](crate::cu_assert).
    pub fn assert(
        &self,
        holds: bool,
        condition: &'static str,
        detail: Option<String>,
    ) -> CudaResult<()> {
        if holds {
            return Ok(());
        }

        Err(CudaError::Assertion(AssertionFailure {
            function: Some(self.function),
            condition,
            detail,
        }))
    }
}

/// End a sequence and hand its outcome to the host.
///
/// - `Ok(value)` returns `value`; nothing is reported and `cleanup` is not run.
/// - A call failure, or any other error the body propagated with `?` (for
///   example `NoDevice`), is reported through `sink`, then `cleanup` runs once
///   and `sentinel` is returned.
/// - An assertion failure is reported and `sentinel` returned without running
///   `cleanup`.
pub fn finish<T, S, C>(result: CudaResult<T>, sink: &S, sentinel: T, cleanup: C) -> T
where
    S: HostErrorSink + ?Sized,
    C: FnOnce(),
{
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(target: "unit_cuda::sequence", category = ?err.category(), "{}", err);
            report(sink, &err);
            if !matches!(err, CudaError::Assertion(_)) {
                cleanup();
            }
            sentinel
        }
    }
}

/// Invoke a driver call inside a [`CallSequence`].
///
/// Evaluates `$call` (a `CUresult`); on failure returns early from the
/// enclosing function with `CudaError::Call`, recording the literal call text,
/// file and line.
#[macro_export]
macro_rules! cu_call {
    ($seq:expr, $call:expr) => {
        $seq.check(
            $call,
            $crate::sequence::CallSite {
                call: stringify!($call),
                file: file!(),
                line: line!(),
            },
        )?
    };
}

/// Assert a condition inside a [`CallSequence`].
///
/// On failure returns early with a message `"{function}: assertion {cond}"`,
/// followed by `": {detail}"` when format arguments are given.
#[macro_export]
macro_rules! cu_assert {
    ($seq:expr, $cond:expr $(,)?) => {
        $seq.assert($cond, stringify!($cond), None)?
    };
    ($seq:expr, $cond:expr, $($detail:tt)+) => {
        $seq.assert($cond, stringify!($cond), Some(format!($($detail)+)))?
    };
}

/// Assert a condition outside any sequence.
///
/// On failure returns early with a message `"assertion {cond}: {detail}"`.
#[macro_export]
macro_rules! host_assert {
    ($cond:expr, $($detail:tt)+) => {
        if !($cond) {
            return Err($crate::CudaError::Assertion($crate::sequence::AssertionFailure {
                function: None,
                condition: stringify!($cond),
                detail: Some(format!($($detail)+)),
            }));
        }
    };
}
