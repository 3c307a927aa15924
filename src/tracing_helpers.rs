//! Zero-cost tracing helpers.
//!
//! With the `tracing` feature enabled these forward to the `tracing`
//! crate; without it (the default) they compile to nothing, so the hot
//! CAS loops carry no logging overhead in normal builds.
//!
//! ```bash
//! # Trace retry/repair events of a specific test
//! RUST_LOG=lflist=trace cargo test --features tracing test_name
//! ```

#![allow(unused_macros, unused_imports)]

/// Trace-level logging for retry and repair paths.
#[cfg(feature = "tracing")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

/// Debug-level logging.
#[cfg(feature = "tracing")]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub(crate) use debug_log;
pub(crate) use trace_log;
