//! `tracing` macros pinned to the `bench_compare` target. Events carry a
//! `component` naming the pipeline stage and a snake_case `event`.
//! Only the binary installs a subscriber.

/// Target for all comparator log events.
pub(crate) const BENCH_TARGET: &str = "bench_compare";

/// Macro for info-level log events.
macro_rules! log_info {
    ($($field:tt)*) => {
        ::tracing::info!(target: $crate::observability::BENCH_TARGET, $($field)*)
    };
}

/// Macro for debug-level log events.
macro_rules! log_debug {
    ($($field:tt)*) => {
        ::tracing::debug!(target: $crate::observability::BENCH_TARGET, $($field)*)
    };
}

/// Macro for warn-level log events.
macro_rules! log_warn {
    ($($field:tt)*) => {
        ::tracing::warn!(target: $crate::observability::BENCH_TARGET, $($field)*)
    };
}

pub(crate) use log_debug;
pub(crate) use log_info;
pub(crate) use log_warn;
