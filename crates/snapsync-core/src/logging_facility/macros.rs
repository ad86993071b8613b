//! Operation boundary macros
//!
//! An operation logs `start`, then exactly one of `end` or `end_error`, each
//! tagged with `component`, `op` and `event`. The closing macros take the
//! `Instant` the operation started at and log `duration_ms` from it.

use std::time::Instant;

/// Milliseconds since `started`, saturating
#[doc(hidden)]
pub fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use snapsync_core::log_op_start;
/// log_op_start!("sync_section");
/// log_op_start!("transfer_snapshot", ordinal = 4);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_START,
            $($($field)*)?
        )
    };
}

/// Log the successful end of an operation started at `since`
///
/// # Example
///
/// ```
/// # use snapsync_core::log_op_end;
/// let started = std::time::Instant::now();
/// log_op_end!("transfer_snapshot", since = started, ordinal = 4);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, since = $started:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END,
            duration_ms = $crate::logging_facility::macros::elapsed_ms($started),
            $($($field)*)?
        )
    };
}

/// Log the failure of an operation started at `since`
///
/// The error is classified through [`ExError`](crate::errors::ExError), so
/// the event carries its stable code plus the ordinal and pipeline stage the
/// failure is attributed to, when there is one.
///
/// # Example
///
/// ```
/// # use snapsync_core::{log_op_error, errors::SyncError};
/// let started = std::time::Instant::now();
/// let err = SyncError::Listing { mount: "/".to_string(), reason: "btrfs not found".to_string() };
/// log_op_error!("collect_inventory", err, since = started);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, since = $started:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::EVENT_END_ERROR,
            duration_ms = $crate::logging_facility::macros::elapsed_ms($started),
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            err.ordinal = ex_err.ordinal(),
            err.stage = ex_err.stage(),
            error = %ex_err,
            $($($field)*)?
        )
    }};
}
