//! Error helpers for snapsync-store
//!
//! Builds `SyncError` values from process and filesystem failures

use snapsync_core::errors::SyncError;
use snapsync_core::model::{Ordinal, PipelineStage};
use std::path::Path;

pub use snapsync_core::errors::Result;

/// Create a listing error for the filesystem at `mount`
pub fn listing_failed(mount: &Path, reason: impl ToString) -> SyncError {
    SyncError::Listing {
        mount: mount.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Create a transfer error for one pipeline stage
pub fn transfer_failed(ordinal: Ordinal, stage: PipelineStage, reason: impl ToString) -> SyncError {
    SyncError::Transfer {
        ordinal,
        stage,
        reason: reason.to_string(),
    }
}

pub fn destination_error(ordinal: Ordinal, path: &Path, reason: impl ToString) -> SyncError {
    SyncError::Destination {
        ordinal,
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

pub fn sidecar_read_error(path: &Path, reason: impl ToString) -> SyncError {
    SyncError::SidecarRead {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

pub fn sidecar_write_error(ordinal: Ordinal, path: &Path, reason: impl ToString) -> SyncError {
    SyncError::SidecarWrite {
        ordinal,
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> SyncError {
    SyncError::Io {
        op: operation.to_string(),
        message: err.to_string(),
    }
}
