//! Atomic write primitives
//!
//! Uses temp→rename pattern to ensure no partial writes

use crate::errors::{io_error, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Atomically write bytes to a file
///
/// The parent directory must already exist. The temp file lives next to the
/// target so the rename never crosses a filesystem.
///
/// # Errors
///
/// `SyncError::Io` naming the step that failed.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    let temp_path = target_path.with_extension("tmp");

    let mut file = File::create(&temp_path).map_err(|e| io_error("create_temp", e))?;
    file.write_all(content)
        .map_err(|e| io_error("write_temp", e))?;
    file.sync_all().map_err(|e| io_error("sync_temp", e))?;
    drop(file);

    if let Err(e) = fs::rename(&temp_path, target_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error("rename_temp", e));
    }

    Ok(())
}
