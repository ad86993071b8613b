//! JSON provenance sidecars
//!
//! One `snapsync.json` per target snapshot directory, next to the received
//! `snapshot` subvolume.

use crate::atomic::atomic_write;
use crate::errors::{sidecar_read_error, sidecar_write_error, Result};
use snapsync_core::collaborators::SidecarStore;
use snapsync_core::model::{Ordinal, SyncSidecar, SIDECAR_FILE_NAME};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSidecarStore;

impl JsonSidecarStore {
    pub fn new() -> Self {
        Self
    }

    /// Location of the sidecar for a snapshot directory
    pub fn sidecar_path(snapshot_dir: &Path) -> PathBuf {
        snapshot_dir.join(SIDECAR_FILE_NAME)
    }
}

impl SidecarStore for JsonSidecarStore {
    fn load(&self, snapshot_dir: &Path) -> Result<Option<SyncSidecar>> {
        let path = Self::sidecar_path(snapshot_dir);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(sidecar_read_error(&path, e)),
        };
        let sidecar = serde_json::from_str(&raw).map_err(|e| sidecar_read_error(&path, e))?;
        Ok(Some(sidecar))
    }

    fn store(&self, ordinal: Ordinal, snapshot_dir: &Path, sidecar: &SyncSidecar) -> Result<()> {
        let path = Self::sidecar_path(snapshot_dir);
        let mut content =
            serde_json::to_vec_pretty(sidecar).map_err(|e| sidecar_write_error(ordinal, &path, e))?;
        content.push(b'\n');
        atomic_write(&path, &content).map_err(|e| sidecar_write_error(ordinal, &path, e))?;
        debug!(ordinal, path = %path.display(), "sidecar written");
        Ok(())
    }
}
