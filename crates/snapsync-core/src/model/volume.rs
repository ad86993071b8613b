//! Volume layout
//!
//! Snapshots follow the snapper layout: `<mount>/<prefix>/<ordinal>/snapshot`,
//! where `<ordinal>/` is a plain directory holding the snapshot subvolume and
//! its metadata files.

use crate::model::record::Ordinal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the snapshot subvolume inside an ordinal directory
pub const SNAPSHOT_SUBVOLUME_NAME: &str = "snapshot";

/// Which collection a listing belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Source,
    Target,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Source => "source",
            Side::Target => "target",
        }
    }
}

/// A mounted filesystem and the subtree holding managed snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSpec {
    pub mount_point: PathBuf,
    /// Relative to the filesystem top level, e.g. `.snapshots`
    pub prefix: PathBuf,
}

impl VolumeSpec {
    pub fn new(mount_point: impl Into<PathBuf>, prefix: impl Into<PathBuf>) -> Self {
        Self {
            mount_point: mount_point.into(),
            prefix: prefix.into(),
        }
    }

    /// Directory holding snapshot `ordinal` and its sidecar
    pub fn snapshot_dir(&self, ordinal: Ordinal) -> PathBuf {
        self.mount_point
            .join(&self.prefix)
            .join(ordinal.to_string())
    }

    /// Component-wise prefix test on a listing path
    pub fn contains(&self, storage_path: &Path) -> bool {
        storage_path.starts_with(&self.prefix)
    }
}
