//! Snapshot records
//!
//! A [`ListingRow`] is what the inventory collector parses out of one listing
//! line. The identity resolver turns each row into an immutable
//! [`SnapshotRecord`] with its ordinal and (target side only) provenance
//! computed once.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sequence number assigned by the snapshot-producing tool
pub type Ordinal = u64;

/// One parsed listing line, before identity resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRow {
    /// Driver-assigned subvolume id; unstable across re-creation
    pub subvolume_id: String,
    pub content_uuid: String,
    /// Path relative to the filesystem top level
    pub storage_path: PathBuf,
}

impl ListingRow {
    pub fn new(
        subvolume_id: impl Into<String>,
        content_uuid: impl Into<String>,
        storage_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            subvolume_id: subvolume_id.into(),
            content_uuid: content_uuid.into(),
            storage_path: storage_path.into(),
        }
    }
}

/// Provenance recovered from a target-side sidecar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// Content UUID of the source snapshot this copy was made from
    pub source_uuid: String,
    /// Whether the sidecar marks the transfer as completed
    pub synced: bool,
}

/// A resolved snapshot record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub subvolume_id: String,
    pub content_uuid: String,
    pub storage_path: PathBuf,
    /// `None` when no ordinal could be extracted from `storage_path`
    pub ordinal: Option<Ordinal>,
    /// Only ever populated for target records
    pub provenance: Option<Provenance>,
}

impl SnapshotRecord {
    pub fn from_row(
        row: ListingRow,
        ordinal: Option<Ordinal>,
        provenance: Option<Provenance>,
    ) -> Self {
        Self {
            subvolume_id: row.subvolume_id,
            content_uuid: row.content_uuid,
            storage_path: row.storage_path,
            ordinal,
            provenance,
        }
    }

    pub fn is_identified(&self) -> bool {
        self.ordinal.is_some()
    }

    /// Provenance UUID if the sidecar could be read
    pub fn provenance_uuid(&self) -> Option<&str> {
        self.provenance.as_ref().map(|p| p.source_uuid.as_str())
    }
}
