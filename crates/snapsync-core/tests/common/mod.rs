#![allow(dead_code)]

use snapsync_core::collaborators::{
    DestinationPreparer, ListingSource, ReplicationRequest, Replicator, SidecarStore,
    TransferBackend,
};
use snapsync_core::identity::extract_ordinal;
use snapsync_core::model::{
    Ordinal, PipelineStage, Provenance, Side, SnapshotRecord, SyncSidecar, VolumeSpec,
};
use snapsync_core::{Result, SyncError};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub fn source_volume() -> VolumeSpec {
    VolumeSpec::new("/", ".snapshots")
}

pub fn target_volume() -> VolumeSpec {
    VolumeSpec::new("/mnt/backup", "backup/root")
}

/// Source record at `.snapshots/<n>/snapshot`
pub fn source_record(ordinal: Ordinal, uuid: &str) -> SnapshotRecord {
    SnapshotRecord {
        subvolume_id: (256 + ordinal).to_string(),
        content_uuid: uuid.to_string(),
        storage_path: format!(".snapshots/{}/snapshot", ordinal).into(),
        ordinal: Some(ordinal),
        provenance: None,
    }
}

/// Source record whose path carries no ordinal
pub fn unidentified_source_record(uuid: &str) -> SnapshotRecord {
    SnapshotRecord {
        subvolume_id: "999".to_string(),
        content_uuid: uuid.to_string(),
        storage_path: ".snapshots/manual/snapshot".into(),
        ordinal: None,
        provenance: None,
    }
}

/// Target record with a synced sidecar pointing at `provenance_uuid`
pub fn target_record(ordinal: Ordinal, provenance_uuid: &str) -> SnapshotRecord {
    SnapshotRecord {
        subvolume_id: (512 + ordinal).to_string(),
        content_uuid: format!("recv-{}", ordinal),
        storage_path: format!("backup/root/{}/snapshot", ordinal).into(),
        ordinal: Some(ordinal),
        provenance: Some(Provenance {
            source_uuid: provenance_uuid.to_string(),
            synced: true,
        }),
    }
}

pub fn uuid_for(ordinal: Ordinal) -> String {
    format!("uuid-{}", ordinal)
}

/// Source records `ordinals` with uuids from [`uuid_for`]
pub fn source_records(ordinals: &[Ordinal]) -> Vec<SnapshotRecord> {
    ordinals
        .iter()
        .map(|&n| source_record(n, &uuid_for(n)))
        .collect()
}

/// Matching target records with correct provenance
pub fn target_records(ordinals: &[Ordinal]) -> Vec<SnapshotRecord> {
    ordinals
        .iter()
        .map(|&n| target_record(n, &uuid_for(n)))
        .collect()
}

pub fn listing_line(id: u64, uuid: &str, path: &str) -> String {
    format!(
        "ID {} gen 10 top level 5 parent_uuid - uuid {} path {}",
        id, uuid, path
    )
}

/// Listing keyed by mount point
#[derive(Default)]
pub struct InMemoryListing {
    listings: HashMap<PathBuf, String>,
}

impl InMemoryListing {
    pub fn with(mut self, mount: &str, raw: impl Into<String>) -> Self {
        self.listings.insert(PathBuf::from(mount), raw.into());
        self
    }
}

impl ListingSource for InMemoryListing {
    fn list(&self, mount_point: &Path, _side: Side) -> Result<String> {
        self.listings
            .get(mount_point)
            .cloned()
            .ok_or_else(|| SyncError::Listing {
                mount: mount_point.display().to_string(),
                reason: "not mounted".to_string(),
            })
    }
}

#[derive(Default)]
pub struct InMemorySidecars {
    pub stored: RefCell<HashMap<PathBuf, SyncSidecar>>,
    pub unreadable: Vec<PathBuf>,
    pub fail_store_for: Option<Ordinal>,
}

impl SidecarStore for InMemorySidecars {
    fn load(&self, snapshot_dir: &Path) -> Result<Option<SyncSidecar>> {
        if self.unreadable.iter().any(|p| p == snapshot_dir) {
            return Err(SyncError::SidecarRead {
                path: snapshot_dir.display().to_string(),
                reason: "malformed".to_string(),
            });
        }
        Ok(self.stored.borrow().get(snapshot_dir).cloned())
    }

    fn store(&self, ordinal: Ordinal, snapshot_dir: &Path, sidecar: &SyncSidecar) -> Result<()> {
        if self.fail_store_for == Some(ordinal) {
            return Err(SyncError::SidecarWrite {
                ordinal,
                path: snapshot_dir.display().to_string(),
                reason: "read-only filesystem".to_string(),
            });
        }
        self.stored
            .borrow_mut()
            .insert(snapshot_dir.to_path_buf(), sidecar.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingDestinations {
    pub prepared: RefCell<Vec<PathBuf>>,
    pub fail_for: Option<Ordinal>,
}

impl DestinationPreparer for RecordingDestinations {
    fn prepare(&self, ordinal: Ordinal, destination: &Path) -> Result<()> {
        if self.fail_for == Some(ordinal) {
            return Err(SyncError::Destination {
                ordinal,
                path: destination.display().to_string(),
                reason: "permission denied".to_string(),
            });
        }
        self.prepared.borrow_mut().push(destination.to_path_buf());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingReplicator {
    pub requests: RefCell<Vec<ReplicationRequest>>,
    pub fail_for: Option<(Ordinal, PipelineStage)>,
}

impl RecordingReplicator {
    /// `(ordinal, parent ordinal)` for every successful replication
    pub fn transfers(&self) -> Vec<(Ordinal, Option<Ordinal>)> {
        self.requests
            .borrow()
            .iter()
            .map(|r| (r.ordinal, r.parent.as_deref().and_then(extract_ordinal)))
            .collect()
    }
}

impl Replicator for RecordingReplicator {
    fn replicate(&self, request: &ReplicationRequest) -> Result<()> {
        if let Some((ordinal, stage)) = self.fail_for {
            if ordinal == request.ordinal {
                return Err(SyncError::Transfer {
                    ordinal,
                    stage,
                    reason: "exit status 1".to_string(),
                });
            }
        }
        self.requests.borrow_mut().push(request.clone());
        Ok(())
    }
}

/// Bundles the recording fakes so tests can inspect them after a run
#[derive(Default)]
pub struct Fakes {
    pub destinations: RecordingDestinations,
    pub replicator: RecordingReplicator,
    pub sidecars: InMemorySidecars,
}

impl Fakes {
    pub fn backend(&self) -> TransferBackend<'_> {
        TransferBackend {
            destinations: &self.destinations,
            replicator: &self.replicator,
            sidecars: &self.sidecars,
        }
    }
}
