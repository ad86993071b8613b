#![allow(dead_code)]

use snapsync_core::collaborators::{ListingSource, ReplicationRequest, Replicator};
use snapsync_core::identity::extract_ordinal;
use snapsync_core::model::{Ordinal, PipelineStage, Side, VolumeSpec};
use snapsync_core::{Result, SyncError};
use snapsync_engine::SyncSection;
use snapsync_store::BtrfsCommand;
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const TARGET_PREFIX: &str = "backup/root";

pub fn listing_line(id: u64, uuid: &str, path: &str) -> String {
    format!(
        "ID {} gen 100 top level 5 parent_uuid - received_uuid - uuid {} path {}",
        id, uuid, path
    )
}

/// A section whose target lives in a temp directory
pub fn section(name: &str, target_mount: &Path) -> SyncSection {
    fs::create_dir_all(target_mount.join(TARGET_PREFIX)).unwrap();
    SyncSection {
        name: name.to_string(),
        source: VolumeSpec::new("/", ".snapshots"),
        target: VolumeSpec::new(target_mount, TARGET_PREFIX),
        btrfs: BtrfsCommand::default(),
    }
}

pub fn temp_target() -> TempDir {
    TempDir::new().unwrap()
}

/// In-memory btrfs pair: a fixed source listing and a target listing that
/// grows as snapshots are received
#[derive(Default)]
pub struct SimulatedBtrfs {
    pub source: Vec<(Ordinal, String)>,
    pub target_lines: RefCell<Vec<String>>,
    /// Raw target listing returned instead of the simulated one
    pub target_override: Option<String>,
    pub fail_for: Option<Ordinal>,
    /// Receive fails after writing part of the subvolume
    pub partial_for: Option<Ordinal>,
    /// (ordinal, parent ordinal) of every replicate call
    pub requests: RefCell<Vec<(Ordinal, Option<Ordinal>)>>,
}

impl SimulatedBtrfs {
    pub fn with_source(ordinals: &[Ordinal]) -> Self {
        Self {
            source: ordinals.iter().map(|&n| (n, format!("uuid-{}", n))).collect(),
            ..Default::default()
        }
    }

    pub fn replicated(&self) -> Vec<(Ordinal, Option<Ordinal>)> {
        self.requests.borrow().clone()
    }
}

impl ListingSource for SimulatedBtrfs {
    fn list(&self, _mount_point: &Path, side: Side) -> Result<String> {
        match side {
            Side::Source => Ok(self
                .source
                .iter()
                .map(|(n, uuid)| {
                    listing_line(256 + n, uuid, &format!(".snapshots/{}/snapshot", n))
                })
                .collect::<Vec<_>>()
                .join("\n")),
            Side::Target => match &self.target_override {
                Some(raw) => Ok(raw.clone()),
                None => Ok(self.target_lines.borrow().join("\n")),
            },
        }
    }
}

impl Replicator for SimulatedBtrfs {
    fn replicate(&self, request: &ReplicationRequest) -> Result<()> {
        let parent = request.parent.as_deref().and_then(extract_ordinal);
        self.requests.borrow_mut().push((request.ordinal, parent));

        if self.fail_for == Some(request.ordinal) {
            return Err(SyncError::Transfer {
                ordinal: request.ordinal,
                stage: PipelineStage::Receive,
                reason: "exit status: 1".to_string(),
            });
        }

        fs::create_dir(request.destination.join("snapshot")).map_err(|e| SyncError::Io {
            op: "simulate_receive".to_string(),
            message: e.to_string(),
        })?;
        if self.partial_for == Some(request.ordinal) {
            return Err(SyncError::Transfer {
                ordinal: request.ordinal,
                stage: PipelineStage::Receive,
                reason: "ERROR: short read from stream".to_string(),
            });
        }
        let n = request.ordinal;
        self.target_lines.borrow_mut().push(listing_line(
            1000 + n,
            &format!("recv-{}", n),
            &format!("<FS_TREE>/{}/{}/snapshot", TARGET_PREFIX, n),
        ));
        Ok(())
    }
}
