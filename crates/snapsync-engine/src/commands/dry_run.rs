//! Dry-run transfer backend
//!
//! Accepts every prepare, replicate and sidecar write without touching the
//! target, logging what would have happened. The sequencer still promotes each
//! planned snapshot, so the logged ancestor choices are the ones a real run
//! would make.

use snapsync_core::collaborators::{
    DestinationPreparer, ReplicationRequest, Replicator, SidecarStore, TransferBackend,
};
use snapsync_core::errors::Result;
use snapsync_core::model::{Ordinal, SyncSidecar};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunBackend;

impl DryRunBackend {
    pub fn backend(&self) -> TransferBackend<'_> {
        TransferBackend {
            destinations: self,
            replicator: self,
            sidecars: self,
        }
    }
}

impl DestinationPreparer for DryRunBackend {
    fn prepare(&self, ordinal: Ordinal, destination: &Path) -> Result<()> {
        info!(ordinal, destination = %destination.display(), "dry run: would create destination");
        Ok(())
    }
}

impl Replicator for DryRunBackend {
    fn replicate(&self, request: &ReplicationRequest) -> Result<()> {
        match &request.parent {
            Some(parent) => info!(
                ordinal = request.ordinal,
                snapshot = %request.snapshot.display(),
                parent = %parent.display(),
                "dry run: would send incrementally"
            ),
            None => info!(
                ordinal = request.ordinal,
                snapshot = %request.snapshot.display(),
                "dry run: would send in full"
            ),
        }
        Ok(())
    }
}

impl SidecarStore for DryRunBackend {
    fn load(&self, _snapshot_dir: &Path) -> Result<Option<SyncSidecar>> {
        Ok(None)
    }

    fn store(&self, ordinal: Ordinal, snapshot_dir: &Path, _sidecar: &SyncSidecar) -> Result<()> {
        info!(ordinal, dir = %snapshot_dir.display(), "dry run: would record provenance");
        Ok(())
    }
}
