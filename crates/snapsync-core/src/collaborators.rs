//! Collaborator traits
//!
//! The reconciliation kernel never touches the filesystem or spawns processes
//! itself. Everything external is reached through these traits, which the
//! store crate implements for real btrfs volumes and tests implement in memory.

use crate::errors::Result;
use crate::model::{Ordinal, Side, SyncSidecar};
use std::path::{Path, PathBuf};

/// Source of raw snapshot listings
pub trait ListingSource {
    /// Return the multi-line listing for the filesystem mounted at `mount_point`
    ///
    /// # Errors
    ///
    /// `SyncError::Listing` if the query cannot be run or fails.
    fn list(&self, mount_point: &Path, side: Side) -> Result<String>;
}

/// Structured load/store of provenance sidecars
///
/// `snapshot_dir` is the ordinal directory holding the snapshot subvolume.
pub trait SidecarStore {
    /// Load the sidecar for a snapshot directory; `Ok(None)` when absent
    ///
    /// # Errors
    ///
    /// `SyncError::SidecarRead` when a sidecar exists but cannot be read or parsed.
    fn load(&self, snapshot_dir: &Path) -> Result<Option<SyncSidecar>>;

    /// Persist the sidecar for snapshot `ordinal`
    ///
    /// # Errors
    ///
    /// `SyncError::SidecarWrite` on any failure.
    fn store(&self, ordinal: Ordinal, snapshot_dir: &Path, sidecar: &SyncSidecar) -> Result<()>;
}

/// Creates the destination directory a snapshot is received into
pub trait DestinationPreparer {
    /// # Errors
    ///
    /// `SyncError::Destination` if the directory cannot be created or is unusable.
    fn prepare(&self, ordinal: Ordinal, destination: &Path) -> Result<()>;
}

/// One incremental (or full) replication to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicationRequest {
    pub ordinal: Ordinal,
    /// Source snapshot subvolume
    pub snapshot: PathBuf,
    /// Source subvolume of the selected ancestor; `None` means a full send
    pub parent: Option<PathBuf>,
    /// Directory the target side receives into
    pub destination: PathBuf,
}

/// The block-level incremental replication primitive
pub trait Replicator {
    /// Blocks until both pipeline stages have exited
    ///
    /// # Errors
    ///
    /// `SyncError::Transfer` naming the failing stage.
    fn replicate(&self, request: &ReplicationRequest) -> Result<()>;
}

/// The three collaborators the transfer sequencer drives for each snapshot
#[derive(Clone, Copy)]
pub struct TransferBackend<'a> {
    pub destinations: &'a dyn DestinationPreparer,
    pub replicator: &'a dyn Replicator,
    pub sidecars: &'a dyn SidecarStore,
}
