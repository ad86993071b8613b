//! snapsync Core - snapshot reconciliation kernel
//!
//! This crate decides what has to be sent to bring a backup volume up to date
//! with a local snapshot collection:
//! - Inventory parsing of snapshot listings
//! - Identity resolution (ordinals, sidecar provenance)
//! - Sorted-merge diff into common and pending snapshots
//! - Tightest-ancestor selection for incremental streams
//! - Transfer sequencing over injected collaborators
//!
//! Nothing here touches the filesystem or spawns processes; see the
//! [`collaborators`] traits.

pub mod ancestor;
pub mod collaborators;
pub mod diff;
pub mod errors;
pub mod identity;
pub mod inventory;
pub mod logging_facility;
pub mod model;
pub mod sequencer;

pub use snapsync_core_types as core_types;

// Re-export commonly used types
pub use ancestor::select_ancestor;
pub use collaborators::{
    DestinationPreparer, ListingSource, ReplicationRequest, Replicator, SidecarStore,
    TransferBackend,
};
pub use diff::{diff_inventories, IntegrityWarning, SyncPlan};
pub use errors::{ExError, ExErrorKind, Result, SyncError};
pub use model::{Ordinal, Side, SnapshotRecord, SyncSidecar, VolumeSpec};
pub use sequencer::{CompletedTransfer, SequenceReport, TransferSequencer};
