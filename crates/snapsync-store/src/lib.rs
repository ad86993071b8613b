//! snapsync store - the btrfs and filesystem side of a sync
//!
//! Provides:
//! - `btrfs subvolume list` as a `ListingSource`
//! - `btrfs send | btrfs receive` as a `Replicator`
//! - JSON provenance sidecars written atomically into the target snapshot directory
//! - Target directory preparation

pub mod atomic;
pub mod btrfs;
pub mod destination;
pub mod errors;
pub mod sidecar;

pub use btrfs::{BtrfsCommand, BtrfsListing, BtrfsReplicator};
pub use destination::FsDestination;
pub use sidecar::JsonSidecarStore;
