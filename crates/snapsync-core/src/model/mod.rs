//! Domain model for snapshot reconciliation

pub mod record;
pub mod sidecar;
pub mod stage;
pub mod volume;

pub use record::{ListingRow, Ordinal, Provenance, SnapshotRecord};
pub use sidecar::{SyncSidecar, SIDECAR_FILE_NAME};
pub use stage::{PipelineStage, SequencerStage};
pub use volume::{Side, VolumeSpec, SNAPSHOT_SUBVOLUME_NAME};
