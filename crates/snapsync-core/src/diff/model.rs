//! Sync plan types.

use crate::model::{Ordinal, Side, SnapshotRecord};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Target-side counterpart of a common snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommonTarget {
    /// Present in the target listing when the run started
    Listed(SnapshotRecord),
    /// Received during this run into `destination`
    Transferred { destination: PathBuf },
}

/// A snapshot present on both sides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommonPair {
    pub ordinal: Ordinal,
    pub source: SnapshotRecord,
    pub target: CommonTarget,
}

/// A source snapshot missing on the target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSnapshot {
    pub ordinal: Ordinal,
    pub record: SnapshotRecord,
}

/// Why a matched target snapshot cannot be confirmed as a completed copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnverifiedReason {
    /// No readable sidecar next to the target snapshot
    MissingSidecar,
    /// Sidecar present but its completion marker is not set
    NotSynced,
}

/// Non-fatal finding of the diff engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityWarning {
    /// Ordinals match but the target copy came from different content
    ProvenanceMismatch {
        ordinal: Ordinal,
        source_uuid: String,
        provenance_uuid: String,
    },
    /// Ordinals match but the copy cannot be confirmed as complete
    Unverified {
        ordinal: Ordinal,
        reason: UnverifiedReason,
    },
    /// The same ordinal was listed more than once on one side; the first wins
    DuplicateOrdinal {
        side: Side,
        ordinal: Ordinal,
        content_uuid: String,
    },
}

impl IntegrityWarning {
    pub fn ordinal(&self) -> Ordinal {
        match self {
            IntegrityWarning::ProvenanceMismatch { ordinal, .. }
            | IntegrityWarning::Unverified { ordinal, .. }
            | IntegrityWarning::DuplicateOrdinal { ordinal, .. } => *ordinal,
        }
    }
}

impl std::fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrityWarning::ProvenanceMismatch {
                ordinal,
                source_uuid,
                provenance_uuid,
            } => write!(
                f,
                "snapshot {} on target was copied from {}, source now has {}",
                ordinal, provenance_uuid, source_uuid
            ),
            IntegrityWarning::Unverified { ordinal, reason } => match reason {
                UnverifiedReason::MissingSidecar => {
                    write!(f, "snapshot {} on target has no provenance sidecar", ordinal)
                }
                UnverifiedReason::NotSynced => {
                    write!(f, "snapshot {} on target is not marked as synced", ordinal)
                }
            },
            IntegrityWarning::DuplicateOrdinal {
                side,
                ordinal,
                content_uuid,
            } => write!(
                f,
                "ordinal {} listed more than once on {} side, ignoring {}",
                ordinal,
                side.as_str(),
                content_uuid
            ),
        }
    }
}

/// Result of diffing one source/target inventory pair
///
/// `common` and `pending` are both kept sorted ascending by ordinal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPlan {
    pub common: Vec<CommonPair>,
    pub pending: Vec<PendingSnapshot>,
    pub warnings: Vec<IntegrityWarning>,
}

impl SyncPlan {
    pub fn is_up_to_date(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn common_ordinals(&self) -> Vec<Ordinal> {
        self.common.iter().map(|c| c.ordinal).collect()
    }

    pub fn pending_ordinals(&self) -> Vec<Ordinal> {
        self.pending.iter().map(|p| p.ordinal).collect()
    }

    /// Insert a just-transferred snapshot into `common`, keeping it sorted
    pub fn promote(&mut self, pending: PendingSnapshot, destination: PathBuf) {
        let idx = self.common.partition_point(|c| c.ordinal < pending.ordinal);
        self.common.insert(
            idx,
            CommonPair {
                ordinal: pending.ordinal,
                source: pending.record,
                target: CommonTarget::Transferred { destination },
            },
        );
    }
}
