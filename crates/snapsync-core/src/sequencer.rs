//! Transfer sequencer
//!
//! Drives every pending snapshot through
//! `Prepare → SelectAncestor → Transfer → RecordProvenance → PromoteToCommon`,
//! strictly in ascending ordinal order. Promotion happens before the next
//! snapshot's ancestor is selected, so a run that sends 2 and 3 sends 3
//! incrementally on top of 2.
//!
//! The first fatal error stops the run. Snapshots already promoted stay in
//! `common`; the failed snapshot and everything after it go back to `pending`.

use crate::ancestor::select_ancestor;
use crate::collaborators::{ReplicationRequest, TransferBackend};
use crate::diff::{PendingSnapshot, SyncPlan};
use crate::errors::{Result, SyncError};
use crate::model::{Ordinal, SequencerStage, SyncSidecar, VolumeSpec};
use crate::{log_op_end, log_op_error, log_op_start};
use serde::Serialize;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

/// One snapshot fully transferred and tagged during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedTransfer {
    pub ordinal: Ordinal,
    /// Ancestor used for the incremental stream; `None` for a full send
    pub parent: Option<Ordinal>,
    pub destination: PathBuf,
}

/// Outcome of one sequencer run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SequenceReport {
    pub completed: Vec<CompletedTransfer>,
    /// The error that aborted the run, if any
    pub error: Option<SyncError>,
}

impl SequenceReport {
    pub fn is_aborted(&self) -> bool {
        self.error.is_some()
    }

    /// # Errors
    ///
    /// The aborting error, discarding the list of completed transfers.
    pub fn into_result(self) -> Result<Vec<CompletedTransfer>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.completed),
        }
    }
}

pub struct TransferSequencer<'a> {
    source: &'a VolumeSpec,
    target: &'a VolumeSpec,
    backend: TransferBackend<'a>,
}

impl<'a> TransferSequencer<'a> {
    pub fn new(
        source: &'a VolumeSpec,
        target: &'a VolumeSpec,
        backend: TransferBackend<'a>,
    ) -> Self {
        Self {
            source,
            target,
            backend,
        }
    }

    /// Transfer every pending snapshot of `plan`, promoting each on success
    pub fn run(&self, plan: &mut SyncPlan) -> SequenceReport {
        let mut queue: Vec<PendingSnapshot> = std::mem::take(&mut plan.pending);
        queue.sort_by_key(|p| p.ordinal);
        let mut queue = VecDeque::from(queue);
        let mut report = SequenceReport::default();

        while let Some(next) = queue.pop_front() {
            let started = Instant::now();
            log_op_start!("transfer_snapshot", ordinal = next.ordinal);

            match self.transfer_one(plan, &next) {
                Ok(done) => {
                    debug!(
                        ordinal = next.ordinal,
                        stage = SequencerStage::PromoteToCommon.as_str(),
                        "promoting"
                    );
                    plan.promote(next, done.destination.clone());
                    log_op_end!(
                        "transfer_snapshot",
                        since = started,
                        ordinal = done.ordinal,
                        parent_ordinal = ?done.parent,
                    );
                    report.completed.push(done);
                }
                Err(err) => {
                    log_op_error!(
                        "transfer_snapshot",
                        err.clone(),
                        since = started,
                        ordinal = next.ordinal,
                        remaining = queue.len() as u64,
                    );
                    queue.push_front(next);
                    plan.pending = queue.into();
                    report.error = Some(err);
                    return report;
                }
            }
        }
        report
    }

    fn transfer_one(
        &self,
        plan: &SyncPlan,
        pending: &PendingSnapshot,
    ) -> Result<CompletedTransfer> {
        let ordinal = pending.ordinal;

        let destination = self.target.snapshot_dir(ordinal);
        debug!(
            ordinal,
            stage = SequencerStage::Prepare.as_str(),
            destination = %destination.display()
        );
        self.backend.destinations.prepare(ordinal, &destination)?;

        let ancestor = select_ancestor(&plan.common, ordinal);
        let parent = ancestor.map(|c| c.ordinal);
        debug!(
            ordinal,
            stage = SequencerStage::SelectAncestor.as_str(),
            parent_ordinal = ?parent
        );

        // Source paths come from the listing, not from the layout.
        let request = ReplicationRequest {
            ordinal,
            snapshot: self.source.mount_point.join(&pending.record.storage_path),
            parent: ancestor.map(|c| self.source.mount_point.join(&c.source.storage_path)),
            destination: destination.clone(),
        };
        debug!(
            ordinal,
            stage = SequencerStage::Transfer.as_str(),
            full_send = parent.is_none()
        );
        self.backend.replicator.replicate(&request)?;

        let sidecar = SyncSidecar::completed(pending.record.content_uuid.clone(), ordinal);
        debug!(ordinal, stage = SequencerStage::RecordProvenance.as_str());
        self.backend.sidecars.store(ordinal, &destination, &sidecar)?;

        Ok(CompletedTransfer {
            ordinal,
            parent,
            destination,
        })
    }
}
