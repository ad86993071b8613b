//! Section orchestration.
//!
//! ## Pipeline (in order):
//! 1. Source inventory (snapshots under the source prefix)
//! 2. Target inventory (received subvolumes under the target prefix)
//! 3. Identity resolution, target records enriched from sidecars
//! 4. Diff into common / pending plus integrity warnings
//! 5. Transfer sequencer over the pending list
//!
//! A failure in steps 1 to 3 aborts the section before anything is sent.

use snapsync_core::collaborators::{ListingSource, SidecarStore, TransferBackend};
use snapsync_core::diff::{diff_inventories, IntegrityWarning, SyncPlan};
use snapsync_core::errors::{Result, SyncError};
use snapsync_core::identity::{resolve_source, resolve_target};
use snapsync_core::inventory::collect_inventory;
use snapsync_core::model::{Ordinal, Side, VolumeSpec};
use snapsync_core::sequencer::{CompletedTransfer, TransferSequencer};
use snapsync_core::{log_op_end, log_op_error, log_op_start};
use snapsync_core_types::RunId;
use snapsync_store::{BtrfsCommand, BtrfsListing, BtrfsReplicator, FsDestination, JsonSidecarStore};
use std::time::Instant;
use tracing::{info, info_span};

use crate::commands::dry_run::DryRunBackend;

/// One named source→target pairing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSection {
    pub name: String,
    pub source: VolumeSpec,
    pub target: VolumeSpec,
    pub btrfs: BtrfsCommand,
}

/// Everything a section run reads from and writes to
#[derive(Clone, Copy)]
pub struct SectionCollaborators<'a> {
    pub listing: &'a dyn ListingSource,
    /// Used to read target provenance while planning
    pub sidecars: &'a dyn SidecarStore,
    pub backend: TransferBackend<'a>,
}

/// Outcome of one section run
#[derive(Debug, Clone, PartialEq)]
pub struct SectionReport {
    pub name: String,
    pub run_id: RunId,
    pub dry_run: bool,
    /// Ordinals already present on both sides before the run
    pub common: Vec<Ordinal>,
    /// Ordinals the plan scheduled for transfer
    pub planned: Vec<Ordinal>,
    pub warnings: Vec<IntegrityWarning>,
    pub completed: Vec<CompletedTransfer>,
    /// Ordinals still pending when the run ended
    pub remaining: Vec<Ordinal>,
    pub error: Option<SyncError>,
}

impl SectionReport {
    /// Report for a section rejected before planning
    pub fn failed(name: impl Into<String>, run_id: RunId, error: SyncError) -> Self {
        Self {
            name: name.into(),
            run_id,
            dry_run: false,
            common: Vec::new(),
            planned: Vec::new(),
            warnings: Vec::new(),
            completed: Vec::new(),
            remaining: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_up_to_date(&self) -> bool {
        self.is_success() && self.planned.is_empty()
    }
}

/// Build the sync plan for a section without transferring anything
///
/// # Errors
///
/// `SyncError::Listing` or `SyncError::Parse` from either inventory.
pub fn plan_section(
    section: &SyncSection,
    listing: &dyn ListingSource,
    sidecars: &dyn SidecarStore,
) -> Result<SyncPlan> {
    let source_rows = collect_inventory(listing, Side::Source, &section.source)?;
    let target_rows = collect_inventory(listing, Side::Target, &section.target)?;

    let source = resolve_source(source_rows);
    let target = resolve_target(target_rows, &section.target, sidecars);

    Ok(diff_inventories(source, target))
}

/// Run one section end to end
pub fn sync_section(
    section: &SyncSection,
    collaborators: SectionCollaborators<'_>,
    dry_run: bool,
) -> SectionReport {
    let run_id = RunId::new();
    let span = info_span!("section", section = %section.name, run_id = %run_id);
    let _guard = span.enter();

    let started = Instant::now();
    log_op_start!("sync_section", dry_run);

    let mut plan = match plan_section(section, collaborators.listing, collaborators.sidecars) {
        Ok(plan) => plan,
        Err(err) => {
            log_op_error!(
                "sync_section",
                err.clone(),
                since = started
            );
            let mut report = SectionReport::failed(section.name.clone(), run_id, err);
            report.dry_run = dry_run;
            return report;
        }
    };

    let common = plan.common_ordinals();
    let planned = plan.pending_ordinals();
    info!(
        common_len = common.len() as u64,
        pending_len = planned.len() as u64,
        warnings = plan.warnings.len() as u64,
        pending = ?planned,
        "plan computed"
    );

    let sequencer =
        TransferSequencer::new(&section.source, &section.target, collaborators.backend);
    let sequence = sequencer.run(&mut plan);

    let report = SectionReport {
        name: section.name.clone(),
        run_id,
        dry_run,
        common,
        planned,
        warnings: plan.warnings.clone(),
        completed: sequence.completed,
        remaining: plan.pending_ordinals(),
        error: sequence.error,
    };

    match &report.error {
        None => {
            log_op_end!(
                "sync_section",
                since = started,
                transferred = report.completed.len() as u64
            );
        }
        Some(err) => {
            log_op_error!(
                "sync_section",
                err.clone(),
                since = started,
                transferred = report.completed.len() as u64
            );
        }
    }
    report
}

/// Run a section over the real btrfs collaborators
///
/// Listing and sidecar reads always hit the volumes; with `dry_run` the
/// transfer side is replaced by [`DryRunBackend`].
pub fn run_section(section: &SyncSection, dry_run: bool) -> SectionReport {
    let listing = BtrfsListing::new(section.btrfs.clone());
    let sidecars = JsonSidecarStore::new();

    if dry_run {
        let dry = DryRunBackend;
        let collaborators = SectionCollaborators {
            listing: &listing,
            sidecars: &sidecars,
            backend: dry.backend(),
        };
        return sync_section(section, collaborators, true);
    }

    let destinations = FsDestination::new();
    let replicator = BtrfsReplicator::new(section.btrfs.clone());
    let collaborators = SectionCollaborators {
        listing: &listing,
        sidecars: &sidecars,
        backend: TransferBackend {
            destinations: &destinations,
            replicator: &replicator,
            sidecars: &sidecars,
        },
    };
    sync_section(section, collaborators, false)
}
