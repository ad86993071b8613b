//! Sorted-merge diff of two resolved inventories.
//!
//! Both sides are sorted by ordinal once and walked in lockstep, so a diff
//! costs O(n log n) in the size of the larger inventory.

use crate::core_types::schema::EVENT_INTEGRITY_WARNING;
use crate::diff::model::{
    CommonPair, CommonTarget, IntegrityWarning, PendingSnapshot, SyncPlan, UnverifiedReason,
};
use crate::model::{Ordinal, Side, SnapshotRecord};
use tracing::{debug, warn};

/// Keep identified records, sorted by ordinal, first occurrence per ordinal
fn identified_sorted(
    records: Vec<SnapshotRecord>,
    side: Side,
    warnings: &mut Vec<IntegrityWarning>,
) -> Vec<(Ordinal, SnapshotRecord)> {
    let mut keyed: Vec<(Ordinal, SnapshotRecord)> = records
        .into_iter()
        .filter_map(|r| r.ordinal.map(|n| (n, r)))
        .collect();
    // Stable, so among duplicates the listing order decides which one wins.
    keyed.sort_by_key(|(n, _)| *n);

    let mut unique: Vec<(Ordinal, SnapshotRecord)> = Vec::with_capacity(keyed.len());
    for (ordinal, record) in keyed {
        if unique.last().is_some_and(|(last, _)| *last == ordinal) {
            warnings.push(IntegrityWarning::DuplicateOrdinal {
                side,
                ordinal,
                content_uuid: record.content_uuid,
            });
            continue;
        }
        unique.push((ordinal, record));
    }
    unique
}

/// Compare a matched pair's provenance against the source content
fn check_provenance(
    ordinal: Ordinal,
    source: &SnapshotRecord,
    target: &SnapshotRecord,
) -> Option<IntegrityWarning> {
    match &target.provenance {
        None => Some(IntegrityWarning::Unverified {
            ordinal,
            reason: UnverifiedReason::MissingSidecar,
        }),
        Some(p) if p.source_uuid != source.content_uuid => {
            Some(IntegrityWarning::ProvenanceMismatch {
                ordinal,
                source_uuid: source.content_uuid.clone(),
                provenance_uuid: p.source_uuid.clone(),
            })
        }
        Some(p) if !p.synced => Some(IntegrityWarning::Unverified {
            ordinal,
            reason: UnverifiedReason::NotSynced,
        }),
        Some(_) => None,
    }
}

/// Partition `source` into snapshots already on the target and those missing
///
/// Unidentified records on either side are ignored. Integrity findings are
/// collected in [`SyncPlan::warnings`] and logged at warn level; they never
/// move a record between `common` and `pending`.
pub fn diff_inventories(source: Vec<SnapshotRecord>, target: Vec<SnapshotRecord>) -> SyncPlan {
    let mut warnings = Vec::new();
    let source = identified_sorted(source, Side::Source, &mut warnings);
    let target = identified_sorted(target, Side::Target, &mut warnings);

    let mut common = Vec::new();
    let mut pending = Vec::new();
    let mut targets = target.into_iter().peekable();

    for (ordinal, record) in source {
        while targets.next_if(|(t, _)| *t < ordinal).is_some() {}

        match targets.next_if(|(t, _)| *t == ordinal) {
            Some((_, target_record)) => {
                if let Some(w) = check_provenance(ordinal, &record, &target_record) {
                    warnings.push(w);
                }
                common.push(CommonPair {
                    ordinal,
                    source: record,
                    target: CommonTarget::Listed(target_record),
                });
            }
            None => pending.push(PendingSnapshot { ordinal, record }),
        }
    }

    for w in &warnings {
        warn!(
            event = EVENT_INTEGRITY_WARNING,
            ordinal = w.ordinal(),
            warning = %w,
            "integrity warning"
        );
    }
    debug!(
        common_len = common.len(),
        pending_len = pending.len(),
        "inventory diff computed"
    );

    SyncPlan {
        common,
        pending,
        warnings,
    }
}
