//! Identity resolution
//!
//! Derives the ordinal of every listing row once, and for the target side
//! attaches whatever provenance the sidecar store can offer. A sidecar that is
//! missing, unreadable or malformed simply means "no provenance known".

use crate::collaborators::SidecarStore;
use crate::model::volume::SNAPSHOT_SUBVOLUME_NAME;
use crate::model::{ListingRow, Ordinal, SnapshotRecord, VolumeSpec};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static ORDINAL_IN_PATH: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"(?:^|/)(\d+)/{}(?:/|$)",
        regex::escape(SNAPSHOT_SUBVOLUME_NAME)
    );
    Regex::new(&pattern).expect("valid regex pattern")
});

/// Extract the snapper number from `.../<n>/snapshot`
///
/// Returns `None` when no all-digit component is directly followed by a
/// `snapshot` component.
pub fn extract_ordinal(storage_path: &Path) -> Option<Ordinal> {
    let caps = ORDINAL_IN_PATH.captures(storage_path.to_str()?)?;
    caps[1].parse().ok()
}

/// Resolve source-side rows; source records never carry provenance
pub fn resolve_source(rows: Vec<ListingRow>) -> Vec<SnapshotRecord> {
    let records: Vec<SnapshotRecord> = rows
        .into_iter()
        .map(|row| {
            let ordinal = extract_ordinal(&row.storage_path);
            SnapshotRecord::from_row(row, ordinal, None)
        })
        .collect();
    log_unidentified("source", &records);
    records
}

/// Resolve target-side rows, reading each identified record's sidecar
pub fn resolve_target(
    rows: Vec<ListingRow>,
    volume: &VolumeSpec,
    sidecars: &dyn SidecarStore,
) -> Vec<SnapshotRecord> {
    let records: Vec<SnapshotRecord> = rows
        .into_iter()
        .map(|row| {
            let ordinal = extract_ordinal(&row.storage_path);
            let provenance = ordinal.and_then(|n| {
                // The sidecar sits next to the subvolume, wherever the listing put it.
                let subvolume = volume.mount_point.join(&row.storage_path);
                let dir = subvolume
                    .parent()
                    .map_or_else(|| volume.snapshot_dir(n), Path::to_path_buf);
                match sidecars.load(&dir) {
                    Ok(sidecar) => sidecar.map(|s| s.provenance()),
                    Err(err) => {
                        debug!(ordinal = n, error = %err, "sidecar unreadable, provenance unknown");
                        None
                    }
                }
            });
            SnapshotRecord::from_row(row, ordinal, provenance)
        })
        .collect();
    log_unidentified("target", &records);
    records
}

fn log_unidentified(side: &str, records: &[SnapshotRecord]) {
    for record in records.iter().filter(|r| !r.is_identified()) {
        debug!(
            side,
            path = %record.storage_path.display(),
            content_uuid = %record.content_uuid,
            "no ordinal in snapshot path, ignoring"
        );
    }
}
