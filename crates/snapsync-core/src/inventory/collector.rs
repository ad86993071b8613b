//! Inventory collector

use crate::collaborators::ListingSource;
use crate::errors::Result;
use crate::inventory::parser::parse_listing;
use crate::model::{ListingRow, Side, VolumeSpec};
use tracing::debug;

/// Query the listing for `volume` and keep the rows under its prefix
///
/// # Errors
///
/// - `SyncError::Listing` if the listing query fails
/// - `SyncError::Parse` if any non-blank line is unrecognized
pub fn collect_inventory(
    listing: &dyn ListingSource,
    side: Side,
    volume: &VolumeSpec,
) -> Result<Vec<ListingRow>> {
    let raw = listing.list(&volume.mount_point, side)?;
    let rows = parse_listing(&volume.mount_point, &raw)?;
    let listed = rows.len();

    let rows: Vec<ListingRow> = rows
        .into_iter()
        .filter(|row| volume.contains(&row.storage_path))
        .collect();

    debug!(
        side = side.as_str(),
        mount = %volume.mount_point.display(),
        prefix = %volume.prefix.display(),
        listed,
        records_len = rows.len(),
        "collected inventory"
    );
    Ok(rows)
}
