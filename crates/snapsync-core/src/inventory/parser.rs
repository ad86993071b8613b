//! Listing line parser
//!
//! Record lines look like
//!
//! ```text
//! ID 259 gen 10 top level 256 parent_uuid 8f.. uuid e4.. path .snapshots/1/snapshot
//! ```
//!
//! Only `ID <id>` and the first standalone `uuid <uuid> path <path>` pair are
//! used; the fields in between vary with the listing flags. The path runs to
//! the end of the line and is kept byte for byte.

use crate::errors::{Result, SyncError};
use crate::model::ListingRow;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Prefix printed for paths outside the mounted subvolume (`btrfs subvolume list -a`)
pub const FS_TREE_MARKER: &str = "<FS_TREE>/";

// ` uuid ` needs the leading space, so `parent_uuid`/`received_uuid` never match.
static RECORD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ID (\S+) (?:.*? )?uuid (\S+) path (.+)$").expect("valid regex pattern")
});

/// Parse one non-blank line without leading whitespace; `None` if it is not
/// a record line
pub fn parse_line(line: &str) -> Option<ListingRow> {
    let caps = RECORD_LINE.captures(line)?;
    let path = &caps[3];
    let path = path.strip_prefix(FS_TREE_MARKER).unwrap_or(path);
    Some(ListingRow::new(&caps[1], &caps[2], path))
}

/// Parse a complete listing
///
/// # Errors
///
/// `SyncError::Parse` for the first non-blank line that is not a record line.
pub fn parse_listing(mount_point: &Path, raw: &str) -> Result<Vec<ListingRow>> {
    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            parse_line(line.trim_start()).ok_or_else(|| SyncError::Parse {
                mount: mount_point.display().to_string(),
                line_no: idx + 1,
                line: line.to_string(),
            })
        })
        .collect()
}
