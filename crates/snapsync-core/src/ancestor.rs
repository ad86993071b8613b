//! Ancestor selection
//!
//! The incremental parent for pending snapshot `p` is the common snapshot with
//! the largest ordinal below `p`. Any older common snapshot would make the
//! stream carry more accumulated change. Ordinals are unique, so there is
//! never a tie.

use crate::diff::CommonPair;
use crate::model::Ordinal;

/// Tightest common ancestor strictly below `pending`, or `None` for a full send
///
/// `common` must be sorted ascending by ordinal, as [`SyncPlan`] keeps it.
///
/// [`SyncPlan`]: crate::diff::SyncPlan
pub fn select_ancestor(common: &[CommonPair], pending: Ordinal) -> Option<&CommonPair> {
    let below = common.partition_point(|c| c.ordinal < pending);
    below.checked_sub(1).map(|idx| &common[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::CommonTarget;
    use crate::model::SnapshotRecord;

    fn pair(ordinal: Ordinal) -> CommonPair {
        CommonPair {
            ordinal,
            source: SnapshotRecord {
                subvolume_id: ordinal.to_string(),
                content_uuid: format!("u{}", ordinal),
                storage_path: format!(".snapshots/{}/snapshot", ordinal).into(),
                ordinal: Some(ordinal),
                provenance: None,
            },
            target: CommonTarget::Transferred {
                destination: format!("/t/{}", ordinal).into(),
            },
        }
    }

    #[test]
    fn test_tightest_lower_bound() {
        let common = vec![pair(1), pair(4), pair(9)];
        assert_eq!(select_ancestor(&common, 5).map(|c| c.ordinal), Some(4));
        assert_eq!(select_ancestor(&common, 10).map(|c| c.ordinal), Some(9));
        assert_eq!(select_ancestor(&common, 2).map(|c| c.ordinal), Some(1));
    }

    #[test]
    fn test_never_equal_or_above() {
        let common = vec![pair(3), pair(7)];
        assert_eq!(select_ancestor(&common, 7).map(|c| c.ordinal), Some(3));
        assert_eq!(select_ancestor(&common, 3), None);
    }

    #[test]
    fn test_no_common_means_full_send() {
        assert!(select_ancestor(&[], 1).is_none());
        assert!(select_ancestor(&[pair(5)], 2).is_none());
    }
}
