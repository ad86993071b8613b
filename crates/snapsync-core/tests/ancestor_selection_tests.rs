mod common;

use common::*;
use proptest::prelude::*;
use snapsync_core::{diff_inventories, select_ancestor};

proptest! {
    #[test]
    fn prop_ancestor_is_strictly_below_pending(
        common in prop::collection::btree_set(0u64..300, 0..30),
        pending in 0u64..300,
    ) {
        let ordinals: Vec<u64> = common.iter().copied().collect();
        let plan = diff_inventories(source_records(&ordinals), target_records(&ordinals));

        if let Some(ancestor) = select_ancestor(&plan.common, pending) {
            prop_assert!(ancestor.ordinal < pending);
        }
    }

    #[test]
    fn prop_ancestor_is_tightest_bound(
        common in prop::collection::btree_set(0u64..300, 0..30),
        pending in 0u64..300,
    ) {
        let ordinals: Vec<u64> = common.iter().copied().collect();
        let plan = diff_inventories(source_records(&ordinals), target_records(&ordinals));

        let expected = common.range(..pending).next_back().copied();
        let selected = select_ancestor(&plan.common, pending).map(|c| c.ordinal);
        prop_assert_eq!(selected, expected);
    }
}

#[test]
fn test_selection_sees_promoted_snapshot() {
    let mut plan = diff_inventories(source_records(&[1, 2, 3]), target_records(&[1]));
    assert_eq!(select_ancestor(&plan.common, 3).map(|c| c.ordinal), Some(1));

    let two = plan.pending.remove(0);
    plan.promote(two, "/mnt/backup/backup/root/2".into());

    assert_eq!(select_ancestor(&plan.common, 3).map(|c| c.ordinal), Some(2));
}
