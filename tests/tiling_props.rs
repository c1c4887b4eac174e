mod common;

use proptest::prelude::*;
use ticktree::{CoverageLedger, Key, Phase, Route, Spine, TraceWalker, ViewRoute};

/// `(root_width, left, right)` with `left <= right < root_width`
fn ranges() -> impl Strategy<Value = (u32, u32, u32)> {
    (0u32..=20)
        .prop_map(|height| 1u32 << height)
        .prop_flat_map(|width| (Just(width), 0..width, 0..width))
        .prop_map(|(width, a, b)| (width, a.min(b), a.max(b)))
}

proptest! {
    #[test]
    fn canonical_nodes_tile_the_range((width, left, right) in ranges()) {
        let route = Route::make(width, left, right).expect("valid range");
        let mut ledger = CoverageLedger::new(width);
        route.walk(&mut ledger);

        prop_assert_eq!(ledger.overlap(), None);
        prop_assert!(ledger.covers_exactly(left, right), "[{}, {}] not tiled", left, right);
        prop_assert_eq!(ledger.covered_count(), (right - left + 1) as usize);
    }

    #[test]
    fn visits_match_recursive_segment_tree((width, left, right) in ranges()) {
        let route = Route::make(width, left, right).expect("valid range");
        let visits: Vec<_> = route
            .steps()
            .into_iter()
            .map(|step| (step.key, step.canonical))
            .collect();

        prop_assert!(common::parents_first(&visits));
        prop_assert_eq!(
            common::sorted(visits),
            common::sorted(common::reference_visits(width, left, right))
        );
    }

    #[test]
    fn canonical_nodes_are_sorted_and_aligned((width, left, right) in ranges()) {
        let route = Route::make(width, left, right).expect("valid range");
        let canonical = route.canonical();

        prop_assert_eq!(canonical.first().map(Key::low), Some(left));
        prop_assert_eq!(canonical.last().map(Key::high), Some(right));
        for pair in canonical.windows(2) {
            prop_assert_eq!(pair[0].high() + 1, pair[1].low());
        }
        for key in &canonical {
            prop_assert!(key.span().is_power_of_two());
            prop_assert_eq!(key.offset() % key.span(), 0);
            prop_assert!(route.lca() == *key || route.lca().is_ancestor_of(key));
        }
    }

    #[test]
    fn each_up_segment_mirrors_its_down_segment((width, left, right) in ranges()) {
        let route = Route::make(width, left, right).expect("valid range");
        let trace = common::trace(&route);

        prop_assert_eq!(trace.phases(), Phase::ORDER.to_vec());
        for spine in Spine::ALL {
            let mut ups = trace.segment(Phase::up(spine));
            ups.reverse();
            prop_assert_eq!(trace.segment(Phase::down(spine)), ups);
        }

        // children are folded before their parents
        let mut ups = trace.ups();
        ups.reverse();
        prop_assert!(common::parents_first(&ups));
    }

    #[test]
    fn boundaries_sit_below_the_lca((width, left, right) in ranges()) {
        let route = Route::make(width, left, right).expect("valid range");
        let lca = route.lca();

        match route.left_boundary() {
            Some(boundary) => {
                prop_assert!(lca.is_ancestor_of(&boundary));
                prop_assert_eq!(boundary.low(), left);
            }
            None => prop_assert_eq!(lca.low(), left),
        }
        match route.right_boundary() {
            Some(boundary) => {
                prop_assert!(lca.is_ancestor_of(&boundary));
                prop_assert_eq!(boundary.high(), right);
            }
            None => prop_assert_eq!(lca.high(), right),
        }
    }

    #[test]
    fn view_walk_matches_mutable_walk((width, left, right) in ranges()) {
        let route = Route::make(width, left, right).expect("valid range");
        let mut viewed = TraceWalker::default();
        ViewRoute::from(route).walk(&(), &mut viewed);

        let reference = common::trace(&route);
        prop_assert_eq!(viewed.events(), reference.events());
    }

    #[test]
    fn packed_keys_round_trip(height in 0u32..=31, slot in any::<u32>()) {
        let span = 1u32 << height;
        let offset = (slot & !(span - 1)) & (u32::MAX >> 1);
        let key = Key::new(offset, span);

        prop_assert_eq!(Key::wrap(key.packed()), Ok(key));
        prop_assert_eq!(key.packed(), 2 * u64::from(offset) + u64::from(span));
    }

    #[test]
    fn parent_contains_child(height in 0u32..30, slot in 0u32..(1 << 30)) {
        let span = 1u32 << height;
        let key = Key::new(slot & !(span - 1), span);
        let parent = key.parent();

        prop_assert_eq!(parent.span(), span * 2);
        prop_assert!(parent.is_ancestor_of(&key));
        let (lo, hi) = parent.children();
        prop_assert!(key == lo || key == hi);
        prop_assert_eq!(key.sibling().parent(), parent);
    }
}
