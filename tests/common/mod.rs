//! Shared helpers: naive reference implementations to compare against.

#![allow(dead_code)]

use ticktree::{Key, Route, TraceWalker};

/// Recursive segment-tree visit of `[left, right]`, pre-order.
///
/// Returns every node that intersects the range without lying inside an
/// already-covered node, tagged with whether it is covered.
pub fn reference_visits(root_width: u32, left: u32, right: u32) -> Vec<(Key, bool)> {
    let mut out = Vec::new();
    visit(Key::root(root_width), left, right, &mut out);
    out
}

fn visit(node: Key, left: u32, right: u32, out: &mut Vec<(Key, bool)>) {
    if node.high() < left || node.low() > right {
        return;
    }
    if left <= node.low() && node.high() <= right {
        out.push((node, true));
        return;
    }
    out.push((node, false));
    let (lo, hi) = node.children();
    visit(lo, left, right, out);
    visit(hi, left, right, out);
}

/// Visits ordered by key, for order-insensitive comparison.
pub fn sorted(mut visits: Vec<(Key, bool)>) -> Vec<(Key, bool)> {
    visits.sort_unstable();
    visits
}

/// True iff no visit precedes a visit of one of its ancestors.
pub fn parents_first(visits: &[(Key, bool)]) -> bool {
    visits.iter().enumerate().all(|(i, (key, _))| {
        visits[i + 1..]
            .iter()
            .all(|(later, _)| !later.is_ancestor_of(key))
    })
}

/// Run a route and return the recorded trace.
pub fn trace(route: &Route) -> TraceWalker {
    let mut walker = TraceWalker::default();
    route.walk(&mut walker);
    walker
}

/// Per-leaf liquidity, updated one leaf at a time.
#[derive(Debug, Clone)]
pub struct NaiveLiquidity {
    leaves: Vec<i128>,
}

impl NaiveLiquidity {
    pub fn new(root_width: u32) -> Self {
        Self {
            leaves: vec![0; root_width as usize],
        }
    }

    pub fn add(&mut self, left: u32, right: u32, delta: i128) {
        for leaf in &mut self.leaves[left as usize..=right as usize] {
            *leaf += delta;
        }
    }

    pub fn total(&self, left: u32, right: u32) -> i128 {
        self.leaves[left as usize..=right as usize].iter().sum()
    }
}
