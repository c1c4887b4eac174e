//! Range-add / range-sum liquidity over the tree
//!
//! Per node (keyed by packed key):
//!   own     = liquidity added to the whole node
//!   subtree = own · span + Σ children.subtree
//! Add:   canonical nodes take the delta on the way down,
//!        pass-through nodes refold their subtree on the way up
//! Query: canonical nodes contribute subtree,
//!        pass-through nodes contribute own · overlap

use std::collections::HashMap;

use tracing::debug;

use crate::tree::{Domain, Key, ViewWalker, Walker};
use crate::Result;

/// Liquidity accumulators of one node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeLiquidity {
    /// Liquidity applied to every leaf of this node
    pub own: i128,

    /// Total liquidity summed over every leaf of this node's subtree
    pub subtree: i128,
}

/// Liquidity per leaf, stored only at the O(log n) nodes each update touches.
#[derive(Debug, Clone)]
pub struct LiquidityTree {
    domain: Domain,
    nodes: HashMap<u64, NodeLiquidity>,
}

impl LiquidityTree {
    /// Create an empty tree over `domain`
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            nodes: HashMap::new(),
        }
    }

    /// Domain of this tree
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Accumulators stored at `key` (zero if never touched)
    pub fn node(&self, key: Key) -> NodeLiquidity {
        self.nodes.get(&key.packed()).copied().unwrap_or_default()
    }

    /// Number of nodes holding state
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Add `delta` to every leaf in `[left, right]`.
    pub fn add(&mut self, left: u32, right: u32, delta: i128) -> Result<()> {
        let route = self.domain.route(left, right)?;
        let mut walk = AddLiquidity {
            nodes: &mut self.nodes,
            delta,
        };
        route.walk(&mut walk);

        debug!(left, right, delta, nodes = self.nodes.len(), "liquidity updated");
        Ok(())
    }

    /// Add `delta` over the half-open tick range `[lower_tick, upper_tick)`.
    pub fn add_ticks(&mut self, lower_tick: i32, upper_tick: i32, delta: i128) -> Result<()> {
        let route = self.domain.route_ticks(lower_tick, upper_tick)?;
        self.add(*route.range().start(), *route.range().end(), delta)
    }

    /// Sum of liquidity over every leaf in `[left, right]`.
    pub fn total(&self, left: u32, right: u32) -> Result<i128> {
        let view = self.domain.view_route(left, right)?;
        let mut sum = SumLiquidity {
            first: left,
            last: right,
            total: 0,
        };
        view.walk(&self.nodes, &mut sum);
        Ok(sum.total)
    }

    /// Sum of liquidity over the half-open tick range `[lower_tick, upper_tick)`.
    pub fn total_ticks(&self, lower_tick: i32, upper_tick: i32) -> Result<i128> {
        let route = self.domain.route_ticks(lower_tick, upper_tick)?;
        self.total(*route.range().start(), *route.range().end())
    }

    /// Liquidity at a single leaf
    pub fn at(&self, index: u32) -> Result<i128> {
        self.total(index, index)
    }

    /// Liquidity at the leaf holding `tick`
    pub fn at_tick(&self, tick: i32) -> Result<i128> {
        let index = self.domain.tick_to_leaf(tick)?;
        self.at(index)
    }
}

struct AddLiquidity<'a> {
    nodes: &'a mut HashMap<u64, NodeLiquidity>,
    delta: i128,
}

impl Walker for AddLiquidity<'_> {
    fn down(&mut self, key: Key, canonical: bool) {
        if !canonical {
            return;
        }
        let node = self.nodes.entry(key.packed()).or_default();
        node.own += self.delta;
        node.subtree += self.delta * i128::from(key.span());
    }

    fn up(&mut self, key: Key, canonical: bool) {
        if canonical {
            return;
        }
        // pass-through nodes always have children: a leaf touching the
        // range is inside it
        let (lo, hi) = key.children();
        let children = subtree_of(self.nodes, lo) + subtree_of(self.nodes, hi);
        let node = self.nodes.entry(key.packed()).or_default();
        node.subtree = node.own * i128::from(key.span()) + children;
    }
}

struct SumLiquidity {
    first: u32,
    last: u32,
    total: i128,
}

impl ViewWalker for SumLiquidity {
    type State = HashMap<u64, NodeLiquidity>;

    fn down(&mut self, nodes: &Self::State, key: Key, canonical: bool) {
        let Some(node) = nodes.get(&key.packed()) else {
            return;
        };
        if canonical {
            self.total += node.subtree;
        } else {
            let overlap = key.high().min(self.last) - key.low().max(self.first) + 1;
            self.total += node.own * i128::from(overlap);
        }
    }
}

fn subtree_of(nodes: &HashMap<u64, NodeLiquidity>, key: Key) -> i128 {
    nodes.get(&key.packed()).map_or(0, |node| node.subtree)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(width: u32) -> LiquidityTree {
        LiquidityTree::new(Domain::new(width).expect("valid width"))
    }

    #[test]
    fn test_single_range() {
        let mut liquidity = tree(16);
        liquidity.add(3, 9, 5).expect("valid range");

        assert_eq!(liquidity.total(0, 15), Ok(35));
        assert_eq!(liquidity.total(3, 9), Ok(35));
        assert_eq!(liquidity.total(0, 2), Ok(0));
        assert_eq!(liquidity.at(9), Ok(5));
        assert_eq!(liquidity.at(10), Ok(0));
        assert_eq!(liquidity.node(Key::root(16)).subtree, 35);
    }

    #[test]
    fn test_overlapping_ranges() {
        let mut liquidity = tree(32);
        liquidity.add(0, 31, 1).expect("valid range");
        liquidity.add(8, 11, 10).expect("valid range");
        liquidity.add(10, 20, -2).expect("valid range");

        assert_eq!(liquidity.at(9), Ok(11));
        assert_eq!(liquidity.at(10), Ok(9));
        assert_eq!(liquidity.at(15), Ok(-1));
        assert_eq!(liquidity.total(9, 12), Ok(11 + 9 + 9 - 1));
        assert_eq!(liquidity.total(0, 31), Ok(32 + 40 - 22));
    }

    #[test]
    fn test_remove_restores_zero() {
        let mut liquidity = tree(64);
        liquidity.add(17, 42, 7).expect("valid range");
        liquidity.add(17, 42, -7).expect("valid range");

        assert_eq!(liquidity.total(0, 63), Ok(0));
        assert!(liquidity.node_count() > 0);
    }

    #[test]
    fn test_tick_ranges() {
        let domain = Domain::new(64)
            .and_then(|d| d.with_tick_spacing(10))
            .expect("valid domain");
        let mut liquidity = LiquidityTree::new(domain);

        liquidity.add_ticks(-100, 50, 3).expect("valid ticks");

        assert_eq!(liquidity.at_tick(-100), Ok(3));
        assert_eq!(liquidity.at_tick(40), Ok(3));
        assert_eq!(liquidity.at_tick(50), Ok(0));
        assert_eq!(liquidity.total_ticks(-320, 320), Ok(45));
        assert!(liquidity.add_ticks(-95, 50, 1).is_err());
    }
}
