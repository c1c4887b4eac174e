//! Range decomposition
//!
//! Inclusive leaf range [left, right] → LCA + two boundary nodes
//!   LCA span      = 2 · highest_set_bit(left ^ right)  (1 if left == right)
//!   left boundary = (left, lowest_set_bit(left))
//!   right boundary= (right + 1 - s, s), s = lowest_set_bit(right + 1)
//! A boundary that coincides with the LCA edge collapses to the root key,
//! which can never lie strictly below the LCA.

use std::ops::RangeInclusive;

use tracing::trace;

use super::key::MAX_SPAN;
use super::traversal::{drive, Spine, Step, Walker};
use super::{Key, ViewRoute};
use crate::bits::BitMath;
use crate::{Result, TreeError};

/// Decomposition of one inclusive leaf range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    root_width: u32,
    first: u32,
    last: u32,
    lca: Key,
    left: Key,
    right: Key,
}

impl Route {
    /// Decompose `[left, right]` in a tree of `root_width` leaves.
    ///
    /// # Errors
    ///
    /// - [`TreeError::InvalidRootWidth`] if `root_width` is not a power of two
    ///   no larger than `2^31`.
    /// - [`TreeError::InvertedRange`] if `left > right`.
    /// - [`TreeError::OutOfBounds`] if `right >= root_width`.
    pub fn make(root_width: u32, left: u32, right: u32) -> Result<Self> {
        if !root_width.is_power_of_two() || root_width > MAX_SPAN {
            return Err(TreeError::InvalidRootWidth(u64::from(root_width)));
        }
        if left > right {
            return Err(TreeError::InvertedRange { left, right });
        }
        if right >= root_width {
            return Err(TreeError::OutOfBounds {
                index: right,
                root_width,
            });
        }

        let lca = if left == right {
            Key::leaf(left)
        } else {
            let span = (left ^ right).highest_set_bit_value() << 1;
            Key::new(left & !(span - 1), span)
        };

        let root = Key::root(root_width);
        let left_key = if left == lca.low() {
            root
        } else {
            Key::new(left, left.lowest_set_bit())
        };
        let right_key = if right == lca.high() {
            root
        } else {
            let end = right + 1;
            let span = end.lowest_set_bit();
            Key::new(end - span, span)
        };

        trace!(
            root_width,
            left,
            right,
            lca = %lca,
            left_boundary = %left_key,
            right_boundary = %right_key,
            "range decomposed"
        );

        Ok(Self {
            root_width,
            first: left,
            last: right,
            lca,
            left: left_key,
            right: right_key,
        })
    }

    /// Number of leaves in the tree
    pub fn root_width(&self) -> u32 {
        self.root_width
    }

    /// Root node of the tree
    pub fn root(&self) -> Key {
        Key::root(self.root_width)
    }

    /// Leaf range being decomposed
    pub fn range(&self) -> RangeInclusive<u32> {
        self.first..=self.last
    }

    /// Number of leaves in the range
    pub fn leaf_count(&self) -> u32 {
        self.last - self.first + 1
    }

    /// Smallest node containing both endpoints
    pub fn lca(&self) -> Key {
        self.lca
    }

    /// Left boundary key; the root key when it collapsed onto the LCA
    pub fn left(&self) -> Key {
        self.left
    }

    /// Right boundary key; the root key when it collapsed onto the LCA
    pub fn right(&self) -> Key {
        self.right
    }

    /// Left boundary, `None` when the range starts at the LCA's low edge
    pub fn left_boundary(&self) -> Option<Key> {
        (self.left != self.root()).then_some(self.left)
    }

    /// Right boundary, `None` when the range ends at the LCA's high edge
    pub fn right_boundary(&self) -> Option<Key> {
        (self.right != self.root()).then_some(self.right)
    }

    /// Down-pass visit sequence, grouped root / left / right.
    ///
    /// Along each boundary spine a path node is followed by its covered
    /// child (if any), then by the rest of the descent. When one side
    /// collapses, the LCA's child on that side is covered whole and opens
    /// the other spine.
    pub fn steps(&self) -> Vec<Step> {
        let depth = self.root_width.trailing_zeros() as usize;
        let mut steps = Vec::with_capacity(3 * depth + 1);

        let left = self.left_boundary();
        let right = self.right_boundary();
        let collapsed = left.is_none() && right.is_none();

        let mut span = self.root_width;
        loop {
            let key = Key::new(self.lca.offset() & !(span - 1), span);
            if key == self.lca && collapsed {
                steps.push(Step::canonical(key, Spine::Root));
            } else {
                steps.push(Step::pass(key, Spine::Root));
            }
            if span == self.lca.span() {
                break;
            }
            span >>= 1;
        }

        if collapsed {
            return steps;
        }

        let (left_child, right_child) = self.lca.children();
        if let Some(boundary) = left {
            if right.is_none() {
                steps.push(Step::canonical(right_child, Spine::Left));
            }
            self.left_spine(left_child, boundary, &mut steps);
        }
        if let Some(boundary) = right {
            if left.is_none() {
                steps.push(Step::canonical(left_child, Spine::Right));
            }
            self.right_spine(right_child, boundary, &mut steps);
        }

        steps
    }

    /// Suffix of `start` from the left endpoint; a covered right child
    /// follows the path node it hangs from.
    fn left_spine(&self, start: Key, boundary: Key, steps: &mut Vec<Step>) {
        let mut node = start;

        while node != boundary {
            steps.push(Step::pass(node, Spine::Left));
            let (lo, hi) = node.children();
            if self.first < hi.offset() {
                steps.push(Step::canonical(hi, Spine::Left));
                node = lo;
            } else {
                node = hi;
            }
        }

        steps.push(Step::canonical(boundary, Spine::Left));
    }

    /// Prefix of `start` up to the right endpoint; a covered left child
    /// follows the path node it hangs from.
    fn right_spine(&self, start: Key, boundary: Key, steps: &mut Vec<Step>) {
        let mut node = start;

        while node != boundary {
            steps.push(Step::pass(node, Spine::Right));
            let (lo, hi) = node.children();
            if self.last >= hi.offset() {
                steps.push(Step::canonical(lo, Spine::Right));
                node = hi;
            } else {
                node = lo;
            }
        }

        steps.push(Step::canonical(boundary, Spine::Right));
    }

    /// Canonical nodes sorted by offset; they tile the range exactly
    pub fn canonical(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = self
            .steps()
            .into_iter()
            .filter(|step| step.canonical)
            .map(|step| step.key)
            .collect();
        keys.sort_unstable_by_key(Key::offset);
        keys
    }

    /// Run the two-phase traversal.
    ///
    /// Phases arrive as `RootDown, LeftDown, LeftUp, RightDown, RightUp,
    /// RootUp`; each up segment retraces its down segment in reverse.
    pub fn walk<W: Walker + ?Sized>(&self, walker: &mut W) {
        let steps = self.steps();
        trace!(
            lca = %self.lca,
            visits = steps.len(),
            "walking route"
        );
        drive(&steps, walker);
    }

    /// Read-only view of this route
    pub fn view(&self) -> ViewRoute {
        ViewRoute::new(*self)
    }
}
