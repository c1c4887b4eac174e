//! Implicit tree node addressing
//!
//! Node = (offset, span) with span a power of two and offset % span == 0
//! Covers leaves [offset, offset + span)
//! Children via halving:
//!   Left child:  (offset, span / 2)
//!   Right child: (offset + span / 2, span / 2)
//! Packed form: 2 * offset + span (the node's in-order position, 0 = empty)

use std::fmt;

use crate::bits::BitMath;
use crate::tick::tree_index_to_tick;
use crate::{Result, TreeError};

/// Largest span representable with `u32` offsets.
pub const MAX_SPAN: u32 = 1 << 31;

/// Tree node key (implicit - just an aligned interval)
///
/// Collaborators key their per-node state by [`Key::packed`], which is a
/// stable encoding: changing it breaks every persisted map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Key {
    offset: u32,
    span: u32,
}

impl Key {
    /// The "no node" sentinel `(0, 0)`.
    pub const EMPTY: Key = Key { offset: 0, span: 0 };

    /// Create a key without checking alignment.
    ///
    /// Callers uphold `span` being a power of two and `offset` a multiple of
    /// `span`; only the former is asserted, and only in debug builds.
    #[inline]
    pub const fn new(offset: u32, span: u32) -> Self {
        debug_assert!(
            span == 0 || span.is_power_of_two(),
            "span must be a power of two"
        );
        Self { offset, span }
    }

    /// Create a key, validating span and alignment.
    pub fn try_new(offset: u32, span: u32) -> Result<Self> {
        if !span.is_power_of_two() {
            return Err(TreeError::InvalidSpan { span });
        }
        if offset % span != 0 {
            return Err(TreeError::MisalignedKey { offset, span });
        }
        Ok(Self { offset, span })
    }

    /// Root spanning `[0, root_width)`
    #[inline]
    pub const fn root(root_width: u32) -> Self {
        Self::new(0, root_width)
    }

    /// Leaf covering a single index
    #[inline]
    pub const fn leaf(index: u32) -> Self {
        Self {
            offset: index,
            span: 1,
        }
    }

    /// Decode a packed key; `0` decodes to [`Key::EMPTY`].
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidPackedKey`] if the span exceeds [`MAX_SPAN`] or the
    /// offset does not fit in `u32`.
    pub fn wrap(packed: u64) -> Result<Self> {
        let span = packed.lowest_set_bit();
        let offset = (packed - span) >> 1;
        if span > u64::from(MAX_SPAN) {
            return Err(TreeError::InvalidPackedKey { packed });
        }
        let offset = u32::try_from(offset).map_err(|_| TreeError::InvalidPackedKey { packed })?;
        Ok(Self {
            offset,
            span: span as u32,
        })
    }

    /// Stable single-word encoding `2 * offset + span`.
    ///
    /// For aligned keys this is the in-order position of the node, so packed
    /// values of distinct nodes never collide.
    #[inline]
    pub const fn packed(&self) -> u64 {
        2 * self.offset as u64 + self.span as u64
    }

    /// `(offset, span)`
    #[inline]
    pub const fn explode(&self) -> (u32, u32) {
        (self.offset, self.span)
    }

    /// First leaf covered
    #[inline]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Number of leaves covered
    #[inline]
    pub const fn span(&self) -> u32 {
        self.span
    }

    /// Check for the sentinel
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.span == 0
    }

    /// Check if leaf (unit span)
    #[inline]
    pub const fn is_leaf(&self) -> bool {
        self.span == 1
    }

    /// Levels above the leaves (`log2(span)`)
    #[inline]
    pub const fn height(&self) -> u32 {
        self.span.trailing_zeros()
    }

    /// Inclusive lower index
    #[inline]
    pub const fn low(&self) -> u32 {
        self.offset
    }

    /// Inclusive upper index
    #[inline]
    pub const fn high(&self) -> u32 {
        self.offset + self.span.saturating_sub(1)
    }

    /// Whether `index` lies inside this node
    #[inline]
    pub const fn contains(&self, index: u32) -> bool {
        !self.is_empty() && self.low() <= index && index <= self.high()
    }

    /// Parent: double the span, align the offset down.
    ///
    /// Saturates: a key already at [`MAX_SPAN`] (or the empty key) is its own
    /// parent. Use [`Key::parent_within`] to saturate at a domain root.
    pub fn parent(&self) -> Self {
        if self.is_empty() || self.span >= MAX_SPAN {
            return *self;
        }
        let span = self.span << 1;
        Self {
            offset: self.offset & !(span - 1),
            span,
        }
    }

    /// Parent inside a domain of `root_width` leaves; the root is its own parent.
    pub fn parent_within(&self, root_width: u32) -> Self {
        if self.span >= root_width {
            return *self;
        }
        self.parent()
    }

    /// Children via halving
    ///
    /// Returns: ((offset, span/2), (offset + span/2, span/2))
    ///
    /// # Panics
    ///
    /// A leaf has no children; asking for them is a broken decomposition.
    pub fn children(&self) -> (Key, Key) {
        assert!(self.span > 1, "leaf {self} has no children");

        let half = self.span >> 1;
        (
            Key {
                offset: self.offset,
                span: half,
            },
            Key {
                offset: self.offset + half,
                span: half,
            },
        )
    }

    /// The other child of this node's parent
    #[inline]
    pub const fn sibling(&self) -> Self {
        Self {
            offset: self.offset ^ self.span,
            span: self.span,
        }
    }

    /// Left child of its parent (the root counts as left)
    #[inline]
    pub const fn is_left(&self) -> bool {
        self.offset & self.span == 0
    }

    /// Right child of its parent
    #[inline]
    pub const fn is_right(&self) -> bool {
        !self.is_left()
    }

    /// Strict ancestor test, by climbing `other` through its parents.
    pub fn is_ancestor_of(&self, other: &Key) -> bool {
        if self.is_empty() || other.is_empty() || other.span >= self.span {
            return false;
        }

        let mut node = *other;
        while node.span < self.span {
            let up = node.parent();
            if up == node {
                return false;
            }
            node = up;
        }
        node == *self
    }

    /// Strict descendant test
    #[inline]
    pub fn is_descendant_of(&self, other: &Key) -> bool {
        other.is_ancestor_of(self)
    }

    /// Child of `self` on the path down to `target`.
    ///
    /// `None` unless `target` is a strict descendant.
    pub fn next_down(&self, target: &Key) -> Option<Key> {
        if !self.is_ancestor_of(target) {
            return None;
        }
        let (left, right) = self.children();
        if left == *target || left.is_ancestor_of(target) {
            Some(left)
        } else {
            Some(right)
        }
    }

    /// Tick range `[low_tick, high_tick)` covered by this node.
    ///
    /// `high_tick` is the tick of the first leaf past the node.
    pub fn to_tick_range(&self, root_width: u32, tick_spacing: i32) -> Result<(i32, i32)> {
        let low = tree_index_to_tick(self.offset, root_width, tick_spacing)?;
        let high = tree_index_to_tick(self.offset + self.span, root_width, tick_spacing)?;
        Ok((low, high))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "(empty)")
        } else {
            write!(f, "({}, {})", self.offset, self.span)
        }
    }
}
