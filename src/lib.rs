//! # Range-decomposition tree engine for tick-ranged liquidity
//!
//! An implicit perfect binary tree over the leaf domain `[0, root_width)`.
//! Nodes are `(offset, span)` keys computed on demand; nothing is materialized.
//!
//! ## Core Algorithm
//!
//! 1. **Tick mapping**: price ticks map to leaves, tick 0 ↔ leaf `root_width / 2`
//! 2. **Route**: an inclusive leaf range → LCA + two boundary nodes, in O(1) bit math
//! 3. **Walk**: root spine down, left spine down and back up, right spine
//!    down and back up, root spine up; canonical nodes are tagged
//! 4. **Walkers**: collaborators key their per-node state by [`Key::packed`]
//!
//! Canonical nodes visited by a walk tile the queried range exactly, and there
//! are O(log root_width) of them.
//!
//! ## Usage Example
//!
//! ```
//! use ticktree::{Domain, Key, TraceWalker};
//!
//! let domain = Domain::new(64)?;
//! let route = domain.route(45, 57)?;
//! assert_eq!(route.lca(), Key::new(32, 32));
//!
//! let mut trace = TraceWalker::default();
//! route.walk(&mut trace);
//! let covered: u32 = trace.canonical().iter().map(|k| k.span()).sum();
//! assert_eq!(covered, 13);
//! # Ok::<(), ticktree::TreeError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod bits; // Bit primitives
pub mod tick; // Tick <-> leaf index mapping
pub mod tree; // Keys, routes and traversal
pub mod walkers; // Reference collaborators

// Re-exports for convenience
pub use bits::BitMath;
pub use tick::{tick_to_tree_index, tree_index_to_tick};
pub use tree::{Domain, Key, Phase, Route, Spine, Step, ViewRoute, ViewWalker, Walker};
pub use walkers::{CoverageLedger, Event, LiquidityTree, TraceWalker};

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors raised by range validation, tick conversion and key construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Range endpoints given in the wrong order
    #[error("inverted range: left {left} > right {right}")]
    InvertedRange {
        /// Left endpoint supplied
        left: u32,
        /// Right endpoint supplied
        right: u32,
    },

    /// Range endpoint outside the tree domain
    #[error("index {index} out of bounds for root width {root_width}")]
    OutOfBounds {
        /// Offending index
        index: u32,
        /// Domain size
        root_width: u32,
    },

    /// Tick is not a multiple of the tick spacing
    #[error("tick {tick} is not aligned to spacing {tick_spacing}")]
    UnalignedTick {
        /// Offending tick
        tick: i32,
        /// Tick spacing of the domain
        tick_spacing: i32,
    },

    /// Tick or tree index falls outside the tick domain
    #[error("tree index {index} out of range for root width {root_width}")]
    OutOfRange {
        /// Computed leaf index (may be negative)
        index: i64,
        /// Domain size
        root_width: u32,
    },

    /// Domain size is not a power of two in `[2, 2^31]`
    #[error("invalid root width {0}: must be a power of two in [2, 2^31]")]
    InvalidRootWidth(u64),

    /// Tick spacing is not positive or overflows the tick range
    #[error("invalid tick spacing {0}")]
    InvalidTickSpacing(i32),

    /// Tree index does not map to a tick representable as `i32`
    #[error("tick for tree index {index} overflows i32")]
    TickOverflow {
        /// Offending tree index
        index: u32,
    },

    /// Key span is not a power of two
    #[error("span {span} is not a power of two")]
    InvalidSpan {
        /// Offending span
        span: u32,
    },

    /// Key offset is not a multiple of its span
    #[error("offset {offset} is not aligned to span {span}")]
    MisalignedKey {
        /// Offending offset
        offset: u32,
        /// Span of the key
        span: u32,
    },

    /// Packed value does not decode to a key of this tree
    #[error("packed key {packed:#x} is out of range")]
    InvalidPackedKey {
        /// Offending packed value
        packed: u64,
    },

    /// Two canonical nodes cover the same leaf
    #[error("node {key} overlaps a previously covered node")]
    Overlap {
        /// Node that overlapped
        key: Key,
    },
}
