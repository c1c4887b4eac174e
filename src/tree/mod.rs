//! Implicit range-decomposition tree
//!
//! Perfect binary tree over leaves [0, root_width)
//! Implicit representation: no tree is stored!
//! Nodes are (offset, span) keys computed on demand, and the only
//! per-domain parameters are the width and the tick spacing.

mod key;
mod route;
mod traversal;
mod view;

pub use key::{Key, MAX_SPAN};
pub use route::Route;
pub use traversal::{Phase, Spine, Step, Walker};
pub use view::{ViewRoute, ViewWalker};

use crate::tick::{tick_to_tree_index, tree_index_to_tick};
use crate::{Result, TreeError};

/// Tree domain: leaf count and tick spacing (validated)
///
/// Passed explicitly wherever a width is needed, so several domains can be
/// used side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "DomainSpec")
)]
pub struct Domain {
    /// Number of leaves (power of two)
    root_width: u32,

    /// Ticks per leaf
    tick_spacing: i32,
}

impl Domain {
    /// Create a domain of `root_width` leaves with tick spacing 1.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidRootWidth`] unless `root_width` is a power of two
    /// in `[2, 2^31]`.
    pub fn new(root_width: u32) -> Result<Self> {
        if root_width < 2 || !root_width.is_power_of_two() || root_width > MAX_SPAN {
            return Err(TreeError::InvalidRootWidth(u64::from(root_width)));
        }
        Ok(Self {
            root_width,
            tick_spacing: 1,
        })
    }

    /// Set the tick spacing.
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidTickSpacing`] if the spacing is not positive or the
    /// domain's tick range `±(root_width / 2) · spacing` overflows `i32`.
    pub fn with_tick_spacing(mut self, tick_spacing: i32) -> Result<Self> {
        let half = i64::from(self.root_width / 2);
        if tick_spacing <= 0 || half * i64::from(tick_spacing) > i64::from(i32::MAX) {
            return Err(TreeError::InvalidTickSpacing(tick_spacing));
        }
        self.tick_spacing = tick_spacing;
        Ok(self)
    }

    /// Number of leaves
    pub fn root_width(&self) -> u32 {
        self.root_width
    }

    /// Ticks per leaf
    pub fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    /// Root node
    pub fn root(&self) -> Key {
        Key::root(self.root_width)
    }

    /// Levels between the root and the leaves
    pub fn height(&self) -> u32 {
        self.root_width.trailing_zeros()
    }

    /// Lowest tick (leaf 0)
    pub fn min_tick(&self) -> i32 {
        -self.max_tick()
    }

    /// Exclusive upper tick (one leaf past the last)
    pub fn max_tick(&self) -> i32 {
        (self.root_width / 2) as i32 * self.tick_spacing
    }

    /// Decompose an inclusive leaf range.
    pub fn route(&self, left: u32, right: u32) -> Result<Route> {
        Route::make(self.root_width, left, right)
    }

    /// Decompose an inclusive leaf range for read-only walks.
    pub fn view_route(&self, left: u32, right: u32) -> Result<ViewRoute> {
        ViewRoute::make(self.root_width, left, right)
    }

    /// Leaf holding `tick`, bounds-checked against the domain.
    ///
    /// # Errors
    ///
    /// [`TreeError::UnalignedTick`] or [`TreeError::OutOfRange`].
    pub fn tick_to_leaf(&self, tick: i32) -> Result<u32> {
        let index = tick_to_tree_index(tick, self.root_width, self.tick_spacing)?;
        if index >= self.root_width {
            return Err(TreeError::OutOfRange {
                index: i64::from(index),
                root_width: self.root_width,
            });
        }
        Ok(index)
    }

    /// Lowest tick of a leaf; `root_width` itself maps to the upper tick edge.
    ///
    /// # Errors
    ///
    /// [`TreeError::OutOfRange`] past the upper edge.
    pub fn leaf_to_tick(&self, index: u32) -> Result<i32> {
        if index > self.root_width {
            return Err(TreeError::OutOfRange {
                index: i64::from(index),
                root_width: self.root_width,
            });
        }
        tree_index_to_tick(index, self.root_width, self.tick_spacing)
    }

    /// Route for the half-open tick range `[lower_tick, upper_tick)`.
    ///
    /// # Errors
    ///
    /// Tick validation errors from either bound, or
    /// [`TreeError::InvertedRange`] (leaf indices) if the range is empty.
    pub fn route_ticks(&self, lower_tick: i32, upper_tick: i32) -> Result<Route> {
        let first = self.tick_to_leaf(lower_tick)?;
        let end = tick_to_tree_index(upper_tick, self.root_width, self.tick_spacing)?;
        if end > self.root_width {
            return Err(TreeError::OutOfRange {
                index: i64::from(end),
                root_width: self.root_width,
            });
        }
        if end <= first {
            return Err(TreeError::InvertedRange {
                left: first,
                right: end,
            });
        }
        self.route(first, end - 1)
    }

    /// Tick range `[low, high)` covered by a node of this domain.
    pub fn key_ticks(&self, key: Key) -> Result<(i32, i32)> {
        key.to_tick_range(self.root_width, self.tick_spacing)
    }
}

/// Unvalidated wire form of [`Domain`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct DomainSpec {
    root_width: u32,
    tick_spacing: i32,
}

#[cfg(feature = "serde")]
impl TryFrom<DomainSpec> for Domain {
    type Error = TreeError;

    fn try_from(raw: DomainSpec) -> Result<Self> {
        Domain::new(raw.root_width)?.with_tick_spacing(raw.tick_spacing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_validation() {
        assert!(Domain::new(2).is_ok());
        assert!(Domain::new(1 << 31).is_ok());
        assert_eq!(Domain::new(1), Err(TreeError::InvalidRootWidth(1)));
        assert_eq!(Domain::new(96), Err(TreeError::InvalidRootWidth(96)));
    }

    #[test]
    fn test_spacing_validation() {
        let domain = Domain::new(1024).expect("valid width");
        assert!(domain.with_tick_spacing(60).is_ok());
        assert_eq!(
            domain.with_tick_spacing(0),
            Err(TreeError::InvalidTickSpacing(0))
        );
        assert_eq!(
            Domain::new(1 << 31)
                .expect("valid width")
                .with_tick_spacing(2),
            Err(TreeError::InvalidTickSpacing(2))
        );
    }

    #[test]
    fn test_tick_bounds() {
        let domain = Domain::new(512)
            .and_then(|d| d.with_tick_spacing(3))
            .expect("valid domain");
        assert_eq!(domain.min_tick(), -768);
        assert_eq!(domain.max_tick(), 768);
        assert_eq!(domain.tick_to_leaf(-768), Ok(0));
        assert_eq!(domain.tick_to_leaf(765), Ok(511));
        assert_eq!(
            domain.tick_to_leaf(768),
            Err(TreeError::OutOfRange {
                index: 512,
                root_width: 512
            })
        );
        assert_eq!(domain.leaf_to_tick(512), Ok(768));
    }

    #[test]
    fn test_range_errors_agree_both_directions() {
        let domain = Domain::new(512)
            .and_then(|d| d.with_tick_spacing(3))
            .expect("valid domain");
        let past_edge = TreeError::OutOfRange {
            index: 513,
            root_width: 512,
        };
        assert_eq!(domain.leaf_to_tick(513), Err(past_edge.clone()));
        assert_eq!(domain.tick_to_leaf(771), Err(past_edge));
    }

    #[test]
    fn test_route_ticks_half_open() {
        let domain = Domain::new(64)
            .and_then(|d| d.with_tick_spacing(10))
            .expect("valid domain");

        // [-50, 30) → leaves 27..=34
        let route = domain.route_ticks(-50, 30).expect("valid tick range");
        assert_eq!(route.range(), 27..=34);

        // upper tick may sit exactly on the domain edge
        let route = domain.route_ticks(0, domain.max_tick()).expect("edge");
        assert_eq!(route.range(), 32..=63);

        assert_eq!(
            domain.route_ticks(30, 30),
            Err(TreeError::InvertedRange {
                left: 35,
                right: 35
            })
        );
    }
}
