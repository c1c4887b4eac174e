//! Tick ↔ tree-index mapping
//!
//! The leaf domain is centered on tick 0:
//!   index = tick / spacing + root_width / 2
//!   tick  = (index - root_width / 2) * spacing
//!
//! Both directions are exact inverses on aligned ticks. Neither function
//! checks the index against `root_width`; [`Domain`](crate::Domain) does.

use crate::{Result, TreeError};

/// Map an aligned tick to its tree index.
///
/// The result is not checked against `root_width` (tick `888` with spacing
/// `3` on a 512-wide tree yields `552`); it only has to be representable as
/// a `u32`.
///
/// # Errors
///
/// - [`TreeError::InvalidTickSpacing`] if `tick_spacing <= 0`.
/// - [`TreeError::UnalignedTick`] if `tick` is not a multiple of `tick_spacing`.
/// - [`TreeError::OutOfRange`] if the index would be negative or exceed `u32`.
///
/// # Examples
///
/// ```
/// use ticktree::tick_to_tree_index;
///
/// assert_eq!(tick_to_tree_index(3, 512, 3), Ok(257));
/// assert_eq!(tick_to_tree_index(-63, 512, 3), Ok(235));
/// assert!(tick_to_tree_index(887, 512, 3).is_err());
/// ```
pub fn tick_to_tree_index(tick: i32, root_width: u32, tick_spacing: i32) -> Result<u32> {
    if tick_spacing <= 0 {
        return Err(TreeError::InvalidTickSpacing(tick_spacing));
    }
    if tick % tick_spacing != 0 {
        return Err(TreeError::UnalignedTick { tick, tick_spacing });
    }

    let index = i64::from(tick / tick_spacing) + i64::from(root_width / 2);
    u32::try_from(index).map_err(|_| TreeError::OutOfRange { index, root_width })
}

/// Map a tree index back to its tick.
///
/// # Errors
///
/// - [`TreeError::InvalidTickSpacing`] if `tick_spacing <= 0`.
/// - [`TreeError::TickOverflow`] if the tick does not fit in an `i32`.
///
/// # Examples
///
/// ```
/// use ticktree::tree_index_to_tick;
///
/// assert_eq!(tree_index_to_tick(257, 512, 3), Ok(3));
/// assert_eq!(tree_index_to_tick(235, 512, 3), Ok(-63));
/// ```
pub fn tree_index_to_tick(index: u32, root_width: u32, tick_spacing: i32) -> Result<i32> {
    if tick_spacing <= 0 {
        return Err(TreeError::InvalidTickSpacing(tick_spacing));
    }

    let steps = i64::from(index) - i64::from(root_width / 2);
    let tick = steps * i64::from(tick_spacing);
    i32::try_from(tick).map_err(|_| TreeError::TickOverflow { index })
}
