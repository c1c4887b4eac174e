//! Leaf coverage ledger
//!
//! Tracks which leaves canonical nodes have covered, 1 bit per leaf
//! Total space: O(root_width) bits

use bitvec::prelude::*;

use crate::tree::{Key, Walker};
use crate::{Result, TreeError};

/// Coverage ledger for tiling checks
///
/// As a [`Walker`] it marks every canonical node on the way down and
/// remembers the first one that overlapped earlier coverage.
#[derive(Debug, Clone)]
pub struct CoverageLedger {
    /// Coverage bitvector (1 bit per leaf)
    covered: BitVec,

    /// First overlapping node seen by a walk
    overlap: Option<Key>,
}

impl CoverageLedger {
    /// Create an empty ledger for `root_width` leaves
    pub fn new(root_width: u32) -> Self {
        Self {
            covered: bitvec![0; root_width as usize],
            overlap: None,
        }
    }

    /// Mark the leaves of `key` covered.
    ///
    /// Nothing is marked if the node overlaps existing coverage.
    ///
    /// # Errors
    ///
    /// [`TreeError::OutOfBounds`] past the domain, [`TreeError::Overlap`] if
    /// any leaf was already covered.
    pub fn mark(&mut self, key: Key) -> Result<()> {
        let range = self.leaves(key)?;
        if self.covered[range.clone()].any() {
            return Err(TreeError::Overlap { key });
        }
        self.covered[range].fill(true);
        Ok(())
    }

    /// Whether every leaf of `key` is covered
    pub fn is_covered(&self, key: Key) -> bool {
        self.leaves(key)
            .map(|range| self.covered[range].all())
            .unwrap_or(false)
    }

    /// First overlap recorded by a walk
    pub fn overlap(&self) -> Option<Key> {
        self.overlap
    }

    /// Number of covered leaves
    pub fn covered_count(&self) -> usize {
        self.covered.count_ones()
    }

    /// True iff exactly the leaves `[left, right]` are covered, once each
    pub fn covers_exactly(&self, left: u32, right: u32) -> bool {
        if self.overlap.is_some() || left > right || right as usize >= self.covered.len() {
            return false;
        }
        let (left, right) = (left as usize, right as usize);
        self.covered[left..=right].all() && self.covered_count() == right - left + 1
    }

    /// Forget all coverage
    pub fn clear(&mut self) {
        self.covered.fill(false);
        self.overlap = None;
    }

    fn leaves(&self, key: Key) -> Result<std::ops::Range<usize>> {
        if key.is_empty() || key.high() as usize >= self.covered.len() {
            return Err(TreeError::OutOfBounds {
                index: key.high(),
                root_width: self.covered.len() as u32,
            });
        }
        Ok(key.low() as usize..key.high() as usize + 1)
    }
}

impl Walker for CoverageLedger {
    fn down(&mut self, key: Key, canonical: bool) {
        if !canonical {
            return;
        }
        if let Err(TreeError::Overlap { key }) = self.mark(key) {
            self.overlap.get_or_insert(key);
        }
    }

    fn up(&mut self, _key: Key, _canonical: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_overlap() {
        let mut ledger = CoverageLedger::new(16);
        ledger.mark(Key::new(4, 4)).expect("fresh leaves");
        assert!(ledger.is_covered(Key::new(4, 2)));
        assert!(!ledger.is_covered(Key::new(0, 8)));

        assert_eq!(
            ledger.mark(Key::new(0, 8)),
            Err(TreeError::Overlap {
                key: Key::new(0, 8)
            })
        );
        // a rejected mark leaves coverage untouched
        assert_eq!(ledger.covered_count(), 4);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut ledger = CoverageLedger::new(8);
        assert_eq!(
            ledger.mark(Key::new(8, 8)),
            Err(TreeError::OutOfBounds {
                index: 15,
                root_width: 8
            })
        );
        assert!(ledger.mark(Key::EMPTY).is_err());
    }

    #[test]
    fn test_walker_records_first_overlap() {
        let mut ledger = CoverageLedger::new(8);
        ledger.down(Key::new(0, 4), true);
        ledger.down(Key::new(0, 8), false);
        ledger.down(Key::new(2, 2), true);
        ledger.down(Key::leaf(3), true);

        assert_eq!(ledger.overlap(), Some(Key::new(2, 2)));
        assert!(!ledger.covers_exactly(0, 3));

        ledger.clear();
        assert_eq!(ledger.overlap(), None);
        assert_eq!(ledger.covered_count(), 0);
    }

    #[test]
    fn test_covers_exactly() {
        let mut ledger = CoverageLedger::new(8);
        ledger.mark(Key::leaf(3)).expect("fresh");
        ledger.mark(Key::new(4, 2)).expect("fresh");
        assert!(ledger.covers_exactly(3, 5));
        assert!(!ledger.covers_exactly(3, 6));
        assert!(!ledger.covers_exactly(2, 5));
    }
}
