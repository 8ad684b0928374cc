//! BMOC: a multi-order coverage map whose cells carry a "fully covered" flag.
//!
//! Cells are stored as single `u64` values sorted in z-order:
//!
//! ```text
//! raw = ((((hash << 1) | 1) << 2 (depth_max - depth)) << 1) | is_full
//! ```
//!
//! The sentinel bit after the hash gives back the cell depth from the number
//! of trailing zeros, and for disjoint cells the raw values sort in the same
//! order as the cells' positions on the z-order curve at `depth_max`.

use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::DEPTH_MAX;

/// Decoded view of one BMOC entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub raw_value: u64,
    pub depth: u8,
    pub hash: u64,
    pub is_full: bool,
}

impl Cell {
    pub fn new(raw_value: u64, depth_max: u8) -> Self {
        let is_full = raw_value & 1 == 1;
        let shifted = raw_value >> 1;
        let delta_depth = (shifted.trailing_zeros() >> 1) as u8;
        Self {
            raw_value,
            depth: depth_max - delta_depth,
            hash: shifted >> ((delta_depth << 1) + 1),
            is_full,
        }
    }

    /// Range of hashes covered by this cell at `depth_max`.
    fn range_at(&self, depth_max: u8) -> Range<u64> {
        let twice_dd = (depth_max - self.depth) << 1;
        (self.hash << twice_dd)..((self.hash + 1) << twice_dd)
    }
}

#[inline]
fn encode(depth: u8, hash: u64, is_full: bool, depth_max: u8) -> u64 {
    let twice_dd = (depth_max - depth) << 1;
    ((((hash << 1) | 1) << twice_dd) << 1) | is_full as u64
}

/// Flat cell description exchanged with callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BmocCell {
    pub ipix: u64,
    pub depth: u8,
    pub fully_covered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BMOC {
    depth_max: u8,
    entries: Box<[u64]>,
}

impl BMOC {
    pub fn new_empty(depth_max: u8) -> Self {
        Self {
            depth_max,
            entries: Box::new([]),
        }
    }

    /// The 12 base cells, all full.
    pub fn new_allsky(depth_max: u8) -> Self {
        let mut builder = BMOCBuilder::new(depth_max, 12);
        for d0h in 0..12 {
            builder.push(0, d0h, true);
        }
        builder.to_bmoc()
    }

    pub fn depth_max(&self) -> u8 {
        self.depth_max
    }

    /// Number of stored cells.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn raw_values(&self) -> &[u64] {
        &self.entries
    }

    pub fn cell(&self, index: usize) -> Cell {
        Cell::new(self.entries[index], self.depth_max)
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.entries.iter().map(move |&raw| Cell::new(raw, self.depth_max))
    }

    /// Number of cells once every cell is expressed at `depth_max`.
    pub fn deep_size(&self) -> u64 {
        self.iter()
            .map(|c| 1u64 << ((self.depth_max - c.depth) << 1))
            .sum()
    }

    /// All hashes at `depth_max`, in increasing order.
    pub fn flat_iter(&self) -> impl Iterator<Item = u64> + '_ {
        let depth_max = self.depth_max;
        self.iter().flat_map(move |c| c.range_at(depth_max))
    }

    /// All cells at `depth_max`, each carrying the flag of its parent entry.
    pub fn flat_iter_cell(&self) -> impl Iterator<Item = Cell> + '_ {
        let depth_max = self.depth_max;
        self.iter().flat_map(move |c| {
            c.range_at(depth_max).map(move |hash| Cell {
                raw_value: encode(depth_max, hash, c.is_full, depth_max),
                depth: depth_max,
                hash,
                is_full: c.is_full,
            })
        })
    }

    /// Cells as [`BmocCell`]s: at their own depth, or all at `depth_max`
    /// when `flat` is set.
    pub fn to_cells(&self, flat: bool) -> Vec<BmocCell> {
        let to_cell = |c: Cell| BmocCell {
            ipix: c.hash,
            depth: c.depth,
            fully_covered: c.is_full,
        };
        if flat {
            self.flat_iter_cell().map(to_cell).collect()
        } else {
            self.iter().map(to_cell).collect()
        }
    }

    /// Status of the given cell: `None` if outside, `Some(true)` if it lies
    /// inside a full entry, `Some(false)` if it overlaps the coverage only
    /// partially or through a partial entry.
    pub fn contains_cell(&self, depth: u8, hash: u64) -> Option<bool> {
        let (lo, hi) = if depth >= self.depth_max {
            let h = hash >> ((depth - self.depth_max) << 1);
            (h, h + 1)
        } else {
            let twice_dd = (self.depth_max - depth) << 1;
            (hash << twice_dd, (hash + 1) << twice_dd)
        };
        let idx = self
            .entries
            .partition_point(|&raw| Cell::new(raw, self.depth_max).range_at(self.depth_max).end <= lo);
        let cell = self.entries.get(idx).map(|&raw| Cell::new(raw, self.depth_max))?;
        let range = cell.range_at(self.depth_max);
        if range.start >= hi {
            return None;
        }
        Some(cell.is_full && range.start <= lo && hi <= range.end)
    }

    /// Merges every group of 4 full siblings into their full parent,
    /// recursively.
    pub fn pack(&self) -> Self {
        let mut stack: Vec<Cell> = Vec::with_capacity(self.entries.len());
        for cell in self.iter() {
            stack.push(cell);
            while let Some(parent) = self.mergeable_parent(&stack) {
                stack.truncate(stack.len() - 4);
                stack.push(parent);
            }
        }
        Self {
            depth_max: self.depth_max,
            entries: stack.into_iter().map(|c| c.raw_value).collect(),
        }
    }

    fn mergeable_parent(&self, stack: &[Cell]) -> Option<Cell> {
        let n = stack.len();
        if n < 4 {
            return None;
        }
        let last = &stack[n - 4..];
        let depth = last[0].depth;
        if depth == 0 || last[0].hash & 3 != 0 {
            return None;
        }
        let siblings = last.iter().enumerate().all(|(k, c)| {
            c.is_full && c.depth == depth && c.hash == last[0].hash + k as u64
        });
        if !siblings {
            return None;
        }
        let hash = last[0].hash >> 2;
        Some(Cell {
            raw_value: encode(depth - 1, hash, true, self.depth_max),
            depth: depth - 1,
            hash,
            is_full: true,
        })
    }

    /// Lowers the resolution to `depth`: deeper cells are replaced by their
    /// ancestor at `depth`, flagged partial.
    pub fn degrade(&self, depth: u8) -> Self {
        if depth >= self.depth_max {
            return self.clone();
        }
        let mut entries: Vec<u64> = Vec::with_capacity(self.entries.len());
        for cell in self.iter() {
            let raw = if cell.depth > depth {
                let hash = cell.hash >> ((cell.depth - depth) << 1);
                encode(depth, hash, false, depth)
            } else {
                encode(cell.depth, cell.hash, cell.is_full, depth)
            };
            if entries.last() != Some(&raw) {
                entries.push(raw);
            }
        }
        Self {
            depth_max: depth,
            entries: entries.into_boxed_slice(),
        }
    }
}

/// Accumulates cells before sorting and packing them into a [`BMOC`].
#[derive(Debug)]
pub struct BMOCBuilder {
    depth_max: u8,
    entries: Vec<u64>,
}

impl BMOCBuilder {
    pub fn new(depth_max: u8, capacity: usize) -> Self {
        debug_assert!(depth_max <= DEPTH_MAX);
        Self {
            depth_max,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Adds a cell. Cells must not overlap.
    pub fn push(&mut self, depth: u8, hash: u64, is_full: bool) -> &mut Self {
        debug_assert!(depth <= self.depth_max);
        self.entries.push(encode(depth, hash, is_full, self.depth_max));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted and packed BMOC.
    pub fn to_bmoc(mut self) -> BMOC {
        self.entries.sort_unstable();
        BMOC {
            depth_max: self.depth_max,
            entries: self.entries.into_boxed_slice(),
        }
        .pack()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_value_round_trip() {
        let depth_max = 10;
        for &(depth, hash, full) in &[(0u8, 0u64, true), (0, 11, false), (3, 500, true), (10, 12 * (1 << 20) - 1, false)] {
            let cell = Cell::new(encode(depth, hash, full, depth_max), depth_max);
            assert_eq!((cell.depth, cell.hash, cell.is_full), (depth, hash, full));
        }
        assert_eq!(Cell::new(encode(DEPTH_MAX, (12 << 58) - 1, true, DEPTH_MAX), DEPTH_MAX).hash, (12 << 58) - 1);
    }

    #[test]
    fn test_pack_merges_full_siblings() {
        let mut builder = BMOCBuilder::new(3, 8);
        for h in 16..20 {
            builder.push(2, h, true);
        }
        builder.push(2, 20, false);
        let bmoc = builder.to_bmoc();
        let cells: Vec<_> = bmoc.iter().map(|c| (c.depth, c.hash, c.is_full)).collect();
        assert_eq!(cells, vec![(1, 4, true), (2, 20, false)]);
    }

    #[test]
    fn test_pack_is_recursive() {
        let mut builder = BMOCBuilder::new(2, 16);
        for h in (0..16).rev() {
            builder.push(2, h, true);
        }
        let bmoc = builder.to_bmoc();
        assert_eq!(bmoc.size(), 1);
        assert_eq!(bmoc.cell(0).depth, 0);
        assert_eq!(bmoc.cell(0).hash, 0);
        assert_eq!(bmoc.deep_size(), 16);
    }

    #[test]
    fn test_pack_keeps_partial_siblings() {
        let mut builder = BMOCBuilder::new(1, 4);
        builder.push(1, 0, true).push(1, 1, true).push(1, 2, false).push(1, 3, true);
        assert_eq!(builder.to_bmoc().size(), 4);
    }

    #[test]
    fn test_flat_size_matches_deep_size() {
        let mut builder = BMOCBuilder::new(3, 4);
        builder.push(0, 2, true).push(2, 100, false).push(3, 7, true);
        let bmoc = builder.to_bmoc();
        let flat: Vec<u64> = bmoc.flat_iter().collect();
        assert_eq!(flat.len() as u64, bmoc.deep_size());
        assert_eq!(flat.len(), 1 + 4 + 64);
        assert!(flat.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(bmoc.to_cells(true).len(), flat.len());
        assert_eq!(bmoc.to_cells(false).len(), 3);
    }

    #[test]
    fn test_degrade() {
        let mut builder = BMOCBuilder::new(4, 8);
        builder.push(1, 0, true).push(4, 300, true).push(4, 301, false).push(3, 200, true);
        let bmoc = builder.to_bmoc().degrade(2);
        assert_eq!(bmoc.depth_max(), 2);
        let cells: Vec<_> = bmoc.iter().map(|c| (c.depth, c.hash, c.is_full)).collect();
        assert_eq!(cells, vec![(1, 0, true), (2, 18, false), (2, 50, false)]);
    }

    #[test]
    fn test_contains_cell() {
        let mut builder = BMOCBuilder::new(3, 2);
        builder.push(1, 5, true).push(3, 400, false);
        let bmoc = builder.to_bmoc();
        assert_eq!(bmoc.contains_cell(1, 5), Some(true));
        assert_eq!(bmoc.contains_cell(2, 21), Some(true));
        assert_eq!(bmoc.contains_cell(0, 1), Some(false));
        assert_eq!(bmoc.contains_cell(3, 400), Some(false));
        assert_eq!(bmoc.contains_cell(3, 401), None);
        assert_eq!(bmoc.contains_cell(0, 11), None);
    }

    #[test]
    fn test_allsky() {
        let bmoc = BMOC::new_allsky(5);
        assert_eq!(bmoc.size(), 12);
        assert_eq!(bmoc.deep_size(), 12 << 10);
        assert!(bmoc.iter().all(|c| c.is_full && c.depth == 0));
    }
}
