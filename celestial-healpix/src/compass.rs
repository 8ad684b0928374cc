//! Compass directions around a cell.
//!
//! [`MainWind`] lists the 9 positions of the 3x3 block centered on a cell, in
//! the order `[S, SE, E, SW, C, NE, W, NW, N]`. The index of a direction is
//! `4 + di + 3 dj` where `(di, dj)` is the base-cell frame offset
//! (`i` toward the East vertex, `j` toward the West vertex) rotated so that
//! `S = (-1, -1)` and `N = (1, 1)`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the 8 neighbour directions plus the center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MainWind {
    S,
    SE,
    E,
    SW,
    C,
    NE,
    W,
    NW,
    N,
}

impl MainWind {
    pub const ALL: [MainWind; 9] = [
        MainWind::S,
        MainWind::SE,
        MainWind::E,
        MainWind::SW,
        MainWind::C,
        MainWind::NE,
        MainWind::W,
        MainWind::NW,
        MainWind::N,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Offset `(di, dj)` in the base-cell frame.
    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            MainWind::S => (-1, -1),
            MainWind::SE => (0, -1),
            MainWind::E => (1, -1),
            MainWind::SW => (-1, 0),
            MainWind::C => (0, 0),
            MainWind::NE => (1, 0),
            MainWind::W => (-1, 1),
            MainWind::NW => (0, 1),
            MainWind::N => (1, 1),
        }
    }

    /// Direction of an offset with components in {-1, 0, 1}.
    #[inline]
    pub fn from_offset(di: i32, dj: i32) -> Option<Self> {
        if !(-1..=1).contains(&di) || !(-1..=1).contains(&dj) {
            return None;
        }
        Self::from_index((4 + di + 3 * dj) as usize)
    }

    #[inline]
    pub fn opposite(self) -> Self {
        let (di, dj) = self.offset();
        Self::ALL[(4 - di - 3 * dj) as usize]
    }
}

/// The 4 vertices of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Cardinal {
    S,
    E,
    N,
    W,
}

impl Cardinal {
    /// Counter-clockwise order starting from the South vertex.
    pub const ALL: [Cardinal; 4] = [Cardinal::S, Cardinal::E, Cardinal::N, Cardinal::W];

    /// `(dx, dy)` offset of the vertex inside its cell.
    #[inline]
    pub fn offset(self) -> (f64, f64) {
        match self {
            Cardinal::S => (0.0, 0.0),
            Cardinal::E => (1.0, 0.0),
            Cardinal::N => (1.0, 1.0),
            Cardinal::W => (0.0, 1.0),
        }
    }

    /// Next vertex, counter-clockwise on the sky seen from inside the sphere.
    #[inline]
    pub fn next(self) -> Self {
        match self {
            Cardinal::S => Cardinal::E,
            Cardinal::E => Cardinal::N,
            Cardinal::N => Cardinal::W,
            Cardinal::W => Cardinal::S,
        }
    }
}

/// Neighbours of a cell, indexed by [`MainWind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Neighbours {
    cells: [Option<u64>; 9],
}

impl Neighbours {
    pub(crate) fn set(&mut self, direction: MainWind, hash: u64) {
        self.cells[direction.index()] = Some(hash);
    }

    #[inline]
    pub fn get(&self, direction: MainWind) -> Option<u64> {
        self.cells[direction.index()]
    }

    /// Present neighbours (and the center when it was requested), in [`MainWind`] order.
    pub fn iter(&self) -> impl Iterator<Item = (MainWind, u64)> + '_ {
        MainWind::ALL
            .iter()
            .filter_map(move |&d| self.get(d).map(|h| (d, h)))
    }

    /// Number of present entries.
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat row with `-1` for missing entries.
    pub fn to_i64_row(&self) -> [i64; 9] {
        let mut row = [-1i64; 9];
        for (slot, cell) in row.iter_mut().zip(self.cells.iter()) {
            if let Some(h) = cell {
                *slot = *h as i64;
            }
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_index_round_trip() {
        for (i, d) in MainWind::ALL.iter().enumerate() {
            assert_eq!(d.index(), i);
            let (di, dj) = d.offset();
            assert_eq!(MainWind::from_offset(di, dj), Some(*d));
        }
        assert_eq!(MainWind::from_offset(2, 0), None);
    }

    #[test]
    fn test_opposite() {
        assert_eq!(MainWind::S.opposite(), MainWind::N);
        assert_eq!(MainWind::E.opposite(), MainWind::W);
        assert_eq!(MainWind::SE.opposite(), MainWind::NW);
        assert_eq!(MainWind::C.opposite(), MainWind::C);
    }

    #[test]
    fn test_cardinal_cycle() {
        let mut c = Cardinal::S;
        for expected in [Cardinal::E, Cardinal::N, Cardinal::W, Cardinal::S] {
            c = c.next();
            assert_eq!(c, expected);
        }
    }

    #[test]
    fn test_neighbours_row() {
        let mut n = Neighbours::default();
        assert!(n.is_empty());
        n.set(MainWind::C, 7);
        n.set(MainWind::N, 3);
        assert_eq!(n.len(), 2);
        assert_eq!(n.to_i64_row(), [-1, -1, -1, -1, 7, -1, -1, -1, 3]);
        let collected: Vec<_> = n.iter().collect();
        assert_eq!(collected, vec![(MainWind::C, 7), (MainWind::N, 3)]);
    }
}
