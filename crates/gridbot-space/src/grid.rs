//! N×N square board with row-major cell indices.

use crate::adjacency::Connectivity;
use crate::error::SpaceError;
use gridbot_core::CellIndex;
use smallvec::SmallVec;

/// A square `size`×`size` board.
///
/// Cell `i` sits at `(row, col) = (i / size, i % size)`. Which cells are one
/// step apart is decided by the grid's [`Connectivity`]; edges absorb, so
/// corner cells have fewer neighbours than interior ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareGrid {
    size: u32,
    connectivity: Connectivity,
}

impl SquareGrid {
    /// Largest accepted side length; `MAX_SIZE²` still fits a `u32` index.
    pub const MAX_SIZE: u32 = u16::MAX as u32;

    /// Create a `size`×`size` grid.
    ///
    /// Returns `Err(SpaceError::EmptyGrid)` if `size` is 0, or
    /// `Err(SpaceError::DimensionTooLarge)` if it exceeds [`Self::MAX_SIZE`].
    pub fn new(size: u32, connectivity: Connectivity) -> Result<Self, SpaceError> {
        if size == 0 {
            return Err(SpaceError::EmptyGrid);
        }
        if size > Self::MAX_SIZE {
            return Err(SpaceError::DimensionTooLarge {
                value: size,
                max: Self::MAX_SIZE,
            });
        }
        Ok(Self { size, connectivity })
    }

    /// Side length N.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Neighbourhood rule.
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// Total number of cells, N².
    pub fn cell_count(&self) -> usize {
        (self.size as usize) * (self.size as usize)
    }

    /// Always returns `false`; construction rejects empty grids.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `index` names a cell of this grid.
    pub fn contains(&self, index: CellIndex) -> bool {
        index.as_usize() < self.cell_count()
    }

    /// `(row, col)` of `index`, or `None` when out of range.
    pub fn coord(&self, index: CellIndex) -> Option<(u32, u32)> {
        self.contains(index)
            .then(|| (index.0 / self.size, index.0 % self.size))
    }

    /// `(row, col)` of `index`, or `CellOutOfRange`.
    pub fn check(&self, index: CellIndex) -> Result<(u32, u32), SpaceError> {
        self.coord(index).ok_or(SpaceError::CellOutOfRange {
            index,
            cell_count: self.cell_count(),
        })
    }

    /// Index of `(row, col)`, or `None` when either axis is out of range.
    pub fn index(&self, row: u32, col: u32) -> Option<CellIndex> {
        (row < self.size && col < self.size).then(|| CellIndex(row * self.size + col))
    }

    /// All cells in ascending index order.
    pub fn cells(&self) -> impl Iterator<Item = CellIndex> {
        (0..self.cell_count() as u32).map(CellIndex)
    }

    /// Cells one step away from `index`, in the connectivity's offset order.
    ///
    /// Empty when `index` is out of range.
    pub fn neighbours(&self, index: CellIndex) -> SmallVec<[CellIndex; 8]> {
        let mut out = SmallVec::new();
        let Some((r, c)) = self.coord(index) else {
            return out;
        };
        let n = self.size as i64;
        for &(dr, dc) in self.connectivity.offsets() {
            let nr = r as i64 + dr as i64;
            let nc = c as i64 + dc as i64;
            if (0..n).contains(&nr) && (0..n).contains(&nc) {
                out.push(CellIndex((nr * n + nc) as u32));
            }
        }
        out
    }

    /// Step distance between two cells, or `None` if either is out of range.
    pub fn distance(&self, a: CellIndex, b: CellIndex) -> Option<u32> {
        Some(self.connectivity.distance(self.coord(a)?, self.coord(b)?))
    }

    /// Whether `from → to` is a legal single step on this grid.
    pub fn is_legal_move(&self, from: CellIndex, to: CellIndex) -> bool {
        self.connectivity.is_legal_move(from, to, self.size)
    }

    /// Map a cell of `previous` onto this grid by clamping its row and
    /// column to the new bounds.
    pub fn remap_from(&self, previous: &SquareGrid, index: CellIndex) -> CellIndex {
        let (r, c) = previous.coord(index).unwrap_or((0, 0));
        let last = self.size - 1;
        CellIndex(r.min(last) * self.size + c.min(last))
    }
}
