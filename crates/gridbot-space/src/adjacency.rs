//! Single-step move legality.

use gridbot_core::CellIndex;

/// All 8 offsets: N, S, W, E, NW, NE, SW, SE.
const OFFSETS_8: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Cardinal offsets only: N, S, W, E.
const OFFSETS_4: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Which cells count as one step away.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Connectivity {
    /// Cardinal plus diagonal neighbours (Chebyshev distance 1).
    #[default]
    Eight,
    /// Cardinal neighbours only (Manhattan distance 1).
    Four,
}

impl Connectivity {
    /// `(row, col)` offsets of every neighbour, in a fixed order.
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Self::Eight => &OFFSETS_8,
            Self::Four => &OFFSETS_4,
        }
    }

    /// Step distance between two `(row, col)` coordinates under this rule.
    pub fn distance(self, a: (u32, u32), b: (u32, u32)) -> u32 {
        let dr = a.0.abs_diff(b.0);
        let dc = a.1.abs_diff(b.1);
        match self {
            Self::Eight => dr.max(dc),
            Self::Four => dr + dc,
        }
    }

    /// Whether moving `from → to` on a `size`×`size` grid is a legal step.
    ///
    /// Never faults: identical or out-of-range indices are simply illegal.
    pub fn is_legal_move(self, from: CellIndex, to: CellIndex, size: u32) -> bool {
        if from == to {
            return false;
        }
        let cell_count = u64::from(size) * u64::from(size);
        if u64::from(from.0) >= cell_count || u64::from(to.0) >= cell_count {
            return false;
        }
        let a = (from.0 / size, from.0 % size);
        let b = (to.0 / size, to.0 % size);
        self.distance(a, b) == 1
    }
}

/// Whether `from → to` is a legal single step on a `size`×`size` grid.
///
/// Legal iff the cells differ, both are in `[0, size²)`, and their rows and
/// columns each differ by at most one (the eight-neighbourhood).
///
/// # Examples
///
/// ```
/// use gridbot_core::CellIndex;
/// use gridbot_space::is_legal_move;
///
/// // 3×3: centre to corner is a diagonal step.
/// assert!(is_legal_move(CellIndex(4), CellIndex(0), 3));
/// // Opposite corners are two steps apart.
/// assert!(!is_legal_move(CellIndex(0), CellIndex(8), 3));
/// ```
pub fn is_legal_move(from: CellIndex, to: CellIndex, size: u32) -> bool {
    Connectivity::Eight.is_legal_move(from, to, size)
}
