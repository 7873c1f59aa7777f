//! Strongly-typed identifiers.

use std::fmt;

/// Zero-based linear index of a grid cell: `row * size + col`.
///
/// A `CellIndex` carries no grid size of its own; whether it is in range
/// is decided by the topology it is checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellIndex(pub u32);

impl CellIndex {
    /// The index as a `usize`, for slice indexing.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CellIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies one accepted transition.
///
/// Assigned sequentially by the motion controller when a move is accepted,
/// so a preempted transition and its successor are always distinguishable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(pub u64);

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TransitionId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_index_display_and_from() {
        let c = CellIndex::from(7);
        assert_eq!(c, CellIndex(7));
        assert_eq!(c.to_string(), "7");
        assert_eq!(c.as_usize(), 7usize);
    }

    #[test]
    fn cell_index_orders_by_value() {
        let mut cells = vec![CellIndex(3), CellIndex(0), CellIndex(2)];
        cells.sort();
        assert_eq!(cells, vec![CellIndex(0), CellIndex(2), CellIndex(3)]);
    }

    #[test]
    fn transition_id_display() {
        assert_eq!(TransitionId(42).to_string(), "42");
        assert_eq!(TransitionId::from(1u64), TransitionId(1));
    }
}
