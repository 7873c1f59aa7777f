//! Error types for grid construction and cell lookups.

use gridbot_core::CellIndex;
use std::fmt;

/// Errors arising from grid construction or cell queries.
#[derive(Debug, Clone, PartialEq)]
pub enum SpaceError {
    /// Attempted to construct a grid with zero cells.
    EmptyGrid,
    /// The grid side length is too large for `u32` cell indices.
    DimensionTooLarge {
        /// The requested side length.
        value: u32,
        /// Largest accepted side length.
        max: u32,
    },
    /// A cell index is outside `[0, cell_count)`.
    CellOutOfRange {
        /// The offending index.
        index: CellIndex,
        /// Number of cells in the grid.
        cell_count: usize,
    },
    /// A spacing parameter is negative, zero where it must be positive,
    /// or not finite.
    InvalidSpacing {
        /// Which parameter was rejected.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid must have at least one cell"),
            Self::DimensionTooLarge { value, max } => {
                write!(f, "grid size {value} exceeds maximum of {max}")
            }
            Self::CellOutOfRange { index, cell_count } => {
                write!(f, "cell {index} out of range [0, {cell_count})")
            }
            Self::InvalidSpacing { name, value } => {
                write!(f, "invalid {name}: {value}")
            }
        }
    }
}

impl std::error::Error for SpaceError {}
