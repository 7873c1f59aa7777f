//! World-space placement of grid tiles.
//!
//! The grid is centred on the origin and lies in the `y = 0` plane. Rows
//! advance along world X and columns along world Z. Each axis is offset by
//! `(N - 1) / 2` cells, then scaled by the cell size plus an independent
//! padding term:
//!
//! ```text
//! world = (c - centre) * cell_size + (c - centre) * padding
//! ```

use crate::error::SpaceError;
use crate::grid::SquareGrid;
use glam::Vec3;
use gridbot_core::CellIndex;

/// Tile centres for one grid configuration.
///
/// Positions are computed once at construction; rebuilding with the same
/// parameters reproduces them exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    size: u32,
    cell_size: f32,
    padding: f32,
    positions: Vec<Vec3>,
}

impl GridLayout {
    /// Lay out a `size`×`size` grid.
    ///
    /// `cell_size` must be finite and positive; `padding` finite and
    /// non-negative.
    pub fn new(size: u32, cell_size: f32, padding: f32) -> Result<Self, SpaceError> {
        if size == 0 {
            return Err(SpaceError::EmptyGrid);
        }
        if size > SquareGrid::MAX_SIZE {
            return Err(SpaceError::DimensionTooLarge {
                value: size,
                max: SquareGrid::MAX_SIZE,
            });
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(SpaceError::InvalidSpacing {
                name: "cell_size",
                value: cell_size,
            });
        }
        if !padding.is_finite() || padding < 0.0 {
            return Err(SpaceError::InvalidSpacing {
                name: "padding",
                value: padding,
            });
        }

        let mut positions = Vec::with_capacity((size as usize) * (size as usize));
        for row in 0..size {
            for col in 0..size {
                positions.push(cell_position(row, col, size, cell_size, padding));
            }
        }

        Ok(Self {
            size,
            cell_size,
            padding,
            positions,
        })
    }

    /// Side length N.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Edge length of one tile.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Gap added between neighbouring tiles.
    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Centre-to-centre distance between neighbouring tiles.
    pub fn pitch(&self) -> f32 {
        self.cell_size + self.padding
    }

    /// Centre of tile `index`.
    pub fn position(&self, index: CellIndex) -> Result<Vec3, SpaceError> {
        self.positions
            .get(index.as_usize())
            .copied()
            .ok_or(SpaceError::CellOutOfRange {
                index,
                cell_count: self.positions.len(),
            })
    }

    /// All tile centres in cell-index order.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// The tile whose footprint contains `point`, ignoring its height.
    ///
    /// A tile's footprint is the `cell_size` square around its centre, so
    /// points that land in the padding between tiles select nothing.
    pub fn cell_at(&self, point: Vec3) -> Option<CellIndex> {
        let row = self.axis_cell(point.x)?;
        let col = self.axis_cell(point.z)?;
        Some(CellIndex(row * self.size + col))
    }

    fn axis_cell(&self, world: f32) -> Option<u32> {
        if !world.is_finite() {
            return None;
        }
        let centre = centre_offset(self.size);
        let pitch = self.pitch();
        let c = (world / pitch + centre).round();
        if c < 0.0 || c >= self.size as f32 {
            return None;
        }
        let tile_centre = (c - centre) * pitch;
        ((world - tile_centre).abs() <= self.cell_size * 0.5).then_some(c as u32)
    }
}

fn centre_offset(size: u32) -> f32 {
    (size as f32 - 1.0) * 0.5
}

/// Centre of the tile at `(row, col)` on a `size`×`size` grid.
///
/// Pure; the same inputs always produce the same position.
pub fn cell_position(row: u32, col: u32, size: u32, cell_size: f32, padding: f32) -> Vec3 {
    let centre = centre_offset(size);
    let r = row as f32 - centre;
    let c = col as f32 - centre;
    Vec3::new(r * cell_size + r * padding, 0.0, c * cell_size + c * padding)
}
