//! Per-cell highlight and scale state.
//!
//! [`TileRegistry`] holds the desired presentation of every tile as plain
//! data. A renderer reads it each frame (or consumes
//! [`take_changes()`](TileRegistry::take_changes) for incremental updates);
//! nothing in the registry touches rendering directly.
//!
//! # Deferred refresh
//!
//! After the grid is (re)generated, highlighting the agent's neighbours can
//! be delayed so the layout settles first. At most one refresh is pending:
//! scheduling a new one replaces the old one, and an immediate refresh
//! cancels it.

use std::error::Error;
use std::fmt;

use gridbot_core::CellIndex;
use gridbot_space::SquareGrid;

/// Desired presentation of one tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileState {
    /// Whether the tile is shown as a selectable destination.
    pub highlighted: bool,
    /// Uniform scale of the tile.
    pub scale: f32,
}

/// Errors from explicit tile mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileError {
    /// The index does not name a tile.
    OutOfRange {
        /// The offending index.
        index: CellIndex,
        /// Number of tiles in the registry.
        cell_count: usize,
    },
    /// The registry has not been generated yet.
    NotConfigured,
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, cell_count } => {
                write!(f, "tile {index} out of range [0, {cell_count})")
            }
            Self::NotConfigured => write!(f, "tile registry not generated"),
        }
    }
}

impl Error for TileError {}

/// One tile per grid cell, plus the pending-refresh timer.
#[derive(Debug, Default)]
pub struct TileRegistry {
    tiles: Vec<TileState>,
    dirty: Vec<bool>,
    base_scale: f32,
    /// Seconds left before the pending refresh fires.
    pending: Option<f32>,
    refresh_count: u64,
}

impl TileRegistry {
    /// A registry of `cell_count` unhighlighted tiles at `base_scale`.
    pub fn new(cell_count: usize, base_scale: f32) -> Self {
        let mut registry = Self::default();
        registry.regenerate(cell_count, base_scale);
        registry
    }

    /// Replace every tile with a fresh, unhighlighted one.
    ///
    /// Cancels any pending refresh and marks every tile changed.
    pub fn regenerate(&mut self, cell_count: usize, base_scale: f32) {
        self.tiles = vec![
            TileState {
                highlighted: false,
                scale: base_scale,
            };
            cell_count
        ];
        self.dirty = vec![true; cell_count];
        self.base_scale = base_scale;
        self.pending = None;
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the registry has no tiles (not generated yet).
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Resting scale of every tile.
    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }

    /// All tiles in cell-index order.
    pub fn tiles(&self) -> &[TileState] {
        &self.tiles
    }

    /// State of tile `index`, if it exists.
    pub fn get(&self, index: CellIndex) -> Option<&TileState> {
        self.tiles.get(index.as_usize())
    }

    /// Whether tile `index` is highlighted. Out-of-range tiles are not.
    pub fn is_highlighted(&self, index: CellIndex) -> bool {
        self.get(index).is_some_and(|t| t.highlighted)
    }

    /// Highlighted cells in ascending order.
    pub fn highlighted(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.highlighted)
            .map(|(i, _)| CellIndex(i as u32))
    }

    /// Set one tile's highlight flag.
    pub fn set_highlight(&mut self, index: CellIndex, highlighted: bool) -> Result<(), TileError> {
        self.check(index)?;
        self.write_highlight(index.as_usize(), highlighted);
        Ok(())
    }

    /// Set one tile's scale.
    pub fn set_scale(&mut self, index: CellIndex, scale: f32) -> Result<(), TileError> {
        self.check(index)?;
        self.write_scale(index.as_usize(), scale);
        Ok(())
    }

    /// Highlight exactly the legal destinations from `from`.
    ///
    /// Every tile `x` ends up with `highlighted == grid.is_legal_move(from, x)`.
    /// Cancels any pending refresh.
    pub fn refresh_highlights(&mut self, from: CellIndex, grid: &SquareGrid) {
        self.pending = None;
        for i in 0..self.tiles.len() {
            let legal = grid.is_legal_move(from, CellIndex(i as u32));
            self.write_highlight(i, legal);
        }
        self.refresh_count += 1;
        log::trace!("highlighted neighbours of cell {from}");
    }

    /// Clear every highlight.
    pub fn clear_all(&mut self) {
        for i in 0..self.tiles.len() {
            self.write_highlight(i, false);
        }
    }

    /// Request a refresh `delay` seconds from now, replacing any pending one.
    ///
    /// A non-positive delay refreshes from `from` immediately. A delayed
    /// refresh uses whichever cell is passed to [`advance()`](Self::advance)
    /// when it fires.
    pub fn schedule_refresh(&mut self, delay: f32, from: CellIndex, grid: &SquareGrid) {
        if delay > 0.0 {
            self.pending = Some(delay);
        } else {
            self.refresh_highlights(from, grid);
        }
    }

    /// Whether a deferred refresh is waiting.
    pub fn has_pending_refresh(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending refresh, if any.
    pub fn cancel_pending_refresh(&mut self) {
        self.pending = None;
    }

    /// Advance the refresh timer by `dt`; fire it from `current` when due.
    ///
    /// Returns `true` if a refresh ran.
    pub fn advance(&mut self, dt: f32, current: CellIndex, grid: &SquareGrid) -> bool {
        let Some(remaining) = self.pending.as_mut() else {
            return false;
        };
        *remaining -= dt;
        if *remaining > 0.0 {
            return false;
        }
        self.refresh_highlights(current, grid);
        true
    }

    /// Number of mass refreshes performed so far.
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    /// Cells whose highlight or scale changed since the last call.
    pub fn take_changes(&mut self) -> Vec<CellIndex> {
        let mut changed = Vec::new();
        for (i, d) in self.dirty.iter_mut().enumerate() {
            if std::mem::take(d) {
                changed.push(CellIndex(i as u32));
            }
        }
        changed
    }

    // ── Crate-internal feedback used by the motion controller ──────

    /// Multiply tile `index`'s resting scale by `factor`.
    pub(crate) fn pulse(&mut self, index: CellIndex, factor: f32) {
        if index.as_usize() < self.tiles.len() {
            self.write_scale(index.as_usize(), self.base_scale * factor);
        }
    }

    /// Return tile `index` to its resting scale.
    pub(crate) fn restore_scale(&mut self, index: CellIndex) {
        if index.as_usize() < self.tiles.len() {
            self.write_scale(index.as_usize(), self.base_scale);
        }
    }

    /// Set a highlight on a tile already known to exist.
    pub(crate) fn force_highlight(&mut self, index: CellIndex, highlighted: bool) {
        if index.as_usize() < self.tiles.len() {
            self.write_highlight(index.as_usize(), highlighted);
        }
    }

    fn check(&self, index: CellIndex) -> Result<(), TileError> {
        if self.tiles.is_empty() {
            return Err(TileError::NotConfigured);
        }
        if index.as_usize() >= self.tiles.len() {
            return Err(TileError::OutOfRange {
                index,
                cell_count: self.tiles.len(),
            });
        }
        Ok(())
    }

    fn write_highlight(&mut self, i: usize, highlighted: bool) {
        let tile = &mut self.tiles[i];
        if tile.highlighted != highlighted {
            tile.highlighted = highlighted;
            self.dirty[i] = true;
        }
    }

    fn write_scale(&mut self, i: usize, scale: f32) {
        let tile = &mut self.tiles[i];
        if tile.scale != scale {
            tile.scale = scale;
            self.dirty[i] = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbot_space::Connectivity;
    use proptest::prelude::*;

    fn grid(size: u32) -> SquareGrid {
        SquareGrid::new(size, Connectivity::Eight).unwrap()
    }

    fn highlighted(r: &TileRegistry) -> Vec<u32> {
        r.highlighted().map(|c| c.0).collect()
    }

    // ── Explicit mutation ───────────────────────────────────────

    #[test]
    fn new_registry_is_dark_at_base_scale() {
        let r = TileRegistry::new(9, 2.0);
        assert_eq!(r.len(), 9);
        assert!(r.tiles().iter().all(|t| !t.highlighted && t.scale == 2.0));
    }

    #[test]
    fn set_highlight_out_of_range_fails() {
        let mut r = TileRegistry::new(4, 1.0);
        assert_eq!(
            r.set_highlight(CellIndex(4), true),
            Err(TileError::OutOfRange {
                index: CellIndex(4),
                cell_count: 4
            })
        );
        assert!(r.set_highlight(CellIndex(3), true).is_ok());
        assert!(r.is_highlighted(CellIndex(3)));
    }

    #[test]
    fn ungenerated_registry_is_not_configured() {
        let mut r = TileRegistry::default();
        assert!(r.is_empty());
        assert_eq!(
            r.set_highlight(CellIndex(0), true),
            Err(TileError::NotConfigured)
        );
        assert_eq!(r.set_scale(CellIndex(0), 1.0), Err(TileError::NotConfigured));
    }

    // ── Refresh ─────────────────────────────────────────────────

    #[test]
    fn refresh_from_corner_of_three_by_three() {
        let g = grid(3);
        let mut r = TileRegistry::new(9, 1.0);
        r.refresh_highlights(CellIndex(0), &g);
        assert_eq!(highlighted(&r), vec![1, 3, 4]);
        r.refresh_highlights(CellIndex(4), &g);
        assert_eq!(highlighted(&r), vec![0, 1, 2, 3, 5, 6, 7, 8]);
        assert_eq!(r.refresh_count(), 2);
    }

    #[test]
    fn clear_all_turns_everything_off() {
        let g = grid(3);
        let mut r = TileRegistry::new(9, 1.0);
        r.refresh_highlights(CellIndex(4), &g);
        r.clear_all();
        assert_eq!(highlighted(&r), Vec::<u32>::new());
    }

    // ── Deferred refresh ────────────────────────────────────────

    #[test]
    fn deferred_refresh_fires_after_delay() {
        let g = grid(3);
        let mut r = TileRegistry::new(9, 1.0);
        r.schedule_refresh(0.25, CellIndex(0), &g);
        assert!(r.has_pending_refresh());
        assert!(!r.advance(0.1, CellIndex(4), &g));
        assert_eq!(highlighted(&r), Vec::<u32>::new());
        assert!(r.advance(0.2, CellIndex(4), &g));
        assert!(!r.has_pending_refresh());
        // Fires from the cell current at fire time.
        assert_eq!(highlighted(&r).len(), 8);
    }

    #[test]
    fn newer_schedule_supersedes_pending() {
        let g = grid(2);
        let mut r = TileRegistry::new(4, 1.0);
        r.schedule_refresh(0.25, CellIndex(0), &g);
        assert!(!r.advance(0.2, CellIndex(0), &g));
        r.schedule_refresh(0.25, CellIndex(0), &g);
        assert!(!r.advance(0.2, CellIndex(0), &g));
        assert!(r.advance(0.1, CellIndex(0), &g));
        assert!(!r.advance(1.0, CellIndex(0), &g));
        assert_eq!(r.refresh_count(), 1);
    }

    #[test]
    fn zero_delay_refreshes_immediately() {
        let g = grid(2);
        let mut r = TileRegistry::new(4, 1.0);
        r.schedule_refresh(0.0, CellIndex(0), &g);
        assert!(!r.has_pending_refresh());
        assert_eq!(highlighted(&r), vec![1, 2, 3]);
    }

    #[test]
    fn regenerate_cancels_pending() {
        let g = grid(2);
        let mut r = TileRegistry::new(4, 1.0);
        r.schedule_refresh(0.5, CellIndex(0), &g);
        r.regenerate(9, 1.5);
        assert!(!r.has_pending_refresh());
        assert_eq!(r.len(), 9);
        assert_eq!(r.base_scale(), 1.5);
    }

    // ── Change tracking ─────────────────────────────────────────

    #[test]
    fn take_changes_reports_only_modified_tiles() {
        let g = grid(3);
        let mut r = TileRegistry::new(9, 1.0);
        assert_eq!(r.take_changes().len(), 9);
        assert!(r.take_changes().is_empty());
        r.refresh_highlights(CellIndex(0), &g);
        assert_eq!(
            r.take_changes(),
            vec![CellIndex(1), CellIndex(3), CellIndex(4)]
        );
        r.pulse(CellIndex(8), 1.1);
        r.set_highlight(CellIndex(1), true).unwrap();
        assert_eq!(r.take_changes(), vec![CellIndex(8)]);
        r.restore_scale(CellIndex(8));
        assert_eq!(r.get(CellIndex(8)).unwrap().scale, 1.0);
    }

    // ── Property tests ──────────────────────────────────────────

    proptest! {
        #[test]
        fn refresh_matches_legality(size in 1u32..8, from in 0u32..64) {
            let g = grid(size);
            let from = CellIndex(from % g.cell_count() as u32);
            let mut r = TileRegistry::new(g.cell_count(), 1.0);
            r.refresh_highlights(from, &g);
            for cell in g.cells() {
                prop_assert_eq!(r.is_highlighted(cell), g.is_legal_move(from, cell));
            }
        }
    }
}
