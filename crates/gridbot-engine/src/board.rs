//! The top-level board: grid, tiles, agent, and command routing.
//!
//! [`Board`] is the primary user-facing API. It is driven by an external
//! frame loop: call [`frame()`](Board::frame) once per rendered frame with
//! the elapsed time. Commands reach the agent either immediately through
//! [`request_move()`](Board::request_move) and friends, or through a
//! [`CommandHandle`] whose queue is drained at the start of each frame.
//!
//! Arrival order holds across producers: a direct command first routes
//! everything already waiting in the queue, so it can never overtake an
//! earlier queued command.
//!
//! # Frame order
//!
//! 1. drain queued commands, oldest first, routing each
//! 2. advance the clock
//! 3. tick the in-flight transition
//! 4. advance the deferred highlight refresh
//!
//! # Ownership model
//!
//! `Board` is [`Send`] but takes `&mut self` for every mutation; there is
//! no interior locking. Other threads interact only through handles.

use glam::Vec3;
use gridbot_core::{Animator, CellIndex, CommandSource, MoveCommand, NullAnimator, Pose, Receipt};
use gridbot_space::{GridLayout, SquareGrid};

use crate::config::{BoardConfig, ConfigError};
use crate::metrics::BoardMetrics;
use crate::motion::{MotionContext, MotionController, MotionEvent, MotionState, Transition};
use crate::router::{CommandHandle, CommandRouter};
use crate::tiles::{TileRegistry, TileState};

// Compile-time assertion: Board can be moved to a render thread.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<Board>();
    }
};

// ── FrameReport ─────────────────────────────────────────────────

/// What happened during one [`Board::frame()`] call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Receipts for queued commands routed since the previous frame,
    /// oldest first.
    ///
    /// This includes queued commands flushed ahead of a direct submission.
    /// Commands routed directly through [`Board::submit`] return their
    /// receipt to the caller and do not appear here.
    pub receipts: Vec<Receipt>,
    /// Motion events since the previous frame, including those caused by
    /// direct submissions made between frames.
    pub events: Vec<MotionEvent>,
    /// Whether any mass highlight refresh ran this frame.
    pub highlights_refreshed: bool,
}

// ── Board ───────────────────────────────────────────────────────

/// A square grid with one agent moving between neighbouring cells.
///
/// # Example
///
/// ```
/// use gridbot_core::CellIndex;
/// use gridbot_engine::{Board, BoardConfig};
///
/// let mut config = BoardConfig::with_size(3);
/// config.start_cell = CellIndex(4);
/// let mut board = Board::new(config).unwrap();
///
/// assert!(board.request_move(CellIndex(0)));
/// while board.transition().is_some() {
///     board.frame(1.0 / 60.0);
/// }
/// assert_eq!(board.current_cell(), CellIndex(0));
/// assert!(!board.request_move(CellIndex(8)));
/// ```
pub struct Board {
    config: BoardConfig,
    grid: SquareGrid,
    layout: GridLayout,
    tiles: TileRegistry,
    motion: MotionController,
    router: CommandRouter,
    animator: Box<dyn Animator + Send>,
    clock: f64,
    metrics: BoardMetrics,
    /// Receipts of queued commands flushed by direct submissions.
    queued_receipts: Vec<Receipt>,
}

impl Board {
    /// Create a board with no animation collaborator.
    pub fn new(config: BoardConfig) -> Result<Self, ConfigError> {
        Self::with_animator(config, Box::new(NullAnimator))
    }

    /// Create a board that reports walking state to `animator`.
    ///
    /// Validates `config`, lays out the grid, places the agent on its start
    /// cell, and schedules the first highlight refresh after the configured
    /// delay.
    pub fn with_animator(
        config: BoardConfig,
        animator: Box<dyn Animator + Send>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let (grid, layout) = config.grid.build()?;
        let start = config.start_cell;
        let pose = Pose::at(layout.position(start)?);

        let mut tiles = TileRegistry::new(grid.cell_count(), config.grid.cell_size);
        tiles.schedule_refresh(config.highlight_delay, start, &grid);

        log::info!(
            "board generated: {n}x{n} grid, agent at cell {start}",
            n = grid.size()
        );
        Ok(Self {
            motion: MotionController::new(config.motion.clone(), start, pose),
            router: CommandRouter::new(config.max_pending_commands, grid.cell_count()),
            metrics: BoardMetrics {
                highlight_refreshes: tiles.refresh_count(),
                ..BoardMetrics::default()
            },
            config,
            grid,
            layout,
            tiles,
            animator,
            clock: 0.0,
            queued_receipts: Vec::new(),
        })
    }

    // ── Commands ────────────────────────────────────────────────

    /// Route `command` now.
    ///
    /// Commands already waiting in the queue arrived first, so they are
    /// routed before `command`.
    pub fn submit(&mut self, command: MoveCommand) -> Receipt {
        self.flush_queue();
        self.route(command)
    }

    fn flush_queue(&mut self) {
        for command in self.router.drain() {
            let receipt = self.route(command);
            self.queued_receipts.push(receipt);
        }
    }

    fn route(&mut self, command: MoveCommand) -> Receipt {
        let mut ctx = MotionContext {
            grid: &self.grid,
            layout: &self.layout,
            tiles: &mut self.tiles,
            animator: &mut *self.animator,
        };
        let receipt = self.router.route(command, &mut self.motion, &mut ctx);
        self.metrics.record_receipt(&receipt);
        receipt
    }

    /// Move the agent to `target` if it is a neighbour of the current cell.
    ///
    /// Returns whether the move was accepted. A rejected move has no side
    /// effect.
    pub fn request_move(&mut self, target: CellIndex) -> bool {
        self.submit(MoveCommand::new(target, CommandSource::Direct))
            .is_accepted()
    }

    /// Route a pointer selection of `target`.
    pub fn select_cell(&mut self, target: CellIndex) -> Receipt {
        self.submit(MoveCommand::new(target, CommandSource::Pointer))
    }

    /// Route a pointer hit at world-space `point` on the grid plane.
    ///
    /// Returns `None` when the point is not over a tile.
    pub fn select_at(&mut self, point: Vec3) -> Option<Receipt> {
        let target = self.layout.cell_at(point)?;
        Some(self.select_cell(target))
    }

    /// A handle that queues commands for the next frame.
    pub fn command_handle(&self) -> CommandHandle {
        self.router.handle()
    }

    // ── Frame loop ──────────────────────────────────────────────

    /// Advance the board by `dt` seconds.
    ///
    /// Negative or non-finite `dt` is treated as zero.
    pub fn frame(&mut self, dt: f32) -> FrameReport {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let refreshes_before = self.tiles.refresh_count();
        self.metrics.frames += 1;

        self.flush_queue();
        let receipts = std::mem::take(&mut self.queued_receipts);

        self.clock += f64::from(dt);
        let mut ctx = MotionContext {
            grid: &self.grid,
            layout: &self.layout,
            tiles: &mut self.tiles,
            animator: &mut *self.animator,
        };
        self.motion.tick(dt, self.clock as f32, &mut ctx);
        self.tiles
            .advance(dt, self.motion.current_cell(), &self.grid);

        let events = self.motion.drain_events();
        for event in &events {
            self.metrics.record_event(event);
        }
        self.metrics.highlight_refreshes = self.tiles.refresh_count();

        FrameReport {
            receipts,
            events,
            highlights_refreshed: self.tiles.refresh_count() != refreshes_before,
        }
    }

    // ── Reconfiguration ─────────────────────────────────────────

    /// Regenerate the grid from `config`.
    ///
    /// Any in-flight transition is abandoned. The agent keeps its row and
    /// column, clamped into the new grid, and snaps to that cell's new
    /// position. `config.start_cell` is ignored. Highlights refresh after
    /// the configured delay. On `Err` the board is unchanged.
    pub fn reconfigure(&mut self, config: BoardConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let (grid, layout) = config.grid.build()?;
        let cell = grid.remap_from(&self.grid, self.motion.current_cell());
        let position = layout.position(cell)?;

        self.motion.abort(&mut *self.animator);
        self.motion.set_config(config.motion.clone());
        self.motion.place(cell, position);
        self.tiles
            .regenerate(grid.cell_count(), config.grid.cell_size);
        self.router.set_cell_count(grid.cell_count());
        self.tiles
            .schedule_refresh(config.highlight_delay, cell, &grid);

        log::info!(
            "board regenerated: {n}x{n} grid, agent at cell {cell}",
            n = grid.size()
        );
        self.grid = grid;
        self.layout = layout;
        self.config = config;
        self.metrics.reconfigurations += 1;
        self.metrics.highlight_refreshes = self.tiles.refresh_count();
        Ok(())
    }

    // ── Accessors ───────────────────────────────────────────────

    /// Configuration currently in effect.
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Grid topology.
    pub fn grid(&self) -> &SquareGrid {
        &self.grid
    }

    /// Tile centres.
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Desired presentation of every tile.
    pub fn tiles(&self) -> &[TileState] {
        self.tiles.tiles()
    }

    /// Whether tile `cell` is highlighted as a legal destination.
    pub fn is_highlighted(&self, cell: CellIndex) -> bool {
        self.tiles.is_highlighted(cell)
    }

    /// Whether a deferred highlight refresh is waiting.
    pub fn has_pending_refresh(&self) -> bool {
        self.tiles.has_pending_refresh()
    }

    /// Tiles whose highlight or scale changed since the last call.
    pub fn take_tile_changes(&mut self) -> Vec<CellIndex> {
        self.tiles.take_changes()
    }

    /// The cell the agent logically occupies.
    pub fn current_cell(&self) -> CellIndex {
        self.motion.current_cell()
    }

    /// The agent's rendered pose.
    pub fn pose(&self) -> Pose {
        self.motion.pose()
    }

    /// Uniform scale of the agent model.
    pub fn agent_scale(&self) -> f32 {
        self.config.grid.cell_size
    }

    /// Whether the walk animation is on.
    pub fn is_walking(&self) -> bool {
        self.motion.is_walking()
    }

    /// Idle or moving.
    pub fn state(&self) -> MotionState {
        self.motion.state()
    }

    /// The in-flight transition, if any.
    pub fn transition(&self) -> Option<&Transition> {
        self.motion.transition()
    }

    /// Cumulative counters.
    pub fn metrics(&self) -> &BoardMetrics {
        &self.metrics
    }

    /// Seconds advanced by [`frame()`](Self::frame) so far.
    pub fn clock(&self) -> f64 {
        self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbot_core::RejectReason;

    fn board(size: u32, start: u32) -> Board {
        let mut config = BoardConfig::with_size(size);
        config.start_cell = CellIndex(start);
        Board::new(config).unwrap()
    }

    fn settle(b: &mut Board) {
        for _ in 0..100 {
            b.frame(0.05);
        }
    }

    // ── Construction ────────────────────────────────────────────

    #[test]
    fn new_rejects_invalid_config() {
        assert!(matches!(
            Board::new(BoardConfig::with_size(0)),
            Err(ConfigError::Space(_))
        ));
    }

    #[test]
    fn first_refresh_is_deferred() {
        let mut b = board(3, 4);
        assert!(b.has_pending_refresh());
        assert!(!b.is_highlighted(CellIndex(0)));
        assert!(!b.frame(0.1).highlights_refreshed);
        assert!(b.frame(0.2).highlights_refreshed);
        assert!((0..9).all(|i| b.is_highlighted(CellIndex(i)) == (i != 4)));
    }

    #[test]
    fn zero_delay_refreshes_at_construction() {
        let mut config = BoardConfig::with_size(2);
        config.highlight_delay = 0.0;
        let b = Board::new(config).unwrap();
        assert!(!b.has_pending_refresh());
        assert!(b.is_highlighted(CellIndex(3)));
        assert_eq!(b.metrics().highlight_refreshes, 1);
    }

    // ── Commands ────────────────────────────────────────────────

    #[test]
    fn queued_commands_drain_in_order_before_tick() {
        let mut b = board(3, 4);
        let h = b.command_handle();
        h.request_move(CellIndex(0), CommandSource::Sensor).unwrap();
        h.request_move(CellIndex(4), CommandSource::Sensor).unwrap();
        let report = b.frame(0.01);
        assert_eq!(report.receipts.len(), 2);
        assert!(report.receipts[0].is_accepted());
        assert_eq!(
            report.receipts[1].reason,
            Some(RejectReason::SameCell { cell: CellIndex(4) })
        );
        assert!(matches!(report.events[0], MotionEvent::Started { .. }));
        assert!(b.transition().unwrap().elapsed > 0.0);
    }

    #[test]
    fn direct_command_does_not_overtake_queued_one() {
        let mut b = board(3, 4);
        let h = b.command_handle();
        h.request_move(CellIndex(0), CommandSource::Sensor).unwrap();
        // Routed after the sensor hit, so it preempts the move to 0.
        assert!(b.select_cell(CellIndex(8)).is_accepted());
        assert_eq!(b.transition().unwrap().target_cell, CellIndex(8));

        let report = b.frame(0.01);
        assert_eq!(report.receipts.len(), 1);
        assert_eq!(report.receipts[0].command.target, CellIndex(0));
        assert!(report.receipts[0].is_accepted());
        assert!(matches!(
            report.events[1],
            MotionEvent::Preempted { target: CellIndex(0), .. }
        ));

        settle(&mut b);
        assert_eq!(b.current_cell(), CellIndex(8));
    }

    #[test]
    fn select_at_routes_pointer_hits() {
        let mut b = board(3, 4);
        let p = b.layout().position(CellIndex(1)).unwrap();
        let r = b.select_at(p).unwrap();
        assert!(r.is_accepted());
        assert_eq!(r.command.source, CommandSource::Pointer);
        assert!(b.select_at(Vec3::new(50.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn metrics_follow_activity() {
        let mut b = board(3, 4);
        assert!(b.request_move(CellIndex(0)));
        b.frame(0.1);
        assert!(b.request_move(CellIndex(8)));
        assert!(!b.request_move(CellIndex(4)));
        settle(&mut b);
        let m = b.metrics();
        assert_eq!(m.commands_accepted, 2);
        assert_eq!(m.commands_rejected, 1);
        assert_eq!(m.preemptions, 1);
        assert_eq!(m.transitions_completed, 1);
        assert_eq!(m.frames, 101);
    }

    // ── Frame loop ──────────────────────────────────────────────

    #[test]
    fn bad_dt_is_ignored() {
        let mut b = board(2, 0);
        b.request_move(CellIndex(3));
        b.frame(f32::NAN);
        b.frame(-1.0);
        assert_eq!(b.transition().unwrap().elapsed, 0.0);
        assert_eq!(b.clock(), 0.0);
    }

    // ── Reconfiguration ─────────────────────────────────────────

    #[test]
    fn reconfigure_clamps_agent_and_aborts_motion() {
        let mut b = board(4, 15);
        b.frame(1.0);
        assert!(b.request_move(CellIndex(10)));
        b.frame(0.1);
        assert!(b.is_walking());

        let mut config = BoardConfig::with_size(2);
        config.grid.cell_size = 2.0;
        b.reconfigure(config).unwrap();

        // (3, 3) clamps to (1, 1).
        assert_eq!(b.current_cell(), CellIndex(3));
        assert_eq!(b.state(), MotionState::Idle);
        assert!(!b.is_walking());
        assert_eq!(b.pose().position, b.layout().position(CellIndex(3)).unwrap());
        assert_eq!(b.tiles().len(), 4);
        assert!(b.tiles().iter().all(|t| t.scale == 2.0 && !t.highlighted));
        assert_eq!(b.agent_scale(), 2.0);
        assert_eq!(b.command_handle().cell_count(), 4);

        settle(&mut b);
        assert!(b.is_highlighted(CellIndex(0)));
        assert!(!b.is_highlighted(CellIndex(3)));
    }

    #[test]
    fn failed_reconfigure_leaves_board_untouched() {
        let mut b = board(3, 4);
        assert!(b.reconfigure(BoardConfig::with_size(0)).is_err());
        assert_eq!(b.grid().size(), 3);
        assert_eq!(b.current_cell(), CellIndex(4));
    }
}
