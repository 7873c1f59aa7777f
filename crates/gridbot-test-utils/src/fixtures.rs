//! Board fixtures and frame-loop helpers.

use gridbot_core::CellIndex;
use gridbot_engine::{Board, BoardConfig, FrameReport};

use crate::RecordingAnimator;

/// Frame length used by the helpers, in seconds.
pub const FRAME_DT: f32 = 1.0 / 60.0;

/// Default board of `size`×`size` with the agent on `start`.
///
/// The highlight delay is zero so neighbours are lit immediately.
pub fn board_with(size: u32, start: u32) -> Board {
    Board::new(config(size, start)).unwrap()
}

/// Like [`board_with`], but with a [`RecordingAnimator`] attached.
pub fn recorded_board(size: u32, start: u32) -> (Board, RecordingAnimator) {
    let probe = RecordingAnimator::new();
    let board = Board::with_animator(config(size, start), Box::new(probe.clone())).unwrap();
    (board, probe)
}

/// Run frames of `dt` until no transition is in flight.
///
/// Returns every frame report. Panics after `max_frames` frames.
pub fn run_until_idle(board: &mut Board, dt: f32, max_frames: usize) -> Vec<FrameReport> {
    let mut reports = Vec::new();
    while board.transition().is_some() {
        assert!(
            reports.len() < max_frames,
            "board still moving after {max_frames} frames"
        );
        reports.push(board.frame(dt));
    }
    reports
}

fn config(size: u32, start: u32) -> BoardConfig {
    let mut config = BoardConfig::with_size(size);
    config.start_cell = CellIndex(start);
    config.highlight_delay = 0.0;
    config
}
