//! Cumulative counters for a board.
//!
//! [`BoardMetrics`] is updated by [`Board`](crate::Board) as commands are
//! routed and frames advance. Read it for telemetry or tests; it has no
//! effect on behaviour.

use gridbot_core::{Receipt, RejectReason};

use crate::motion::MotionEvent;

/// Counters accumulated since the board was created.
///
/// Reconfiguration does not reset them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoardMetrics {
    /// Frames advanced.
    pub frames: u64,
    /// Commands that started a transition.
    pub commands_accepted: u64,
    /// Commands rejected by validation.
    pub commands_rejected: u64,
    /// Rejections because the target was not a neighbour.
    pub not_adjacent_rejections: u64,
    /// Transitions abandoned in favour of a newer one.
    pub preemptions: u64,
    /// Transitions that reached their destination.
    pub transitions_completed: u64,
    /// Mass highlight refreshes, immediate and deferred.
    pub highlight_refreshes: u64,
    /// Grid regenerations after construction.
    pub reconfigurations: u64,
}

impl BoardMetrics {
    /// Count one routed command.
    pub fn record_receipt(&mut self, receipt: &Receipt) {
        match receipt.reason {
            None => self.commands_accepted += 1,
            Some(reason) => {
                self.commands_rejected += 1;
                if matches!(reason, RejectReason::NotAdjacent { .. }) {
                    self.not_adjacent_rejections += 1;
                }
            }
        }
    }

    /// Count one motion lifecycle event.
    pub fn record_event(&mut self, event: &MotionEvent) {
        match event {
            MotionEvent::Started { .. } => {}
            MotionEvent::Preempted { .. } => self.preemptions += 1,
            MotionEvent::Completed { .. } => self.transitions_completed += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbot_core::{CellIndex, CommandSource, MoveCommand, TransitionId};

    #[test]
    fn default_metrics_are_zero() {
        let m = BoardMetrics::default();
        assert_eq!(m.frames, 0);
        assert_eq!(m.commands_accepted, 0);
        assert_eq!(m.commands_rejected, 0);
        assert_eq!(m.preemptions, 0);
        assert_eq!(m.transitions_completed, 0);
        assert_eq!(m.highlight_refreshes, 0);
    }

    #[test]
    fn receipts_are_counted_by_outcome() {
        let mut m = BoardMetrics::default();
        let cmd = MoveCommand::new(CellIndex(8), CommandSource::Pointer);
        m.record_receipt(&Receipt::accepted(cmd, TransitionId(0)));
        m.record_receipt(&Receipt::rejected(
            cmd,
            RejectReason::NotAdjacent {
                from: CellIndex(0),
                to: CellIndex(8),
            },
        ));
        m.record_receipt(&Receipt::rejected(cmd, RejectReason::SameCell { cell: CellIndex(8) }));
        assert_eq!(m.commands_accepted, 1);
        assert_eq!(m.commands_rejected, 2);
        assert_eq!(m.not_adjacent_rejections, 1);
    }

    #[test]
    fn events_are_counted_by_kind() {
        let mut m = BoardMetrics::default();
        m.record_event(&MotionEvent::Preempted {
            transition: TransitionId(0),
            target: CellIndex(1),
        });
        m.record_event(&MotionEvent::Completed {
            transition: TransitionId(1),
            cell: CellIndex(2),
        });
        assert_eq!(m.preemptions, 1);
        assert_eq!(m.transitions_completed, 1);
    }
}
