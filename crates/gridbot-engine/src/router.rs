//! Single entry point for move commands.
//!
//! Every producer funnels through [`CommandRouter::route`], so pointer,
//! sensor, and direct commands face identical validation:
//!
//! 1. target must name a cell (`OutOfRange`)
//! 2. target must differ from the agent's cell (`SameCell`)
//! 3. target must be a neighbour of the agent's cell (`NotAdjacent`)
//!
//! Producers that do not own the board hold a [`CommandHandle`] instead.
//! Commands submitted through a handle wait in a bounded queue until the
//! board drains it at the start of the next frame, in arrival order.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use gridbot_core::{CellIndex, CommandSource, MoveCommand, Receipt, RejectReason};

use crate::motion::{MotionContext, MotionController};

/// Cloneable, thread-safe submitter of move commands.
///
/// Obtained from [`CommandRouter::handle`] (or
/// [`Board::command_handle`](crate::Board::command_handle)) and injected into
/// producers such as [`SensorFeed`](crate::SensorFeed).
#[derive(Clone, Debug)]
pub struct CommandHandle {
    tx: Sender<MoveCommand>,
    cell_count: Arc<AtomicUsize>,
    capacity: usize,
}

impl CommandHandle {
    /// Enqueue a command for the next frame.
    ///
    /// Fails with `QueueFull` when the queue is at capacity and with
    /// `NotConfigured` when the board has been dropped. Legality is checked
    /// when the command is drained, not here.
    pub fn submit(&self, command: MoveCommand) -> Result<(), RejectReason> {
        match self.tx.try_send(command) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(RejectReason::QueueFull {
                capacity: self.capacity,
            }),
            Err(TrySendError::Disconnected(_)) => Err(RejectReason::NotConfigured),
        }
    }

    /// Enqueue a move to `target` from `source`.
    pub fn request_move(&self, target: CellIndex, source: CommandSource) -> Result<(), RejectReason> {
        self.submit(MoveCommand::new(target, source))
    }

    /// Number of cells in the board's current grid.
    pub fn cell_count(&self) -> usize {
        self.cell_count.load(Ordering::Acquire)
    }
}

/// Validates commands and dispatches legal ones to the motion controller.
#[derive(Debug)]
pub struct CommandRouter {
    tx: Sender<MoveCommand>,
    rx: Receiver<MoveCommand>,
    cell_count: Arc<AtomicUsize>,
    capacity: usize,
}

impl CommandRouter {
    /// A router whose queue holds up to `capacity` commands.
    pub fn new(capacity: usize, cell_count: usize) -> Self {
        let (tx, rx) = bounded(capacity);
        Self {
            tx,
            rx,
            cell_count: Arc::new(AtomicUsize::new(cell_count)),
            capacity,
        }
    }

    /// A new handle onto this router's queue.
    pub fn handle(&self) -> CommandHandle {
        CommandHandle {
            tx: self.tx.clone(),
            cell_count: Arc::clone(&self.cell_count),
            capacity: self.capacity,
        }
    }

    /// Publish the cell count of a regenerated grid to every handle.
    pub fn set_cell_count(&self, cell_count: usize) {
        self.cell_count.store(cell_count, Ordering::Release);
    }

    /// Number of queued commands.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Take every queued command, oldest first.
    pub fn drain(&self) -> Vec<MoveCommand> {
        self.rx.try_iter().collect()
    }

    /// Validate `command` against the agent's current cell and dispatch it.
    ///
    /// A rejected command has no side effect.
    pub fn route(
        &self,
        command: MoveCommand,
        motion: &mut MotionController,
        ctx: &mut MotionContext<'_>,
    ) -> Receipt {
        match Self::validate(command.target, motion.current_cell(), ctx) {
            Err(reason) => {
                log::debug!("{:?} move rejected: {reason}", command.source);
                Receipt::rejected(command, reason)
            }
            Ok(()) => match motion.begin(command.target, ctx) {
                Ok(id) => Receipt::accepted(command, id),
                Err(e) => {
                    log::debug!("{:?} move rejected: {e}", command.source);
                    Receipt::rejected(
                        command,
                        RejectReason::OutOfRange {
                            target: command.target,
                            cell_count: ctx.grid.cell_count(),
                        },
                    )
                }
            },
        }
    }

    fn validate(
        target: CellIndex,
        current: CellIndex,
        ctx: &MotionContext<'_>,
    ) -> Result<(), RejectReason> {
        if !ctx.grid.contains(target) {
            return Err(RejectReason::OutOfRange {
                target,
                cell_count: ctx.grid.cell_count(),
            });
        }
        if target == current {
            return Err(RejectReason::SameCell { cell: current });
        }
        if !ctx.grid.is_legal_move(current, target) {
            return Err(RejectReason::NotAdjacent {
                from: current,
                to: target,
            });
        }
        Ok(())
    }
}
