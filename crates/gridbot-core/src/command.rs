//! Move commands and the receipts returned for them.

use crate::error::RejectReason;
use crate::id::{CellIndex, TransitionId};

/// Which collaborator produced a command.
///
/// The source is informational only: every source goes through the same
/// legality check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandSource {
    /// A tile picked with a pointer (mouse, touch, ray hit).
    Pointer,
    /// A hit reported on the hardware sensor stream.
    Sensor,
    /// A direct programmatic call.
    Direct,
}

/// A request to move the agent to `target`.
///
/// # Examples
///
/// ```
/// use gridbot_core::{CellIndex, CommandSource, MoveCommand};
///
/// let cmd = MoveCommand::new(CellIndex(4), CommandSource::Sensor);
/// assert_eq!(cmd.target, CellIndex(4));
/// assert_eq!(cmd.source, CommandSource::Sensor);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveCommand {
    /// The destination cell.
    pub target: CellIndex,
    /// The producer of the command.
    pub source: CommandSource,
}

impl MoveCommand {
    /// Create a command targeting `target` from `source`.
    pub fn new(target: CellIndex, source: CommandSource) -> Self {
        Self { target, source }
    }
}

/// Outcome of routing one [`MoveCommand`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// The command this receipt answers.
    pub command: MoveCommand,
    /// The transition started for the command, if it was accepted.
    pub transition: Option<TransitionId>,
    /// Why the command was rejected, if it was.
    pub reason: Option<RejectReason>,
}

impl Receipt {
    /// Receipt for a command that started `transition`.
    pub fn accepted(command: MoveCommand, transition: TransitionId) -> Self {
        Self {
            command,
            transition: Some(transition),
            reason: None,
        }
    }

    /// Receipt for a command that was dropped.
    pub fn rejected(command: MoveCommand, reason: RejectReason) -> Self {
        Self {
            command,
            transition: None,
            reason: Some(reason),
        }
    }

    /// Whether the command started a transition.
    pub fn is_accepted(&self) -> bool {
        self.reason.is_none()
    }
}
