//! Error types shared across the gridbot workspace.
//!
//! Move validation failures are not faults: they travel back to the caller
//! inside a [`Receipt`](crate::command::Receipt) as a [`RejectReason`].
//! Sensor-channel failures are reported as [`SensorError`] so the feed can
//! log them and keep reading.

use std::error::Error;
use std::fmt;

use crate::id::CellIndex;

/// Why a move command was not dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// The target index is outside `[0, cell_count)`.
    OutOfRange {
        /// The requested target.
        target: CellIndex,
        /// Number of cells in the current grid.
        cell_count: usize,
    },
    /// The target is the cell the agent already occupies.
    SameCell {
        /// The agent's current cell.
        cell: CellIndex,
    },
    /// The target is in range but not a neighbour of the current cell.
    NotAdjacent {
        /// The agent's current cell.
        from: CellIndex,
        /// The requested target.
        to: CellIndex,
    },
    /// No board is live to receive the command.
    NotConfigured,
    /// The command queue is at capacity; the command was dropped.
    QueueFull {
        /// Capacity of the queue.
        capacity: usize,
    },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { target, cell_count } => {
                write!(f, "cell {target} out of range [0, {cell_count})")
            }
            Self::SameCell { cell } => write!(f, "agent already occupies cell {cell}"),
            Self::NotAdjacent { from, to } => {
                write!(f, "cell {to} is not adjacent to cell {from}")
            }
            Self::NotConfigured => write!(f, "no board is configured"),
            Self::QueueFull { capacity } => {
                write!(f, "command queue full ({capacity} pending)")
            }
        }
    }
}

impl Error for RejectReason {}

/// Errors raised while ingesting the hardware sensor stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SensorError {
    /// A line matched neither the integer form nor the two-field form.
    Malformed {
        /// The trimmed offending line.
        line: String,
    },
    /// The line parsed, but the index does not name a cell.
    OutOfRange {
        /// The parsed value (may be negative).
        value: i64,
        /// Number of cells in the current grid.
        cell_count: usize,
    },
    /// The board behind the command handle is gone.
    NotConfigured,
    /// The command handle refused the hit, e.g. because its queue is full.
    Rejected {
        /// Why the handle refused it.
        reason: RejectReason,
    },
    /// The background reader thread could not be started.
    ReaderSpawnFailed {
        /// Description of the spawn failure.
        reason: String,
    },
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { line } => write!(f, "cannot parse sensor line '{line}'"),
            Self::OutOfRange { value, cell_count } => {
                if *cell_count == 0 {
                    write!(f, "sensor index {value} out of range: grid is empty")
                } else {
                    write!(
                        f,
                        "sensor index {value} out of range 0..{}",
                        cell_count - 1
                    )
                }
            }
            Self::NotConfigured => write!(f, "sensor hit with no board configured"),
            Self::Rejected { reason } => write!(f, "sensor hit dropped: {reason}"),
            Self::ReaderSpawnFailed { reason } => {
                write!(f, "sensor reader thread failed to start: {reason}")
            }
        }
    }
}

impl Error for SensorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rejected { reason } => Some(reason),
            _ => None,
        }
    }
}
