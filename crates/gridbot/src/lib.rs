//! Gridbot: a frame-driven movement engine for one agent on a square board.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! gridbot sub-crates. For most users, adding `gridbot` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use gridbot::prelude::*;
//!
//! let mut config = BoardConfig::with_size(3);
//! config.start_cell = CellIndex(4);
//! let mut board = Board::new(config).unwrap();
//!
//! // Sensor hits arrive through an injected handle.
//! let mut feed = SensorFeed::new(board.command_handle());
//! feed.feed("SENSOR,0\n");
//!
//! let report = board.frame(1.0 / 60.0);
//! assert!(report.receipts[0].is_accepted());
//! while board.state() == MotionState::Moving {
//!     board.frame(1.0 / 60.0);
//! }
//! assert_eq!(board.current_cell(), CellIndex(0));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `gridbot-core` | IDs, poses, commands, receipts, error types, `Animator` |
//! | [`space`] | `gridbot-space` | Grid topology, adjacency, world-space layout |
//! | [`engine`] | `gridbot-engine` | Board, motion, tiles, routing, sensor ingestion |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`gridbot-core`).
pub use gridbot_core as types;

/// Grid topology and layout (`gridbot-space`).
///
/// [`space::SquareGrid`] decides adjacency; [`space::GridLayout`] places
/// tiles in world space.
pub use gridbot_space as space;

/// The movement engine (`gridbot-engine`).
///
/// [`engine::Board`] is the entry point; [`engine::SensorFeed`] ingests the
/// hardware sensor stream.
pub use gridbot_engine as engine;

/// Common imports for typical gridbot usage.
///
/// ```rust
/// use gridbot::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use gridbot_core::{
        Animator, CellIndex, CommandSource, MoveCommand, Pose, Receipt, TransitionId,
    };

    // Errors
    pub use gridbot_core::{RejectReason, SensorError};
    pub use gridbot_engine::ConfigError;

    // Space
    pub use gridbot_space::{Connectivity, GridLayout, SquareGrid};

    // Engine
    pub use gridbot_engine::{
        Board, BoardConfig, BoardMetrics, CommandHandle, FrameReport, MotionEvent, MotionState,
        SensorFeed, TileState,
    };
}
