//! Frame-driven movement engine for gridbot boards.
//!
//! [`Board`] is the top-level API. It owns the grid, its layout, the
//! [`TileRegistry`], the [`MotionController`], and the [`CommandRouter`].
//! An external frame loop calls [`Board::frame`] once per frame; producers
//! either call [`Board::request_move`] directly or hold a [`CommandHandle`]
//! whose commands are drained at the start of the next frame.
//!
//! Hardware sensor input is ingested by [`SensorFeed`], which parses the
//! line-oriented sensor stream and submits through an injected handle.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod board;
pub mod config;
pub mod metrics;
pub mod motion;
pub mod router;
pub mod sensor;
pub mod tiles;

pub use board::{Board, FrameReport};
pub use config::{BoardConfig, ConfigError, GridConfig, MotionConfig, PulseConfig};
pub use metrics::BoardMetrics;
pub use motion::{MotionContext, MotionController, MotionEvent, MotionState, Transition};
pub use router::{CommandHandle, CommandRouter};
pub use sensor::{parse_sensor_line, LineBuffer, SensorFeed, SensorStatus};
pub use tiles::{TileError, TileRegistry, TileState};
