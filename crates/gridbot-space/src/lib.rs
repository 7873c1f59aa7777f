//! Grid topology, move legality, and world layout for gridbot boards.
//!
//! - [`SquareGrid`]: an N×N board addressed by row-major [`CellIndex`]
//!   with a configurable [`Connectivity`].
//! - [`is_legal_move`]: the single-step legality rule (eight-neighbourhood).
//! - [`GridLayout`]: world-space tile centres and pointer picking.
//!
//! [`CellIndex`]: gridbot_core::CellIndex

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod adjacency;
pub mod error;
pub mod grid;
pub mod layout;

pub use adjacency::{is_legal_move, Connectivity};
pub use error::SpaceError;
pub use grid::SquareGrid;
pub use layout::GridLayout;
