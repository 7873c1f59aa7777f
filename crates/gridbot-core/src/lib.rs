//! Core types and traits for the gridbot movement engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by every other crate in the workspace: cell and
//! transition identifiers, the agent [`Pose`], move commands and their
//! receipts, error types, and the [`Animator`] collaborator trait.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod command;
pub mod error;
pub mod id;
pub mod pose;
pub mod traits;

pub use command::{CommandSource, MoveCommand, Receipt};
pub use error::{RejectReason, SensorError};
pub use id::{CellIndex, TransitionId};
pub use pose::Pose;
pub use traits::{Animator, NullAnimator};
