//! Test utilities and mock collaborators for gridbot development.
//!
//! Provides a [`RecordingAnimator`] that remembers every walking toggle and
//! board fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::{Arc, Mutex};

use gridbot_core::Animator;

pub use fixtures::{board_with, recorded_board, run_until_idle, FRAME_DT};

/// [`Animator`] that records every `set_walking` call.
///
/// Clones share one log, so a test can keep one clone as a probe and move
/// another into a board.
#[derive(Clone, Debug, Default)]
pub struct RecordingAnimator {
    calls: Arc<Mutex<Vec<bool>>>,
}

impl RecordingAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every value passed to `set_walking`, oldest first.
    pub fn calls(&self) -> Vec<bool> {
        self.calls.lock().unwrap().clone()
    }

    /// The most recent value, if any call was made.
    pub fn last(&self) -> Option<bool> {
        self.calls.lock().unwrap().last().copied()
    }
}

impl Animator for RecordingAnimator {
    fn set_walking(&mut self, walking: bool) {
        self.calls.lock().unwrap().push(walking);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_log() {
        let probe = RecordingAnimator::new();
        let mut animator = probe.clone();
        animator.set_walking(true);
        animator.set_walking(false);
        assert_eq!(probe.calls(), vec![true, false]);
        assert_eq!(probe.last(), Some(false));
    }
}
