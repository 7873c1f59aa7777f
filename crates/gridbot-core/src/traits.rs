//! Collaborator traits implemented outside the engine.

/// Receives the agent's walking state.
///
/// Calls are fire-and-forget: the engine never reads anything back and does
/// not depend on the animator for correctness.
pub trait Animator {
    /// Set whether the walk animation should play.
    fn set_walking(&mut self, walking: bool);
}

/// An [`Animator`] that ignores every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAnimator;

impl Animator for NullAnimator {
    fn set_walking(&mut self, _walking: bool) {}
}

impl<A: Animator + ?Sized> Animator for Box<A> {
    fn set_walking(&mut self, walking: bool) {
        (**self).set_walking(walking);
    }
}
