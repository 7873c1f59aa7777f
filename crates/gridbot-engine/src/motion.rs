//! The agent's transition state machine.
//!
//! ```text
//!            begin(target)                 tick(dt), elapsed < duration
//!   Idle ─────────────────────▶ Moving ◀──────────────────────────────┐
//!    ▲                           │  │                                  │
//!    │  elapsed ≥ duration       │  └──────────────────────────────────┘
//!    └───────────────────────────┘
//!                                   begin(new target): preempt, stay Moving
//! ```
//!
//! The controller exclusively owns the agent's pose and current cell. The
//! current cell changes only when a transition completes; a command that
//! arrives mid-flight is validated against the cell the agent left.
//!
//! Preemption never snaps: the new transition starts from whatever pose
//! the abandoned one had reached.

use glam::Vec3;
use gridbot_core::pose::smoothstep;
use gridbot_core::{Animator, CellIndex, Pose, TransitionId};
use gridbot_space::{GridLayout, SpaceError, SquareGrid};

use crate::config::MotionConfig;
use crate::tiles::TileRegistry;

/// Borrowed view of everything a transition reads or drives.
pub struct MotionContext<'a> {
    /// Board topology, used for highlight refresh.
    pub grid: &'a SquareGrid,
    /// Tile centres, used for target positions.
    pub layout: &'a GridLayout,
    /// Tile presentation state.
    pub tiles: &'a mut TileRegistry,
    /// External walk-animation collaborator.
    pub animator: &'a mut dyn Animator,
}

/// Whether a transition is in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionState {
    /// No transition in flight.
    Idle,
    /// A transition is animating.
    Moving,
}

/// An in-flight move of the agent.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Identifier assigned when the move was accepted.
    pub id: TransitionId,
    /// Pose captured when the transition began.
    pub start: Pose,
    /// Pose the transition ends at.
    pub target: Pose,
    /// Destination cell.
    pub target_cell: CellIndex,
    /// Seconds animated so far.
    pub elapsed: f32,
    /// Seconds the whole transition takes.
    pub duration: f32,
}

impl Transition {
    /// Eased progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        smoothstep(self.elapsed / self.duration)
    }

    /// Whether the transition has run its full duration.
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Lifecycle notifications emitted by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionEvent {
    /// A move was accepted and began animating.
    Started {
        /// The new transition.
        transition: TransitionId,
        /// The agent's cell when the move was accepted.
        from: CellIndex,
        /// The destination cell.
        to: CellIndex,
    },
    /// An in-flight transition was replaced by a newer one.
    Preempted {
        /// The abandoned transition.
        transition: TransitionId,
        /// Its destination, never reached.
        target: CellIndex,
    },
    /// A transition finished and the agent now occupies `cell`.
    Completed {
        /// The finished transition.
        transition: TransitionId,
        /// The agent's new cell.
        cell: CellIndex,
    },
}

/// Animates the agent between cells.
#[derive(Debug)]
pub struct MotionController {
    config: MotionConfig,
    current_cell: CellIndex,
    pose: Pose,
    transition: Option<Transition>,
    walking: bool,
    next_id: u64,
    events: Vec<MotionEvent>,
}

impl MotionController {
    /// An idle controller with the agent resting at `cell` in `pose`.
    pub fn new(config: MotionConfig, cell: CellIndex, pose: Pose) -> Self {
        Self {
            config,
            current_cell: cell,
            pose,
            transition: None,
            walking: false,
            next_id: 0,
            events: Vec::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> MotionState {
        if self.transition.is_some() {
            MotionState::Moving
        } else {
            MotionState::Idle
        }
    }

    /// The cell the agent logically occupies.
    pub fn current_cell(&self) -> CellIndex {
        self.current_cell
    }

    /// The agent's rendered pose.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// The in-flight transition, if any.
    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    /// Whether the walk animation was last switched on.
    pub fn is_walking(&self) -> bool {
        self.walking
    }

    /// Timing in effect for future transitions.
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Replace the timing used by transitions begun from now on.
    pub fn set_config(&mut self, config: MotionConfig) {
        self.config = config;
    }

    /// Start animating towards `target`, preempting any in-flight move.
    ///
    /// Legality is the router's concern; this only requires `target` to be
    /// on the grid. On `Err` nothing changes, including any motion already
    /// in flight.
    pub fn begin(
        &mut self,
        target: CellIndex,
        ctx: &mut MotionContext<'_>,
    ) -> Result<TransitionId, SpaceError> {
        let target_position = ctx.layout.position(target)?;
        ctx.grid.check(target)?;

        if let Some(old) = self.transition.take() {
            ctx.tiles.force_highlight(old.target_cell, false);
            ctx.tiles.restore_scale(old.target_cell);
            log::debug!(
                "transition {} to cell {} preempted by move to cell {target}",
                old.id,
                old.target_cell
            );
            self.events.push(MotionEvent::Preempted {
                transition: old.id,
                target: old.target_cell,
            });
        }

        let start = self.pose;
        let orientation =
            Pose::facing(target_position - start.position).unwrap_or(start.orientation);
        let id = TransitionId(self.next_id);
        self.next_id += 1;

        // No tile may look selectable mid-flight, so a deferred refresh
        // from an earlier regeneration must not fire either.
        ctx.tiles.cancel_pending_refresh();
        ctx.tiles.clear_all();
        ctx.tiles.force_highlight(target, true);

        self.transition = Some(Transition {
            id,
            start,
            target: Pose {
                position: target_position,
                orientation,
            },
            target_cell: target,
            elapsed: 0.0,
            duration: self.config.duration,
        });
        self.set_walking(true, ctx.animator);

        log::debug!(
            "transition {id} started: cell {} -> cell {target}",
            self.current_cell
        );
        self.events.push(MotionEvent::Started {
            transition: id,
            from: self.current_cell,
            to: target,
        });
        Ok(id)
    }

    /// Advance the in-flight transition by `dt` seconds.
    ///
    /// `time` is the board clock that drives the destination tile pulse.
    /// Returns `Some` with the `Completed` event on the frame the transition
    /// finishes. Idle controllers ignore the call.
    pub fn tick(&mut self, dt: f32, time: f32, ctx: &mut MotionContext<'_>) -> Option<MotionEvent> {
        let transition = self.transition.as_mut()?;

        ctx.tiles
            .pulse(transition.target_cell, self.config.pulse.factor(time));

        transition.elapsed += dt.max(0.0);
        if !transition.is_finished() {
            self.pose = transition.start.interpolate(&transition.target, transition.progress());
            return None;
        }

        let done = self.transition.take()?;
        self.pose = done.target;
        ctx.tiles.restore_scale(done.target_cell);
        self.current_cell = done.target_cell;
        self.set_walking(false, ctx.animator);
        ctx.tiles.refresh_highlights(self.current_cell, ctx.grid);

        log::debug!("transition {} completed at cell {}", done.id, done.target_cell);
        let event = MotionEvent::Completed {
            transition: done.id,
            cell: done.target_cell,
        };
        self.events.push(event);
        Some(event)
    }

    /// Drop the in-flight transition without snapping or touching tiles.
    ///
    /// Used when the grid is regenerated underneath the agent.
    pub fn abort(&mut self, animator: &mut dyn Animator) -> Option<Transition> {
        let aborted = self.transition.take()?;
        self.set_walking(false, animator);
        log::debug!("transition {} aborted", aborted.id);
        Some(aborted)
    }

    /// Put an idle agent at `cell`, standing at `position`.
    ///
    /// Orientation is kept.
    pub fn place(&mut self, cell: CellIndex, position: Vec3) {
        self.current_cell = cell;
        self.pose.position = position;
    }

    /// Take the events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<MotionEvent> {
        std::mem::take(&mut self.events)
    }

    fn set_walking(&mut self, walking: bool, animator: &mut dyn Animator) {
        self.walking = walking;
        animator.set_walking(walking);
    }
}
