//! Agent pose and the interpolation helpers used by transitions.

use glam::{Quat, Vec3};

/// Squared horizontal length below which a movement vector is treated as
/// having no direction (the agent keeps its current facing).
pub const MIN_FACING_LENGTH_SQ: f32 = 1.0e-4;

/// Rendered position and orientation of the agent.
///
/// Orientation is a unit quaternion; the agent's forward axis is `+Z` and
/// its up axis is `+Y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation.
    pub orientation: Quat,
}

impl Pose {
    /// A pose at `position` facing `+Z`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }

    /// Orientation that faces along the horizontal part of `delta`.
    ///
    /// Returns `None` when the horizontal component is too short to define
    /// a direction (a purely vertical or zero-length move).
    pub fn facing(delta: Vec3) -> Option<Quat> {
        let flat = Vec3::new(delta.x, 0.0, delta.z);
        if flat.length_squared() <= MIN_FACING_LENGTH_SQ {
            return None;
        }
        Some(Quat::from_rotation_y(flat.x.atan2(flat.z)))
    }

    /// Interpolate between `self` and `target` by `t` in `[0, 1]`.
    ///
    /// Position is linear; orientation follows the shortest arc.
    pub fn interpolate(&self, target: &Pose, t: f32) -> Pose {
        Pose {
            position: self.position.lerp(target.position, t),
            orientation: slerp_shortest(self.orientation, target.orientation, t),
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// Spherical interpolation that never takes the long way around.
///
/// `q` and `-q` encode the same rotation; flipping `to` into the same
/// hemisphere as `from` selects the shorter of the two arcs.
pub fn slerp_shortest(from: Quat, to: Quat, t: f32) -> Quat {
    let to = if from.dot(to) < 0.0 { -to } else { to };
    from.slerp(to, t).normalize()
}

/// Hermite smoothstep of `x` clamped to `[0, 1]`.
pub fn smoothstep(x: f32) -> f32 {
    let t = x.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
