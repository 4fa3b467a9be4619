//! Placed wall segments and their poses

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::types::{flatten, EntityHandle, Point2, Point3, SegmentId};

/// Position and rotation handed to the host when spawning a wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point3,
    pub rotation: Quat,
}

/// Rotation that turns +Z onto `direction` with +Y kept up (no roll)
///
/// A zero direction yields the identity.
pub fn look_rotation(direction: Vec3) -> Quat {
    let dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let yaw = dir.x.atan2(dir.z);
    let pitch = -dir.y.clamp(-1.0, 1.0).asin();
    Quat::from_rotation_y(yaw) * Quat::from_rotation_x(pitch)
}

/// One committed wall instance
///
/// Invariant: `end() - start()` has length `length` and points along
/// `direction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedSegment {
    pub id: SegmentId,
    pub center: Point3,
    /// Unit vector from start to end
    pub direction: Vec3,
    pub rotation: Quat,
    pub length: f32,
    pub scale: Vec3,
    #[serde(default)]
    pub entity: Option<EntityHandle>,
}

impl PlacedSegment {
    /// Segment between two points, with the look rotation and unit scale
    pub fn between(id: SegmentId, start: Point3, end: Point3) -> Self {
        let diff = end - start;
        let direction = diff.normalize_or_zero();
        Self {
            id,
            center: (start + end) * 0.5,
            direction,
            rotation: look_rotation(direction),
            length: diff.length(),
            scale: Vec3::ONE,
            entity: None,
        }
    }

    pub fn start(&self) -> Point3 {
        self.center - self.direction * (self.length * 0.5)
    }

    pub fn end(&self) -> Point3 {
        self.center + self.direction * (self.length * 0.5)
    }

    pub fn midpoint(&self) -> Point3 {
        self.center
    }

    pub fn pose(&self) -> Pose {
        Pose {
            position: self.center,
            rotation: self.rotation,
        }
    }

    /// Endpoints projected onto the horizontal plane
    pub fn planar(&self) -> (Point2, Point2) {
        (flatten(self.start()), flatten(self.end()))
    }
}
