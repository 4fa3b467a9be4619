//! Core type definitions used throughout the codebase

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A coordinate on the horizontal (x, z) plane
pub type Point2 = Vec2;

/// A full world-space coordinate
pub type Point3 = Vec3;

/// Project a world point onto the horizontal plane (drops height)
#[inline]
pub fn flatten(p: Point3) -> Point2 {
    Vec2::new(p.x, p.z)
}

/// Distance between two world points measured on the horizontal plane
#[inline]
pub fn planar_distance(a: Point3, b: Point3) -> f32 {
    flatten(a).distance(flatten(b))
}

/// Identifier for a wall segment committed by a placement session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentId(pub u64);

impl std::fmt::Display for SegmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "seg#{}", self.0)
    }
}

/// Handle to an object the host spawned on our behalf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityHandle(pub Uuid);

impl EntityHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityHandle {
    fn default() -> Self {
        Self::new()
    }
}
