//! Queries the placement core asks of the surrounding world

use crate::core::types::Point3;

/// "Does any non-wall solid object lie along the span between these points?"
pub trait ObstacleQuery {
    fn is_blocked(&self, start: Point3, end: Point3) -> bool;
}

/// "Is this point currently visible to the player?"
pub trait VisibilityQuery {
    fn is_visible(&self, point: Point3) -> bool;
}

impl<F> ObstacleQuery for F
where
    F: Fn(Point3, Point3) -> bool,
{
    fn is_blocked(&self, start: Point3, end: Point3) -> bool {
        self(start, end)
    }
}

impl<F> VisibilityQuery for F
where
    F: Fn(Point3) -> bool,
{
    fn is_visible(&self, point: Point3) -> bool {
        self(point)
    }
}

/// An empty world: nothing ever blocks a wall
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObstacles;

impl ObstacleQuery for NoObstacles {
    fn is_blocked(&self, _start: Point3, _end: Point3) -> bool {
        false
    }
}
