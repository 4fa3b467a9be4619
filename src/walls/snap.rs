//! Snapping a pole onto an existing wall's start, end or midpoint

use ordered_float::OrderedFloat;
use serde::Serialize;

use super::segment::PlacedSegment;
use crate::core::types::{planar_distance, Point3, SegmentId};

/// Which part of a wall a pole snapped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SnapAnchor {
    Start,
    End,
    Midpoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnapTarget {
    pub point: Point3,
    pub segment: SegmentId,
    pub anchor: SnapAnchor,
    pub distance: f32,
}

/// Closest anchor within `radius` of `point`, measured on the ground plane
///
/// Linear scan; sessions hold at most a few hundred segments.
pub fn try_snap_to_nearby_wall(
    point: Point3,
    radius: f32,
    segments: &[PlacedSegment],
) -> Option<SnapTarget> {
    segments
        .iter()
        .flat_map(|seg| {
            [
                (seg.start(), SnapAnchor::Start),
                (seg.end(), SnapAnchor::End),
                (seg.midpoint(), SnapAnchor::Midpoint),
            ]
            .into_iter()
            .map(move |(anchor_point, anchor)| SnapTarget {
                point: anchor_point,
                segment: seg.id,
                anchor,
                distance: planar_distance(point, anchor_point),
            })
        })
        .filter(|target| target.distance <= radius)
        .min_by_key(|target| OrderedFloat(target.distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn walls() -> Vec<PlacedSegment> {
        vec![
            PlacedSegment::between(SegmentId(1), Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)),
            PlacedSegment::between(
                SegmentId(2),
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 10.0),
            ),
        ]
    }

    #[test]
    fn test_snaps_to_closest_anchor() {
        let target = try_snap_to_nearby_wall(Vec3::new(5.3, 0.0, 0.4), 1.0, &walls()).unwrap();
        assert_eq!(target.segment, SegmentId(1));
        assert_eq!(target.anchor, SnapAnchor::Midpoint);
        assert!(target.point.distance(Vec3::new(5.0, 0.0, 0.0)) < 1e-5);
    }

    #[test]
    fn test_snaps_to_end() {
        let target = try_snap_to_nearby_wall(Vec3::new(10.2, 0.0, 10.1), 1.0, &walls()).unwrap();
        assert_eq!(target.segment, SegmentId(2));
        assert_eq!(target.anchor, SnapAnchor::End);
    }

    #[test]
    fn test_nothing_within_radius() {
        assert!(try_snap_to_nearby_wall(Vec3::new(3.0, 0.0, 4.0), 1.0, &walls()).is_none());
        assert!(try_snap_to_nearby_wall(Vec3::ZERO, 1.0, &[]).is_none());
    }

    #[test]
    fn test_height_ignored() {
        let target = try_snap_to_nearby_wall(Vec3::new(0.0, 5.0, 0.2), 0.5, &walls()).unwrap();
        assert_eq!(target.anchor, SnapAnchor::Start);
        assert_eq!(target.point.y, 0.0);
    }
}
