//! Splits a pole-to-pole span into wall units
//!
//! A span of length `d` gets `floor(d / unit)` full units laid end to end
//! from the start pole, then one shortened unit for the remainder. The
//! shortened unit keeps the other two scale axes and shrinks only along the
//! length axis. A remainder at or below `unit * min_scale_factor` is dropped
//! rather than emitted as a sliver; the chain then stops that far short of
//! the end pole.

use glam::{Quat, Vec3};
use serde::Serialize;

use super::catalog::WallUnitSpec;
use super::segment::{look_rotation, PlacedSegment, Pose};
use crate::core::types::{Point3, SegmentId};

/// One segment of a plan, before it has an id
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlannedSegment {
    pub center: Point3,
    pub scale: Vec3,
    pub length: f32,
}

/// Segments needed to span one A→B request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentPlan {
    pub start: Point3,
    /// Requested end pole (the segments may stop short of it)
    pub end: Point3,
    pub direction: Vec3,
    pub rotation: Quat,
    pub total_distance: f32,
    pub segments: Vec<PlannedSegment>,
}

impl SegmentPlan {
    fn empty(start: Point3, end: Point3, total_distance: f32) -> Self {
        Self {
            start,
            end,
            direction: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            total_distance,
            segments: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Summed length of all planned segments
    pub fn covered_length(&self) -> f32 {
        self.segments.iter().map(|s| s.length).sum()
    }

    /// How far short of the end pole the segments stop
    pub fn shortfall(&self) -> f32 {
        (self.total_distance - self.covered_length()).max(0.0)
    }

    /// Where the last segment actually ends
    pub fn covered_end(&self) -> Point3 {
        self.start + self.direction * self.covered_length()
    }

    pub fn poses(&self) -> impl Iterator<Item = (Pose, Vec3)> + '_ {
        self.segments.iter().map(|s| {
            (
                Pose {
                    position: s.center,
                    rotation: self.rotation,
                },
                s.scale,
            )
        })
    }

    /// Turn the plan into placed segments, numbering from `first_id`
    pub fn into_placed(&self, first_id: u64) -> Vec<PlacedSegment> {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, s)| PlacedSegment {
                id: SegmentId(first_id + i as u64),
                center: s.center,
                direction: self.direction,
                rotation: self.rotation,
                length: s.length,
                scale: s.scale,
                entity: None,
            })
            .collect()
    }
}

pub struct WallSegmentPlanner;

impl WallSegmentPlanner {
    /// Plan the segments that span `start` → `end` with walls of `spec`
    pub fn plan(start: Point3, end: Point3, spec: &WallUnitSpec) -> SegmentPlan {
        let diff = end - start;
        let total_distance = diff.length();
        let unit = spec.unit_length;
        let threshold = spec.min_segment_length();

        if total_distance < threshold || !(unit > 0.0) || total_distance <= f32::EPSILON {
            return SegmentPlan::empty(start, end, total_distance);
        }

        let direction = diff / total_distance;
        let rotation = look_rotation(direction) * spec.orientation;

        let full_count = (total_distance / unit).floor() as usize;
        let mut segments = Vec::with_capacity(full_count + 1);

        for i in 0..full_count {
            let offset = i as f32 * unit + unit * 0.5;
            segments.push(PlannedSegment {
                center: start + direction * offset,
                scale: spec.base_scale,
                length: unit,
            });
        }

        let used = full_count as f32 * unit;
        let remaining = total_distance - used;
        if remaining > threshold {
            let factor = remaining / unit;
            let axis = spec.length_axis;
            segments.push(PlannedSegment {
                center: start + direction * (used + remaining * 0.5),
                scale: axis.with_component(spec.base_scale, axis.component(spec.base_scale) * factor),
                length: remaining,
            });
        }

        tracing::debug!(
            "Planned {} x {} over {:.2} ({} full, remainder {:.2})",
            segments.len(),
            spec.id,
            total_distance,
            full_count,
            remaining
        );

        SegmentPlan {
            start,
            end,
            direction,
            rotation,
            total_distance,
            segments,
        }
    }
}
