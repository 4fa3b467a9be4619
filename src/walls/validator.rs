//! Decides whether a pole-to-pole span may be built
//!
//! Every check runs on every call, so the caller can show the player all
//! the problems with a span at once.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

use super::catalog::WallUnitSpec;
use super::planner::{SegmentPlan, WallSegmentPlanner};
use super::segment::PlacedSegment;
use crate::core::config::PlacementConfig;
use crate::core::types::{flatten, Point3, SegmentId};
use crate::economy::{ResourceCost, ResourceQuery, Unlimited};
use crate::spatial::segment::{self, SegmentTolerances};
use crate::world::query::{NoObstacles, ObstacleQuery, VisibilityQuery};

/// Why a span can't be placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FailureReason {
    TooShort,
    WallOverlap,
    BuildingOverlap,
    NotVisible,
    CannotAfford,
}

impl FailureReason {
    /// Text suitable for showing to the player
    pub fn message(&self) -> &'static str {
        match self {
            FailureReason::TooShort => "Too short to place a wall",
            FailureReason::WallOverlap => "Overlaps an existing wall",
            FailureReason::BuildingOverlap => "Overlaps a building",
            FailureReason::NotVisible => "Location is not visible",
            FailureReason::CannotAfford => "Not enough resources",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// How a preview of the span should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PreviewState {
    Valid,
    Overlap,
    NotVisible,
    Unaffordable,
    TooShort,
}

/// Result of validating one span
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub reasons: BTreeSet<FailureReason>,
    /// Existing segments the span overlaps
    pub conflicts: Vec<SegmentId>,
    pub segment_count: usize,
    pub cost: ResourceCost,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            reasons: BTreeSet::new(),
            conflicts: Vec::new(),
            segment_count: 0,
            cost: ResourceCost::new(),
        }
    }

    pub fn add(&mut self, reason: FailureReason) {
        self.is_valid = false;
        self.reasons.insert(reason);
    }

    pub fn add_conflict(&mut self, id: SegmentId) {
        self.add(FailureReason::WallOverlap);
        self.conflicts.push(id);
    }

    pub fn has(&self, reason: FailureReason) -> bool {
        self.reasons.contains(&reason)
    }

    /// Preview material selection; overlap wins over everything else
    pub fn preview_state(&self) -> PreviewState {
        if self.has(FailureReason::WallOverlap) || self.has(FailureReason::BuildingOverlap) {
            PreviewState::Overlap
        } else if self.has(FailureReason::NotVisible) {
            PreviewState::NotVisible
        } else if self.has(FailureReason::CannotAfford) {
            PreviewState::Unaffordable
        } else if self.has(FailureReason::TooShort) {
            PreviewState::TooShort
        } else {
            PreviewState::Valid
        }
    }

    /// All failure messages joined for a tooltip
    pub fn summary(&self) -> String {
        if self.is_valid {
            return "OK".to_string();
        }
        self.reasons
            .iter()
            .map(|r| r.message())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Collaborators consulted while validating and committing
pub struct PlacementContext<'a> {
    pub obstacles: &'a dyn ObstacleQuery,
    /// None means no fog of war: everything is visible
    pub visibility: Option<&'a dyn VisibilityQuery>,
    pub resources: &'a mut dyn ResourceQuery,
}

impl<'a> PlacementContext<'a> {
    pub fn new(obstacles: &'a dyn ObstacleQuery, resources: &'a mut dyn ResourceQuery) -> Self {
        Self {
            obstacles,
            visibility: None,
            resources,
        }
    }

    /// Sandbox context: nothing blocks, everything is visible, walls are free
    pub fn permissive() -> PlacementContext<'static> {
        // Unlimited is zero-sized, so leaking it allocates nothing
        let bank: &'static mut Unlimited = Box::leak(Box::new(Unlimited));
        PlacementContext::new(&NoObstacles, bank)
    }

    pub fn with_visibility(mut self, visibility: &'a dyn VisibilityQuery) -> Self {
        self.visibility = Some(visibility);
        self
    }

    fn is_visible(&self, point: Point3) -> bool {
        self.visibility.map_or(true, |v| v.is_visible(point))
    }
}

pub struct PlacementValidator<'c> {
    config: &'c PlacementConfig,
}

impl<'c> PlacementValidator<'c> {
    pub fn new(config: &'c PlacementConfig) -> Self {
        Self { config }
    }

    /// Plan and validate a span in one go
    pub fn validate(
        &self,
        start: Point3,
        end: Point3,
        spec: &WallUnitSpec,
        existing: &[PlacedSegment],
        ctx: &PlacementContext<'_>,
        closing_loop: bool,
    ) -> (SegmentPlan, ValidationReport) {
        let plan = WallSegmentPlanner::plan(start, end, spec);
        let report = self.validate_plan(&plan, spec, existing, ctx, closing_loop);
        (plan, report)
    }

    /// Validate an already computed plan
    pub fn validate_plan(
        &self,
        plan: &SegmentPlan,
        spec: &WallUnitSpec,
        existing: &[PlacedSegment],
        ctx: &PlacementContext<'_>,
        closing_loop: bool,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        let (start, end) = (plan.start, plan.end);

        report.segment_count = plan.len();
        report.cost = spec.cost_per_unit.scaled(plan.len() as u32);

        if plan.is_empty() {
            report.add(FailureReason::TooShort);
        }

        for id in self.wall_conflicts(start, end, existing, closing_loop) {
            report.add_conflict(id);
        }

        if ctx.obstacles.is_blocked(start, end) {
            report.add(FailureReason::BuildingOverlap);
        }

        if self.config.require_visibility && !(ctx.is_visible(start) && ctx.is_visible(end)) {
            report.add(FailureReason::NotVisible);
        }

        if !ctx.resources.can_afford(&report.cost) {
            report.add(FailureReason::CannotAfford);
        }

        report
    }

    /// Existing segments that a start→end span would cross or run along
    ///
    /// Spans may meet existing walls at their endpoints or midpoints, but
    /// never double back along one from there.
    pub fn wall_conflicts(
        &self,
        start: Point3,
        end: Point3,
        existing: &[PlacedSegment],
        closing_loop: bool,
    ) -> Vec<SegmentId> {
        let tolerance = self.config.endpoint_tolerance_for(closing_loop);
        let tol = SegmentTolerances {
            touch: tolerance,
            parallel: self.config.parallel_epsilon,
            collinear: self.config.collinear_epsilon,
        };
        let (a1, a2) = (flatten(start), flatten(end));

        existing
            .iter()
            .filter(|seg| {
                let (b1, b2) = seg.planar();
                let mid = flatten(seg.midpoint());
                let joins = segment::shares_endpoint(a1, a2, b1, b2, tolerance)
                    || a1.distance(mid) <= tolerance
                    || a2.distance(mid) <= tolerance;

                let doubles_back = segment::shared_run(a1, a2, b1, b2, tol.collinear)
                    .is_some_and(|run| run > self.config.min_overlap_length);

                doubles_back || (!joins && segment::intersects_2d_with(a1, a2, b1, b2, &tol))
            })
            .map(|seg| seg.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::{ResourceKind, Stockpile, Unlimited};
    use crate::world::query::NoObstacles;
    use glam::Vec3;

    fn spec() -> WallUnitSpec {
        WallUnitSpec::new("test", 2.0, 0.3)
    }

    fn wall(id: u64, start: [f32; 3], end: [f32; 3]) -> PlacedSegment {
        PlacedSegment::between(SegmentId(id), Vec3::from_array(start), Vec3::from_array(end))
    }

    #[test]
    fn test_crossing_rejected() {
        let config = PlacementConfig::default();
        let validator = PlacementValidator::new(&config);
        let existing = vec![wall(1, [0.0, 0.0, 0.0], [10.0, 0.0, 0.0])];
        let ctx = PlacementContext::permissive();

        let (_, report) = validator.validate(
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 10.0),
            &spec(),
            &existing,
            &ctx,
            false,
        );
        assert!(!report.is_valid);
        assert!(report.has(FailureReason::WallOverlap));
        assert_eq!(report.conflicts, vec![SegmentId(1)]);
        assert_eq!(report.preview_state(), PreviewState::Overlap);
    }

    #[test]
    fn test_endpoint_connection_allowed() {
        let config = PlacementConfig::default();
        let validator = PlacementValidator::new(&config);
        let existing = vec![wall(1, [0.0, 0.0, 0.0], [10.0, 0.0, 0.0])];
        let ctx = PlacementContext::permissive();

        let (_, report) = validator.validate(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 10.0),
            &spec(),
            &existing,
            &ctx,
            false,
        );
        assert!(report.is_valid, "{}", report);
        assert_eq!(report.preview_state(), PreviewState::Valid);
    }

    #[test]
    fn test_midpoint_t_junction_allowed() {
        let config = PlacementConfig::default();
        let validator = PlacementValidator::new(&config);
        let existing = vec![wall(1, [0.0, 0.0, 0.0], [10.0, 0.0, 0.0])];

        let conflicts = validator.wall_conflicts(
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(5.0, 0.0, 8.0),
            &existing,
            false,
        );
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_collinear_fold_back_rejected() {
        let config = PlacementConfig::default();
        let validator = PlacementValidator::new(&config);
        let existing = vec![wall(1, [0.0, 0.0, 0.0], [10.0, 0.0, 0.0])];

        let conflicts = validator.wall_conflicts(
            Vec3::new(12.0, 0.0, 0.0),
            Vec3::new(6.0, 0.0, 0.0),
            &existing,
            false,
        );
        assert_eq!(conflicts, vec![SegmentId(1)]);
    }

    #[test]
    fn test_retracing_a_wall_rejected() {
        let config = PlacementConfig::default();
        let validator = PlacementValidator::new(&config);
        let existing = vec![wall(1, [0.0, 0.0, 0.0], [2.0, 0.0, 0.0])];

        let conflicts = validator.wall_conflicts(
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::ZERO,
            &existing,
            false,
        );
        assert_eq!(conflicts, vec![SegmentId(1)]);
    }

    #[test]
    fn test_fold_back_over_single_segment_rejected() {
        let config = PlacementConfig::default();
        let validator = PlacementValidator::new(&config);
        let existing = vec![wall(1, [0.0, 0.0, 0.0], [10.0, 0.0, 0.0])];

        // Starts on the wall's end pole and runs back along it
        let conflicts = validator.wall_conflicts(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            &existing,
            false,
        );
        assert_eq!(conflicts, vec![SegmentId(1)]);
    }

    #[test]
    fn test_straight_continuation_allowed() {
        let config = PlacementConfig::default();
        let validator = PlacementValidator::new(&config);
        let existing = vec![wall(1, [0.0, 0.0, 0.0], [10.0, 0.0, 0.0])];

        let conflicts = validator.wall_conflicts(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(18.0, 0.0, 0.0),
            &existing,
            false,
        );
        assert!(conflicts.is_empty());
    }

    #[test]
    fn test_running_along_from_midpoint_rejected() {
        let config = PlacementConfig::default();
        let validator = PlacementValidator::new(&config);
        let existing = vec![wall(1, [0.0, 0.0, 0.0], [10.0, 0.0, 0.0])];

        let conflicts = validator.wall_conflicts(
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(8.0, 0.0, 0.0),
            &existing,
            false,
        );
        assert_eq!(conflicts, vec![SegmentId(1)]);
    }

    #[test]
    fn test_loop_closing_widens_tolerance() {
        let config = PlacementConfig::default();
        let validator = PlacementValidator::new(&config);
        // End lands 0.3 past the start of the first wall, on its line
        let existing = vec![wall(1, [0.0, 0.0, 0.0], [0.0, 0.0, 10.0])];
        let start = Vec3::new(-8.0, 0.0, 0.0);
        let end = Vec3::new(0.3, 0.0, 0.0);

        assert_eq!(validator.wall_conflicts(start, end, &existing, false), vec![SegmentId(1)]);
        assert!(validator.wall_conflicts(start, end, &existing, true).is_empty());
    }

    #[test]
    fn test_all_failures_reported_together() {
        let config = PlacementConfig::default();
        let validator = PlacementValidator::new(&config);
        let existing = vec![wall(1, [0.0, 0.0, 0.0], [10.0, 0.0, 0.0])];
        let always_blocked = |_: Point3, _: Point3| true;
        let never_visible = |_: Point3| false;
        let mut poor = Stockpile::new();
        let ctx = PlacementContext::new(&always_blocked, &mut poor).with_visibility(&never_visible);

        let spec = spec().with_cost(ResourceCost::new().with(ResourceKind::Wood, 3));
        let (_, report) = validator.validate(
            Vec3::new(3.0, 0.0, -5.0),
            Vec3::new(3.0, 0.0, 5.0),
            &spec,
            &existing,
            &ctx,
            false,
        );

        assert_eq!(
            report.reasons.iter().copied().collect::<Vec<_>>(),
            vec![
                FailureReason::WallOverlap,
                FailureReason::BuildingOverlap,
                FailureReason::NotVisible,
                FailureReason::CannotAfford,
            ]
        );
        assert_eq!(report.segment_count, 5);
        assert_eq!(report.cost.get(ResourceKind::Wood), 15);
        assert!(report.summary().contains("Not enough resources"));
    }

    #[test]
    fn test_visibility_gate_can_be_disabled() {
        let config = PlacementConfig {
            require_visibility: false,
            ..PlacementConfig::default()
        };
        let validator = PlacementValidator::new(&config);
        let never_visible = |_: Point3| false;
        let mut bank = Unlimited;
        let ctx = PlacementContext::new(&NoObstacles, &mut bank).with_visibility(&never_visible);

        let (_, report) = validator.validate(
            Vec3::ZERO,
            Vec3::new(4.0, 0.0, 0.0),
            &spec(),
            &[],
            &ctx,
            false,
        );
        assert!(report.is_valid);
    }

    #[test]
    fn test_missing_visibility_service_is_permissive() {
        let config = PlacementConfig::default();
        let validator = PlacementValidator::new(&config);
        let ctx = PlacementContext::permissive();

        let (_, report) = validator.validate(
            Vec3::ZERO,
            Vec3::new(4.0, 0.0, 0.0),
            &spec(),
            &[],
            &ctx,
            false,
        );
        assert!(!report.has(FailureReason::NotVisible));
    }

    #[test]
    fn test_too_short_preview() {
        let config = PlacementConfig::default();
        let validator = PlacementValidator::new(&config);
        let ctx = PlacementContext::permissive();

        let (plan, report) = validator.validate(
            Vec3::ZERO,
            Vec3::new(0.2, 0.0, 0.0),
            &spec(),
            &[],
            &ctx,
            false,
        );
        assert!(plan.is_empty());
        assert_eq!(report.preview_state(), PreviewState::TooShort);
    }
}
