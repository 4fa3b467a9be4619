//! One "drag out a wall chain" interaction
//!
//! The player drops a first pole, then clicks further poles. Each click is
//! validated as a single span from the current pole; accepted spans are
//! paid for, spawned, and the next span continues from the new pole.
//! Clicking back near the chain's first pole closes the loop and ends the
//! chain.
//!
//! All committed segments stay in the session so later chains are checked
//! against them. The current chain is the tail of that list.

use serde::Serialize;

use super::catalog::WallUnitSpec;
use super::planner::SegmentPlan;
use super::segment::PlacedSegment;
use super::snap::{try_snap_to_nearby_wall, SnapTarget};
use super::spawn::WallSpawner;
use super::validator::{PlacementContext, PlacementValidator, PreviewState, ValidationReport};
use crate::core::config::PlacementConfig;
use crate::core::error::{RampartError, Result};
use crate::core::types::{planar_distance, EntityHandle, Point3, SegmentId};
use crate::economy::ResourceCost;

/// Spans a chain needs before clicking the first pole closes a loop
const MIN_SPANS_TO_CLOSE: usize = 2;

/// What the pointer would build if clicked now
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    /// End pole after snapping
    pub end: Point3,
    pub closing_loop: bool,
    pub plan: SegmentPlan,
    pub report: ValidationReport,
    pub state: PreviewState,
}

/// Result of a committed span
#[derive(Debug, Clone, Serialize)]
pub struct PlacementOutcome {
    pub segments: Vec<SegmentId>,
    pub entities: Vec<EntityHandle>,
    pub cost: ResourceCost,
    /// Pole the chain continues from
    pub end: Point3,
    /// Remainder dropped because it was too short for its own segment
    pub shortfall: f32,
    pub closed_loop: bool,
}

#[derive(Debug, Clone)]
pub struct PlacementSession {
    spec: WallUnitSpec,
    config: PlacementConfig,
    /// Every segment committed so far; the current chain is the tail
    segments: Vec<PlacedSegment>,
    chain_start: usize,
    chain_spans: usize,
    first_pole: Option<Point3>,
    current_pole: Option<Point3>,
    next_id: u64,
}

impl PlacementSession {
    pub fn new(spec: WallUnitSpec, config: PlacementConfig) -> Self {
        Self {
            spec,
            config,
            segments: Vec::new(),
            chain_start: 0,
            chain_spans: 0,
            first_pole: None,
            current_pole: None,
            next_id: 1,
        }
    }

    /// Seed the session with walls that already stand in the world
    pub fn with_existing(mut self, existing: Vec<PlacedSegment>) -> Self {
        let max_id = existing.iter().map(|s| s.id.0).max().unwrap_or(0);
        self.next_id = self.next_id.max(max_id + 1);
        // Seeded walls sit before the current chain
        let chain: Vec<PlacedSegment> = self.segments.drain(self.chain_start..).collect();
        self.segments.extend(existing);
        self.chain_start = self.segments.len();
        self.segments.extend(chain);
        self
    }

    pub fn spec(&self) -> &WallUnitSpec {
        &self.spec
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Segments of the chain being dragged out
    pub fn chain(&self) -> &[PlacedSegment] {
        &self.segments[self.chain_start..]
    }

    /// Segments from earlier chains and seeded walls
    pub fn settled(&self) -> &[PlacedSegment] {
        &self.segments[..self.chain_start]
    }

    pub fn all_segments(&self) -> &[PlacedSegment] {
        &self.segments
    }

    pub fn first_pole(&self) -> Option<Point3> {
        self.first_pole
    }

    pub fn current_pole(&self) -> Option<Point3> {
        self.current_pole
    }

    pub fn is_active(&self) -> bool {
        self.current_pole.is_some()
    }

    /// Snap a point to the nearest existing wall anchor, if any is close
    pub fn snap(&self, point: Point3) -> Option<SnapTarget> {
        try_snap_to_nearby_wall(point, self.config.snap_radius, &self.segments)
    }

    /// Drop the first pole of a new chain; returns the pole after snapping
    ///
    /// A chain still in progress is finished first.
    pub fn begin(&mut self, point: Point3) -> Point3 {
        if self.is_active() {
            self.finish_chain();
        }
        let pole = match self.snap(point) {
            Some(target) => {
                tracing::debug!("First pole snapped to {:?} of {}", target.anchor, target.segment);
                target.point
            }
            None => point,
        };
        self.first_pole = Some(pole);
        self.current_pole = Some(pole);
        pole
    }

    /// Where a click at `end` would actually land, and whether it closes the loop
    ///
    /// Once the chain is long enough, a click near the first pole, or one
    /// that snaps onto it, closes the loop.
    fn resolve_end(&self, end: Point3) -> (Point3, bool) {
        let first = self
            .first_pole
            .filter(|_| self.chain_spans >= MIN_SPANS_TO_CLOSE);
        if let Some(first) = first {
            if planar_distance(end, first) <= self.config.loop_closing_tolerance {
                return (first, true);
            }
        }
        match (self.snap(end), first) {
            (Some(target), Some(first))
                if planar_distance(target.point, first) <= self.config.endpoint_tolerance =>
            {
                (first, true)
            }
            (Some(target), _) => (target.point, false),
            (None, _) => (end, false),
        }
    }

    /// Evaluate a span from the current pole without committing anything
    pub fn preview(&self, end: Point3, ctx: &PlacementContext<'_>) -> Result<Preview> {
        let start = self.current_pole.ok_or(RampartError::NoActivePole)?;
        let (end, closing_loop) = self.resolve_end(end);
        let validator = PlacementValidator::new(&self.config);
        let (plan, report) =
            validator.validate(start, end, &self.spec, &self.segments, ctx, closing_loop);
        let state = report.preview_state();
        Ok(Preview {
            end,
            closing_loop,
            plan,
            report,
            state,
        })
    }

    /// Validate, pay for and spawn a span from the current pole to `end`
    ///
    /// On rejection the session is left untouched and the error carries
    /// every failure reason.
    pub fn place(
        &mut self,
        end: Point3,
        ctx: &mut PlacementContext<'_>,
        spawner: &mut dyn WallSpawner,
    ) -> Result<PlacementOutcome> {
        let Preview {
            end,
            closing_loop,
            plan,
            report,
            ..
        } = self.preview(end, ctx)?;

        if !report.is_valid {
            tracing::warn!("Rejected {} span: {}", self.spec.id, report);
            return Err(RampartError::Rejected(report));
        }

        if !report.cost.is_free() && !ctx.resources.spend(&report.cost) {
            tracing::warn!("Could not spend {} for {} span", report.cost, self.spec.id);
            return Err(RampartError::SpendFailed(report.cost.to_string()));
        }

        let mut placed = plan.into_placed(self.next_id);
        self.next_id += placed.len() as u64;

        let mut entities = Vec::with_capacity(placed.len());
        for seg in &mut placed {
            let handle = spawner.spawn_segment(seg.pose(), seg.scale);
            seg.entity = Some(handle);
            entities.push(handle);
        }

        let ids: Vec<SegmentId> = placed.iter().map(|s| s.id).collect();
        tracing::info!(
            "Placed {} x {} ({:.2} units, cost {})",
            ids.len(),
            self.spec.id,
            plan.covered_length(),
            report.cost
        );

        self.segments.extend(placed);
        self.current_pole = Some(end);
        self.chain_spans += 1;

        if closing_loop {
            tracing::info!("Closed wall loop after {} spans", self.chain_spans);
            self.finish_chain();
        }

        Ok(PlacementOutcome {
            segments: ids,
            entities,
            cost: report.cost,
            end,
            shortfall: plan.shortfall(),
            closed_loop: closing_loop,
        })
    }

    /// End the current chain; its segments stay as settled walls
    pub fn finish_chain(&mut self) {
        self.chain_start = self.segments.len();
        self.chain_spans = 0;
        self.first_pole = None;
        self.current_pole = None;
    }

    /// Abandon the chain in progress
    ///
    /// Nothing uncommitted has touched the world, so this only clears the
    /// poles and the chain list. Spans already spawned remain as walls.
    pub fn cancel(&mut self) {
        if self.is_active() {
            tracing::debug!("Cancelled chain with {} segments", self.chain().len());
        }
        self.finish_chain();
    }
}
