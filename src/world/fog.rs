//! Fog of war on a square cell grid
//!
//! Cells start unknown, become visible when revealed, and fall back to
//! explored when vision is withdrawn. Only visible cells allow building.

use ahash::AHashMap;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::query::VisibilityQuery;
use crate::core::types::{flatten, Point3};

/// Visibility state for a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellVisibility {
    /// Never seen
    #[default]
    Unknown,
    /// Previously seen but not currently observed
    Explored,
    /// Currently observed
    Visible,
}

/// Grid of per-cell visibility for the building player
#[derive(Debug, Clone)]
pub struct FogMap {
    cells: AHashMap<(i32, i32), CellVisibility>,
    cell_size: f32,
}

impl FogMap {
    /// Create a new FogMap with default cell size of 1.0
    pub fn new() -> Self {
        Self::with_cell_size(1.0)
    }

    /// Create a new FogMap with specified cell size
    pub fn with_cell_size(cell_size: f32) -> Self {
        Self {
            cells: AHashMap::new(),
            cell_size: cell_size.max(f32::EPSILON),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Convert a horizontal position to cell coordinates
    pub fn world_to_cell(&self, pos: Vec2) -> (i32, i32) {
        let x = (pos.x / self.cell_size).floor() as i32;
        let y = (pos.y / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Mark a single cell visible
    pub fn reveal_cell(&mut self, x: i32, y: i32) {
        self.cells.insert((x, y), CellVisibility::Visible);
    }

    /// Reveal every cell whose center lies within `radius` of `center`
    pub fn reveal_radius(&mut self, center: Point3, radius: f32) {
        let c = flatten(center);
        let (min_x, min_y) = self.world_to_cell(c - Vec2::splat(radius));
        let (max_x, max_y) = self.world_to_cell(c + Vec2::splat(radius));

        for cy in min_y..=max_y {
            for cx in min_x..=max_x {
                let cell_center = Vec2::new(
                    (cx as f32 + 0.5) * self.cell_size,
                    (cy as f32 + 0.5) * self.cell_size,
                );
                if cell_center.distance(c) <= radius {
                    self.reveal_cell(cx, cy);
                }
            }
        }
    }

    /// Withdraw vision everywhere; visible cells become explored
    pub fn hide_all(&mut self) {
        for state in self.cells.values_mut() {
            if *state == CellVisibility::Visible {
                *state = CellVisibility::Explored;
            }
        }
    }

    /// Visibility of the cell containing a world point
    pub fn visibility_at(&self, point: Point3) -> CellVisibility {
        let cell = self.world_to_cell(flatten(point));
        self.cells.get(&cell).copied().unwrap_or_default()
    }

    /// Number of currently visible cells
    pub fn visible_count(&self) -> usize {
        self.cells
            .values()
            .filter(|s| **s == CellVisibility::Visible)
            .count()
    }
}

impl Default for FogMap {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilityQuery for FogMap {
    fn is_visible(&self, point: Point3) -> bool {
        self.visibility_at(point) == CellVisibility::Visible
    }
}
