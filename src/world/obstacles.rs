//! Building footprints that walls may not cut through
//!
//! A wall span is probed as a capsule: the segment between the poles,
//! widened by a radius. It is blocked when it crosses or enters a footprint
//! or passes within the radius of one.

use geo::{Intersects, Line, LineString, Polygon};
use glam::Vec2;

use super::query::ObstacleQuery;
use crate::core::types::{flatten, Point3};
use crate::spatial::segment::point_segment_distance;

/// One building's footprint on the (x, z) plane
#[derive(Debug, Clone)]
pub struct Footprint {
    pub id: String,
    vertices: Vec<Vec2>,
    polygon: Polygon<f64>,
}

impl Footprint {
    /// Build a footprint from [x, z] vertices; None with fewer than 3
    pub fn new(id: impl Into<String>, vertices: &[[f32; 2]]) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let vertices: Vec<Vec2> = vertices.iter().map(|[x, z]| Vec2::new(*x, *z)).collect();
        let polygon = to_geo_polygon(&vertices);
        Some(Self {
            id: id.into(),
            vertices,
            polygon,
        })
    }

    /// Axis-aligned rectangle centred on a world point
    pub fn rect(id: impl Into<String>, center: Point3, size: Vec2) -> Self {
        let c = flatten(center);
        let h = size * 0.5;
        let vertices = vec![
            Vec2::new(c.x - h.x, c.y - h.y),
            Vec2::new(c.x + h.x, c.y - h.y),
            Vec2::new(c.x + h.x, c.y + h.y),
            Vec2::new(c.x - h.x, c.y + h.y),
        ];
        let polygon = to_geo_polygon(&vertices);
        Self {
            id: id.into(),
            vertices,
            polygon,
        }
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Whether a capsule of `radius` around a-b touches this footprint
    pub fn blocks(&self, a: Vec2, b: Vec2, radius: f32) -> bool {
        let line = Line::new(
            (a.x as f64, a.y as f64),
            (b.x as f64, b.y as f64),
        );
        if line.intersects(&self.polygon) {
            return true;
        }
        radius > 0.0 && self.edge_distance(a, b) <= radius
    }

    /// Shortest distance between a non-crossing segment and the outline
    fn edge_distance(&self, a: Vec2, b: Vec2) -> f32 {
        let n = self.vertices.len();
        (0..n)
            .map(|i| {
                let p = self.vertices[i];
                let q = self.vertices[(i + 1) % n];
                point_segment_distance(a, p, q)
                    .min(point_segment_distance(b, p, q))
                    .min(point_segment_distance(p, a, b))
                    .min(point_segment_distance(q, a, b))
            })
            .fold(f32::INFINITY, f32::min)
    }
}

fn to_geo_polygon(vertices: &[Vec2]) -> Polygon<f64> {
    let mut coords: Vec<(f64, f64)> = vertices
        .iter()
        .map(|v| (v.x as f64, v.y as f64))
        .collect();
    // Close the ring
    if let Some(first) = coords.first().cloned() {
        coords.push(first);
    }
    Polygon::new(LineString::from(coords), vec![])
}

/// All building footprints known to the placement tool
#[derive(Debug, Clone)]
pub struct BuildingFootprints {
    footprints: Vec<Footprint>,
    radius: f32,
}

impl BuildingFootprints {
    /// Create an empty set probed with the given capsule radius
    pub fn new(radius: f32) -> Self {
        Self {
            footprints: Vec::new(),
            radius: radius.max(0.0),
        }
    }

    pub fn add(&mut self, footprint: Footprint) {
        self.footprints.push(footprint);
    }

    pub fn len(&self) -> usize {
        self.footprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }

    /// Ids of every footprint a span from start to end would touch
    pub fn blocking(&self, start: Point3, end: Point3) -> Vec<&str> {
        let (a, b) = (flatten(start), flatten(end));
        self.footprints
            .iter()
            .filter(|f| f.blocks(a, b, self.radius))
            .map(|f| f.id.as_str())
            .collect()
    }
}

impl ObstacleQuery for BuildingFootprints {
    fn is_blocked(&self, start: Point3, end: Point3) -> bool {
        let (a, b) = (flatten(start), flatten(end));
        self.footprints.iter().any(|f| f.blocks(a, b, self.radius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn barracks() -> BuildingFootprints {
        let mut buildings = BuildingFootprints::new(0.25);
        buildings.add(Footprint::rect("barracks", Vec3::new(5.0, 0.0, 5.0), Vec2::new(4.0, 4.0)));
        buildings
    }

    #[test]
    fn test_span_through_building_blocked() {
        let buildings = barracks();
        assert!(buildings.is_blocked(Vec3::new(0.0, 0.0, 5.0), Vec3::new(10.0, 0.0, 5.0)));
        assert_eq!(
            buildings.blocking(Vec3::new(0.0, 0.0, 5.0), Vec3::new(10.0, 0.0, 5.0)),
            vec!["barracks"]
        );
    }

    #[test]
    fn test_span_inside_building_blocked() {
        let buildings = barracks();
        assert!(buildings.is_blocked(Vec3::new(4.5, 0.0, 5.0), Vec3::new(5.5, 0.0, 5.0)));
    }

    #[test]
    fn test_capsule_grazes_building() {
        let buildings = barracks();
        // Passes 0.2 from the north wall of the footprint (z = 7)
        assert!(buildings.is_blocked(Vec3::new(0.0, 0.0, 7.2), Vec3::new(10.0, 0.0, 7.2)));
        // 1 unit clear
        assert!(!buildings.is_blocked(Vec3::new(0.0, 0.0, 8.0), Vec3::new(10.0, 0.0, 8.0)));
    }

    #[test]
    fn test_footprint_needs_three_vertices() {
        assert!(Footprint::new("pole", &[[0.0, 0.0], [1.0, 0.0]]).is_none());
        assert!(Footprint::new("hut", &[[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]).is_some());
    }
}
