//! Measures how long one wall unit is in world space

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// Floor for measured unit lengths; zero-size meshes would divide by zero
pub const MIN_UNIT_LENGTH: f32 = 0.1;

/// Floor used when no mesh or collider bounds are available
pub const MIN_FALLBACK_UNIT_LENGTH: f32 = 1.0;

/// Local axis of a wall asset along which units connect end-to-end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallLengthAxis {
    X,
    Y,
    #[default]
    Z,
}

impl WallLengthAxis {
    /// Component of `v` along this axis
    pub fn component(&self, v: Vec3) -> f32 {
        match self {
            WallLengthAxis::X => v.x,
            WallLengthAxis::Y => v.y,
            WallLengthAxis::Z => v.z,
        }
    }

    /// Copy of `v` with this axis' component replaced
    pub fn with_component(&self, mut v: Vec3, value: f32) -> Vec3 {
        match self {
            WallLengthAxis::X => v.x = value,
            WallLengthAxis::Y => v.y = value,
            WallLengthAxis::Z => v.z = value,
        }
        v
    }

    /// Unit vector of this axis in the asset's local space
    pub fn unit(&self) -> Vec3 {
        match self {
            WallLengthAxis::X => Vec3::X,
            WallLengthAxis::Y => Vec3::Y,
            WallLengthAxis::Z => Vec3::Z,
        }
    }

    /// Local rotation that lays this axis onto +Z (the look direction)
    pub fn alignment(&self) -> Quat {
        match self {
            WallLengthAxis::X => Quat::from_rotation_y(-FRAC_PI_2),
            WallLengthAxis::Y => Quat::from_rotation_x(FRAC_PI_2),
            WallLengthAxis::Z => Quat::IDENTITY,
        }
    }
}

pub struct WallMeshSizer;

impl WallMeshSizer {
    /// Unit length from bounds extent, asset scale and instance scale
    pub fn compute_unit_length(bounds_size: f32, mesh_local_scale: f32, instance_scale: f32) -> f32 {
        (bounds_size * mesh_local_scale * instance_scale).max(MIN_UNIT_LENGTH)
    }

    /// Unit length when the asset has no bounds to measure
    pub fn fallback_unit_length(instance_scale: f32) -> f32 {
        instance_scale.max(MIN_FALLBACK_UNIT_LENGTH)
    }

    /// Measure along `axis`, falling back to the instance scale without bounds
    pub fn measure(
        bounds: Option<Vec3>,
        mesh_local_scale: Vec3,
        instance_scale: Vec3,
        axis: WallLengthAxis,
    ) -> f32 {
        match bounds {
            Some(size) => Self::compute_unit_length(
                axis.component(size),
                axis.component(mesh_local_scale),
                axis.component(instance_scale),
            ),
            None => Self::fallback_unit_length(axis.component(instance_scale)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_length_is_product() {
        let len = WallMeshSizer::compute_unit_length(2.0, 0.5, 3.0);
        assert!((len - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_size_mesh_floored() {
        assert_eq!(WallMeshSizer::compute_unit_length(0.0, 1.0, 1.0), MIN_UNIT_LENGTH);
    }

    #[test]
    fn test_fallback_floored_to_one() {
        assert_eq!(WallMeshSizer::fallback_unit_length(0.4), 1.0);
        assert_eq!(WallMeshSizer::fallback_unit_length(2.5), 2.5);
    }

    #[test]
    fn test_measure_picks_axis() {
        let bounds = Vec3::new(0.5, 3.0, 4.0);
        let x = WallMeshSizer::measure(Some(bounds), Vec3::ONE, Vec3::ONE, WallLengthAxis::X);
        let z = WallMeshSizer::measure(Some(bounds), Vec3::ONE, Vec3::new(1.0, 1.0, 0.5), WallLengthAxis::Z);
        assert_eq!(x, 0.5);
        assert_eq!(z, 2.0);
    }

    #[test]
    fn test_measure_without_bounds() {
        let len = WallMeshSizer::measure(None, Vec3::ONE, Vec3::new(1.0, 1.0, 3.0), WallLengthAxis::Z);
        assert_eq!(len, 3.0);
    }

    #[test]
    fn test_alignment_maps_axis_to_forward() {
        for axis in [WallLengthAxis::X, WallLengthAxis::Y, WallLengthAxis::Z] {
            let forward = axis.alignment() * axis.unit();
            assert!(forward.distance(Vec3::Z) < 1e-5, "{:?} -> {:?}", axis, forward);
        }
    }

    #[test]
    fn test_with_component() {
        let v = WallLengthAxis::Y.with_component(Vec3::ONE, 0.25);
        assert_eq!(v, Vec3::new(1.0, 0.25, 1.0));
    }
}
