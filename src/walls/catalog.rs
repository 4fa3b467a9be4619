//! Wall types available to the placement tool
//!
//! A catalog is loaded from TOML. Each `[[wall]]` table describes one wall
//! asset: how its mesh is measured, how it is oriented, and what one unit
//! costs. The measured, validated form used during placement is
//! `WallUnitSpec`.
//!
//! ```toml
//! [[wall]]
//! id = "palisade"
//! name = "Wooden Palisade"
//! length_axis = "z"
//! bounds = [0.4, 3.0, 2.0]
//! min_scale_factor = 0.3
//! cost = { wood = 5 }
//! ```

use ahash::AHashMap;
use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::sizer::{WallLengthAxis, WallMeshSizer};
use crate::core::error::{RampartError, Result};
use crate::economy::ResourceCost;

/// Default lower bound on how far a remainder segment may shrink
pub const DEFAULT_MIN_SCALE_FACTOR: f32 = 0.3;

/// Everything the planner needs to know about one kind of wall
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WallUnitSpec {
    pub id: String,
    pub name: String,
    /// World length of one full unit along the length axis
    pub unit_length: f32,
    /// Remainders shorter than `unit_length * min_scale_factor` are dropped
    pub min_scale_factor: f32,
    /// Instance scale of a full unit
    pub base_scale: Vec3,
    pub length_axis: WallLengthAxis,
    /// Local orientation composed after the look rotation
    pub orientation: Quat,
    pub cost_per_unit: ResourceCost,
}

impl WallUnitSpec {
    /// A Z-axis wall with unit scale and no cost
    pub fn new(id: impl Into<String>, unit_length: f32, min_scale_factor: f32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            unit_length,
            min_scale_factor,
            base_scale: Vec3::ONE,
            length_axis: WallLengthAxis::Z,
            orientation: Quat::IDENTITY,
            cost_per_unit: ResourceCost::new(),
        }
    }

    /// Switch the length axis; resets orientation to that axis' alignment
    pub fn with_axis(mut self, axis: WallLengthAxis) -> Self {
        self.length_axis = axis;
        self.orientation = axis.alignment();
        self
    }

    pub fn with_base_scale(mut self, scale: Vec3) -> Self {
        self.base_scale = scale;
        self
    }

    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_cost(mut self, cost: ResourceCost) -> Self {
        self.cost_per_unit = cost;
        self
    }

    /// Shortest span or remainder that still gets its own segment
    pub fn min_segment_length(&self) -> f32 {
        self.unit_length * self.min_scale_factor
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| RampartError::InvalidWall {
            id: self.id.clone(),
            reason,
        };

        if !(self.unit_length > 0.0) || !self.unit_length.is_finite() {
            return Err(invalid(format!("unit_length must be positive (got {})", self.unit_length)));
        }
        if !(self.min_scale_factor > 0.0 && self.min_scale_factor <= 1.0) {
            return Err(invalid(format!(
                "min_scale_factor must be in (0, 1] (got {})",
                self.min_scale_factor
            )));
        }
        if self.base_scale.min_element() <= 0.0 {
            return Err(invalid(format!(
                "scale components must be positive (got {:?})",
                self.base_scale.to_array()
            )));
        }
        Ok(())
    }
}

/// TOML form of a catalog entry
#[derive(Debug, Clone, Deserialize)]
pub struct WallDef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub length_axis: WallLengthAxis,
    /// Mesh or collider extent in asset space
    #[serde(default)]
    pub bounds: Option<[f32; 3]>,
    /// Scale baked into the source asset's transform
    #[serde(default = "unit_scale")]
    pub mesh_scale: [f32; 3],
    /// Scale applied to each placed instance
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    #[serde(default = "default_min_scale")]
    pub min_scale_factor: f32,
    /// Euler offset in degrees; defaults to aligning the length axis
    #[serde(default)]
    pub orientation_deg: Option<[f32; 3]>,
    #[serde(default)]
    pub cost: ResourceCost,
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_min_scale() -> f32 {
    DEFAULT_MIN_SCALE_FACTOR
}

impl WallDef {
    /// Measure the asset and produce a validated spec
    pub fn to_spec(&self) -> Result<WallUnitSpec> {
        let scale = Vec3::from_array(self.scale);
        let unit_length = WallMeshSizer::measure(
            self.bounds.map(Vec3::from_array),
            Vec3::from_array(self.mesh_scale),
            scale,
            self.length_axis,
        );

        let orientation = match self.orientation_deg {
            Some([x, y, z]) => Quat::from_euler(
                EulerRot::YXZ,
                y.to_radians(),
                x.to_radians(),
                z.to_radians(),
            ),
            None => self.length_axis.alignment(),
        };

        let spec = WallUnitSpec {
            id: self.id.clone(),
            name: self.name.clone().unwrap_or_else(|| self.id.clone()),
            unit_length,
            min_scale_factor: self.min_scale_factor,
            base_scale: scale,
            length_axis: self.length_axis,
            orientation,
            cost_per_unit: self.cost.clone(),
        };
        spec.validate()?;
        Ok(spec)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "wall")]
    walls: Vec<WallDef>,
}

/// Registry of wall types by id, in load order
#[derive(Debug, Clone, Default)]
pub struct WallCatalog {
    specs: Vec<WallUnitSpec>,
    by_id: AHashMap<String, usize>,
}

impl WallCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a spec, replacing any earlier one with the same id
    pub fn register(&mut self, spec: WallUnitSpec) -> Result<()> {
        spec.validate()?;
        match self.by_id.get(&spec.id) {
            Some(&idx) => self.specs[idx] = spec,
            None => {
                self.by_id.insert(spec.id.clone(), self.specs.len());
                self.specs.push(spec);
            }
        }
        Ok(())
    }

    /// Parse a catalog from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile =
            toml::from_str(content).map_err(|e| RampartError::CatalogParse(e.to_string()))?;
        let mut catalog = Self::new();
        for def in &file.walls {
            catalog.register(def.to_spec()?)?;
        }
        tracing::debug!("Loaded {} wall types", catalog.len());
        Ok(catalog)
    }

    /// Load a catalog from a TOML file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| match e {
            RampartError::CatalogParse(msg) => {
                RampartError::CatalogParse(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn get(&self, id: &str) -> Result<&WallUnitSpec> {
        self.by_id
            .get(id)
            .map(|&idx| &self.specs[idx])
            .ok_or_else(|| RampartError::UnknownWall(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(|s| s.id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &WallUnitSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::ResourceKind;

    const SAMPLE: &str = r#"
        [[wall]]
        id = "palisade"
        name = "Wooden Palisade"
        length_axis = "z"
        bounds = [0.4, 3.0, 2.0]
        cost = { wood = 5 }

        [[wall]]
        id = "stone_wall"
        length_axis = "x"
        bounds = [4.0, 5.0, 1.0]
        mesh_scale = [0.5, 1.0, 1.0]
        scale = [1.5, 1.0, 1.0]
        min_scale_factor = 0.5
        cost = { stone = 8, wood = 1 }

        [[wall]]
        id = "hedge"
        scale = [1.0, 1.0, 0.5]
    "#;

    #[test]
    fn test_load_catalog() {
        let catalog = WallCatalog::from_toml_str(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.ids().collect::<Vec<_>>(), vec!["palisade", "stone_wall", "hedge"]);

        let palisade = catalog.get("palisade").unwrap();
        assert_eq!(palisade.name, "Wooden Palisade");
        assert_eq!(palisade.unit_length, 2.0);
        assert_eq!(palisade.min_scale_factor, DEFAULT_MIN_SCALE_FACTOR);
        assert_eq!(palisade.cost_per_unit.get(ResourceKind::Wood), 5);
    }

    #[test]
    fn test_measured_along_x_axis() {
        let catalog = WallCatalog::from_toml_str(SAMPLE).unwrap();
        let stone = catalog.get("stone_wall").unwrap();
        // 4.0 * 0.5 * 1.5
        assert!((stone.unit_length - 3.0).abs() < 1e-6);
        assert_eq!(stone.length_axis, WallLengthAxis::X);
        assert_eq!(stone.orientation, WallLengthAxis::X.alignment());
    }

    #[test]
    fn test_fallback_without_bounds() {
        let catalog = WallCatalog::from_toml_str(SAMPLE).unwrap();
        // Scale 0.5 on z floors to 1.0
        assert_eq!(catalog.get("hedge").unwrap().unit_length, 1.0);
    }

    #[test]
    fn test_unknown_wall() {
        let catalog = WallCatalog::from_toml_str(SAMPLE).unwrap();
        assert!(matches!(catalog.get("moat"), Err(RampartError::UnknownWall(_))));
    }

    #[test]
    fn test_invalid_min_scale_rejected() {
        let toml = r#"
            [[wall]]
            id = "bad"
            min_scale_factor = 1.5
        "#;
        assert!(matches!(
            WallCatalog::from_toml_str(toml),
            Err(RampartError::InvalidWall { .. })
        ));
    }

    #[test]
    fn test_parse_error_reported() {
        assert!(matches!(
            WallCatalog::from_toml_str("[[wall]]\nid = 3"),
            Err(RampartError::CatalogParse(_))
        ));
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut catalog = WallCatalog::new();
        catalog.register(WallUnitSpec::new("fence", 1.0, 0.3)).unwrap();
        catalog.register(WallUnitSpec::new("fence", 2.0, 0.3)).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("fence").unwrap().unit_length, 2.0);
    }

    #[test]
    fn test_orientation_override() {
        let toml = r#"
            [[wall]]
            id = "rotated"
            orientation_deg = [0.0, 90.0, 0.0]
        "#;
        let catalog = WallCatalog::from_toml_str(toml).unwrap();
        let q = catalog.get("rotated").unwrap().orientation;
        let forward = q * Vec3::Z;
        assert!(forward.distance(Vec3::X) < 1e-5);
    }
}
