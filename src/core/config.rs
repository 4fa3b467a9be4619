//! Placement configuration with documented tolerances
//!
//! All magic numbers used by the geometry and validation passes live here,
//! with notes on how they interact with each other.

use serde::Deserialize;
use std::path::Path;

use super::error::{RampartError, Result};

/// Configuration for wall placement
///
/// The defaults suit wall units between roughly 1 and 10 world units long.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    // === ENDPOINT MATCHING ===
    /// Distance under which two segment endpoints count as the same point
    ///
    /// Touching at a shared endpoint is always legal, so this must stay
    /// small enough that a genuine crossing near a pole is still caught.
    pub endpoint_tolerance: f32,

    /// Endpoint tolerance used while closing a loop back to the first pole
    ///
    /// The final span of a loop has to touch the start of the chain, and
    /// the first pole is usually clicked by hand, so this is much looser.
    /// Must be >= endpoint_tolerance.
    pub loop_closing_tolerance: f32,

    // === OVERLAP ===
    /// Collinear overlap shorter than this is treated as two walls kissing
    pub min_overlap_length: f32,

    /// Cross product magnitude under which two directions are parallel
    pub parallel_epsilon: f32,

    /// Perpendicular distance under which a point lies on a segment's line
    pub collinear_epsilon: f32,

    // === SNAPPING ===
    /// Radius for grabbing an existing wall's start, end or midpoint
    pub snap_radius: f32,

    // === OBSTACLES ===
    /// Half-width of the capsule swept along a span when probing buildings
    pub obstacle_radius: f32,

    // === FOG OF WAR ===
    /// Whether both poles must be visible to the player
    ///
    /// When set and no visibility service is wired in, every point counts
    /// as visible.
    pub require_visibility: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            endpoint_tolerance: 0.01,
            loop_closing_tolerance: 0.5,

            min_overlap_length: 0.05,
            parallel_epsilon: 1e-4,
            collinear_epsilon: 0.01,

            snap_radius: 1.0,

            obstacle_radius: 0.25,

            require_visibility: true,
        }
    }
}

impl PlacementConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PlacementConfig =
            toml::from_str(content).map_err(|e| RampartError::InvalidConfig(e.to_string()))?;
        config.validate().map_err(RampartError::InvalidConfig)?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Tolerance for endpoint matching, widened while closing a loop
    pub fn endpoint_tolerance_for(&self, closing_loop: bool) -> f32 {
        if closing_loop {
            self.loop_closing_tolerance
        } else {
            self.endpoint_tolerance
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        let positive = [
            ("endpoint_tolerance", self.endpoint_tolerance),
            ("loop_closing_tolerance", self.loop_closing_tolerance),
            ("parallel_epsilon", self.parallel_epsilon),
            ("collinear_epsilon", self.collinear_epsilon),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(format!("{} must be positive (got {})", name, value));
            }
        }

        if self.min_overlap_length < 0.0 || self.snap_radius < 0.0 || self.obstacle_radius < 0.0 {
            return Err("min_overlap_length, snap_radius and obstacle_radius must be >= 0".into());
        }

        if self.loop_closing_tolerance < self.endpoint_tolerance {
            return Err(format!(
                "loop_closing_tolerance ({}) should be >= endpoint_tolerance ({})",
                self.loop_closing_tolerance, self.endpoint_tolerance
            ));
        }

        Ok(())
    }
}
