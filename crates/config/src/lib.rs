//! Shared configuration for wingmesh
//!
//! This crate is the single source of truth for the tunables of the mesh
//! topology core: how close two positions must be to weld into one coincident
//! vertex, the default smoothing angle, and the weights used when walking the
//! face graph.

use serde::{Deserialize, Serialize};

#[cfg(feature = "bevy")]
use bevy::prelude::Resource;

/// Default coincident resolution in grid steps per world unit.
///
/// Positions closer than roughly `1 / resolution` collapse onto one grid cell.
pub const DEFAULT_COINCIDENT_RESOLUTION: f32 = 10_000.0;

/// Default smoothing angle threshold in degrees
pub const DEFAULT_SMOOTHING_ANGLE: f32 = 1.0;

/// Largest usable smoothing angle. At 90 degrees the dot threshold hits zero.
pub const MAX_SMOOTHING_ANGLE: f32 = 89.999;

/// Default fixed cost of stepping from one face to a neighbour
pub const DEFAULT_PATH_BASE_COST: f32 = 10.0;

/// Default multiplier applied to the centroid distance between two faces
pub const DEFAULT_PATH_DISTANCE_WEIGHT: f32 = 1.0;

/// Default multiplier applied to `1 - dot(n1, n2)` between two faces
pub const DEFAULT_PATH_NORMAL_WEIGHT: f32 = 2.0;

/// Weights of a single step across the face graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathWeights {
    /// Constant cost per crossed edge
    pub base_cost: f32,
    /// Multiplier for the distance between face centroids
    pub distance_weight: f32,
    /// Multiplier for the normal divergence between faces
    pub normal_weight: f32,
}

impl Default for PathWeights {
    fn default() -> Self {
        Self {
            base_cost: DEFAULT_PATH_BASE_COST,
            distance_weight: DEFAULT_PATH_DISTANCE_WEIGHT,
            normal_weight: DEFAULT_PATH_NORMAL_WEIGHT,
        }
    }
}

impl PathWeights {
    /// All weights finite and non-negative.
    ///
    /// A negative step cost would let a shortest path search loop forever.
    pub fn is_valid(&self) -> bool {
        [self.base_cost, self.distance_weight, self.normal_weight]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0)
    }

    /// Cost of one step given the centroid distance and the dot product of
    /// the two (normalized) face normals.
    pub fn step_cost(&self, centroid_distance: f32, normal_dot: f32) -> f32 {
        self.base_cost
            + self.distance_weight * centroid_distance
            + self.normal_weight * (1.0 - normal_dot)
    }
}

/// Topology configuration shared by the welding, smoothing and path tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "bevy", derive(Resource))]
#[serde(default)]
pub struct TopologyConfig {
    /// Grid steps per world unit used to quantize positions before welding
    pub coincident_resolution: f32,
    /// Smoothing angle threshold in degrees
    pub smoothing_angle: f32,
    /// Face graph step weights
    pub path: PathWeights,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            coincident_resolution: DEFAULT_COINCIDENT_RESOLUTION,
            smoothing_angle: DEFAULT_SMOOTHING_ANGLE,
            path: PathWeights::default(),
        }
    }
}

impl TopologyConfig {
    /// Create a config with the given smoothing angle and default everything else
    pub fn with_smoothing_angle(smoothing_angle: f32) -> Self {
        Self {
            smoothing_angle,
            ..Self::default()
        }
    }

    /// Smoothing angle clamped to the usable `[0, 89.999]` range
    pub fn clamped_smoothing_angle(&self) -> f32 {
        clamp_smoothing_angle(self.smoothing_angle)
    }

    /// Smallest position difference (in world units) that is still resolved
    pub fn weld_distance(&self) -> f32 {
        1.0 / self.coincident_resolution
    }
}

/// Clamp a smoothing angle in degrees to `[0, MAX_SMOOTHING_ANGLE]`.
///
/// NaN clamps to zero.
pub fn clamp_smoothing_angle(angle: f32) -> f32 {
    if angle.is_nan() {
        return 0.0;
    }
    angle.clamp(0.0, MAX_SMOOTHING_ANGLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TopologyConfig::default();
        assert_eq!(config.coincident_resolution, DEFAULT_COINCIDENT_RESOLUTION);
        assert_eq!(config.smoothing_angle, DEFAULT_SMOOTHING_ANGLE);
        assert_eq!(config.path, PathWeights::default());
    }

    #[test]
    fn test_weld_distance() {
        let config = TopologyConfig::default();
        assert!((config.weld_distance() - 1e-4).abs() < 1e-9);
    }

    #[test]
    fn test_clamped_smoothing_angle() {
        assert_eq!(TopologyConfig::with_smoothing_angle(90.0).clamped_smoothing_angle(), MAX_SMOOTHING_ANGLE);
        assert_eq!(TopologyConfig::with_smoothing_angle(-5.0).clamped_smoothing_angle(), 0.0);
        assert_eq!(clamp_smoothing_angle(f32::NAN), 0.0);
        assert_eq!(clamp_smoothing_angle(45.0), 45.0);
    }

    #[test]
    fn test_step_cost() {
        let weights = PathWeights::default();
        // Coplanar neighbours one unit apart
        assert_eq!(weights.step_cost(1.0, 1.0), 11.0);
        // Perpendicular neighbours
        assert_eq!(weights.step_cost(0.0, 0.0), 12.0);
    }

    #[test]
    fn test_path_weights_validity() {
        assert!(PathWeights::default().is_valid());
        assert!(PathWeights { base_cost: 0.0, distance_weight: 0.0, normal_weight: 0.0 }.is_valid());
        assert!(!PathWeights { base_cost: -10.0, ..PathWeights::default() }.is_valid());
        assert!(!PathWeights { normal_weight: f32::NAN, ..PathWeights::default() }.is_valid());
        assert!(!PathWeights { distance_weight: f32::INFINITY, ..PathWeights::default() }.is_valid());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TopologyConfig = serde_json::from_str(r#"{ "smoothing_angle": 30.0 }"#).unwrap();
        assert_eq!(config.smoothing_angle, 30.0);
        assert_eq!(config.coincident_resolution, DEFAULT_COINCIDENT_RESOLUTION);

        let text = serde_json::to_string(&config).unwrap();
        let back: TopologyConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
