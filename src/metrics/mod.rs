//! Layout metrics: the four normalized readability scores produced by a
//! [`ReadabilityEngine`] plus the geometric statistics computed locally.

mod extended;
mod readability;

use serde::{Deserialize, Serialize};

pub use extended::{
    calculate_aspect_ratio, calculate_density, calculate_edge_length_stats,
    calculate_node_occlusion,
};
pub use readability::{Greadability, ReadabilityEngine, DEFAULT_IDEAL_CROSSING_ANGLE};

/// Normalized `[0, 1]` readability scores. Higher is better for every field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadabilityMetrics {
    pub crossing_number: f64,
    pub crossing_angle: f64,
    pub angular_resolution_min: f64,
    pub angular_resolution_dev: f64,
}

impl ReadabilityMetrics {
    /// Scores of a drawing with nothing to penalize.
    pub const PERFECT: Self = Self {
        crossing_number: 1.0,
        crossing_angle: 1.0,
        angular_resolution_min: 1.0,
        angular_resolution_dev: 1.0,
    };
}

impl Default for ReadabilityMetrics {
    fn default() -> Self {
        Self::PERFECT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeLengthStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedMetrics {
    #[serde(flatten)]
    pub readability: ReadabilityMetrics,
    pub edge_length: EdgeLengthStats,
    /// Count of overlapping node pairs.
    pub node_node_occlusion: usize,
    pub aspect_ratio: f64,
    pub density: f64,
}
